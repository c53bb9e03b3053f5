//! Spring annotation matchers
//!
//! Each matcher recognizes one annotation shape and reports what it found as
//! a [`CandidateMapping`]. The scanner turns candidates into endpoints, so a
//! new annotation spelling only needs a new matcher.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::HttpMethod;

/// A mapping annotation found in a source file, before the class base path
/// has been applied
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateMapping {
    pub method: HttpMethod,
    /// Path fragment from the annotation, empty when none was given
    pub sub_path: String,
    /// Byte offset of the annotation in the file
    pub offset: usize,
}

/// A controller source file with its class-level facts resolved
#[derive(Clone, Debug)]
pub struct SourceUnit<'a> {
    pub text: &'a str,
    /// Class-level `@RequestMapping` path, empty when absent
    pub base_path: String,
    /// First `class <Name>` declaration outside comments
    pub declaring_unit: Option<String>,
    /// Offset of the annotation that supplied `base_path`
    class_mapping_offset: Option<usize>,
}

impl<'a> SourceUnit<'a> {
    /// Returns `None` unless the text carries a controller annotation
    pub fn parse(text: &'a str) -> Option<SourceUnit<'a>> {
        static CONTROLLER: OnceLock<Regex> = OnceLock::new();
        static CLASS_DECL: OnceLock<Regex> = OnceLock::new();

        let controller_re = CONTROLLER
            .get_or_init(|| Regex::new(r"@(?:RestController|Controller)\b").unwrap());
        if !controller_re.is_match(text) {
            return None;
        }

        // Offsets in `code` line up with `text`; only comment bytes differ
        let code = mask_comments(text);
        let class_re = CLASS_DECL.get_or_init(|| {
            Regex::new(
                r"(?m)^[ \t]*(?:@\w+(?:\([^)\n]*\))?[ \t]+)*(?:(?:public|protected|private|internal|abstract|final|open|data|sealed|static)[ \t]+)*(class)[ \t]+([A-Za-z_][A-Za-z0-9_]*)",
            )
            .unwrap()
        });
        let class_match = class_re.captures(&code);
        let declaring_unit = class_match
            .as_ref()
            .and_then(|caps| caps.get(2))
            .map(|m| m.as_str().to_string());
        let class_offset = class_match
            .and_then(|caps| caps.get(1))
            .map(|m| m.start())
            .unwrap_or(code.len());

        let (base_path, class_mapping_offset) = match class_base_path(&code[..class_offset]) {
            Some((path, offset)) => (path, Some(offset)),
            None => (String::new(), None),
        };

        Some(SourceUnit {
            text,
            base_path,
            declaring_unit,
            class_mapping_offset,
        })
    }

    fn is_class_mapping(&self, offset: usize) -> bool {
        self.class_mapping_offset == Some(offset)
    }
}

/// Blank out `//` and `/* */` comments, keeping every byte offset and line
/// break in place. String and char literals are left untouched.
fn mask_comments(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum Mode {
        Code,
        Line,
        Block,
        Quoted(char),
    }

    let mut out = String::with_capacity(text.len());
    let mut mode = Mode::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match mode {
            Mode::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    out.push_str("  ");
                    mode = Mode::Line;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    out.push_str("  ");
                    mode = Mode::Block;
                }
                '"' | '\'' => {
                    out.push(c);
                    mode = Mode::Quoted(c);
                }
                _ => out.push(c),
            },
            Mode::Quoted(quote) => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == quote || c == '\n' {
                    mode = Mode::Code;
                }
            }
            Mode::Line => {
                if c == '\n' {
                    out.push('\n');
                    mode = Mode::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            Mode::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    mode = Mode::Code;
                } else if c == '\n' {
                    out.push('\n');
                } else {
                    blank(&mut out, c);
                }
            }
        }
    }

    out
}

fn blank(out: &mut String, c: char) {
    out.extend(std::iter::repeat(' ').take(c.len_utf8()));
}

/// Find `@RequestMapping("/x")`, then `@RequestMapping(value = "/x")` /
/// `@RequestMapping(path = "/x")`, in the class header
fn class_base_path(header: &str) -> Option<(String, usize)> {
    static POSITIONAL: OnceLock<Regex> = OnceLock::new();
    static KEYED: OnceLock<Regex> = OnceLock::new();

    let positional_re = POSITIONAL
        .get_or_init(|| Regex::new(r#"@RequestMapping\(\s*"([^"]+)"\s*\)"#).unwrap());
    let keyed_re = KEYED.get_or_init(|| {
        Regex::new(r#"@RequestMapping\(\s*(?:value|path)\s*=\s*"([^"]+)"\s*\)"#).unwrap()
    });

    [positional_re, keyed_re].iter().find_map(|re| {
        re.captures(header).and_then(|caps| {
            let whole = caps.get(0)?;
            let path = caps.get(1)?;
            Some((path.as_str().to_string(), whole.start()))
        })
    })
}

/// One annotation shape
pub trait MappingMatcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn candidates(&self, unit: &SourceUnit<'_>) -> Vec<CandidateMapping>;
}

/// `@GetMapping`, `@PostMapping("/x")`, `@PutMapping(value = "/x")`, `@DeleteMapping()` ...
pub struct ShorthandMappingMatcher;

impl MappingMatcher for ShorthandMappingMatcher {
    fn name(&self) -> &'static str {
        "shorthand"
    }

    fn candidates(&self, unit: &SourceUnit<'_>) -> Vec<CandidateMapping> {
        static SHORTHAND: OnceLock<Regex> = OnceLock::new();
        let re = SHORTHAND.get_or_init(|| {
            Regex::new(
                r#"@(Get|Post|Put|Delete|Patch)Mapping(?:\(\s*(?:value|path)\s*=\s*"([^"]+)"\s*\)|\(\s*"([^"]+)"\s*\)|\(\s*\))?"#,
            )
            .unwrap()
        });

        re.captures_iter(unit.text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let verb = caps.get(1)?.as_str();
                let sub_path = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                Some(CandidateMapping {
                    method: HttpMethod::from_token(verb),
                    sub_path,
                    offset: whole.start(),
                })
            })
            .collect()
    }
}

/// `@RequestMapping(method = RequestMethod.POST, value = "/x")`
///
/// A match naming neither a verb nor a path is not a route and is dropped.
pub struct RequestMappingMatcher;

impl MappingMatcher for RequestMappingMatcher {
    fn name(&self) -> &'static str {
        "request-mapping"
    }

    fn candidates(&self, unit: &SourceUnit<'_>) -> Vec<CandidateMapping> {
        static GENERIC: OnceLock<Regex> = OnceLock::new();
        static VERB: OnceLock<Regex> = OnceLock::new();
        static PATH: OnceLock<Regex> = OnceLock::new();

        let generic_re = GENERIC.get_or_init(|| Regex::new(r"@RequestMapping\(([^)]*)\)").unwrap());
        let verb_re = VERB
            .get_or_init(|| Regex::new(r"method\s*=\s*RequestMethod\.([A-Z]+)").unwrap());
        let path_re = PATH
            .get_or_init(|| Regex::new(r#"(?:value|path)\s*=\s*"([^"]+)""#).unwrap());

        generic_re
            .captures_iter(unit.text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                if unit.is_class_mapping(whole.start()) {
                    return None;
                }
                let args = caps.get(1)?.as_str();

                let verb = verb_re
                    .captures(args)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str());
                let path = path_re
                    .captures(args)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str());

                if verb.is_none() && path.is_none() {
                    return None;
                }

                Some(CandidateMapping {
                    method: verb.map(HttpMethod::from_token).unwrap_or_default(),
                    sub_path: path.unwrap_or_default().to_string(),
                    offset: whole.start(),
                })
            })
            .collect()
    }
}

/// Matchers in the order their candidates are emitted
pub fn default_matchers() -> Vec<Box<dyn MappingMatcher>> {
    vec![
        Box::new(ShorthandMappingMatcher),
        Box::new(RequestMappingMatcher),
    ]
}
