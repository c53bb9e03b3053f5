//! Project walker - collects candidate controller sources from disk

use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::models::{DiscoveryReport, SourceFile};
use crate::discovery::scanner::discover;

/// Directories that only hold build output or tooling state
const SKIPPED_DIRS: &[&str] = &["target", "build", "out", ".git", ".gradle", "node_modules"];

const SOURCE_EXTENSIONS: &[&str] = &["java", "kt"];

/// Find source files under `root`, sorted by path
pub fn find_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    collect(root, &mut files);
    files.sort();
    files
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|name| SKIPPED_DIRS.contains(&name))
                .unwrap_or(false);
            if !skipped {
                collect(&path, files);
            }
        } else if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if SOURCE_EXTENSIONS.contains(&ext) {
                files.push(path);
            }
        }
    }
}

/// Read every source file under `root`. Unreadable files are skipped.
pub fn load_sources(root: &Path) -> Vec<SourceFile> {
    find_source_files(root)
        .into_iter()
        .filter_map(|path| match fs::read_to_string(&path) {
            Ok(text) => Some(SourceFile::new(path.display().to_string(), text)),
            Err(e) => {
                tracing::debug!(file = %path.display(), error = %e, "Skipping unreadable source");
                None
            }
        })
        .collect()
}

/// Scan a project directory. A missing directory yields an empty inventory.
pub fn discover_workspace(root: &Path) -> DiscoveryReport {
    discover(&load_sources(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CONTROLLER: &str = "@RestController\n@RequestMapping(\"/api\")\nclass Users {\n  @GetMapping(\"/users/{id}\")\n  void get() {}\n}";

    #[test]
    fn test_skips_build_output() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src/main/java");
        let target = dir.path().join("target/classes");
        let build = dir.path().join("build/generated");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&target).unwrap();
        fs::create_dir_all(&build).unwrap();

        fs::write(src.join("Users.java"), CONTROLLER).unwrap();
        fs::write(src.join("Notes.kt"), "class Notes").unwrap();
        fs::write(src.join("README.md"), "@RestController").unwrap();
        fs::write(target.join("Copy.java"), CONTROLLER).unwrap();
        fs::write(build.join("Gen.java"), CONTROLLER).unwrap();

        let files = find_source_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| !f.starts_with(dir.path().join("target"))));
    }

    #[test]
    fn test_discover_workspace() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Users.java"), CONTROLLER).unwrap();

        let report = discover_workspace(dir.path());
        assert_eq!(report.endpoints.len(), 1);
        assert_eq!(report.endpoints[0].path, "/api/users/{id}");
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let report = discover_workspace(&dir.path().join("does-not-exist"));
        assert!(report.endpoints.is_empty());
    }
}
