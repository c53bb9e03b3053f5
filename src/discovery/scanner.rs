//! Spring controller scanner - turns source text into an endpoint inventory

use std::collections::HashMap;
use std::thread;

use crate::discovery::matchers::{default_matchers, MappingMatcher, SourceUnit};
use crate::discovery::models::{DiscoveryReport, Endpoint, SourceFile};
use crate::path_template;

/// Upper bound on scanner threads
const MAX_SCAN_WORKERS: usize = 8;

/// Runs a fixed set of matchers over controller files
pub struct Scanner {
    matchers: Vec<Box<dyn MappingMatcher>>,
}

impl Default for Scanner {
    fn default() -> Self {
        Scanner::with_matchers(default_matchers())
    }
}

impl Scanner {
    pub fn with_matchers(matchers: Vec<Box<dyn MappingMatcher>>) -> Self {
        Scanner { matchers }
    }

    /// Endpoints declared in one file, in matcher order
    pub fn scan_file(&self, file: &SourceFile) -> Vec<Endpoint> {
        let Some(unit) = SourceUnit::parse(&file.text) else {
            return Vec::new();
        };

        self.matchers
            .iter()
            .flat_map(|matcher| {
                let candidates = matcher.candidates(&unit);
                tracing::trace!(matcher = matcher.name(), file = %file.id, count = candidates.len());
                candidates
            })
            .map(|candidate| {
                let path = path_template::join(&unit.base_path, &candidate.sub_path);
                Endpoint {
                    method: candidate.method,
                    variables: path_template::extract_variables(&path),
                    path,
                    source_location: file.id.clone(),
                    declaring_unit: unit.declaring_unit.clone(),
                }
            })
            .collect()
    }

    /// Scan every file and fold the results into a duplicate-free inventory.
    ///
    /// Files are visited in identifier order; for a repeated method + path
    /// the later file's endpoint replaces the earlier one in place.
    pub fn scan(&self, files: &[SourceFile]) -> DiscoveryReport {
        let mut sorted: Vec<&SourceFile> = files.iter().collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));

        let mut diagnostics = vec![format!("scanning {} source files", sorted.len())];
        tracing::info!(files = sorted.len(), "Scanning for Spring endpoints");

        let per_file = self.scan_parallel(&sorted);

        let mut index: HashMap<String, usize> = HashMap::new();
        let mut endpoints: Vec<Endpoint> = Vec::new();
        for endpoint in per_file.into_iter().flatten() {
            let line = match &endpoint.declaring_unit {
                Some(unit) => format!("mapped: {} @ {} ({})", endpoint.key(), endpoint.source_location, unit),
                None => format!("mapped: {} @ {}", endpoint.key(), endpoint.source_location),
            };
            tracing::debug!("{}", line);
            diagnostics.push(line);

            match index.get(&endpoint.key()) {
                Some(&slot) => endpoints[slot] = endpoint,
                None => {
                    index.insert(endpoint.key(), endpoints.len());
                    endpoints.push(endpoint);
                }
            }
        }

        let summary = format!(
            "scan complete: {} files, {} unique endpoints",
            sorted.len(),
            endpoints.len()
        );
        tracing::info!(files = sorted.len(), endpoints = endpoints.len(), "Scan complete");
        diagnostics.push(summary);

        DiscoveryReport { endpoints, diagnostics }
    }

    /// Per-file results in input order. Files handled by a worker that
    /// panicked contribute nothing.
    fn scan_parallel(&self, files: &[&SourceFile]) -> Vec<Vec<Endpoint>> {
        if files.is_empty() {
            return Vec::new();
        }

        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .clamp(1, MAX_SCAN_WORKERS);
        let chunk_size = (files.len() + workers - 1) / workers;

        thread::scope(|scope| {
            let handles: Vec<_> = files
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk.iter().map(|file| self.scan_file(file)).collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_default())
                .collect()
        })
    }
}

/// Scan with the default matcher set
pub fn discover(files: &[SourceFile]) -> DiscoveryReport {
    Scanner::default().scan(files)
}
