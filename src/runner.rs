//! File Runner
//!
//! Collects the Java files named on the command line and checks them one
//! after another.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::Config;
use crate::core::FileReport;
use crate::indentation::check_source;
use crate::options::IndentationOptions;

/// Result of checking every collected file
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub reports: Vec<FileReport>,
    /// Files that could not be read or parsed
    pub failures: usize,
}

impl RunOutcome {
    pub fn violation_count(&self) -> usize {
        self.reports.iter().map(|r| r.violations.len()).sum()
    }
}

fn is_java_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("java")
}

/// Files named directly, plus every `*.java` below named directories
pub fn collect_files(config: &Config) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for root in &config.paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .filter(|p| is_java_file(p))
            .collect();
        found.sort();
        files.extend(found);
    }
    files.retain(|p| !config.is_excluded(p));
    files
}

pub fn check_file(path: &Path, options: &IndentationOptions) -> Result<FileReport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let violations =
        check_source(&source, options).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(FileReport::new(path.to_path_buf(), violations))
}

/// Check every collected file; unreadable files are logged and counted
pub fn run(config: &Config) -> RunOutcome {
    let mut outcome = RunOutcome::default();
    for path in collect_files(config) {
        log::debug!("checking {}", path.display());
        match check_file(&path, &config.options) {
            Ok(report) => outcome.reports.push(report),
            Err(e) => {
                log::error!("{:#}", e);
                outcome.failures += 1;
            }
        }
    }
    outcome
}
