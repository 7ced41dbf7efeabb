//! Diagnostic Rendering
//!
//! Turns per-file violations into the CLI's text and JSON reports.

use std::path::PathBuf;

use serde::Serialize;

use crate::indentation::{MessageKind, Violation};

/// Violations found in one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub violations: Vec<Violation>,
}

impl FileReport {
    pub fn new(path: PathBuf, violations: Vec<Violation>) -> Self {
        Self { path, violations }
    }
}

#[derive(Serialize)]
struct JsonViolation {
    path: String,
    line: usize,
    column: usize,
    kind: MessageKind,
    message: String,
}

/// One `<path>:<line>:<column>: <message>` line per violation
pub fn render_text(reports: &[FileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        for violation in &report.violations {
            out.push_str(&format!("{}:{}\n", report.path.display(), violation));
        }
    }
    out
}

/// A JSON array with one object per violation
pub fn render_json(reports: &[FileReport]) -> serde_json::Result<String> {
    let entries: Vec<JsonViolation> = reports
        .iter()
        .flat_map(|report| {
            report.violations.iter().map(|v| JsonViolation {
                path: report.path.display().to_string(),
                line: v.line,
                column: v.column + 1,
                kind: v.kind,
                message: v.message(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}
