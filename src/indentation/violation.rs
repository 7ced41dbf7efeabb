//! Violation records and the per-file dedup log.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::level::IndentLevel;

/// Shape of a violation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Error,
    ErrorMulti,
    ChildError,
    ChildErrorMulti,
}

impl MessageKind {
    pub fn new(child: bool, expected: &IndentLevel) -> Self {
        match (child, expected.is_multi_level()) {
            (false, false) => MessageKind::Error,
            (false, true) => MessageKind::ErrorMulti,
            (true, false) => MessageKind::ChildError,
            (true, true) => MessageKind::ChildErrorMulti,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            MessageKind::Error => "indentation.error",
            MessageKind::ErrorMulti => "indentation.error.multi",
            MessageKind::ChildError => "indentation.child.error",
            MessageKind::ChildErrorMulti => "indentation.child.error.multi",
        }
    }
}

/// One indentation violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 1-based line
    pub line: usize,
    /// 0-based character column of the offending node
    pub column: usize,
    pub kind: MessageKind,
    pub subject: String,
    pub actual: usize,
    pub expected: IndentLevel,
}

impl Violation {
    pub fn message(&self) -> String {
        let child = match self.kind {
            MessageKind::ChildError | MessageKind::ChildErrorMulti => " child",
            MessageKind::Error | MessageKind::ErrorMulti => "",
        };
        let expected = match self.kind {
            MessageKind::ErrorMulti | MessageKind::ChildErrorMulti => {
                format!("one of the following: {}", self.expected)
            }
            MessageKind::Error | MessageKind::ChildError => self.expected.to_string(),
        };
        format!(
            "'{}'{} has incorrect indentation level {}, expected level should be {}.",
            self.subject, child, self.actual, expected
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column + 1, self.message())
    }
}

/// Violations of one file, at most one per physical line
#[derive(Debug, Default)]
pub struct ViolationLog {
    reported_lines: HashSet<usize>,
    violations: Vec<Violation>,
}

impl ViolationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `violation` unless its line already has one.
    /// Returns whether it was recorded.
    pub fn report(&mut self, violation: Violation) -> bool {
        if !self.reported_lines.insert(violation.line) {
            log::trace!("line {} already reported", violation.line);
            return false;
        }
        self.violations.push(violation);
        true
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations sorted by line, then column
    pub fn into_violations(mut self) -> Vec<Violation> {
        self.violations.sort_by_key(|v| (v.line, v.column));
        self.violations
    }
}
