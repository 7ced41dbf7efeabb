//! Java Indentation Checker
//!
//! Verifies that Java source code follows configurable indentation rules.
//!
//! This library provides:
//! - A Java parser producing the syntax tree the checks walk
//! - The indentation engine and its per-construct handlers
//! - Options files, CLI configuration and report rendering
//! - An LSP server publishing violations as diagnostics

pub mod config;
pub mod core;
pub mod indentation;
pub mod lsp;
pub mod options;
pub mod parser;
pub mod runner;

// Re-exports for clean public API
pub use config::Config;
pub use indentation::{check_source, check_tree, IndentLevel, MessageKind, Violation};
pub use options::IndentationOptions;
pub use parser::{parse_source, ParseError, SyntaxTree};
