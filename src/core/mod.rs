//! Core Types
//!
//! Source documents and violation reports shared by the CLI and the
//! language server.

pub mod diagnostics;
pub mod document;

pub use diagnostics::{render_json, render_text, FileReport};
pub use document::SourceDocument;
