//! Indentation Checking
//!
//! Validates the indentation of a parsed Java file. Every construct that
//! owns indentation rules gets a handler; handlers compute the columns they
//! accept, suggest columns for nested constructs and report violations.

pub mod anchors;
mod block;
pub mod context;
pub mod engine;
mod expression;
pub mod handler;
pub mod level;
pub mod line_wrap;
pub mod registry;
pub mod violation;

pub use engine::IndentationEngine;
pub use level::IndentLevel;
pub use violation::{MessageKind, Violation};

use crate::core::SourceDocument;
use crate::options::IndentationOptions;
use crate::parser::{parse_source, ParseError, SyntaxTree};

/// Check an already parsed tree against its source text
pub fn check_tree(tree: &SyntaxTree, document: &SourceDocument, options: &IndentationOptions) -> Vec<Violation> {
    IndentationEngine::new(tree, document, options).run()
}

/// Parse `source` and check its indentation
pub fn check_source(source: &str, options: &IndentationOptions) -> Result<Vec<Violation>, ParseError> {
    let tree = parse_source(source)?;
    let document = SourceDocument::new(source);
    Ok(check_tree(&tree, &document, options))
}
