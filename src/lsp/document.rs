use crate::indentation::{check_source, Violation};
use crate::options::IndentationOptions;
use crate::parser::ParseError;

/// State for each open document
#[derive(Debug, Clone)]
pub struct DocumentState {
    pub content: String,
    pub version: i32,
}

impl DocumentState {
    pub fn new(content: String, version: i32) -> Self {
        Self { content, version }
    }

    pub fn check(&self, options: &IndentationOptions) -> Result<Vec<Violation>, ParseError> {
        check_source(&self.content, options)
    }
}
