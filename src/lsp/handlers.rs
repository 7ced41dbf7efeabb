use tower_lsp::lsp_types::*;

use crate::core::SourceDocument;
use crate::indentation::Violation;
use crate::lsp::backend::Backend;
use crate::options::IndentationOptions;
use crate::parser::ParseError;

use super::document::DocumentState;

/// Value of the `source` field on every published diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "java-indent";

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn publish_diagnostics(&self, uri: Url);
    /// Re-check every open document, after the options changed
    async fn refresh_all(&self);
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let doc_state = match docs.get(&uri) {
            Some(state) => state.clone(),
            None => return,
        };
        drop(docs);

        let options = self.options.read().await.clone();
        let diagnostics = document_diagnostics(&doc_state, &options);
        log::debug!("{} diagnostics for {}", diagnostics.len(), uri);

        self.client
            .publish_diagnostics(uri, diagnostics, Some(doc_state.version))
            .await;
    }

    async fn refresh_all(&self) {
        let uris: Vec<Url> = self.documents.lock().await.keys().cloned().collect();
        for uri in uris {
            self.publish_diagnostics(uri).await;
        }
    }
}

/// Diagnostics for one document: a warning per violation, or a single
/// error when the text does not parse
pub fn document_diagnostics(doc: &DocumentState, options: &IndentationOptions) -> Vec<Diagnostic> {
    let source = SourceDocument::new(&doc.content);
    match doc.check(options) {
        Ok(violations) => violations
            .iter()
            .map(|violation| violation_diagnostic(violation, &source))
            .collect(),
        Err(err) => vec![parse_error_diagnostic(&err, &source)],
    }
}

/// One-character range; `column` is a char index, the range is in UTF-16
fn single_char_range(source: &SourceDocument, line: usize, column: usize) -> Range {
    let start = source.utf16_column(line, column) as u32;
    let end = source.utf16_column(line, column + 1) as u32;
    let line = line.saturating_sub(1) as u32;
    Range::new(Position::new(line, start), Position::new(line, end))
}

pub fn violation_diagnostic(violation: &Violation, source: &SourceDocument) -> Diagnostic {
    Diagnostic::new(
        single_char_range(source, violation.line, violation.column),
        Some(DiagnosticSeverity::WARNING),
        Some(NumberOrString::String(violation.kind.key().to_string())),
        Some(DIAGNOSTIC_SOURCE.to_string()),
        violation.message(),
        None,
        None,
    )
}

pub fn parse_error_diagnostic(err: &ParseError, source: &SourceDocument) -> Diagnostic {
    Diagnostic::new(
        single_char_range(source, err.line, err.column),
        Some(DiagnosticSeverity::ERROR),
        None,
        Some(DIAGNOSTIC_SOURCE.to_string()),
        format!("cannot parse file: {}", err.message),
        None,
        None,
    )
}
