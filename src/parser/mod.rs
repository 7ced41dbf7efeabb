//! Java Parser
//!
//! Tokenizes Java source and builds a [`SyntaxTree`] whose node shapes
//! follow the classic Java token-tree layout the indentation checker
//! expects (imaginary `EXPR`/`SLIST`/`ELIST` nodes, method calls rooted at
//! their opening parenthesis, flattened parentheses, and so on).

pub mod ast;
mod declarations;
mod expressions;
mod grammar;
pub mod lexer;
mod statements;

use thiserror::Error;

pub use ast::{NodeId, NodeKind, SyntaxTree};
pub use lexer::{tokenize, Token, TokenKind};

/// Failure to tokenize or parse a source file
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Parse a complete Java compilation unit
///
/// This is the main entry point for parsing. It tokenizes the text and
/// runs the recursive-descent grammar over the tokens.
pub fn parse_source(source: &str) -> Result<SyntaxTree, ParseError> {
    let tokens = lexer::tokenize(source)?;
    grammar::Parser::new(tokens).compilation_unit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of_children(tree: &SyntaxTree, id: NodeId) -> Vec<NodeKind> {
        tree.children(id).map(|c| tree.kind(c)).collect()
    }

    fn find(tree: &SyntaxTree, kind: NodeKind) -> NodeId {
        let root = tree.root().unwrap();
        tree.preorder(root).find(|&n| tree.kind(n) == kind).unwrap()
    }

    #[test]
    fn test_parse_class_with_method() {
        let tree = parse_source("class A {\n    void f() {\n        g();\n    }\n}\n").unwrap();

        let class = find(&tree, NodeKind::ClassDef);
        assert_eq!(
            kinds_of_children(&tree, class),
            vec![
                NodeKind::Modifiers,
                NodeKind::LiteralClass,
                NodeKind::Ident,
                NodeKind::ObjBlock
            ]
        );
        let method = find(&tree, NodeKind::MethodDef);
        assert_eq!((tree.line(method), tree.column(method)), (2, 4));
        assert_eq!(
            kinds_of_children(&tree, method),
            vec![
                NodeKind::Modifiers,
                NodeKind::Type,
                NodeKind::Ident,
                NodeKind::LParen,
                NodeKind::Parameters,
                NodeKind::RParen,
                NodeKind::Slist
            ]
        );
    }

    #[test]
    fn test_method_call_is_rooted_at_paren() {
        let tree = parse_source("class A { void f() { a.b(1, 2); } }").unwrap();

        let call = find(&tree, NodeKind::MethodCall);
        assert_eq!(tree.text(call), "(");
        assert_eq!(
            kinds_of_children(&tree, call),
            vec![NodeKind::Dot, NodeKind::Elist, NodeKind::RParen]
        );
        let expr = tree.parent(call).unwrap();
        assert_eq!(tree.kind(expr), NodeKind::Expr);
        assert_eq!(tree.parent_kind(expr), Some(NodeKind::Slist));
        assert_eq!(tree.column(expr), tree.column(call));
    }

    #[test]
    fn test_empty_modifiers_take_next_token_position() {
        let tree = parse_source("class A {\n  int x;\n}").unwrap();

        let var = find(&tree, NodeKind::VariableDef);
        let modifiers = tree.first_child(var).unwrap();
        assert_eq!(tree.kind(modifiers), NodeKind::Modifiers);
        assert_eq!((tree.line(modifiers), tree.column(modifiers)), (2, 2));
        assert_eq!((tree.line(var), tree.column(var)), (2, 2));
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = parse_source("class A {\n  void f( {\n}").unwrap_err();
        assert_eq!(err.line, 2);
    }
}
