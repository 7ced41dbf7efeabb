//! Recursive-descent grammar core
//!
//! Token cursor, look-ahead scanners and the pieces shared by every part
//! of the grammar: names, types, type arguments, modifiers and annotations.
//! Declarations, statements and expressions live in sibling modules as
//! further `impl Parser` blocks.

use super::ast::{NodeId, NodeKind, SyntaxTree};
use super::lexer::{Token, TokenKind};
use super::ParseError;

pub(super) type ParseResult<T> = Result<T, ParseError>;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "abstract",
    "final",
    "native",
    "synchronized",
    "transient",
    "volatile",
    "strictfp",
];

pub(super) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    pub(super) tree: SyntaxTree,
    /// Set while parsing switch labels, where `x ->` is not a lambda
    pub(super) no_lambda: bool,
}

impl Parser {
    pub(super) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            tree: SyntaxTree::new(),
            no_lambda: false,
        }
    }

    // ---- token cursor ----

    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(super) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    pub(super) fn token_at(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub(super) fn position(&self) -> usize {
        self.pos
    }

    pub(super) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Current token is punctuation or keyword `text`
    pub(super) fn at(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(text))
    }

    pub(super) fn nth_is(&self, offset: usize, text: &str) -> bool {
        self.peek_at(offset).is_some_and(|t| t.is(text))
    }

    pub(super) fn index_is(&self, index: usize, text: &str) -> bool {
        self.tokens.get(index).is_some_and(|t| t.is(text))
    }

    pub(super) fn at_ident(&self) -> bool {
        self.peek().is_some_and(|t| t.kind == TokenKind::Ident)
    }

    /// Current token is the contextual keyword `word`
    pub(super) fn at_contextual(&self, word: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && t.text == word)
    }

    pub(super) fn at_primitive(&self) -> bool {
        self.peek().is_some_and(is_primitive)
    }

    pub(super) fn bump(&mut self) -> ParseResult<Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(self.error_here("unexpected end of file")),
        }
    }

    pub(super) fn expect(&mut self, text: &str) -> ParseResult<Token> {
        if self.at(text) {
            self.bump()
        } else {
            Err(self.error_here(format!("expected '{}'", text)))
        }
    }

    /// Consume the current token as a node of `kind`
    pub(super) fn token_node(&mut self, kind: NodeKind) -> ParseResult<NodeId> {
        let token = self.bump()?;
        Ok(self.tree.token(kind, &token.text, token.line, token.column))
    }

    /// Expect `text` and turn it into a node of `kind`
    pub(super) fn expect_node(&mut self, kind: NodeKind, text: &str) -> ParseResult<NodeId> {
        let token = self.expect(text)?;
        Ok(self.tree.token(kind, &token.text, token.line, token.column))
    }

    pub(super) fn ident_node(&mut self) -> ParseResult<NodeId> {
        if self.at_ident() {
            self.token_node(NodeKind::Ident)
        } else {
            Err(self.error_here("expected identifier"))
        }
    }

    /// Imaginary node positioned at the current token
    pub(super) fn imaginary_here(&mut self, kind: NodeKind) -> NodeId {
        let (line, column) = self.here();
        self.tree.imaginary(kind, line, column)
    }

    fn here(&self) -> (usize, usize) {
        match self.peek() {
            Some(token) => (token.line, token.column),
            None => self
                .tokens
                .last()
                .map(|t| (t.line, t.end_column()))
                .unwrap_or((1, 0)),
        }
    }

    pub(super) fn error_here(&self, message: impl Into<String>) -> ParseError {
        let (line, column) = self.here();
        ParseError::new(line, column, message)
    }

    /// True when token `index` is `text` and touches the token before it,
    /// used to glue `>` characters back into shift and comparison operators.
    pub(super) fn adjacent(&self, index: usize, text: &str) -> bool {
        match (self.tokens.get(index.wrapping_sub(1)), self.tokens.get(index)) {
            (Some(prev), Some(token)) => {
                index > 0
                    && token.is(text)
                    && token.line == prev.line
                    && token.column == prev.end_column()
            }
            _ => false,
        }
    }

    /// Deep copy of a subtree, used for the shared modifiers and type of
    /// `int a, b;` style declarations.
    pub(super) fn copy_subtree(&mut self, id: NodeId) -> NodeId {
        let node = self.tree.node(id).clone();
        let copy = if self.tree.is_imaginary(id) {
            self.tree.imaginary(node.kind, node.line, node.column)
        } else {
            self.tree.token(node.kind, &node.text, node.line, node.column)
        };
        let children: Vec<NodeId> = self.tree.children(id).collect();
        for child in children {
            let child_copy = self.copy_subtree(child);
            self.tree.append(copy, child_copy);
        }
        copy
    }

    // ---- look-ahead scanners ----

    /// Index of the `)` matching the `(` at `open`
    pub(super) fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is("(") {
                depth += 1;
            } else if token.is(")") {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Skip `@Name(...)` annotations starting at `index`
    pub(super) fn skip_annotations(&self, mut index: usize) -> usize {
        while self.index_is(index, "@") && !self.index_is(index + 1, "interface") {
            let mut i = index + 1;
            if !self.token_at(i).is_some_and(|t| t.kind == TokenKind::Ident) {
                return index;
            }
            i += 1;
            while self.index_is(i, ".") && self.token_at(i + 1).is_some_and(|t| t.kind == TokenKind::Ident) {
                i += 2;
            }
            if self.index_is(i, "(") {
                match self.matching_paren(i) {
                    Some(close) => i = close + 1,
                    None => return index,
                }
            }
            index = i;
        }
        index
    }

    /// Index just past a type starting at `index`, if one is there
    pub(super) fn scan_type(&self, index: usize) -> Option<usize> {
        let mut i = self.skip_annotations(index);
        let token = self.token_at(i)?;
        if is_primitive(token) {
            i += 1;
        } else if token.kind == TokenKind::Ident {
            i += 1;
            loop {
                if self.index_is(i, "<") {
                    i = self.scan_type_arguments(i)?;
                }
                if self.index_is(i, ".") {
                    let after = self.skip_annotations(i + 1);
                    if self.token_at(after).is_some_and(|t| t.kind == TokenKind::Ident) {
                        i = after + 1;
                        continue;
                    }
                }
                break;
            }
        } else {
            return None;
        }
        loop {
            let after = self.skip_annotations(i);
            if self.index_is(after, "[") && self.index_is(after + 1, "]") {
                i = after + 2;
            } else {
                break;
            }
        }
        Some(i)
    }

    fn scan_type_arguments(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        loop {
            let token = self.token_at(i)?;
            if token.is("<") {
                depth += 1;
            } else if token.is(">") {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            } else if !(token.kind == TokenKind::Ident
                || is_primitive(token)
                || ["?", "extends", "super", ",", ".", "&", "[", "]", "@"]
                    .iter()
                    .any(|t| token.is(t)))
            {
                return None;
            }
            i += 1;
        }
    }

    /// `ident ->` or `( ... ) ->` at the cursor
    pub(super) fn is_lambda_start(&self) -> bool {
        if self.no_lambda {
            return false;
        }
        if self.at_ident() {
            return self.nth_is(1, "->");
        }
        if self.at("(") {
            return self
                .matching_paren(self.pos)
                .is_some_and(|close| self.index_is(close + 1, "->"));
        }
        false
    }

    // ---- compilation unit ----

    pub(super) fn compilation_unit(mut self) -> ParseResult<SyntaxTree> {
        let root = self.tree.imaginary(NodeKind::CompilationUnit, 1, 0);
        self.tree.set_root(root);

        if self.index_is(self.skip_annotations(self.pos), "package") {
            let package = self.package_def()?;
            self.tree.append(root, package);
        }
        while !self.at_end() {
            if self.at(";") {
                self.bump()?;
            } else if self.at("import") {
                let import = self.import_def()?;
                self.tree.append(root, import);
            } else {
                let modifiers = self.modifiers()?;
                let declaration = self.type_declaration(modifiers)?;
                self.tree.append(root, declaration);
            }
        }

        self.tree.finish();
        Ok(self.tree)
    }

    fn package_def(&mut self) -> ParseResult<NodeId> {
        let annotations = self.imaginary_here(NodeKind::Annotations);
        while self.at("@") {
            let annotation = self.annotation()?;
            self.tree.append(annotations, annotation);
        }
        let package = self.expect_node(NodeKind::PackageDef, "package")?;
        self.tree.append(package, annotations);
        let name = self.qualified_name(false)?;
        self.tree.append(package, name);
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append(package, semi);
        Ok(package)
    }

    fn import_def(&mut self) -> ParseResult<NodeId> {
        let is_static = self.nth_is(1, "static");
        let kind = if is_static {
            NodeKind::StaticImport
        } else {
            NodeKind::Import
        };
        let import = self.expect_node(kind, "import")?;
        if is_static {
            let keyword = self.token_node(NodeKind::LiteralStatic)?;
            self.tree.append(import, keyword);
        }
        let name = self.qualified_name(true)?;
        self.tree.append(import, name);
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append(import, semi);
        Ok(import)
    }

    /// `a.b.c` as nested DOT nodes; `allow_star` accepts a trailing `.*`
    pub(super) fn qualified_name(&mut self, allow_star: bool) -> ParseResult<NodeId> {
        let mut name = self.ident_node()?;
        while self.at(".") {
            let dot = self.token_node(NodeKind::Dot)?;
            self.tree.append(dot, name);
            let rhs = if allow_star && self.at("*") {
                self.token_node(NodeKind::Star)?
            } else {
                self.ident_node()?
            };
            self.tree.append(dot, rhs);
            name = dot;
        }
        Ok(name)
    }

    // ---- modifiers and annotations ----

    /// MODIFIERS node; positioned at the next token when empty
    pub(super) fn modifiers(&mut self) -> ParseResult<NodeId> {
        let modifiers = self.imaginary_here(NodeKind::Modifiers);
        loop {
            if self.at("@") && !self.nth_is(1, "interface") {
                let annotation = self.annotation()?;
                self.tree.append(modifiers, annotation);
            } else if self.at_modifier() {
                let modifier = self.token_node(NodeKind::Modifier)?;
                self.tree.append(modifiers, modifier);
            } else {
                break;
            }
        }
        Ok(modifiers)
    }

    fn at_modifier(&self) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        match token.kind {
            TokenKind::Keyword if token.text == "default" => {
                !(self.nth_is(1, ":") || self.nth_is(1, "->"))
            }
            TokenKind::Keyword => {
                MODIFIER_KEYWORDS.contains(&token.text.as_str())
                    && !(token.text == "synchronized" && self.nth_is(1, "("))
            }
            TokenKind::Ident if token.text == "non-sealed" => true,
            TokenKind::Ident if token.text == "sealed" => self.peek_at(1).is_some_and(|next| {
                matches!(next.kind, TokenKind::Keyword | TokenKind::Ident) || next.is("@")
            }),
            _ => false,
        }
    }

    pub(super) fn annotation(&mut self) -> ParseResult<NodeId> {
        let annotation = self.imaginary_here(NodeKind::Annotation);
        let at = self.expect_node(NodeKind::At, "@")?;
        self.tree.append(annotation, at);
        let name = self.qualified_name(false)?;
        self.tree.append(annotation, name);
        if self.at("(") {
            let lparen = self.token_node(NodeKind::LParen)?;
            self.tree.append(annotation, lparen);
            while !self.at(")") {
                if self.at_ident() && self.nth_is(1, "=") {
                    let pair = self.imaginary_here(NodeKind::AnnotationMemberValuePair);
                    let ident = self.ident_node()?;
                    let assign = self.token_node(NodeKind::Assign)?;
                    let value = self.element_value()?;
                    self.tree.append_all(pair, &[ident, assign, value]);
                    self.tree.append(annotation, pair);
                } else {
                    let value = self.element_value()?;
                    self.tree.append(annotation, value);
                }
                if self.at(",") {
                    let comma = self.token_node(NodeKind::Comma)?;
                    self.tree.append(annotation, comma);
                } else {
                    break;
                }
            }
            let rparen = self.expect_node(NodeKind::RParen, ")")?;
            self.tree.append(annotation, rparen);
        }
        Ok(annotation)
    }

    /// Annotation member value: nested annotation, `{...}` or expression
    pub(super) fn element_value(&mut self) -> ParseResult<NodeId> {
        if self.at("@") {
            self.annotation()
        } else if self.at("{") {
            let init = self.token_node(NodeKind::AnnotationArrayInit)?;
            while !self.at("}") {
                let value = self.element_value()?;
                self.tree.append(init, value);
                if self.at(",") {
                    let comma = self.token_node(NodeKind::Comma)?;
                    self.tree.append(init, comma);
                } else {
                    break;
                }
            }
            let rcurly = self.expect_node(NodeKind::RCurly, "}")?;
            self.tree.append(init, rcurly);
            Ok(init)
        } else {
            let expr = self.imaginary_here(NodeKind::Expr);
            let parts = self.ternary()?;
            self.tree.append_all(expr, &parts);
            Ok(expr)
        }
    }

    // ---- types ----

    /// TYPE node wrapping a complete type
    pub(super) fn type_node(&mut self) -> ParseResult<NodeId> {
        let node = self.imaginary_here(NodeKind::Type);
        let parts = self.type_parts()?;
        self.tree.append_all(node, &parts);
        Ok(node)
    }

    /// Children of a TYPE node: name, type arguments and array dimensions
    pub(super) fn type_parts(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut parts = Vec::new();
        while self.at("@") {
            parts.push(self.annotation()?);
        }
        if self.at_primitive() {
            parts.push(self.token_node(NodeKind::PrimitiveType)?);
        } else {
            parts.extend(self.class_type_parts()?);
        }
        self.array_dimensions(parts)
    }

    /// `a.b.C<T>` style reference type without array dimensions
    pub(super) fn class_type_parts(&mut self) -> ParseResult<Vec<NodeId>> {
        let mut parts = vec![self.ident_node()?];
        if self.at("<") {
            parts.push(self.type_arguments()?);
        }
        while self.at(".") && !self.nth_is(1, "class") && !self.nth_is(1, "this") {
            let dot = self.token_node(NodeKind::Dot)?;
            self.tree.append_all(dot, &parts);
            while self.at("@") {
                let annotation = self.annotation()?;
                self.tree.append(dot, annotation);
            }
            let ident = self.ident_node()?;
            self.tree.append(dot, ident);
            parts = vec![dot];
            if self.at("<") {
                parts.push(self.type_arguments()?);
            }
        }
        Ok(parts)
    }

    /// Wrap `parts` in one ARRAY_DECLARATOR per `[]` pair
    pub(super) fn array_dimensions(&mut self, mut parts: Vec<NodeId>) -> ParseResult<Vec<NodeId>> {
        while self.at("[") && self.nth_is(1, "]") {
            let declarator = self.token_node(NodeKind::ArrayDeclarator)?;
            self.tree.append_all(declarator, &parts);
            let rbrack = self.token_node(NodeKind::RBrack)?;
            self.tree.append(declarator, rbrack);
            parts = vec![declarator];
        }
        Ok(parts)
    }

    pub(super) fn type_arguments(&mut self) -> ParseResult<NodeId> {
        let arguments = self.imaginary_here(NodeKind::TypeArguments);
        let start = self.expect_node(NodeKind::GenericStart, "<")?;
        self.tree.append(arguments, start);
        while !self.at(">") {
            let argument = self.imaginary_here(NodeKind::TypeArgument);
            while self.at("@") {
                let annotation = self.annotation()?;
                self.tree.append(argument, annotation);
            }
            if self.at("?") {
                let wildcard = self.token_node(NodeKind::Wildcard)?;
                self.tree.append(argument, wildcard);
                if self.at("extends") || self.at("super") {
                    let kind = if self.at("extends") {
                        NodeKind::TypeUpperBounds
                    } else {
                        NodeKind::TypeLowerBounds
                    };
                    let bounds = self.token_node(kind)?;
                    let parts = self.type_parts()?;
                    self.tree.append_all(bounds, &parts);
                    self.tree.append(argument, bounds);
                }
            } else {
                let parts = self.type_parts()?;
                self.tree.append_all(argument, &parts);
            }
            self.tree.append(arguments, argument);
            if self.at(",") {
                let comma = self.token_node(NodeKind::Comma)?;
                self.tree.append(arguments, comma);
            } else {
                break;
            }
        }
        let end = self.expect_node(NodeKind::GenericEnd, ">")?;
        self.tree.append(arguments, end);
        Ok(arguments)
    }

    pub(super) fn type_parameters(&mut self) -> ParseResult<NodeId> {
        let parameters = self.imaginary_here(NodeKind::TypeParameters);
        let start = self.expect_node(NodeKind::GenericStart, "<")?;
        self.tree.append(parameters, start);
        loop {
            let parameter = self.imaginary_here(NodeKind::TypeParameter);
            while self.at("@") {
                let annotation = self.annotation()?;
                self.tree.append(parameter, annotation);
            }
            let ident = self.ident_node()?;
            self.tree.append(parameter, ident);
            if self.at("extends") {
                let bounds = self.token_node(NodeKind::TypeUpperBounds)?;
                loop {
                    let parts = self.type_parts()?;
                    self.tree.append_all(bounds, &parts);
                    if !self.at("&") {
                        break;
                    }
                    let and = self.token_node(NodeKind::BinaryOp)?;
                    self.tree.append(bounds, and);
                }
                self.tree.append(parameter, bounds);
            }
            self.tree.append(parameters, parameter);
            if !self.at(",") {
                break;
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(parameters, comma);
        }
        let end = self.expect_node(NodeKind::GenericEnd, ">")?;
        self.tree.append(parameters, end);
        Ok(parameters)
    }

    /// Comma separated reference types appended to `clause`
    pub(super) fn type_list_into(&mut self, clause: NodeId) -> ParseResult<()> {
        loop {
            let parts = self.class_type_parts()?;
            self.tree.append_all(clause, &parts);
            if !self.at(",") {
                return Ok(());
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(clause, comma);
        }
    }
}

pub(super) fn is_primitive(token: &Token) -> bool {
    token.kind == TokenKind::Keyword && PRIMITIVES.contains(&token.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::super::lexer::tokenize;
    use super::*;

    fn parser(source: &str) -> Parser {
        Parser::new(tokenize(source).unwrap())
    }

    #[test]
    fn test_scan_type_handles_generics_and_arrays() {
        let p = parser("Map<String, List<int[]>>[] x");
        assert_eq!(p.scan_type(0), Some(p.tokens.len() - 1));

        let p = parser("a.b.C<? extends D> y");
        assert_eq!(p.scan_type(0), Some(p.tokens.len() - 1));
    }

    #[test]
    fn test_scan_type_rejects_expressions() {
        let p = parser("a < b + c");
        assert_eq!(p.scan_type(0), None);
        let p = parser("(x)");
        assert_eq!(p.scan_type(0), None);
    }

    #[test]
    fn test_lambda_start_detection() {
        assert!(parser("x -> x").is_lambda_start());
        assert!(parser("(a, b) -> a").is_lambda_start());
        assert!(!parser("(a + b) * c").is_lambda_start());
    }

    #[test]
    fn test_adjacent_glues_only_touching_tokens() {
        let p = parser("a >> b > > c");
        assert!(p.adjacent(2, ">"));
        assert!(!p.adjacent(5, ">"));
    }

    #[test]
    fn test_skip_annotations() {
        let p = parser("@A @b.C(x = 1) int");
        assert_eq!(p.skip_annotations(0), 11);
    }
}
