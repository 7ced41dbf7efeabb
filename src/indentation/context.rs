//! Check Context
//!
//! Shared state and helpers every handler validates through: tree and source
//! access, tab-aware columns, subtree line scans, paren and modifier checks,
//! and once-per-line violation logging.

use std::cell::RefCell;

use crate::core::SourceDocument;
use crate::options::IndentationOptions;
use crate::parser::{NodeId, NodeKind, SyntaxTree};

use super::anchors::{Anchor, LineAnchorSet};
use super::handler::{Handler, HandlerId};
use super::level::IndentLevel;
use super::line_wrap::{FirstLine, LineWrapChecker};
use super::registry::HandlerKind;
use super::violation::{MessageKind, Violation, ViolationLog};

/// Borrowed view over one file's check state
pub struct CheckContext<'a> {
    pub tree: &'a SyntaxTree,
    pub document: &'a SourceDocument,
    pub options: &'a IndentationOptions,
    handlers: &'a [Handler],
    log: &'a RefCell<ViolationLog>,
}

impl<'a> CheckContext<'a> {
    pub fn new(
        tree: &'a SyntaxTree,
        document: &'a SourceDocument,
        options: &'a IndentationOptions,
        handlers: &'a [Handler],
        log: &'a RefCell<ViolationLog>,
    ) -> Self {
        Self {
            tree,
            document,
            options,
            handlers,
            log,
        }
    }

    pub fn handler(&self, id: HandlerId) -> &Handler {
        &self.handlers[id.index()]
    }

    pub fn kind(&self, id: HandlerId) -> HandlerKind {
        self.handler(id).kind
    }

    /// Node owned by the handler
    pub fn main(&self, id: HandlerId) -> NodeId {
        self.handler(id).node
    }

    pub fn parent(&self, id: HandlerId) -> Option<HandlerId> {
        self.handler(id).parent
    }

    pub fn parent_kind(&self, id: HandlerId) -> Option<HandlerKind> {
        self.parent(id).map(|p| self.kind(p))
    }

    pub fn basic_offset(&self) -> usize {
        self.options.basic_offset
    }

    pub fn line_wrapping(&self) -> usize {
        self.options.line_wrapping_indentation
    }

    pub fn strict(&self) -> bool {
        self.options.force_strict_condition
    }

    pub fn child(&self, node: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.tree.find_first_child(node, kind)
    }

    // ---- columns ----

    pub fn expanded_column(&self, node: NodeId) -> usize {
        self.document.expanded_column(
            self.tree.line(node),
            self.tree.column(node),
            self.options.tab_width,
        )
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.document.line_start(line, self.options.tab_width)
    }

    pub fn line_start_of(&self, node: NodeId) -> usize {
        self.line_start(self.tree.line(node))
    }

    pub fn is_on_start_of_line(&self, node: NodeId) -> bool {
        self.line_start_of(node) == self.expanded_column(node)
    }

    /// Node with the smallest column in the subtree, ignoring lines
    pub fn first_token(&self, node: NodeId) -> NodeId {
        let mut first = node;
        for child in self.tree.children(node) {
            let candidate = self.first_token(child);
            if self.tree.column(candidate) < self.tree.column(first) {
                first = candidate;
            }
        }
        first
    }

    /// Earliest node of the subtree by line, then column
    pub fn first_node(&self, node: NodeId) -> NodeId {
        let tree = self.tree;
        tree.preorder(node).fold(node, |start, current| {
            let earlier = tree.line(current) < tree.line(start)
                || tree.line(current) == tree.line(start) && tree.column(current) < tree.column(start);
            if earlier { current } else { start }
        })
    }

    // ---- logging ----

    fn report(&self, violation: Violation) {
        self.log.borrow_mut().report(violation);
    }

    /// Report `node` against `expected` under the handler's type name
    pub fn log_error(
        &self,
        id: HandlerId,
        node: NodeId,
        subtype: &str,
        actual: usize,
        expected: &IndentLevel,
    ) {
        let name = self.type_name(id);
        let subject = if subtype.is_empty() {
            name.to_string()
        } else {
            format!("{} {}", name, subtype)
        };
        self.report(Violation {
            line: self.tree.line(node),
            column: self.tree.column(node),
            kind: MessageKind::new(false, expected),
            subject,
            actual,
            expected: expected.clone(),
        });
    }

    pub fn log_child_error(&self, id: HandlerId, node: NodeId, actual: usize, expected: &IndentLevel) {
        self.report(Violation {
            line: self.tree.line(node),
            column: self.tree.column(node),
            kind: MessageKind::new(true, expected),
            subject: self.type_name(id).to_string(),
            actual,
            expected: expected.clone(),
        });
    }

    /// Report a wrapped line by the text of the node leading it
    pub fn log_wrap_error(&self, node: NodeId, actual: usize, expected: usize) {
        self.report(Violation {
            line: self.tree.line(node),
            column: self.tree.column(node),
            kind: MessageKind::Error,
            subject: self.tree.text(node).to_string(),
            actual,
            expected: IndentLevel::new(expected),
        });
    }

    pub fn type_name(&self, id: HandlerId) -> &'static str {
        self.kind(id).type_name(self.tree.kind(self.main(id)))
    }

    // ---- subtree scans ----

    /// Check every line of `tree` against `level`
    ///
    /// With `first_line_matches` the first line must sit exactly at `level`
    /// and later lines at `level + basic_offset` or deeper; otherwise lines
    /// only fail when they start shallower than `level`.
    pub fn check_expression_subtree(
        &self,
        id: HandlerId,
        tree: NodeId,
        level: &IndentLevel,
        first_line_matches: bool,
        allow_nesting: bool,
    ) {
        let mut lines = LineAnchorSet::new();
        let first = self.first_node(tree);
        let first_line = self.tree.line(first);
        if first_line_matches && !allow_nesting {
            lines.insert(first_line, first, self.expanded_column(first));
        }
        self.collect_subtree_anchors(&mut lines, tree);
        self.check_lines_indent(id, &lines, level, first_line_matches, first_line, allow_nesting);
    }

    pub(super) fn collect_subtree_anchors(&self, lines: &mut LineAnchorSet, tree: NodeId) {
        if HandlerKind::is_handled(self.tree.kind(tree)) {
            return;
        }
        lines.insert_if_left(self.tree.line(tree), tree, self.expanded_column(tree));
        for child in self.tree.children(tree) {
            self.collect_subtree_anchors(lines, child);
        }
    }

    fn check_lines_indent(
        &self,
        id: HandlerId,
        lines: &LineAnchorSet,
        level: &IndentLevel,
        first_line_matches: bool,
        first_line: usize,
        allow_nesting: bool,
    ) {
        let Some((start_line, start)) = lines.first() else {
            return;
        };
        let real_start = self.line_start(start_line);
        let start_column = if first_line_matches && !allow_nesting {
            real_start
        } else {
            start.column
        };
        if start_column == real_start {
            self.check_line_indent(id, start, level, first_line_matches);
        }

        let increase = first_line_matches
            || first_line > self.tree.line(self.main(id)) && self.should_increase_indent(id);
        let level = if increase {
            level.offset(self.basic_offset())
        } else {
            level.clone()
        };
        for (_, anchor) in lines.iter().skip(1) {
            self.check_line_indent(id, anchor, &level, false);
        }
    }

    fn check_line_indent(&self, id: HandlerId, anchor: Anchor, level: &IndentLevel, must_match: bool) {
        let start = self.line_start_of(anchor.node);
        let failed = if must_match {
            !level.is_acceptable(start)
        } else {
            anchor.column == start && level.is_greater_than(start)
        };
        if failed {
            self.log_child_error(id, anchor.node, start, level);
        }
    }

    /// Scan every direct child of `parent` whose kind is in `kinds`
    pub fn check_children(
        &self,
        id: HandlerId,
        parent: NodeId,
        kinds: &[NodeKind],
        level: &IndentLevel,
        first_line_matches: bool,
        allow_nesting: bool,
    ) {
        for child in self.tree.children(parent) {
            if kinds.contains(&self.tree.kind(child)) {
                self.check_expression_subtree(id, child, level, first_line_matches, allow_nesting);
            }
        }
    }

    // ---- common token checks ----

    /// Every modifier that starts a line must be acceptable
    pub fn check_each_modifier(&self, id: HandlerId) {
        let Some(modifiers) = self.child(self.main(id), NodeKind::Modifiers) else {
            return;
        };
        let indent = self.indent(id);
        for modifier in self.tree.children(modifiers) {
            let column = self.expanded_column(modifier);
            if self.is_on_start_of_line(modifier) && !indent.is_acceptable(column) {
                self.log_error(id, modifier, "modifier", column, &indent);
            }
        }
    }

    /// The modifier list as a whole must be acceptable when it starts a line
    pub fn check_modifier_list(&self, id: HandlerId) {
        let Some(modifiers) = self.child(self.main(id), NodeKind::Modifiers) else {
            return;
        };
        let indent = self.indent(id);
        let column = self.expanded_column(modifiers);
        if self.is_on_start_of_line(modifiers) && !indent.is_acceptable(column) {
            self.log_error(id, modifiers, "modifier", column, &indent);
        }
    }

    pub fn check_left_paren(&self, id: HandlerId, lparen: Option<NodeId>) {
        let Some(lparen) = lparen else {
            return;
        };
        let indent = self.indent(id);
        let column = self.expanded_column(lparen);
        if !indent.is_acceptable(column) && self.is_on_start_of_line(lparen) {
            self.log_error(id, lparen, "lparen", column, &indent);
        }
    }

    /// A right paren starting its line must line up with its left paren,
    /// sit one past it, or be acceptable at the handler's level
    pub fn check_right_paren(&self, id: HandlerId, lparen: Option<NodeId>, rparen: Option<NodeId>) {
        let (Some(lparen), Some(rparen)) = (lparen, rparen) else {
            return;
        };
        let indent = self.indent(id);
        let column = self.expanded_column(rparen);
        let left = self.expanded_column(lparen);
        if column != left
            && column != left + 1
            && !indent.is_acceptable(column)
            && self.is_on_start_of_line(rparen)
        {
            self.log_error(id, rparen, "rparen", column, &indent);
        }
    }

    /// Line-wrap check of `first..last` with the configured increment
    pub fn check_wrapping(&self, first: NodeId, last: NodeId) {
        LineWrapChecker::new(self).check(first, last);
    }

    pub fn check_wrapping_from(
        &self,
        first: NodeId,
        last: NodeId,
        wrap: usize,
        start: Option<usize>,
        first_line: FirstLine,
    ) {
        LineWrapChecker::new(self).check_with(first, last, wrap, start, first_line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn with_context<F: FnOnce(&CheckContext<'_>, HandlerId)>(source: &str, f: F) {
        let tree = parse_source(source).unwrap();
        let document = SourceDocument::new(source);
        let options = IndentationOptions::default();
        let root = tree.root().unwrap();
        let handlers = vec![Handler::new(HandlerKind::Primordial, root, None)];
        let log = RefCell::new(ViolationLog::new());
        let ctx = CheckContext::new(&tree, &document, &options, &handlers, &log);
        f(&ctx, HandlerId::new(0));
    }

    fn find(ctx: &CheckContext<'_>, kind: NodeKind) -> NodeId {
        let root = ctx.tree.root().unwrap();
        ctx.tree.preorder(root).find(|&n| ctx.tree.kind(n) == kind).unwrap()
    }

    #[test]
    fn test_first_node_prefers_earlier_line() {
        let source = "class A {\n  int x = a\n      + b;\n}\n";
        with_context(source, |ctx, _| {
            let plus = find(ctx, NodeKind::BinaryOp);
            let first = ctx.first_node(plus);
            assert_eq!(ctx.tree.text(first), "a");
        });
    }

    #[test]
    fn test_start_of_line() {
        let source = "class A {\n    int x;\n}\n";
        with_context(source, |ctx, _| {
            let var = find(ctx, NodeKind::VariableDef);
            assert!(ctx.is_on_start_of_line(var));
            let ident = ctx.child(var, NodeKind::Ident).unwrap();
            assert!(!ctx.is_on_start_of_line(ident));
            assert_eq!(ctx.line_start_of(ident), 4);
        });
    }

    #[test]
    fn test_subtree_scan_flags_shallow_continuation() {
        let source = "class A {\n  int x = a\n  + b;\n}\n";
        let tree = parse_source(source).unwrap();
        let document = SourceDocument::new(source);
        let options = IndentationOptions::default();
        let root = tree.root().unwrap();
        let handlers = vec![Handler::new(HandlerKind::Primordial, root, None)];
        let log = RefCell::new(ViolationLog::new());
        let ctx = CheckContext::new(&tree, &document, &options, &handlers, &log);

        let assign = find(&ctx, NodeKind::Assign);
        ctx.check_expression_subtree(HandlerId::new(0), assign, &IndentLevel::new(2), false, false);

        let violations = log.into_inner().into_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 3);
        assert_eq!(violations[0].expected, IndentLevel::new(6));
    }

    #[test]
    fn test_subtree_scan_strict_first_line() {
        let source = "class A {\n  void f() {\n      g();\n  }\n}\n";
        let tree = parse_source(source).unwrap();
        let document = SourceDocument::new(source);
        let options = IndentationOptions::default();
        let root = tree.root().unwrap();
        let handlers = vec![Handler::new(HandlerKind::Primordial, root, None)];
        let log = RefCell::new(ViolationLog::new());
        let ctx = CheckContext::new(&tree, &document, &options, &handlers, &log);

        let expr = find(&ctx, NodeKind::Expr);
        ctx.check_expression_subtree(HandlerId::new(0), expr, &IndentLevel::new(4), true, false);

        let violations = log.into_inner().into_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 3);
        assert_eq!(violations[0].actual, 6);
        assert_eq!(violations[0].kind, MessageKind::ChildError);
    }
}
