//! Line Wrap Checker
//!
//! Validates the continuation lines of a span of nodes. For every physical
//! line the span touches, the leftmost node leading that line must be
//! indented by one wrap increment past the line the span starts on.

use crate::parser::{NodeId, NodeKind};

use super::anchors::LineAnchorSet;
use super::context::CheckContext;

/// Whether the span's first line takes part in the check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstLine {
    /// Already validated by the caller
    Ignore,
    Check,
}

/// Lines led by these nodes are never reported
const IGNORED_LEADERS: &[NodeKind] = &[
    NodeKind::LCurly,
    NodeKind::RCurly,
    NodeKind::LiteralNew,
    NodeKind::LiteralYield,
    NodeKind::ArrayInit,
    NodeKind::LiteralDefault,
    NodeKind::LiteralCase,
];

pub struct LineWrapChecker<'c, 'a> {
    ctx: &'c CheckContext<'a>,
}

impl<'c, 'a> LineWrapChecker<'c, 'a> {
    pub fn new(ctx: &'c CheckContext<'a>) -> Self {
        Self { ctx }
    }

    /// Check `first..last` with the configured increment, skipping the
    /// first line
    pub fn check(&self, first: NodeId, last: NodeId) {
        self.check_with(
            first,
            last,
            self.ctx.line_wrapping(),
            None,
            FirstLine::Ignore,
        );
    }

    /// Check `first..last` against `start + wrap`, where `start` defaults
    /// to the line start of the span's first line
    pub fn check_with(
        &self,
        first: NodeId,
        last: NodeId,
        wrap: usize,
        start: Option<usize>,
        first_line: FirstLine,
    ) {
        let tree = self.ctx.tree;
        let Some(mut lines) = self.collect_first_nodes(first, last) else {
            log::debug!(
                "{} at {}:{} does not reach {} at {}:{}, skipping wrap check",
                tree.kind(first),
                tree.line(first),
                tree.column(first),
                tree.kind(last),
                tree.line(last),
                tree.column(last)
            );
            return;
        };
        let Some((_, leader)) = lines.first() else {
            return;
        };
        if tree.kind(leader.node) == NodeKind::At {
            self.check_annotations(&mut lines, leader.node, wrap);
        }
        if first_line == FirstLine::Ignore {
            if let Some((line, _)) = lines.first() {
                lines.remove(line);
            }
        }

        let first_indent = start.unwrap_or_else(|| self.ctx.line_start_of(leader.node));
        let expected = first_indent + wrap;
        for (_, anchor) in lines.iter() {
            let node = anchor.node;
            let kind = tree.kind(node);
            if self.is_empty_parameters(node) || self.is_method_def_lparen(node) {
                continue;
            }
            if kind == NodeKind::RParen {
                self.report(node, first_indent);
            } else if !IGNORED_LEADERS.contains(&kind) {
                self.report(node, expected);
            }
        }
    }

    /// Leftmost node per line from `first` up to, not including, `last`.
    /// `None` when `last` cannot be reached by walking forward.
    pub fn collect_first_nodes(&self, first: NodeId, last: NodeId) -> Option<LineAnchorSet> {
        let tree = self.ctx.tree;
        let mut lines = LineAnchorSet::new();
        lines.insert(tree.line(first), first, self.ctx.expanded_column(first));
        if first == last {
            return Some(lines);
        }

        let mut current = tree.first_child(first)?;
        while current != last {
            if matches!(tree.kind(current), NodeKind::ObjBlock | NodeKind::Slist) {
                current = tree.last_child(current).unwrap_or(current);
                if current == last {
                    break;
                }
            }
            lines.insert_if_not_right(tree.line(current), current, self.ctx.expanded_column(current));
            current = self.next_node(current)?;
        }
        Some(lines)
    }

    fn next_node(&self, node: NodeId) -> Option<NodeId> {
        let tree = self.ctx.tree;
        if let Some(child) = tree.first_child(node) {
            return Some(child);
        }
        let mut current = node;
        loop {
            if let Some(sibling) = tree.next_sibling(current) {
                return Some(sibling);
            }
            current = tree.parent(current)?;
        }
    }

    fn report(&self, node: NodeId, expected: usize) {
        let column = self.ctx.expanded_column(node);
        let failed = if self.ctx.strict() {
            column != expected
        } else {
            column < expected
        };
        if failed {
            self.ctx.log_wrap_error(node, column, expected);
        }
    }

    fn is_empty_parameters(&self, node: NodeId) -> bool {
        let tree = self.ctx.tree;
        tree.kind(node) == NodeKind::Parameters && !tree.has_children(node)
    }

    fn is_method_def_lparen(&self, node: NodeId) -> bool {
        let tree = self.ctx.tree;
        tree.kind(node) == NodeKind::LParen && tree.parent_kind(node) == Some(NodeKind::MethodDef)
    }

    /// Annotations leading the span are checked against their own line
    /// start; their lines are then dropped from `lines`
    fn check_annotations(&self, lines: &mut LineAnchorSet, leader: NodeId, wrap: usize) {
        let tree = self.ctx.tree;
        let mut node = tree.parent(leader);
        while let Some(current) = node {
            if tree.kind(current) == NodeKind::Annotation {
                if let Some(at) = tree.first_child(current) {
                    let from = tree.line(current);
                    let to = self.line_after_annotation(lines, current);
                    self.check_annotation(at, lines, from, to, wrap);
                }
            }
            node = tree.next_sibling(current);
        }
    }

    fn line_after_annotation(&self, lines: &LineAnchorSet, annotation: NodeId) -> usize {
        let tree = self.ctx.tree;
        let last_line = tree.line(tree.last_child(annotation).unwrap_or(annotation));
        lines
            .line_after(last_line)
            .or_else(|| lines.last_line())
            .unwrap_or(last_line)
    }

    fn check_annotation(&self, at: NodeId, lines: &mut LineAnchorSet, from: usize, to: usize, wrap: usize) {
        let tree = self.ctx.tree;
        let first_indent = self.ctx.line_start_of(at);
        let expected = first_indent + wrap;
        let annotation = tree.parent(at).unwrap_or(at);
        let closing = tree.last_child(annotation).unwrap_or(annotation);
        let closing_line = tree.line(closing);

        let covered = lines.lines_between(from, to);
        let checked = covered.len().saturating_sub(1);
        for &line in &covered[..checked] {
            let Some(anchor) = lines.remove(line) else {
                continue;
            };
            let node = anchor.node;
            if self.has_ancestor(node, NodeKind::AnnotationArrayInit) {
                continue;
            }
            let closes_alone = tree.line(node) == closing_line && self.is_end_of_scope(closing, node);
            let starts_annotation = tree.kind(node) == NodeKind::At
                && tree
                    .parent(node)
                    .and_then(|p| tree.parent_kind(p))
                    .is_some_and(|k| matches!(k, NodeKind::Modifiers | NodeKind::Annotations));
            if closes_alone || starts_annotation || tree.same_line(node, at) {
                self.report(node, first_indent);
            } else {
                self.report(node, expected);
            }
        }
    }

    /// True when only closing braces and brackets separate `node` from the
    /// annotation's last token
    fn is_end_of_scope(&self, closing: NodeId, node: NodeId) -> bool {
        let tree = self.ctx.tree;
        let mut check = node;
        while check != closing {
            if !matches!(tree.kind(check), NodeKind::RCurly | NodeKind::RBrack) {
                return false;
            }
            let mut current = check;
            check = loop {
                if let Some(sibling) = tree.next_sibling(current) {
                    break sibling;
                }
                match tree.parent(current) {
                    Some(parent) => current = parent,
                    None => return false,
                }
            };
        }
        true
    }

    fn has_ancestor(&self, node: NodeId, kind: NodeKind) -> bool {
        let tree = self.ctx.tree;
        let mut current = tree.parent(node);
        while let Some(ancestor) = current {
            if tree.kind(ancestor) == kind {
                return true;
            }
            current = tree.parent(ancestor);
        }
        false
    }
}
