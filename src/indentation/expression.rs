//! Expression and leaf handlers
//!
//! Method and constructor calls, `new`, lambdas, labels, switch labels,
//! `yield`, variable definitions, package and import statements.

use crate::parser::{NodeId, NodeKind};

use super::anchors::LineAnchorSet;
use super::context::CheckContext;
use super::handler::HandlerId;
use super::level::IndentLevel;
use super::registry::HandlerKind;

impl CheckContext<'_> {
    // ---- method calls ----

    pub(super) fn method_call_indent(&self, id: HandlerId) -> IndentLevel {
        let main = self.main(id);
        if let Some(container) = self
            .parent(id)
            .filter(|&p| self.kind(p) == HandlerKind::MethodCall)
        {
            let outer = self.main(container);
            let continued = self.tree.same_line(outer, main)
                || self.is_chained_call_wrapped(main)
                || self.are_calls_chained(outer, main);
            return if continued {
                self.indent(container)
            } else {
                // only the first call of a chain moved to a new line wraps
                self.indent(container).offset(self.line_wrapping())
            };
        }

        let Some(target) = self.tree.first_child(main) else {
            return self.suggested_by_parent(id);
        };
        if self.tree.kind(target) == NodeKind::LiteralNew {
            return self.suggested_by_parent(id);
        }
        let line_start = self.line_start_of(self.first_node(main));
        match self.first_line_column(target) {
            Some(column) if column != line_start => IndentLevel::new(line_start),
            _ => self.suggested_by_parent(id),
        }
    }

    /// Leftmost column on the first line of the unhandled part of `node`
    fn first_line_column(&self, node: NodeId) -> Option<usize> {
        let mut lines = LineAnchorSet::new();
        self.collect_subtree_anchors(&mut lines, node);
        lines.first().map(|(_, anchor)| anchor.column)
    }

    /// `a().b().c()`: the target of the target is itself a call
    fn is_chained_call_wrapped(&self, call: NodeId) -> bool {
        let tree = self.tree;
        let inner = tree
            .first_child(call)
            .and_then(|dot| tree.first_child(dot))
            .and_then(|target| tree.first_child(target));
        match inner {
            Some(dot) if tree.kind(dot) == NodeKind::Dot => tree
                .first_child(dot)
                .is_some_and(|target| tree.kind(target) == NodeKind::MethodCall),
            _ => false,
        }
    }

    /// The outer call's `)` shares a line with this call's `(`
    fn are_calls_chained(&self, outer: NodeId, call: NodeId) -> bool {
        self.child(outer, NodeKind::RParen)
            .is_some_and(|rparen| self.tree.same_line(rparen, call))
    }

    pub(super) fn method_call_suggested_child(&self, id: HandlerId, child: HandlerId) -> IndentLevel {
        let main = self.main(id);
        let target = self.tree.first_child(main).unwrap_or(main);
        let child_node = self.main(child);
        let mut level = if self.is_on_start_of_line(child_node) {
            IndentLevel::new(self.line_start_of(target))
                .with_offsets(&[self.basic_offset() as isize, self.line_wrapping() as isize])
        } else {
            IndentLevel::new(self.line_start_of(child_node))
        };
        if let Some(rparen) = self.child(main, NodeKind::RParen) {
            if self.is_on_start_of_line(rparen) {
                let wrapped = self.suggested_by_parent(id).offset(self.line_wrapping());
                level = level.add_acceptable(&wrapped);
            }
        }
        level
    }

    pub(super) fn check_method_call(&self, id: HandlerId) {
        let main = self.main(id);
        let indent = self.indent(id);
        let lparen = if self.tree.kind(main) == NodeKind::MethodCall {
            let statement = self
                .tree
                .parent(main)
                .is_some_and(|expr| self.tree.parent_kind(expr) == Some(NodeKind::Slist));
            if !statement {
                return;
            }
            if let Some(target) = self.tree.first_child(main) {
                self.check_expression_subtree(id, target, &indent, false, false);
            }
            main
        } else {
            match self.tree.first_child(main) {
                Some(lparen) => lparen,
                None => return,
            }
        };

        self.check_left_paren(id, Some(lparen));
        let Some(rparen) = self.child(main, NodeKind::RParen) else {
            return;
        };
        if self.tree.same_line(rparen, lparen) {
            return;
        }
        if let Some(arguments) = self.child(main, NodeKind::Elist) {
            self.check_expression_subtree(id, arguments, &indent.offset(self.basic_offset()), false, true);
        }
        self.check_right_paren(id, Some(lparen), Some(rparen));
        if let Some(last) = self.tree.last_child(main) {
            self.check_wrapping(main, last);
        }
    }

    // ---- new ----

    pub(super) fn new_indent(&self, id: HandlerId) -> IndentLevel {
        let main = self.main(id);
        if !self.is_on_start_of_line(main) {
            return IndentLevel::new(self.line_start_of(main));
        }
        let level = self.suggested_by_parent(id);
        if self.is_wrapped_value(main) || self.is_wrapped_chain_target(main) {
            level.offset(self.line_wrapping())
        } else {
            level
        }
    }

    fn grandparent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node).and_then(|p| self.tree.parent(p))
    }

    fn is_assignment_or_return(&self, node: Option<NodeId>) -> bool {
        node.is_some_and(|n| {
            matches!(
                self.tree.kind(n),
                NodeKind::Assign | NodeKind::LiteralReturn
            )
        })
    }

    /// `x = <newline> new A()` or `return <newline> new A()`
    fn is_wrapped_value(&self, new: NodeId) -> bool {
        self.is_assignment_or_return(self.grandparent(new))
    }

    /// `x = <newline> new A().b()`
    fn is_wrapped_chain_target(&self, new: NodeId) -> bool {
        let tree = self.tree;
        let Some(dot) = tree.parent(new).filter(|&d| tree.kind(d) == NodeKind::Dot) else {
            return false;
        };
        match tree.parent(dot) {
            Some(call) if tree.kind(call) == NodeKind::MethodCall => {
                self.is_assignment_or_return(self.grandparent(call))
            }
            _ => false,
        }
    }

    pub(super) fn new_suggested_child(&self, id: HandlerId, child: HandlerId) -> IndentLevel {
        let offset = if self.tree.kind(self.main(child)) == NodeKind::ObjBlock {
            self.basic_offset()
        } else {
            self.line_wrapping()
        };
        self.indent(id).offset(offset)
    }

    pub(super) fn check_new(&self, id: HandlerId) {
        let main = self.main(id);
        let indent = self.indent(id);
        if self.is_on_start_of_line(main) {
            let column = self.expanded_column(main);
            let failed = if self.strict() {
                !indent.is_acceptable(column)
            } else {
                indent.is_greater_than(column)
            };
            if failed {
                self.log_error(id, main, "", column, &indent);
            }
        }
        if let Some(ty) = self.tree.first_child(main) {
            self.check_expression_subtree(id, ty, &indent, false, false);
        }
        self.check_left_paren(id, self.child(main, NodeKind::LParen));
    }

    // ---- lambdas ----

    pub(super) fn lambda_indent(&self, id: HandlerId) -> IndentLevel {
        let main = self.main(id);
        let parent = self.parent(id);
        if let Some(call) = parent.filter(|&p| self.kind(p) == HandlerKind::MethodCall) {
            return self.suggested_child_indent(call, id);
        }
        let mut owner = self.tree.parent(main).unwrap_or(main);
        if parent.is_some_and(|p| self.kind(p) == HandlerKind::New) {
            owner = self.tree.parent(owner).unwrap_or(owner);
        }
        let level = IndentLevel::new(self.line_start_of(owner));
        match self.tree.first_child(main) {
            Some(parameters) if self.is_on_start_of_line(parameters) => {
                level.offset(self.line_wrapping())
            }
            _ => level,
        }
    }

    pub(super) fn lambda_suggested_child(&self, id: HandlerId) -> IndentLevel {
        let indent = self.indent(id);
        if self.handler(id).lambda_correct() {
            indent.add_columns(&[self.line_start_of(self.main(id))])
        } else {
            indent
        }
    }

    pub(super) fn check_lambda(&self, id: HandlerId) {
        let main = self.main(id);
        let parameters = self.tree.first_child(main);
        // a bare `->` is a switch rule arrow
        let switch_rule = parameters.is_none();

        if let Some(parameters) = parameters {
            if self.is_on_start_of_line(parameters) {
                let level = self.indent(id);
                let column = self.expanded_column(parameters);
                if !level.is_acceptable(column) {
                    self.handler(id).mark_lambda_incorrect();
                    self.log_error(id, parameters, "arguments", column, &level);
                }
            }
        }

        let column = self.expanded_column(main);
        let arrow_starts_line = column == self.line_start_of(main);
        if arrow_starts_line {
            let base = if switch_rule {
                let label = self.tree.prev_sibling(main).unwrap_or(main);
                IndentLevel::new(self.line_start_of(label))
            } else {
                self.indent(id)
            };
            let level = base.offset(self.line_wrapping());
            if !level.is_acceptable(column) {
                self.handler(id).mark_lambda_incorrect();
                self.log_error(id, main, "", column, &level);
            }
        }

        if switch_rule {
            let body = self
                .tree
                .next_sibling(main)
                .filter(|&n| self.tree.kind(n) == NodeKind::Expr && !self.tree.same_line(main, n));
            if let Some(body) = body {
                let mut level = self.suggested_by_parent(id);
                if arrow_starts_line {
                    level = level.offset(self.line_wrapping());
                }
                self.check_expression_subtree(id, body, &level.offset(self.line_wrapping()), false, false);
            }
        }
    }

    // ---- labels and switch labels ----

    pub(super) fn label_indent(&self, id: HandlerId) -> IndentLevel {
        self.suggested_by_parent(id)
            .with_offsets(&[-(self.basic_offset() as isize), 0])
    }

    pub(super) fn check_label(&self, id: HandlerId) {
        let main = self.main(id);
        let indent = self.indent(id);
        self.check_children(id, main, &[NodeKind::Ident], &indent, true, false);
        let statement = self
            .tree
            .first_child(main)
            .and_then(|label| self.tree.next_sibling(label));
        if let Some(statement) = statement {
            self.check_expression_subtree(id, statement, &indent.offset(self.basic_offset()), true, false);
        }
    }

    pub(super) fn case_indent(&self, id: HandlerId) -> IndentLevel {
        match self.parent(id) {
            Some(switch) => self.indent(switch).offset(self.options.case_indent),
            None => IndentLevel::new(self.options.case_indent),
        }
    }

    pub(super) fn check_case(&self, id: HandlerId) {
        let indent = self.indent(id);
        self.check_children(
            id,
            self.main(id),
            &[NodeKind::LiteralCase, NodeKind::LiteralDefault],
            &indent,
            true,
            false,
        );
    }

    pub(super) fn check_yield(&self, id: HandlerId) {
        let main = self.main(id);
        let indent = self.indent(id);
        let column = self.expanded_column(main);
        if self.is_on_start_of_line(main) && !indent.is_acceptable(column) {
            self.log_error(id, main, "", column, &indent);
        }
        if let Some(semi) = self.tree.last_child(main) {
            self.check_wrapping(main, semi);
        }
    }

    // ---- declarations ----

    pub(super) fn check_member_def(&self, id: HandlerId) {
        let main = self.main(id);
        let has_modifiers = self
            .child(main, NodeKind::Modifiers)
            .is_some_and(|m| self.tree.has_children(m));
        if has_modifiers {
            self.check_modifier_list(id);
        } else {
            self.check_declared_type(id);
        }
        let last = self
            .array_initializer_of(main)
            .or_else(|| self.declaration_end(main));
        if let Some(last) = last {
            self.check_wrapping(main, last);
        }
    }

    fn check_declared_type(&self, id: HandlerId) {
        let Some(ty) = self.child(self.main(id), NodeKind::Type) else {
            return;
        };
        let first = self.first_token(ty);
        let indent = self.indent(id);
        let column = self.expanded_column(first);
        if self.is_on_start_of_line(first) && !indent.is_acceptable(column) {
            self.log_error(id, first, "type", column, &indent);
        }
    }

    /// `= { ... }` or `= new T[] { ... }`
    fn array_initializer_of(&self, variable: NodeId) -> Option<NodeId> {
        let assign = self.child(variable, NodeKind::Assign)?;
        self.child(assign, NodeKind::ArrayInit).or_else(|| {
            self.child(assign, NodeKind::Expr)
                .and_then(|expr| self.child(expr, NodeKind::LiteralNew))
                .and_then(|new| self.child(new, NodeKind::ArrayInit))
        })
    }

    /// The declaration's `;`, or the `,` before the next declarator
    fn declaration_end(&self, variable: NodeId) -> Option<NodeId> {
        match self.tree.last_child(variable) {
            Some(last) if self.tree.kind(last) == NodeKind::Semi => Some(last),
            _ => self.tree.next_sibling(variable),
        }
    }

    pub(super) fn check_package_or_import(&self, id: HandlerId) {
        let main = self.main(id);
        let indent = self.indent(id);
        let column = self.expanded_column(main);
        if !indent.is_acceptable(column) && self.is_on_start_of_line(main) {
            self.log_error(id, main, "", column, &indent);
        }
        if let Some(semi) = self.child(main, NodeKind::Semi) {
            self.check_wrapping(main, semi);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::indentation::check_source;
    use crate::options::IndentationOptions;

    fn lines(source: &str, options: &IndentationOptions) -> Vec<usize> {
        check_source(source, options)
            .unwrap()
            .into_iter()
            .map(|v| v.line)
            .collect()
    }

    fn default_lines(source: &str) -> Vec<usize> {
        lines(source, &IndentationOptions::default())
    }

    #[test]
    fn test_chained_calls_on_one_line() {
        let source = "\
class A {
    void f() {
        builder.a().b().c();
    }
}
";
        assert!(default_lines(source).is_empty());
    }

    #[test]
    fn test_wrapped_chain() {
        let source = "\
class A {
    void f() {
        builder.a()
            .b()
            .c();
    }
}
";
        assert!(default_lines(source).is_empty(), "{:?}", default_lines(source));
    }

    #[test]
    fn test_wrapped_arguments() {
        let source = "\
class A {
    void f() {
        call(first,
            second);
        call(first,
        second);
    }
}
";
        assert_eq!(default_lines(source), vec![6]);
    }

    #[test]
    fn test_lambda_block_body() {
        let source = "\
class A {
    void f() {
        list.forEach(x -> {
            g(x);
        });
        Runnable r = () -> {
            g(1);
        };
    }
}
";
        assert!(default_lines(source).is_empty(), "{:?}", default_lines(source));
    }

    #[test]
    fn test_label_accepts_both_levels() {
        let source = "\
class A {
    void f() {
    outer:
        for (;;) {
            break outer;
        }
        inner:
        while (true) {
            break inner;
        }
    }
}
";
        assert!(default_lines(source).is_empty(), "{:?}", default_lines(source));
    }

    #[test]
    fn test_switch_rules_and_yield() {
        let source = "\
class A {
    int f(int x) {
        return switch (x) {
            case 1 -> 10;
            case 2 -> {
                yield 20;
            }
            default -> 0;
        };
    }
}
";
        assert!(default_lines(source).is_empty(), "{:?}", default_lines(source));
    }

    #[test]
    fn test_member_type_misplaced() {
        let source = "\
class A {
      int x;
    String s;
}
";
        let found = check_source(source, &IndentationOptions::default()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 2);
        assert_eq!(found[0].actual, 6);
        assert_eq!(found[0].expected.levels(), &[4]);
    }

    #[test]
    fn test_package_and_imports() {
        let source = "\
package a.b;

import java.util.List;
  import java.util.Map;

class A {
}
";
        assert_eq!(default_lines(source), vec![4]);
    }

    #[test]
    fn test_wrapped_new_in_assignment() {
        let source = "\
class A {
    void f() {
        Object o =
            new Object();
        Object p =
        new Object();
    }
}
";
        assert_eq!(default_lines(source), vec![6]);
    }
}
