//! Block-parent handlers
//!
//! Constructs that own a brace-delimited body or a single nested statement:
//! type and method definitions, blocks, control-flow statements and array
//! initializers.

use crate::parser::{NodeId, NodeKind};

use super::context::CheckContext;
use super::handler::HandlerId;
use super::level::IndentLevel;
use super::line_wrap::FirstLine;
use super::registry::HandlerKind;

/// Statement kinds a block validates directly
const BLOCK_CHILDREN: &[NodeKind] = &[
    NodeKind::VariableDef,
    NodeKind::Expr,
    NodeKind::Annotation,
    NodeKind::ObjBlock,
    NodeKind::LiteralBreak,
    NodeKind::LiteralReturn,
    NodeKind::LiteralThrow,
    NodeKind::LiteralContinue,
    NodeKind::CtorCall,
    NodeKind::SuperCtorCall,
];

const CLASS_CHILDREN: &[NodeKind] = &[
    NodeKind::Expr,
    NodeKind::ObjBlock,
    NodeKind::LiteralBreak,
    NodeKind::LiteralReturn,
    NodeKind::LiteralThrow,
    NodeKind::LiteralContinue,
];

const ARRAY_INIT_CHILDREN: &[NodeKind] = &[NodeKind::Expr];

const ANNOTATION_ARRAY_INIT_CHILDREN: &[NodeKind] = &[
    NodeKind::Expr,
    NodeKind::Annotation,
    NodeKind::AnnotationArrayInit,
];

/// Parents whose handler already validates a nested block's braces
const BLOCK_OWNERS: &[NodeKind] = &[
    NodeKind::LiteralFor,
    NodeKind::LiteralWhile,
    NodeKind::LiteralDo,
    NodeKind::LiteralIf,
    NodeKind::LiteralElse,
    NodeKind::LiteralTry,
    NodeKind::LiteralCatch,
    NodeKind::LiteralFinally,
    NodeKind::CtorDef,
    NodeKind::MethodDef,
    NodeKind::StaticInit,
    NodeKind::LiteralSynchronized,
    NodeKind::CompactCtorDef,
];

impl CheckContext<'_> {
    // ---- structure ----

    fn top_level_node(&self, id: HandlerId) -> Option<NodeId> {
        match self.kind(id) {
            HandlerKind::ClassDef
            | HandlerKind::ObjectBlock
            | HandlerKind::MethodDef
            | HandlerKind::Slist
            | HandlerKind::ArrayInit
            | HandlerKind::AnnotationArrayInit => None,
            _ => Some(self.main(id)),
        }
    }

    pub(super) fn left_curly(&self, id: HandlerId) -> Option<NodeId> {
        let main = self.main(id);
        match self.kind(id) {
            HandlerKind::ClassDef => self
                .child(main, NodeKind::ObjBlock)
                .and_then(|body| self.child(body, NodeKind::LCurly)),
            HandlerKind::ObjectBlock | HandlerKind::Switch => self.child(main, NodeKind::LCurly),
            HandlerKind::Slist | HandlerKind::ArrayInit | HandlerKind::AnnotationArrayInit => {
                Some(main)
            }
            _ => self.child(main, NodeKind::Slist),
        }
    }

    pub(super) fn right_curly(&self, id: HandlerId) -> Option<NodeId> {
        let main = self.main(id);
        match self.kind(id) {
            HandlerKind::ClassDef => self
                .child(main, NodeKind::ObjBlock)
                .and_then(|body| self.child(body, NodeKind::RCurly)),
            HandlerKind::ObjectBlock
            | HandlerKind::Switch
            | HandlerKind::Slist
            | HandlerKind::ArrayInit
            | HandlerKind::AnnotationArrayInit => self.child(main, NodeKind::RCurly),
            _ => self
                .child(main, NodeKind::Slist)
                .and_then(|body| self.child(body, NodeKind::RCurly)),
        }
    }

    fn curlies(&self, id: HandlerId) -> Option<(NodeId, NodeId)> {
        Some((self.left_curly(id)?, self.right_curly(id)?))
    }

    fn list_child(&self, id: HandlerId) -> Option<NodeId> {
        let main = self.main(id);
        match self.kind(id) {
            HandlerKind::ClassDef => self.child(main, NodeKind::ObjBlock),
            HandlerKind::ObjectBlock
            | HandlerKind::Slist
            | HandlerKind::ArrayInit
            | HandlerKind::AnnotationArrayInit => Some(main),
            HandlerKind::Switch => None,
            _ => self.child(main, NodeKind::Slist),
        }
    }

    fn non_list_child(&self, id: HandlerId) -> Option<NodeId> {
        let main = self.main(id);
        match self.kind(id) {
            HandlerKind::Else | HandlerKind::DoWhile => self.tree.first_child(main),
            HandlerKind::Switch => None,
            _ => self
                .child(main, NodeKind::RParen)
                .and_then(|rparen| self.tree.next_sibling(rparen)),
        }
    }

    fn checked_children(&self, id: HandlerId) -> &'static [NodeKind] {
        match self.kind(id) {
            HandlerKind::ClassDef => CLASS_CHILDREN,
            HandlerKind::ArrayInit => ARRAY_INIT_CHILDREN,
            HandlerKind::AnnotationArrayInit => ANNOTATION_ARRAY_INIT_CHILDREN,
            _ => BLOCK_CHILDREN,
        }
    }

    fn can_children_be_nested(&self, id: HandlerId) -> bool {
        matches!(
            self.kind(id),
            HandlerKind::ArrayInit | HandlerKind::AnnotationArrayInit
        )
    }

    /// Level both braces of the construct must sit at
    pub(super) fn curly_indent(&self, id: HandlerId) -> IndentLevel {
        let indent = self.indent(id);
        let wrap = self.line_wrapping();
        match self.kind(id) {
            HandlerKind::ArrayInit => {
                let level = indent.offset(self.options.brace_adjustment);
                level.add_columns(&[level.last_level() + wrap])
            }
            HandlerKind::AnnotationArrayInit => {
                let lcurly = self.main(id);
                if self.is_on_start_of_line(lcurly) {
                    indent.offset(wrap)
                } else {
                    indent
                }
            }
            _ => {
                let adjusted = self.left_curly(id).is_some_and(|lcurly| {
                    self.is_on_start_of_line(lcurly)
                        && self.tree.parent_kind(lcurly) != Some(NodeKind::InstanceInit)
                });
                if adjusted {
                    indent.offset(self.options.brace_adjustment)
                } else {
                    indent
                }
            }
        }
    }

    /// Level the statements of the body are expected at
    pub(super) fn children_expected_indent(&self, id: HandlerId) -> IndentLevel {
        match self.kind(id) {
            HandlerKind::ArrayInit => {
                let base = self
                    .indent(id)
                    .with_offsets(&[self.options.array_init_indent as isize, self.line_wrapping() as isize]);
                self.with_first_element_column(id, base)
            }
            HandlerKind::AnnotationArrayInit => {
                let base = self.indent(id).offset(self.line_wrapping());
                self.with_first_element_column(id, base)
            }
            _ => self.block_children_indent(id),
        }
    }

    fn block_children_indent(&self, id: HandlerId) -> IndentLevel {
        let indent = self.indent(id);
        let basic = self.basic_offset();
        let mut level = indent.offset(basic);
        if let Some((lcurly, rcurly)) = self.curlies(id) {
            let lcurly_starts_line = self.is_on_start_of_line(lcurly);
            if indent.is_multi_level() {
                if lcurly_starts_line {
                    level = IndentLevel::new(self.expanded_column(lcurly) + basic);
                } else if self.is_on_start_of_line(rcurly) {
                    let curly = self.curly_indent(id).offset(basic);
                    level = curly.add_columns(&[curly.first_level() + self.line_wrapping()]);
                }
            }
            if lcurly_starts_line {
                level = level.add_columns(&[self.curly_indent(id).first_level() + basic]);
            }
        }
        level
    }

    /// Accept elements aligned with the first one written after `{`
    fn with_first_element_column(&self, id: HandlerId, base: IndentLevel) -> IndentLevel {
        let lcurly = self.main(id);
        let line = self.tree.line(self.first_node(lcurly));
        let lcurly_column = self.expanded_column(lcurly);
        match self.document.next_non_blank_after(line, self.tree.column(lcurly)) {
            Some(next) => {
                let first_element = self
                    .document
                    .expanded_column(line, next, self.options.tab_width);
                base.add_columns(&[first_element, lcurly_column + self.line_wrapping()])
            }
            None => base,
        }
    }

    // ---- indent computations ----

    pub(super) fn object_block_indent(&self, id: HandlerId) -> IndentLevel {
        let Some(parent) = self.parent(id) else {
            return IndentLevel::new(0);
        };
        match self.tree.parent_kind(self.main(id)) {
            Some(NodeKind::LiteralNew) => self
                .indent(parent)
                .add_acceptable(&self.suggested_child_indent(parent, id)),
            Some(NodeKind::EnumConstantDef) => self.suggested_by_parent(id),
            _ => self.indent(parent),
        }
    }

    /// `if` directly after `else` on the same line
    fn is_if_after_else(&self, id: HandlerId) -> bool {
        let main = self.main(id);
        self.tree
            .parent(main)
            .is_some_and(|p| self.tree.kind(p) == NodeKind::LiteralElse && self.tree.same_line(p, main))
    }

    pub(super) fn if_indent(&self, id: HandlerId) -> IndentLevel {
        match self.parent(id) {
            Some(parent) if self.is_if_after_else(id) => self.indent(parent),
            _ => self.suggested_by_parent(id),
        }
    }

    pub(super) fn switch_indent(&self, id: HandlerId) -> IndentLevel {
        let main = self.main(id);
        if self.is_on_start_of_line(main) {
            self.suggested_by_parent(id)
        } else {
            IndentLevel::new(self.line_start_of(main))
        }
    }

    pub(super) fn array_init_indent(&self, id: HandlerId) -> IndentLevel {
        let main = self.main(id);
        match self.tree.parent(main) {
            Some(owner)
                if matches!(self.tree.kind(owner), NodeKind::LiteralNew | NodeKind::Assign) =>
            {
                IndentLevel::new(self.line_start_of(owner))
            }
            _ => match self.parent(id) {
                Some(parent) if self.kind(parent) == HandlerKind::ArrayInit => {
                    self.children_expected_indent(parent)
                }
                _ => self.suggested_by_parent(id),
            },
        }
    }

    pub(super) fn annotation_array_init_indent(&self, id: HandlerId) -> IndentLevel {
        let main = self.main(id);
        let owner = self.tree.parent(main).unwrap_or(main);
        IndentLevel::new(self.line_start_of(owner))
    }

    pub(super) fn slist_suggested_child(&self, id: HandlerId, child: HandlerId) -> IndentLevel {
        match self.parent(id) {
            Some(parent) => {
                let parent_kind = self.kind(parent);
                let transparent = parent_kind.is_block_parent() && parent_kind != HandlerKind::Slist
                    || self.kind(child) == HandlerKind::Slist && parent_kind == HandlerKind::Case;
                if transparent {
                    self.suggested_child_indent(parent, child)
                } else {
                    self.children_expected_indent(id)
                }
            }
            None => self.children_expected_indent(id),
        }
    }

    pub(super) fn try_suggested_child(&self, id: HandlerId, child: HandlerId) -> IndentLevel {
        let aligned = match self.kind(child) {
            HandlerKind::Catch | HandlerKind::Finally => true,
            HandlerKind::New => self.is_in_resource_specification(self.main(child)),
            _ => false,
        };
        if aligned {
            self.indent(id)
        } else {
            self.children_expected_indent(id)
        }
    }

    fn is_in_resource_specification(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            match self.tree.kind(n) {
                NodeKind::LiteralTry => return false,
                NodeKind::ResourceSpecification => return true,
                _ => current = self.tree.parent(n),
            }
        }
        false
    }

    // ---- checks ----

    /// Shared validation of the block-parent family
    pub(super) fn check_block_parent(&self, id: HandlerId) {
        let main = self.main(id);
        self.check_top_level_token(id);
        let lparen = self.child(main, NodeKind::LParen);
        self.check_left_paren(id, lparen);
        self.check_right_paren(id, lparen, self.child(main, NodeKind::RParen));

        let curlies = self.curlies(id);
        if let Some((lcurly, rcurly)) = curlies {
            self.check_left_curly(id, lcurly);
            self.check_right_curly(id, rcurly);
        }

        match self.list_child(id) {
            None => self.check_non_list_child(id),
            Some(list) => {
                let one_line = curlies.is_some_and(|(l, r)| self.tree.same_line(l, r));
                if !one_line {
                    let expected = self.children_expected_indent(id);
                    let kinds = self.checked_children(id);
                    self.check_children(id, list, kinds, &expected, true, self.can_children_be_nested(id));
                    if !matches!(
                        self.kind(id),
                        HandlerKind::ClassDef | HandlerKind::ArrayInit | HandlerKind::AnnotationArrayInit
                    ) {
                        self.check_wrapped_exits(list);
                    }
                }
            }
        }
    }

    /// Multi-line `return` and `throw` statements wrap like expressions
    fn check_wrapped_exits(&self, list: NodeId) {
        for statement in self.tree.children(list) {
            if !matches!(
                self.tree.kind(statement),
                NodeKind::LiteralReturn | NodeKind::LiteralThrow
            ) {
                continue;
            }
            let Some(semi) = self.tree.last_child(statement) else {
                continue;
            };
            if !self.tree.same_line(statement, semi) {
                self.check_wrapping(statement, semi);
            }
        }
    }

    fn check_top_level_token(&self, id: HandlerId) {
        let Some(top) = self.top_level_node(id) else {
            return;
        };
        match self.kind(id) {
            HandlerKind::If if self.is_if_after_else(id) => return,
            HandlerKind::Else if self.follows_if_rcurly(id) => return,
            _ => {}
        }
        let indent = self.indent(id);
        let column = self.expanded_column(top);
        if !indent.is_acceptable(column) && self.is_on_start_of_line(top) {
            self.log_error(id, top, "", column, &indent);
        }
    }

    /// `} else` where the brace closes the `if` body
    fn follows_if_rcurly(&self, id: HandlerId) -> bool {
        let main = self.main(id);
        self.tree
            .parent(main)
            .and_then(|if_node| self.child(if_node, NodeKind::Slist))
            .and_then(|body| self.tree.last_child(body))
            .is_some_and(|rcurly| self.tree.same_line(rcurly, main))
    }

    fn check_left_curly(&self, id: HandlerId, lcurly: NodeId) {
        let level = self.curly_indent(id);
        let column = self.expanded_column(lcurly);
        if !level.is_acceptable(column) && self.is_on_start_of_line(lcurly) {
            self.log_error(id, lcurly, "lcurly", column, &level);
        }
    }

    fn check_right_curly(&self, id: HandlerId, rcurly: NodeId) {
        let level = self.curly_indent(id);
        let accepted = if self.kind(id) == HandlerKind::ObjectBlock {
            level.add_columns(&[level.first_level() + self.line_wrapping()])
        } else {
            level.clone()
        };
        let column = self.expanded_column(rcurly);
        if !accepted.is_acceptable(column) && self.is_on_start_of_line(rcurly) {
            self.log_error(id, rcurly, "rcurly", column, &level);
        }
    }

    fn check_non_list_child(&self, id: HandlerId) {
        let Some(statement) = self.non_list_child(id) else {
            return;
        };
        let expected = self.indent(id).offset(self.basic_offset());
        self.check_expression_subtree(id, statement, &expected, false, false);
        let start = self.first_node(statement);
        if start != statement {
            self.check_expression_subtree(id, start, &expected, false, false);
        }
    }

    /// Scan the expression right after the construct's `(`
    fn check_condition(&self, id: HandlerId, level: &IndentLevel) {
        let condition = self
            .child(self.main(id), NodeKind::LParen)
            .and_then(|lparen| self.tree.next_sibling(lparen));
        if let Some(condition) = condition {
            self.check_expression_subtree(id, condition, level, false, false);
        }
    }

    /// Wrap check of the header up to its `)`
    fn check_header_wrapping(&self, id: HandlerId) {
        let main = self.main(id);
        if let Some(rparen) = self.child(main, NodeKind::RParen) {
            self.check_wrapping(main, rparen);
        }
    }

    pub(super) fn check_class_def(&self, id: HandlerId) {
        let main = self.main(id);
        let indent = self.indent(id);
        let is_annotation = self.tree.kind(main) == NodeKind::AnnotationDef;
        let has_modifiers = self
            .child(main, NodeKind::Modifiers)
            .is_some_and(|m| self.tree.has_children(m));
        if has_modifiers {
            self.check_each_modifier(id);
        } else if !is_annotation {
            if let Some(ident) = self.child(main, NodeKind::Ident) {
                let start = self.line_start_of(ident);
                if !indent.is_acceptable(start) {
                    self.log_error(id, ident, "ident", start, &indent);
                }
            }
        }

        if let Some(body) = self.list_child(id) {
            if is_annotation {
                if self
                    .child(main, NodeKind::At)
                    .is_some_and(|at| self.is_on_start_of_line(at))
                {
                    self.check_wrapping_from(main, body, 0, Some(indent.first_level()), FirstLine::Check);
                }
            } else {
                self.check_wrapping(main, body);
            }
        }
        self.check_block_parent(id);
    }

    pub(super) fn check_object_block(&self, id: HandlerId) {
        // named types validate their own bodies
        if self.tree.parent_kind(self.main(id)) == Some(NodeKind::LiteralNew) {
            self.check_block_parent(id);
        }
    }

    pub(super) fn check_method_def(&self, id: HandlerId) {
        let main = self.main(id);
        self.check_modifier_list(id);
        self.check_throws(id);
        if let Some(rparen) = self.child(main, NodeKind::RParen) {
            self.check_wrapping(main, rparen);
        }
        // abstract and interface methods have no body
        if self.left_curly(id).is_some() {
            self.check_block_parent(id);
        }
    }

    fn check_throws(&self, id: HandlerId) {
        let main = self.main(id);
        let Some(throws) = self.child(main, NodeKind::LiteralThrows) else {
            return;
        };
        let Some(end) = self.tree.next_sibling(throws) else {
            return;
        };
        let start = self.line_start(self.signature_start_line(main));
        let first_line = if self.is_on_start_of_line(throws) {
            FirstLine::Check
        } else {
            FirstLine::Ignore
        };
        self.check_wrapping_from(throws, end, self.options.throws_indent, Some(start), first_line);
    }

    /// First line of the signature, annotations excluded
    fn signature_start_line(&self, method: NodeId) -> usize {
        let mut line = self
            .child(method, NodeKind::Ident)
            .map_or(self.tree.line(method), |ident| self.tree.line(ident));
        if let Some(ty) = self.child(method, NodeKind::Type) {
            line = self.tree.line(self.first_node(ty));
        }
        if let Some(modifiers) = self.child(method, NodeKind::Modifiers) {
            for modifier in self.tree.children(modifiers) {
                if self.tree.kind(modifier) != NodeKind::Annotation {
                    line = line.min(self.tree.line(modifier));
                }
            }
        }
        line
    }

    pub(super) fn check_slist(&self, id: HandlerId) {
        let main = self.main(id);
        let owner = self.tree.parent(main);
        let owned = owner.is_some_and(|o| BLOCK_OWNERS.contains(&self.tree.kind(o)));
        let same_line_case = owner.is_some_and(|o| {
            self.tree.kind(o) == NodeKind::CaseGroup && self.tree.same_line(o, main)
        });
        if !owned && !same_line_case {
            self.check_block_parent(id);
        }
    }

    pub(super) fn check_if(&self, id: HandlerId) {
        self.check_block_parent(id);
        let expected = self.indent(id).offset(self.basic_offset());
        self.check_condition(id, &expected);
        self.check_header_wrapping(id);
    }

    pub(super) fn check_for(&self, id: HandlerId) {
        let main = self.main(id);
        let expected = self.indent(id).offset(self.basic_offset());
        match self.child(main, NodeKind::ForInit) {
            Some(init) => {
                self.check_expression_subtree(id, init, &expected, false, false);
                for kind in [NodeKind::ForCondition, NodeKind::ForIterator] {
                    if let Some(part) = self.child(main, kind) {
                        self.check_expression_subtree(id, part, &expected, false, false);
                    }
                }
            }
            None => {
                if let Some(clause) = self.child(main, NodeKind::ForEachClause) {
                    self.check_expression_subtree(id, clause, &expected, false, false);
                }
            }
        }
        self.check_block_parent(id);
        self.check_header_wrapping(id);
    }

    pub(super) fn check_while(&self, id: HandlerId) {
        let expected = self.indent(id).offset(self.basic_offset());
        self.check_condition(id, &expected);
        self.check_block_parent(id);
        self.check_header_wrapping(id);
    }

    pub(super) fn check_do_while(&self, id: HandlerId) {
        self.check_block_parent(id);
        let indent = self.indent(id);
        if let Some(keyword) = self.child(self.main(id), NodeKind::DoWhile) {
            let column = self.expanded_column(keyword);
            if self.is_on_start_of_line(keyword) && !indent.is_acceptable(column) {
                self.log_error(id, keyword, "while", column, &indent);
            }
        }
        self.check_condition(id, &indent.offset(self.basic_offset()));
    }

    pub(super) fn check_synchronized(&self, id: HandlerId) {
        self.check_block_parent(id);
        let expected = self.indent(id).offset(self.basic_offset());
        self.check_condition(id, &expected);
        self.check_header_wrapping(id);
    }

    pub(super) fn check_catch(&self, id: HandlerId) {
        self.check_block_parent(id);
        let indent = self.indent(id);
        self.check_condition(id, &indent);
    }

    pub(super) fn check_switch(&self, id: HandlerId) {
        let indent = self.indent(id);
        self.check_condition(id, &indent);
        self.check_block_parent(id);
    }

    pub(super) fn check_try(&self, id: HandlerId) {
        self.check_block_parent(id);
        let Some(spec) = self
            .tree
            .first_child(self.main(id))
            .filter(|&n| self.tree.kind(n) == NodeKind::ResourceSpecification)
        else {
            return;
        };
        let indent = self.indent(id);
        let wrap = self.line_wrapping();
        let paren_level = indent.with_offsets(&[0, wrap as isize]);
        if let Some(lparen) = self.tree.first_child(spec) {
            self.check_resource_token(id, lparen, "lparen", &paren_level);
        }
        if let Some(rparen) = self.tree.last_child(spec) {
            self.check_resource_token(id, rparen, "rparen", &paren_level);
        }

        let Some(resources) = self.child(spec, NodeKind::Resources) else {
            return;
        };
        let expected = IndentLevel::new(indent.first_level() + wrap);
        for resource in self.tree.children(resources) {
            if self.tree.kind(resource) == NodeKind::Semi {
                continue;
            }
            self.check_resource_token(id, resource, "resource", &expected);
            if let Some(last) = self.tree.last_child(resource) {
                self.check_wrapping_from(resource, last, wrap, Some(expected.first_level()), FirstLine::Ignore);
            }
        }
    }

    /// Resource parts starting a line: exact in strict mode, at least the
    /// first level otherwise
    fn check_resource_token(&self, id: HandlerId, node: NodeId, subtype: &str, expected: &IndentLevel) {
        if !self.is_on_start_of_line(node) {
            return;
        }
        let column = self.expanded_column(node);
        let failed = if self.strict() {
            !expected.is_acceptable(column)
        } else {
            column < expected.first_level()
        };
        if failed {
            self.log_error(id, node, subtype, column, expected);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::indentation::check_source;
    use crate::options::IndentationOptions;

    fn messages(source: &str) -> Vec<(usize, String)> {
        check_source(source, &IndentationOptions::default())
            .unwrap()
            .into_iter()
            .map(|v| (v.line, v.message()))
            .collect()
    }

    #[test]
    fn test_well_formed_class_is_clean() {
        let source = "\
class A {
    private int x;

    void f(int a) {
        if (a > 0) {
            x = a;
        } else {
            x = 0;
        }
    }
}
";
        assert!(messages(source).is_empty(), "{:?}", messages(source));
    }

    #[test]
    fn test_misplaced_if_lcurly() {
        let source = "\
class A {
    void f() {
        if (true)
          {
            g();
        }
    }
}
";
        let found = messages(source);
        assert_eq!(found.len(), 1, "{:?}", found);
        assert_eq!(found[0].0, 4);
        assert!(found[0].1.starts_with("'if lcurly' has incorrect indentation level 10"));
    }

    #[test]
    fn test_else_if_chain_is_clean() {
        let source = "\
class A {
    void f(int a) {
        if (a == 1) {
            g();
        } else if (a == 2) {
            h();
        } else {
            k();
        }
    }
}
";
        assert!(messages(source).is_empty(), "{:?}", messages(source));
    }

    #[test]
    fn test_braceless_body_too_shallow() {
        let source = "\
class A {
    void f(boolean b) {
        while (b)
        g();
    }
}
";
        let found = messages(source);
        assert_eq!(found.len(), 1, "{:?}", found);
        assert_eq!(found[0].0, 4);
        assert!(found[0].1.contains("'while' child"), "{:?}", found);
    }

    #[test]
    fn test_try_catch_finally_aligned() {
        let source = "\
class A {
    void f() {
        try {
            g();
        } catch (Exception e) {
            h();
        } finally {
            k();
        }
    }
}
";
        assert!(messages(source).is_empty(), "{:?}", messages(source));
    }

    #[test]
    fn test_try_resources_wrap() {
        let source = "\
class A {
    void f() throws Exception {
        try (
            Reader r = open();
            Writer w = create()
        ) {
            r.read();
        }
    }
}
";
        assert!(messages(source).is_empty(), "{:?}", messages(source));
    }

    #[test]
    fn test_switch_cases() {
        let source = "\
class A {
    void f(int x) {
        switch (x) {
            case 1:
                g();
                break;
            default:
              h();
        }
    }
}
";
        let found = messages(source);
        assert_eq!(found.len(), 1, "{:?}", found);
        assert_eq!(found[0].0, 8);
        assert!(found[0].1.starts_with("'block' child"), "{:?}", found);
    }

    #[test]
    fn test_array_initializer_forms() {
        let source = "\
class A {
    int[] a = {1, 2, 3};
    int[] b = {
        1,
        2,
    };
    int[] c = {1,
               2};
}
";
        assert!(messages(source).is_empty(), "{:?}", messages(source));
    }

    #[test]
    fn test_anonymous_class_body() {
        let source = "\
class A {
    Runnable r = new Runnable() {
        public void run() {
            g();
        }
    };
}
";
        assert!(messages(source).is_empty(), "{:?}", messages(source));
    }

    #[test]
    fn test_throws_on_own_line() {
        let source = "\
class A {
    void f()
        throws Exception {
    }
    void g()
    throws Exception {
    }
}
";
        let found = messages(source);
        assert_eq!(found.len(), 1, "{:?}", found);
        assert_eq!(found[0].0, 6);
    }
}
