//! Handlers
//!
//! One handler per validated node. Handlers live in a per-file arena and
//! refer to their chaining parent by index; every behavioral question is
//! answered by matching on [`HandlerKind`].

use std::cell::{Cell, OnceCell};

use crate::parser::NodeId;

use super::context::CheckContext;
use super::level::IndentLevel;
use super::registry::HandlerKind;

/// Index of a handler in the per-file arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

impl HandlerId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Validation state for one handled node
#[derive(Debug)]
pub struct Handler {
    pub kind: HandlerKind,
    pub node: NodeId,
    pub parent: Option<HandlerId>,
    indent: OnceCell<IndentLevel>,
    /// Cleared once a lambda has reported its own misplacement
    lambda_correct: Cell<bool>,
}

impl Handler {
    pub fn new(kind: HandlerKind, node: NodeId, parent: Option<HandlerId>) -> Self {
        Self {
            kind,
            node,
            parent,
            indent: OnceCell::new(),
            lambda_correct: Cell::new(true),
        }
    }

    pub fn lambda_correct(&self) -> bool {
        self.lambda_correct.get()
    }

    pub fn mark_lambda_incorrect(&self) {
        self.lambda_correct.set(false);
    }
}

impl CheckContext<'_> {
    /// Expected level of the handler, computed once
    pub fn indent(&self, id: HandlerId) -> IndentLevel {
        let cell = &self.handler(id).indent;
        if let Some(level) = cell.get() {
            return level.clone();
        }
        let level = self.indent_impl(id);
        // a nested computation may have filled the cell first
        cell.get_or_init(|| level).clone()
    }

    pub(super) fn indent_impl(&self, id: HandlerId) -> IndentLevel {
        match self.kind(id) {
            HandlerKind::Primordial => IndentLevel::new(0),
            HandlerKind::ObjectBlock => self.object_block_indent(id),
            HandlerKind::If => self.if_indent(id),
            HandlerKind::Switch => self.switch_indent(id),
            HandlerKind::ArrayInit => self.array_init_indent(id),
            HandlerKind::AnnotationArrayInit => self.annotation_array_init_indent(id),
            HandlerKind::MethodCall => self.method_call_indent(id),
            HandlerKind::New => self.new_indent(id),
            HandlerKind::Lambda => self.lambda_indent(id),
            HandlerKind::Label => self.label_indent(id),
            HandlerKind::Case | HandlerKind::SwitchRule => self.case_indent(id),
            _ => self.suggested_by_parent(id),
        }
    }

    /// The parent's suggestion for `id`, or column zero at the root
    pub(super) fn suggested_by_parent(&self, id: HandlerId) -> IndentLevel {
        match self.parent(id) {
            Some(parent) => self.suggested_child_indent(parent, id),
            None => IndentLevel::new(0),
        }
    }

    /// Level the handler proposes for `child`
    pub fn suggested_child_indent(&self, id: HandlerId, child: HandlerId) -> IndentLevel {
        match self.kind(id) {
            HandlerKind::Primordial => IndentLevel::new(0),
            HandlerKind::Slist => self.slist_suggested_child(id, child),
            HandlerKind::If if self.kind(child) == HandlerKind::Else => self.indent(id),
            HandlerKind::Try => self.try_suggested_child(id, child),
            HandlerKind::MethodCall => self.method_call_suggested_child(id, child),
            HandlerKind::New => self.new_suggested_child(id, child),
            HandlerKind::Lambda => self.lambda_suggested_child(id),
            HandlerKind::MemberDef
            | HandlerKind::Case
            | HandlerKind::SwitchRule
            | HandlerKind::Yield
            | HandlerKind::Index => self.indent(id),
            kind if kind.is_block_parent() => self.children_expected_indent(id),
            _ => self.indent(id).offset(self.basic_offset()),
        }
    }

    /// Whether wrapped lines of a scan below the handler's own line get an
    /// extra basic offset
    pub fn should_increase_indent(&self, id: HandlerId) -> bool {
        !matches!(
            self.kind(id),
            HandlerKind::MethodCall | HandlerKind::New | HandlerKind::Lambda
        )
    }

    /// Validate the handler's node
    pub fn check(&self, id: HandlerId) {
        log::trace!(
            "checking {} at {}:{}",
            self.type_name(id),
            self.tree.line(self.main(id)),
            self.tree.column(self.main(id))
        );
        match self.kind(id) {
            HandlerKind::Primordial | HandlerKind::Index => {}
            HandlerKind::ClassDef => self.check_class_def(id),
            HandlerKind::ObjectBlock => self.check_object_block(id),
            HandlerKind::MethodDef => self.check_method_def(id),
            HandlerKind::Slist => self.check_slist(id),
            HandlerKind::If => self.check_if(id),
            HandlerKind::Else | HandlerKind::Finally | HandlerKind::StaticInit => {
                self.check_block_parent(id)
            }
            HandlerKind::For => self.check_for(id),
            HandlerKind::While => self.check_while(id),
            HandlerKind::DoWhile => self.check_do_while(id),
            HandlerKind::Try => self.check_try(id),
            HandlerKind::Catch => self.check_catch(id),
            HandlerKind::Synchronized => self.check_synchronized(id),
            HandlerKind::Switch => self.check_switch(id),
            HandlerKind::ArrayInit | HandlerKind::AnnotationArrayInit => {
                self.check_block_parent(id)
            }
            HandlerKind::MemberDef => self.check_member_def(id),
            HandlerKind::MethodCall => self.check_method_call(id),
            HandlerKind::New => self.check_new(id),
            HandlerKind::Lambda => self.check_lambda(id),
            HandlerKind::Label => self.check_label(id),
            HandlerKind::Case | HandlerKind::SwitchRule => self.check_case(id),
            HandlerKind::Yield => self.check_yield(id),
            HandlerKind::PackageDef | HandlerKind::Import => self.check_package_or_import(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::core::SourceDocument;
    use crate::indentation::violation::ViolationLog;
    use crate::options::IndentationOptions;
    use crate::parser::{parse_source, NodeKind};

    #[test]
    fn test_indent_is_memoized() {
        let source = "class A {\n    int x;\n}\n";
        let tree = parse_source(source).unwrap();
        let document = SourceDocument::new(source);
        let options = IndentationOptions::default();
        let root = tree.root().unwrap();
        let class = tree.first_child(root).unwrap();
        let handlers = vec![
            Handler::new(HandlerKind::Primordial, root, None),
            Handler::new(HandlerKind::ClassDef, class, Some(HandlerId::new(0))),
        ];
        let log = RefCell::new(ViolationLog::new());
        let ctx = CheckContext::new(&tree, &document, &options, &handlers, &log);

        let first = ctx.indent(HandlerId::new(1));
        assert_eq!(first, IndentLevel::new(0));
        assert_eq!(ctx.indent(HandlerId::new(1)), first);
        assert_eq!(tree.kind(class), NodeKind::ClassDef);
        assert_eq!(ctx.type_name(HandlerId::new(1)), "class def");
    }

    #[test]
    fn test_lambda_flag() {
        let mut tree = crate::parser::SyntaxTree::new();
        let node = tree.token(NodeKind::Lambda, "->", 1, 0);
        let handler = Handler::new(HandlerKind::Lambda, node, None);
        assert!(handler.lambda_correct());
        handler.mark_lambda_incorrect();
        assert!(!handler.lambda_correct());
    }
}
