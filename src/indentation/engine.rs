//! Indentation Engine
//!
//! Walks one syntax tree depth first, keeps the stack of open handlers and
//! runs each handler's check as its node is entered.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::core::SourceDocument;
use crate::options::IndentationOptions;
use crate::parser::{NodeId, NodeKind, SyntaxTree};

use super::context::CheckContext;
use super::handler::{Handler, HandlerId};
use super::registry::HandlerKind;
use super::violation::{Violation, ViolationLog};

/// Per-file checker state
pub struct IndentationEngine<'a> {
    tree: &'a SyntaxTree,
    document: &'a SourceDocument,
    options: &'a IndentationOptions,
    handlers: Vec<Handler>,
    stack: Vec<HandlerId>,
    /// Handlers created ahead of traversal for the targets of method calls
    created: HashMap<NodeId, HandlerId>,
    log: RefCell<ViolationLog>,
}

enum Visit {
    Enter(NodeId),
    Leave,
}

impl<'a> IndentationEngine<'a> {
    pub fn new(tree: &'a SyntaxTree, document: &'a SourceDocument, options: &'a IndentationOptions) -> Self {
        Self {
            tree,
            document,
            options,
            handlers: Vec::new(),
            stack: Vec::new(),
            created: HashMap::new(),
            log: RefCell::new(ViolationLog::new()),
        }
    }

    /// Check the whole tree and return the violations in line order
    pub fn run(mut self) -> Vec<Violation> {
        let Some(root) = self.tree.root() else {
            return Vec::new();
        };
        let primordial = self.push_handler(Handler::new(HandlerKind::Primordial, root, None));
        self.stack.push(primordial);

        let mut pending: Vec<Visit> = self
            .tree
            .children(root)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .map(Visit::Enter)
            .collect();
        while let Some(visit) = pending.pop() {
            match visit {
                Visit::Enter(node) => {
                    if HandlerKind::is_handled(self.tree.kind(node)) {
                        self.enter(node);
                        pending.push(Visit::Leave);
                    }
                    let children: Vec<NodeId> = self.tree.children(node).collect();
                    pending.extend(children.into_iter().rev().map(Visit::Enter));
                }
                Visit::Leave => {
                    self.stack.pop();
                }
            }
        }

        log::debug!("created {} handlers", self.handlers.len());
        self.log.into_inner().into_violations()
    }

    fn enter(&mut self, node: NodeId) {
        let parent = self.stack.last().copied();
        let id = self.handler_for(node, parent);
        self.stack.push(id);
        self.context().check(id);
    }

    fn context(&self) -> CheckContext<'_> {
        CheckContext::new(self.tree, self.document, self.options, &self.handlers, &self.log)
    }

    fn push_handler(&mut self, handler: Handler) -> HandlerId {
        let id = HandlerId::new(self.handlers.len());
        log::debug!(
            "handler {:?} for {} at {}:{}",
            handler.kind,
            self.tree.kind(handler.node).name(),
            self.tree.line(handler.node),
            self.tree.column(handler.node)
        );
        self.handlers.push(handler);
        id
    }

    /// Reuse the handler created for `node` ahead of time, or create one
    fn handler_for(&mut self, node: NodeId, parent: Option<HandlerId>) -> HandlerId {
        if let Some(&id) = self.created.get(&node) {
            return id;
        }
        let Some(kind) = HandlerKind::for_node(self.tree.kind(node)) else {
            // callers only pass handled nodes
            return parent.unwrap_or(HandlerId::new(0));
        };
        let parent = if self.tree.kind(node) == NodeKind::MethodCall {
            self.call_target_handler(node, parent)
        } else {
            parent
        };
        self.push_handler(Handler::new(kind, node, parent))
    }

    /// A call's handled target (`new A().b()`, `a().b()`) becomes the call's
    /// parent, so it is created before traversal reaches it
    fn call_target_handler(&mut self, call: NodeId, parent: Option<HandlerId>) -> Option<HandlerId> {
        let mut target = self.tree.first_child(call)?;
        while self.tree.kind(target) == NodeKind::Dot {
            match self.tree.first_child(target) {
                Some(child) => target = child,
                None => break,
            }
        }
        if !HandlerKind::is_handled(self.tree.kind(target)) {
            return parent;
        }
        let id = self.handler_for(target, parent);
        self.created.insert(target, id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn engine_run(source: &str) -> Vec<Violation> {
        let tree = parse_source(source).unwrap();
        let document = SourceDocument::new(source);
        let options = IndentationOptions::default();
        IndentationEngine::new(&tree, &document, &options).run()
    }

    #[test]
    fn test_empty_compilation_unit() {
        assert!(engine_run("").is_empty());
    }

    #[test]
    fn test_one_violation_per_line() {
        let source = "\
class A {
    void f() {
      int a = 1; int b = 2;
    }
}
";
        let found = engine_run(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 3);
    }

    #[test]
    fn test_chained_target_handler_is_reused() {
        let source = "\
class A {
    void f() {
        new StringBuilder()
            .append(1)
            .toString();
    }
}
";
        assert!(engine_run(source).is_empty());
    }

    #[test]
    fn test_reports_in_line_order() {
        let source = "\
class A {
  int x;
      int y;
}
";
        let lines: Vec<usize> = engine_run(source).into_iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![2, 3]);

        // line 3 continues the declaration on line 2
        let wrapped = "\
class A {
  int x =
 1;
  int y;
}
";
        let lines: Vec<usize> = engine_run(wrapped).into_iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }
}
