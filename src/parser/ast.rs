//! Java Syntax Tree
//!
//! Arena-backed tree of syntax nodes. Every node records its kind, the
//! literal text of the token it stands for, a 1-based line, a 0-based
//! character column and its parent/child/sibling links. Imaginary nodes
//! (kinds with no token of their own, like `METHOD_DEF`) carry their kind
//! name as text and take the position of their first child.

use std::fmt;

/// Index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

macro_rules! node_kinds {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Kind tag of a syntax node
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant),*
        }

        impl NodeKind {
            /// Upper-case token-type name, e.g. `METHOD_DEF`
            pub fn name(self) -> &'static str {
                match self {
                    $(NodeKind::$variant => $name),*
                }
            }
        }
    };
}

node_kinds! {
    CompilationUnit => "COMPILATION_UNIT",
    PackageDef => "PACKAGE_DEF",
    Import => "IMPORT",
    StaticImport => "STATIC_IMPORT",
    Annotations => "ANNOTATIONS",
    Annotation => "ANNOTATION",
    AnnotationMemberValuePair => "ANNOTATION_MEMBER_VALUE_PAIR",
    AnnotationArrayInit => "ANNOTATION_ARRAY_INIT",
    AnnotationDef => "ANNOTATION_DEF",
    AnnotationFieldDef => "ANNOTATION_FIELD_DEF",
    RecordDef => "RECORD_DEF",
    LiteralRecord => "LITERAL_RECORD",
    RecordComponents => "RECORD_COMPONENTS",
    RecordComponentDef => "RECORD_COMPONENT_DEF",
    CompactCtorDef => "COMPACT_CTOR_DEF",
    PermitsClause => "PERMITS_CLAUSE",
    At => "AT",
    ClassDef => "CLASS_DEF",
    InterfaceDef => "INTERFACE_DEF",
    EnumDef => "ENUM_DEF",
    EnumConstantDef => "ENUM_CONSTANT_DEF",
    ObjBlock => "OBJBLOCK",
    LCurly => "LCURLY",
    RCurly => "RCURLY",
    Semi => "SEMI",
    Comma => "COMMA",
    Colon => "COLON",
    Modifiers => "MODIFIERS",
    Modifier => "MODIFIER",
    LiteralClass => "LITERAL_CLASS",
    LiteralInterface => "LITERAL_INTERFACE",
    LiteralEnum => "ENUM",
    TypeParameters => "TYPE_PARAMETERS",
    TypeParameter => "TYPE_PARAMETER",
    TypeArguments => "TYPE_ARGUMENTS",
    TypeArgument => "TYPE_ARGUMENT",
    TypeUpperBounds => "TYPE_UPPER_BOUNDS",
    TypeLowerBounds => "TYPE_LOWER_BOUNDS",
    Wildcard => "WILDCARD_TYPE",
    GenericStart => "GENERIC_START",
    GenericEnd => "GENERIC_END",
    Type => "TYPE",
    PrimitiveType => "PRIMITIVE_TYPE",
    Ident => "IDENT",
    Dot => "DOT",
    Star => "STAR",
    ArrayDeclarator => "ARRAY_DECLARATOR",
    RBrack => "RBRACK",
    ExtendsClause => "EXTENDS_CLAUSE",
    ImplementsClause => "IMPLEMENTS_CLAUSE",
    LiteralThrows => "LITERAL_THROWS",
    MethodDef => "METHOD_DEF",
    CtorDef => "CTOR_DEF",
    Parameters => "PARAMETERS",
    ParameterDef => "PARAMETER_DEF",
    Ellipsis => "ELLIPSIS",
    LParen => "LPAREN",
    RParen => "RPAREN",
    Slist => "SLIST",
    VariableDef => "VARIABLE_DEF",
    PatternVariableDef => "PATTERN_VARIABLE_DEF",
    Assign => "ASSIGN",
    CompoundAssign => "COMPOUND_ASSIGN",
    Expr => "EXPR",
    Elist => "ELIST",
    MethodCall => "METHOD_CALL",
    CtorCall => "CTOR_CALL",
    SuperCtorCall => "SUPER_CTOR_CALL",
    LiteralNew => "LITERAL_NEW",
    ArrayInit => "ARRAY_INIT",
    StaticInit => "STATIC_INIT",
    InstanceInit => "INSTANCE_INIT",
    LiteralStatic => "LITERAL_STATIC",
    LiteralIf => "LITERAL_IF",
    LiteralElse => "LITERAL_ELSE",
    LiteralFor => "LITERAL_FOR",
    ForInit => "FOR_INIT",
    ForCondition => "FOR_CONDITION",
    ForIterator => "FOR_ITERATOR",
    ForEachClause => "FOR_EACH_CLAUSE",
    LiteralWhile => "LITERAL_WHILE",
    LiteralDo => "LITERAL_DO",
    DoWhile => "DO_WHILE",
    LiteralTry => "LITERAL_TRY",
    ResourceSpecification => "RESOURCE_SPECIFICATION",
    Resources => "RESOURCES",
    Resource => "RESOURCE",
    LiteralCatch => "LITERAL_CATCH",
    LiteralFinally => "LITERAL_FINALLY",
    LiteralSwitch => "LITERAL_SWITCH",
    CaseGroup => "CASE_GROUP",
    LiteralCase => "LITERAL_CASE",
    LiteralDefault => "LITERAL_DEFAULT",
    SwitchRule => "SWITCH_RULE",
    LiteralYield => "LITERAL_YIELD",
    LiteralReturn => "LITERAL_RETURN",
    LiteralThrow => "LITERAL_THROW",
    LiteralBreak => "LITERAL_BREAK",
    LiteralContinue => "LITERAL_CONTINUE",
    LabeledStat => "LABELED_STAT",
    LiteralSynchronized => "LITERAL_SYNCHRONIZED",
    LiteralAssert => "LITERAL_ASSERT",
    EmptyStat => "EMPTY_STAT",
    Lambda => "LAMBDA",
    IndexOp => "INDEX_OP",
    Question => "QUESTION",
    BinaryOp => "BINARY_OP",
    UnaryOp => "UNARY_OP",
    PostIncDec => "POST_INC_DEC",
    TypeCast => "TYPECAST",
    LiteralInstanceof => "LITERAL_INSTANCEOF",
    MethodRef => "METHOD_REF",
    Literal => "LITERAL",
    TextBlock => "TEXT_BLOCK",
    TextBlockEnd => "TEXT_BLOCK_END",
    LiteralThis => "LITERAL_THIS",
    LiteralSuper => "LITERAL_SUPER",
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One node of the tree
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    imaginary: bool,
}

/// Parsed Java compilation unit
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node for a real token
    pub fn token(&mut self, kind: NodeKind, text: &str, line: usize, column: usize) -> NodeId {
        self.push(kind, text.to_string(), line, column, false)
    }

    /// Create a detached imaginary node. The position is used only while
    /// the node has no children; see [`SyntaxTree::finish`].
    pub fn imaginary(&mut self, kind: NodeKind, line: usize, column: usize) -> NodeId {
        self.push(kind, kind.name().to_string(), line, column, true)
    }

    fn push(&mut self, kind: NodeKind, text: String, line: usize, column: usize, imaginary: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            text,
            line,
            column,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
            imaginary,
        });
        id
    }

    /// Attach `child` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let previous_last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = Some(parent);
            node.prev_sibling = previous_last;
            node.next_sibling = None;
        }
        match previous_last {
            Some(last) => self.nodes[last.index()].next_sibling = Some(child),
            None => self.nodes[parent.index()].first_child = Some(child),
        }
        self.nodes[parent.index()].last_child = Some(child);
    }

    /// Attach every node of `children` in order
    pub fn append_all(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.append(parent, child);
        }
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Resolve imaginary node positions bottom-up: an imaginary node with
    /// children sits where its first child sits.
    pub fn finish(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let order: Vec<NodeId> = self.preorder(root).collect();
        for &id in order.iter().rev() {
            let node = &self.nodes[id.index()];
            if !node.imaginary {
                continue;
            }
            if let Some(first) = node.first_child {
                let (line, column) = {
                    let child = &self.nodes[first.index()];
                    (child.line, child.column)
                };
                let node = &mut self.nodes[id.index()];
                node.line = line;
                node.column = column;
            }
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].text
    }

    pub fn line(&self, id: NodeId) -> usize {
        self.nodes[id.index()].line
    }

    pub fn column(&self, id: NodeId) -> usize {
        self.nodes[id.index()].column
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].prev_sibling
    }

    /// True for nodes with no token of their own
    pub fn is_imaginary(&self, id: NodeId) -> bool {
        self.nodes[id.index()].imaginary
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.nodes[id.index()].first_child.is_some()
    }

    /// Kind of the parent node, if any
    pub fn parent_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.parent(id).map(|p| self.kind(p))
    }

    /// Direct children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// First direct child of the given kind
    pub fn find_first_child(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id).find(|&c| self.kind(c) == kind)
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` included
    pub fn preorder(&self, id: NodeId) -> Preorder<'_> {
        Preorder {
            tree: self,
            root: id,
            next: Some(id),
        }
    }

    /// True when both nodes start on the same line
    pub fn same_line(&self, a: NodeId, b: NodeId) -> bool {
        self.line(a) == self.line(b)
    }

    /// True when `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Render the subtree as an indented outline, one node per line
    pub fn dump(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.dump_into(id, 0, &mut out);
        out
    }

    fn dump_into(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        out.push_str(&format!(
            "{}{} -> {} [{}:{}]\n",
            "  ".repeat(depth),
            node.kind,
            node.text,
            node.line,
            node.column
        ));
        for child in self.children(id) {
            self.dump_into(child, depth + 1, out);
        }
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Pre-order subtree iterator
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = match self.tree.first_child(current) {
            Some(child) => Some(child),
            None => {
                let mut node = current;
                loop {
                    if node == self.root {
                        break None;
                    }
                    if let Some(sibling) = self.tree.next_sibling(node) {
                        break Some(sibling);
                    }
                    match self.tree.parent(node) {
                        Some(parent) => node = parent,
                        None => break None,
                    }
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (SyntaxTree, NodeId) {
        let mut tree = SyntaxTree::new();
        let root = tree.imaginary(NodeKind::Expr, 9, 9);
        let plus = tree.token(NodeKind::BinaryOp, "+", 1, 6);
        let a = tree.token(NodeKind::Ident, "a", 1, 4);
        let b = tree.token(NodeKind::Ident, "b", 1, 8);
        tree.append(root, plus);
        tree.append(plus, a);
        tree.append(plus, b);
        tree.set_root(root);
        (tree, root)
    }

    #[test]
    fn test_links() {
        let (tree, root) = sample();
        let plus = tree.first_child(root).unwrap();
        let a = tree.first_child(plus).unwrap();
        let b = tree.last_child(plus).unwrap();

        assert_eq!(tree.next_sibling(a), Some(b));
        assert_eq!(tree.prev_sibling(b), Some(a));
        assert_eq!(tree.parent(b), Some(plus));
        assert_eq!(tree.children(plus).count(), 2);
        assert_eq!(tree.find_first_child(plus, NodeKind::Ident), Some(a));
    }

    #[test]
    fn test_finish_moves_imaginary_to_first_child() {
        let (mut tree, root) = sample();
        tree.finish();

        assert_eq!((tree.line(root), tree.column(root)), (1, 6));
        assert_eq!(tree.text(root), "EXPR");
    }

    #[test]
    fn test_preorder_stays_inside_subtree() {
        let (tree, root) = sample();
        let plus = tree.first_child(root).unwrap();
        let a = tree.first_child(plus).unwrap();

        let kinds: Vec<&str> = tree.preorder(root).map(|n| tree.text(n)).collect();
        assert_eq!(kinds, vec!["EXPR", "+", "a", "b"]);

        let only_a: Vec<NodeId> = tree.preorder(a).collect();
        assert_eq!(only_a, vec![a]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::MethodDef.name(), "METHOD_DEF");
        assert_eq!(NodeKind::LiteralIf.to_string(), "LITERAL_IF");
    }
}
