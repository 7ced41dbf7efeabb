//! Handler Registry
//!
//! Maps node kinds to the handler variant that validates them.

use crate::parser::NodeKind;

/// Handler variant responsible for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Synthetic root handler; accepts column zero
    Primordial,
    // block-parent family
    ClassDef,
    ObjectBlock,
    MethodDef,
    Slist,
    If,
    Else,
    For,
    While,
    DoWhile,
    Try,
    Catch,
    Finally,
    Synchronized,
    StaticInit,
    Switch,
    ArrayInit,
    AnnotationArrayInit,
    // expression / leaf family
    MemberDef,
    MethodCall,
    New,
    Lambda,
    Label,
    Index,
    Case,
    SwitchRule,
    Yield,
    PackageDef,
    Import,
}

impl HandlerKind {
    /// Handler variant registered for `kind`, if any
    pub fn for_node(kind: NodeKind) -> Option<HandlerKind> {
        let handler = match kind {
            NodeKind::ClassDef
            | NodeKind::InterfaceDef
            | NodeKind::EnumDef
            | NodeKind::AnnotationDef
            | NodeKind::RecordDef => HandlerKind::ClassDef,
            NodeKind::ObjBlock => HandlerKind::ObjectBlock,
            NodeKind::MethodDef
            | NodeKind::CtorDef
            | NodeKind::AnnotationFieldDef
            | NodeKind::CompactCtorDef => HandlerKind::MethodDef,
            NodeKind::Slist | NodeKind::InstanceInit => HandlerKind::Slist,
            NodeKind::LiteralIf => HandlerKind::If,
            NodeKind::LiteralElse => HandlerKind::Else,
            NodeKind::LiteralFor => HandlerKind::For,
            NodeKind::LiteralWhile => HandlerKind::While,
            NodeKind::LiteralDo => HandlerKind::DoWhile,
            NodeKind::LiteralTry => HandlerKind::Try,
            NodeKind::LiteralCatch => HandlerKind::Catch,
            NodeKind::LiteralFinally => HandlerKind::Finally,
            NodeKind::LiteralSynchronized => HandlerKind::Synchronized,
            NodeKind::StaticInit => HandlerKind::StaticInit,
            NodeKind::LiteralSwitch => HandlerKind::Switch,
            NodeKind::ArrayInit => HandlerKind::ArrayInit,
            NodeKind::AnnotationArrayInit => HandlerKind::AnnotationArrayInit,
            NodeKind::VariableDef => HandlerKind::MemberDef,
            NodeKind::MethodCall | NodeKind::CtorCall | NodeKind::SuperCtorCall => {
                HandlerKind::MethodCall
            }
            NodeKind::LiteralNew => HandlerKind::New,
            NodeKind::Lambda => HandlerKind::Lambda,
            NodeKind::LabeledStat => HandlerKind::Label,
            NodeKind::IndexOp => HandlerKind::Index,
            NodeKind::CaseGroup => HandlerKind::Case,
            NodeKind::SwitchRule => HandlerKind::SwitchRule,
            NodeKind::LiteralYield => HandlerKind::Yield,
            NodeKind::PackageDef => HandlerKind::PackageDef,
            NodeKind::Import | NodeKind::StaticImport => HandlerKind::Import,
            _ => return None,
        };
        Some(handler)
    }

    pub fn is_handled(kind: NodeKind) -> bool {
        Self::for_node(kind).is_some()
    }

    /// Whether the variant belongs to the block-parent family
    pub fn is_block_parent(self) -> bool {
        matches!(
            self,
            HandlerKind::ClassDef
                | HandlerKind::ObjectBlock
                | HandlerKind::MethodDef
                | HandlerKind::Slist
                | HandlerKind::If
                | HandlerKind::Else
                | HandlerKind::For
                | HandlerKind::While
                | HandlerKind::DoWhile
                | HandlerKind::Try
                | HandlerKind::Catch
                | HandlerKind::Finally
                | HandlerKind::Synchronized
                | HandlerKind::StaticInit
                | HandlerKind::Switch
                | HandlerKind::ArrayInit
                | HandlerKind::AnnotationArrayInit
        )
    }

    /// Name used as the subject of violation messages
    pub fn type_name(self, node: NodeKind) -> &'static str {
        match self {
            HandlerKind::Primordial => "primordial",
            HandlerKind::ClassDef => match node {
                NodeKind::ClassDef => "class def",
                NodeKind::EnumDef => "enum def",
                NodeKind::AnnotationDef => "annotation def",
                NodeKind::RecordDef => "record def",
                _ => "interface def",
            },
            HandlerKind::ObjectBlock => "object def",
            HandlerKind::MethodDef => match node {
                NodeKind::MethodDef => "method def",
                NodeKind::AnnotationFieldDef => "annotation field def",
                NodeKind::CompactCtorDef => "compact ctor def",
                _ => "ctor def",
            },
            HandlerKind::Slist => "block",
            HandlerKind::If => "if",
            HandlerKind::Else => "else",
            HandlerKind::For => "for",
            HandlerKind::While => "while",
            HandlerKind::DoWhile => "do..while",
            HandlerKind::Try => "try",
            HandlerKind::Catch => "catch",
            HandlerKind::Finally => "finally",
            HandlerKind::Synchronized => "synchronized",
            HandlerKind::StaticInit => "static initialization",
            HandlerKind::Switch => "switch",
            HandlerKind::ArrayInit => "array initialization",
            HandlerKind::AnnotationArrayInit => "annotation array initialization",
            HandlerKind::MemberDef => "member def",
            HandlerKind::MethodCall => "method call",
            HandlerKind::New => "new",
            HandlerKind::Lambda => "lambda",
            HandlerKind::Label => "label",
            HandlerKind::Index => "index op",
            HandlerKind::Case => "case",
            HandlerKind::SwitchRule => "switch rule",
            HandlerKind::Yield => "yield",
            HandlerKind::PackageDef => "package def",
            HandlerKind::Import => "import",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_kinds() {
        assert_eq!(HandlerKind::for_node(NodeKind::CtorDef), Some(HandlerKind::MethodDef));
        assert_eq!(HandlerKind::for_node(NodeKind::InstanceInit), Some(HandlerKind::Slist));
        assert_eq!(HandlerKind::for_node(NodeKind::SuperCtorCall), Some(HandlerKind::MethodCall));
        assert_eq!(HandlerKind::for_node(NodeKind::StaticImport), Some(HandlerKind::Import));
        assert!(!HandlerKind::is_handled(NodeKind::Expr));
        assert!(!HandlerKind::is_handled(NodeKind::LiteralReturn));
        assert!(!HandlerKind::is_handled(NodeKind::CompilationUnit));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(HandlerKind::ClassDef.type_name(NodeKind::EnumDef), "enum def");
        assert_eq!(HandlerKind::MethodDef.type_name(NodeKind::CtorDef), "ctor def");
        assert_eq!(HandlerKind::DoWhile.type_name(NodeKind::LiteralDo), "do..while");
    }

    #[test]
    fn test_families() {
        assert!(HandlerKind::Slist.is_block_parent());
        assert!(HandlerKind::ArrayInit.is_block_parent());
        assert!(!HandlerKind::Case.is_block_parent());
        assert!(!HandlerKind::Lambda.is_block_parent());
    }
}
