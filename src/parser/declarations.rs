//! Type and member declarations

use super::ast::{NodeId, NodeKind};
use super::grammar::{ParseResult, Parser};
use super::lexer::TokenKind;

/// What kind of body a member list belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Class,
    Enum,
    Annotation,
}

impl Parser {
    /// True when a class, interface, enum, record or annotation type starts
    /// at the cursor (after modifiers).
    pub(super) fn at_type_declaration(&self) -> bool {
        self.at("class")
            || self.at("interface")
            || self.at("enum")
            || (self.at("@") && self.nth_is(1, "interface"))
            || (self.at_contextual("record")
                && self.peek_at(1).is_some_and(|t| t.kind == TokenKind::Ident)
                && (self.nth_is(2, "(") || self.nth_is(2, "<")))
    }

    pub(super) fn type_declaration(&mut self, modifiers: NodeId) -> ParseResult<NodeId> {
        if self.at("class") {
            self.class_like(NodeKind::ClassDef, NodeKind::LiteralClass, modifiers)
        } else if self.at("interface") {
            self.class_like(NodeKind::InterfaceDef, NodeKind::LiteralInterface, modifiers)
        } else if self.at("enum") {
            self.class_like(NodeKind::EnumDef, NodeKind::LiteralEnum, modifiers)
        } else if self.at("@") && self.nth_is(1, "interface") {
            self.annotation_def(modifiers)
        } else if self.at_contextual("record") {
            self.record_def(modifiers)
        } else {
            Err(self.error_here("expected type declaration"))
        }
    }

    fn class_like(&mut self, kind: NodeKind, keyword: NodeKind, modifiers: NodeId) -> ParseResult<NodeId> {
        let def = self.tree.imaginary(kind, 0, 0);
        self.tree.append(def, modifiers);
        let keyword = self.token_node(keyword)?;
        self.tree.append(def, keyword);
        let name = self.ident_node()?;
        self.tree.append(def, name);
        if self.at("<") {
            let parameters = self.type_parameters()?;
            self.tree.append(def, parameters);
        }
        self.type_clauses(def)?;
        let body_kind = if kind == NodeKind::EnumDef {
            BodyKind::Enum
        } else {
            BodyKind::Class
        };
        let body = self.class_body(body_kind)?;
        self.tree.append(def, body);
        Ok(def)
    }

    fn type_clauses(&mut self, def: NodeId) -> ParseResult<()> {
        loop {
            let kind = if self.at("extends") {
                NodeKind::ExtendsClause
            } else if self.at("implements") {
                NodeKind::ImplementsClause
            } else if self.at_contextual("permits") {
                NodeKind::PermitsClause
            } else {
                return Ok(());
            };
            let clause = self.token_node(kind)?;
            self.type_list_into(clause)?;
            self.tree.append(def, clause);
        }
    }

    fn annotation_def(&mut self, modifiers: NodeId) -> ParseResult<NodeId> {
        let def = self.tree.imaginary(NodeKind::AnnotationDef, 0, 0);
        self.tree.append(def, modifiers);
        let at = self.token_node(NodeKind::At)?;
        let keyword = self.token_node(NodeKind::LiteralInterface)?;
        let name = self.ident_node()?;
        self.tree.append_all(def, &[at, keyword, name]);
        let body = self.class_body(BodyKind::Annotation)?;
        self.tree.append(def, body);
        Ok(def)
    }

    fn record_def(&mut self, modifiers: NodeId) -> ParseResult<NodeId> {
        let def = self.tree.imaginary(NodeKind::RecordDef, 0, 0);
        self.tree.append(def, modifiers);
        let keyword = self.token_node(NodeKind::LiteralRecord)?;
        let name = self.ident_node()?;
        self.tree.append_all(def, &[keyword, name]);
        if self.at("<") {
            let parameters = self.type_parameters()?;
            self.tree.append(def, parameters);
        }
        let lparen = self.expect_node(NodeKind::LParen, "(")?;
        self.tree.append(def, lparen);
        let components = self.imaginary_here(NodeKind::RecordComponents);
        while !self.at(")") {
            let component = self.imaginary_here(NodeKind::RecordComponentDef);
            let component_modifiers = self.modifiers()?;
            let ty = self.type_node()?;
            self.tree.append_all(component, &[component_modifiers, ty]);
            if self.at("...") {
                let ellipsis = self.token_node(NodeKind::Ellipsis)?;
                self.tree.append(component, ellipsis);
            }
            let ident = self.ident_node()?;
            self.tree.append(component, ident);
            self.tree.append(components, component);
            if !self.at(",") {
                break;
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(components, comma);
        }
        self.tree.append(def, components);
        let rparen = self.expect_node(NodeKind::RParen, ")")?;
        self.tree.append(def, rparen);
        self.type_clauses(def)?;
        let body = self.class_body(BodyKind::Class)?;
        self.tree.append(def, body);
        Ok(def)
    }

    /// OBJBLOCK: `{ members }`
    fn class_body(&mut self, body_kind: BodyKind) -> ParseResult<NodeId> {
        let body = self.imaginary_here(NodeKind::ObjBlock);
        let lcurly = self.expect_node(NodeKind::LCurly, "{")?;
        self.tree.append(body, lcurly);
        if body_kind == BodyKind::Enum {
            self.enum_constants(body)?;
        }
        while !self.at("}") {
            if self.at_end() {
                return Err(self.error_here("expected '}'"));
            }
            self.member(body, body_kind)?;
        }
        let rcurly = self.token_node(NodeKind::RCurly)?;
        self.tree.append(body, rcurly);
        Ok(body)
    }

    /// Anonymous class body used by `new T() { ... }`
    pub(super) fn anonymous_class_body(&mut self) -> ParseResult<NodeId> {
        self.class_body(BodyKind::Class)
    }

    fn enum_constants(&mut self, body: NodeId) -> ParseResult<()> {
        while !self.at(";") && !self.at("}") {
            let constant = self.imaginary_here(NodeKind::EnumConstantDef);
            let annotations = self.imaginary_here(NodeKind::Annotations);
            while self.at("@") {
                let annotation = self.annotation()?;
                self.tree.append(annotations, annotation);
            }
            self.tree.append(constant, annotations);
            let ident = self.ident_node()?;
            self.tree.append(constant, ident);
            if self.at("(") {
                let (lparen, elist, rparen) = self.arguments()?;
                self.tree.append_all(constant, &[lparen, elist, rparen]);
            }
            if self.at("{") {
                let class_body = self.class_body(BodyKind::Class)?;
                self.tree.append(constant, class_body);
            }
            self.tree.append(body, constant);
            if !self.at(",") {
                break;
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(body, comma);
        }
        if self.at(";") {
            let semi = self.token_node(NodeKind::Semi)?;
            self.tree.append(body, semi);
        }
        Ok(())
    }

    fn member(&mut self, body: NodeId, body_kind: BodyKind) -> ParseResult<()> {
        if self.at(";") {
            self.bump()?;
            return Ok(());
        }
        if self.at("{") {
            let init = self.imaginary_here(NodeKind::InstanceInit);
            let block = self.block()?;
            self.tree.append(init, block);
            self.tree.append(body, init);
            return Ok(());
        }
        if self.at("static") && self.nth_is(1, "{") {
            let init = self.token_node(NodeKind::StaticInit)?;
            let block = self.block()?;
            self.tree.append(init, block);
            self.tree.append(body, init);
            return Ok(());
        }

        let modifiers = self.modifiers()?;
        if self.at_type_declaration() {
            let declaration = self.type_declaration(modifiers)?;
            self.tree.append(body, declaration);
            return Ok(());
        }

        let type_parameters = if self.at("<") {
            Some(self.type_parameters()?)
        } else {
            None
        };

        if self.at_ident() && self.nth_is(1, "(") {
            let ctor = self.constructor(modifiers, type_parameters)?;
            self.tree.append(body, ctor);
            return Ok(());
        }
        if self.at_ident() && self.nth_is(1, "{") {
            let ctor = self.tree.imaginary(NodeKind::CompactCtorDef, 0, 0);
            let ident = self.ident_node()?;
            let block = self.block()?;
            self.tree.append_all(ctor, &[modifiers, ident, block]);
            self.tree.append(body, ctor);
            return Ok(());
        }

        let ty = self.type_node()?;
        if self.at_ident() && self.nth_is(1, "(") {
            let method = self.method(modifiers, type_parameters, ty, body_kind)?;
            self.tree.append(body, method);
            return Ok(());
        }
        self.field_declarators(body, modifiers, ty)
    }

    fn constructor(&mut self, modifiers: NodeId, type_parameters: Option<NodeId>) -> ParseResult<NodeId> {
        let ctor = self.tree.imaginary(NodeKind::CtorDef, 0, 0);
        self.tree.append(ctor, modifiers);
        if let Some(parameters) = type_parameters {
            self.tree.append(ctor, parameters);
        }
        let ident = self.ident_node()?;
        self.tree.append(ctor, ident);
        self.formal_parameters(ctor)?;
        self.throws_clause(ctor)?;
        let block = self.block()?;
        self.tree.append(ctor, block);
        Ok(ctor)
    }

    fn method(
        &mut self,
        modifiers: NodeId,
        type_parameters: Option<NodeId>,
        ty: NodeId,
        body_kind: BodyKind,
    ) -> ParseResult<NodeId> {
        let kind = if body_kind == BodyKind::Annotation {
            NodeKind::AnnotationFieldDef
        } else {
            NodeKind::MethodDef
        };
        let method = self.tree.imaginary(kind, 0, 0);
        self.tree.append(method, modifiers);
        if let Some(parameters) = type_parameters {
            self.tree.append(method, parameters);
        }
        self.tree.append(method, ty);
        let ident = self.ident_node()?;
        self.tree.append(method, ident);

        if kind == NodeKind::AnnotationFieldDef {
            let lparen = self.expect_node(NodeKind::LParen, "(")?;
            let rparen = self.expect_node(NodeKind::RParen, ")")?;
            self.tree.append_all(method, &[lparen, rparen]);
            if self.at("default") {
                let default = self.token_node(NodeKind::LiteralDefault)?;
                let value = self.element_value()?;
                self.tree.append(default, value);
                self.tree.append(method, default);
            }
            let semi = self.expect_node(NodeKind::Semi, ";")?;
            self.tree.append(method, semi);
            return Ok(method);
        }

        self.formal_parameters(method)?;
        // legacy `int f()[]` array dimensions
        while self.at("[") && self.nth_is(1, "]") {
            let declarator = self.token_node(NodeKind::ArrayDeclarator)?;
            let rbrack = self.token_node(NodeKind::RBrack)?;
            self.tree.append(declarator, rbrack);
            self.tree.append(method, declarator);
        }
        self.throws_clause(method)?;
        if self.at(";") {
            let semi = self.token_node(NodeKind::Semi)?;
            self.tree.append(method, semi);
        } else {
            let block = self.block()?;
            self.tree.append(method, block);
        }
        Ok(method)
    }

    /// `( params )` appended to `owner` as LPAREN, PARAMETERS, RPAREN
    fn formal_parameters(&mut self, owner: NodeId) -> ParseResult<()> {
        let lparen = self.expect_node(NodeKind::LParen, "(")?;
        self.tree.append(owner, lparen);
        let parameters = self.imaginary_here(NodeKind::Parameters);
        while !self.at(")") {
            let parameter = self.parameter_def()?;
            self.tree.append(parameters, parameter);
            if !self.at(",") {
                break;
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(parameters, comma);
        }
        self.tree.append(owner, parameters);
        let rparen = self.expect_node(NodeKind::RParen, ")")?;
        self.tree.append(owner, rparen);
        Ok(())
    }

    pub(super) fn parameter_def(&mut self) -> ParseResult<NodeId> {
        let parameter = self.imaginary_here(NodeKind::ParameterDef);
        let modifiers = self.modifiers()?;
        let ty = self.type_node()?;
        self.tree.append_all(parameter, &[modifiers, ty]);
        if self.at("...") {
            let ellipsis = self.token_node(NodeKind::Ellipsis)?;
            self.tree.append(parameter, ellipsis);
        }
        // receiver parameter `Foo this`
        let name = if self.at("this") {
            self.token_node(NodeKind::LiteralThis)?
        } else {
            self.ident_node()?
        };
        self.tree.append(parameter, name);
        let dims = self.array_dimensions(Vec::new())?;
        self.tree.append_all(parameter, &dims);
        Ok(parameter)
    }

    fn throws_clause(&mut self, owner: NodeId) -> ParseResult<()> {
        if self.at("throws") {
            let throws = self.token_node(NodeKind::LiteralThrows)?;
            self.type_list_into(throws)?;
            self.tree.append(owner, throws);
        }
        Ok(())
    }

    /// `T a = x, b;` as a member: the SEMI ends the last VARIABLE_DEF and
    /// the commas sit between the definitions.
    fn field_declarators(&mut self, body: NodeId, modifiers: NodeId, ty: NodeId) -> ParseResult<()> {
        let mut def = self.variable_declarator(modifiers, ty)?;
        self.tree.append(body, def);
        while self.at(",") {
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(body, comma);
            let modifiers_copy = self.copy_subtree(modifiers);
            let ty_copy = self.copy_subtree(ty);
            def = self.variable_declarator(modifiers_copy, ty_copy)?;
            self.tree.append(body, def);
        }
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append(def, semi);
        Ok(())
    }

    /// One VARIABLE_DEF: modifiers, type, name, optional `= init`
    pub(super) fn variable_declarator(&mut self, modifiers: NodeId, ty: NodeId) -> ParseResult<NodeId> {
        let def = self.tree.imaginary(NodeKind::VariableDef, 0, 0);
        self.tree.append_all(def, &[modifiers, ty]);
        let ident = self.ident_node()?;
        self.tree.append(def, ident);
        let dims = self.array_dimensions(Vec::new())?;
        self.tree.append_all(def, &dims);
        if self.at("=") {
            let assign = self.token_node(NodeKind::Assign)?;
            let value = self.variable_initializer()?;
            self.tree.append(assign, value);
            self.tree.append(def, assign);
        }
        Ok(def)
    }

    /// `{...}` array initializer or an EXPR
    pub(super) fn variable_initializer(&mut self) -> ParseResult<NodeId> {
        if self.at("{") {
            self.array_initializer()
        } else {
            self.expression_node()
        }
    }

    pub(super) fn array_initializer(&mut self) -> ParseResult<NodeId> {
        let init = self.expect_node(NodeKind::ArrayInit, "{")?;
        while !self.at("}") {
            let value = self.variable_initializer()?;
            self.tree.append(init, value);
            if !self.at(",") {
                break;
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(init, comma);
        }
        let rcurly = self.expect_node(NodeKind::RCurly, "}")?;
        self.tree.append(init, rcurly);
        Ok(init)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_source, NodeKind, SyntaxTree};

    fn children(tree: &SyntaxTree, kind: NodeKind) -> Vec<NodeKind> {
        let root = tree.root().unwrap();
        let node = tree.preorder(root).find(|&n| tree.kind(n) == kind).unwrap();
        tree.children(node).map(|c| tree.kind(c)).collect()
    }

    #[test]
    fn test_field_with_multiple_declarators() {
        let tree = parse_source("class A { private int a = 1, b; }").unwrap();
        let body = children(&tree, NodeKind::ObjBlock);
        assert_eq!(
            body,
            vec![
                NodeKind::LCurly,
                NodeKind::VariableDef,
                NodeKind::Comma,
                NodeKind::VariableDef,
                NodeKind::RCurly
            ]
        );
        let root = tree.root().unwrap();
        let last_def = tree
            .preorder(root)
            .filter(|&n| tree.kind(n) == NodeKind::VariableDef)
            .last()
            .unwrap();
        assert_eq!(tree.kind(tree.last_child(last_def).unwrap()), NodeKind::Semi);
    }

    #[test]
    fn test_enum_with_constants_and_body() {
        let tree = parse_source("enum E { A(1), B { void f() {} }; int x; }").unwrap();
        let body = children(&tree, NodeKind::ObjBlock);
        assert_eq!(body[1], NodeKind::EnumConstantDef);
        assert!(body.contains(&NodeKind::Semi));
        assert!(body.contains(&NodeKind::VariableDef));
    }

    #[test]
    fn test_annotation_type_fields() {
        let tree = parse_source("@interface Ann { String value() default \"x\"; }").unwrap();
        let field = children(&tree, NodeKind::AnnotationFieldDef);
        assert!(field.contains(&NodeKind::LiteralDefault));
        assert_eq!(field.last(), Some(&NodeKind::Semi));
    }

    #[test]
    fn test_record_with_compact_constructor() {
        let tree = parse_source("record P(int x, int y) { P { check(); } }").unwrap();
        let record = children(&tree, NodeKind::RecordDef);
        assert!(record.contains(&NodeKind::RecordComponents));
        assert_eq!(
            children(&tree, NodeKind::CompactCtorDef),
            vec![NodeKind::Modifiers, NodeKind::Ident, NodeKind::Slist]
        );
    }

    #[test]
    fn test_method_with_throws_and_generics() {
        let tree =
            parse_source("interface I { <T extends Number> List<T> f(T... xs) throws IOException, E; }")
                .unwrap();
        let method = children(&tree, NodeKind::MethodDef);
        assert_eq!(method[1], NodeKind::TypeParameters);
        assert!(method.contains(&NodeKind::LiteralThrows));
        assert_eq!(method.last(), Some(&NodeKind::Semi));
    }
}
