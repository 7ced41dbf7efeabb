//! Blocks and statements

use super::ast::{NodeId, NodeKind};
use super::grammar::{ParseResult, Parser};
use super::lexer::TokenKind;

const ASSIGNMENT_OPERATORS: &[&str] = &["=", "+=", "-=", "*=", "/=", "&=", "|=", "^=", "%=", "<<="];

impl Parser {
    /// SLIST: `{ statements }` ending with its RCURLY
    pub(super) fn block(&mut self) -> ParseResult<NodeId> {
        let slist = self.expect_node(NodeKind::Slist, "{")?;
        while !self.at("}") {
            if self.at_end() {
                return Err(self.error_here("expected '}'"));
            }
            self.block_statement(slist)?;
        }
        let rcurly = self.token_node(NodeKind::RCurly)?;
        self.tree.append(slist, rcurly);
        Ok(slist)
    }

    /// One statement or local declaration appended to `parent`. Expression
    /// statements and local variables leave their SEMI as a sibling.
    pub(super) fn block_statement(&mut self, parent: NodeId) -> ParseResult<()> {
        if self.at_local_class() {
            let modifiers = self.modifiers()?;
            let declaration = self.type_declaration(modifiers)?;
            self.tree.append(parent, declaration);
            return Ok(());
        }
        if !self.at_yield_statement() && self.at_local_variable() {
            self.local_variables(parent, true)?;
            let semi = self.expect_node(NodeKind::Semi, ";")?;
            self.tree.append(parent, semi);
            return Ok(());
        }
        self.statement(parent)
    }

    fn at_local_class(&self) -> bool {
        let mut i = self.skip_annotations(self.position());
        while self.token_at(i).is_some_and(|t| {
            ["final", "abstract", "static", "strictfp"].iter().any(|m| t.is(m))
                || (t.kind == TokenKind::Ident && (t.text == "sealed" || t.text == "non-sealed"))
        }) {
            i = self.skip_annotations(i + 1);
        }
        match self.token_at(i) {
            Some(t) if t.is("class") || t.is("interface") || t.is("enum") => true,
            Some(t) if t.is("@") => self.index_is(i + 1, "interface"),
            Some(t) if t.kind == TokenKind::Ident && t.text == "record" => {
                self.token_at(i + 1).is_some_and(|n| n.kind == TokenKind::Ident)
                    && (self.index_is(i + 2, "(") || self.index_is(i + 2, "<"))
            }
            _ => false,
        }
    }

    pub(super) fn at_local_variable(&self) -> bool {
        if self.at("final") || (self.at("@") && !self.nth_is(1, "interface")) {
            return true;
        }
        let Some(end) = self.scan_type(self.position()) else {
            return false;
        };
        self.token_at(end).is_some_and(|t| t.kind == TokenKind::Ident)
            && ["=", ";", ",", "[", ":"]
                .iter()
                .any(|t| self.index_is(end + 1, t))
    }

    /// `T a = x, b` appended to `parent` with COMMA siblings
    pub(super) fn local_variables(&mut self, parent: NodeId, allow_many: bool) -> ParseResult<()> {
        let modifiers = self.modifiers()?;
        let ty = self.type_node()?;
        let def = self.variable_declarator(modifiers, ty)?;
        self.tree.append(parent, def);
        while allow_many && self.at(",") {
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(parent, comma);
            let modifiers_copy = self.copy_subtree(modifiers);
            let ty_copy = self.copy_subtree(ty);
            let def = self.variable_declarator(modifiers_copy, ty_copy)?;
            self.tree.append(parent, def);
        }
        Ok(())
    }

    fn at_yield_statement(&self) -> bool {
        if !self.at_contextual("yield") {
            return false;
        }
        match self.peek_at(1) {
            Some(next) => {
                ![".", "[", "(", "++", "--", "->", ";"].iter().any(|t| next.is(t))
                    && !ASSIGNMENT_OPERATORS.iter().any(|t| next.is(t))
            }
            None => false,
        }
    }

    pub(super) fn statement(&mut self, parent: NodeId) -> ParseResult<()> {
        let Some(token) = self.peek() else {
            return Err(self.error_here("expected statement"));
        };
        let text = token.text.clone();
        let is_keyword = token.kind == TokenKind::Keyword;
        let is_ident = token.kind == TokenKind::Ident;

        let node = match text.as_str() {
            "{" => self.block()?,
            ";" => self.token_node(NodeKind::EmptyStat)?,
            "if" if is_keyword => self.if_statement()?,
            "for" if is_keyword => self.for_statement()?,
            "while" if is_keyword => self.while_statement()?,
            "do" if is_keyword => self.do_statement()?,
            "try" if is_keyword => self.try_statement()?,
            "switch" if is_keyword => self.switch_block()?,
            "return" if is_keyword => self.keyword_with_expression(NodeKind::LiteralReturn)?,
            "throw" if is_keyword => self.keyword_with_expression(NodeKind::LiteralThrow)?,
            "break" if is_keyword => self.jump_statement(NodeKind::LiteralBreak)?,
            "continue" if is_keyword => self.jump_statement(NodeKind::LiteralContinue)?,
            "synchronized" if is_keyword => self.synchronized_statement()?,
            "assert" if is_keyword => self.assert_statement()?,
            "yield" if self.at_yield_statement() => self.keyword_with_expression(NodeKind::LiteralYield)?,
            _ if is_ident && self.nth_is(1, ":") => self.labeled_statement()?,
            "this" | "super" if self.at_constructor_call() => self.constructor_call()?,
            _ => {
                let expr = self.expression_node()?;
                let semi = self.expect_node(NodeKind::Semi, ";")?;
                self.tree.append(parent, expr);
                self.tree.append(parent, semi);
                return Ok(());
            }
        };
        self.tree.append(parent, node);
        Ok(())
    }

    /// `this(...);` or `super(...);` as an explicit constructor call
    fn at_constructor_call(&self) -> bool {
        self.nth_is(1, "(")
            && self
                .matching_paren(self.position() + 1)
                .is_some_and(|close| self.index_is(close + 1, ";"))
    }

    fn constructor_call(&mut self) -> ParseResult<NodeId> {
        let kind = if self.at("this") {
            NodeKind::CtorCall
        } else {
            NodeKind::SuperCtorCall
        };
        let call = self.token_node(kind)?;
        let (lparen, elist, rparen) = self.arguments()?;
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append_all(call, &[lparen, elist, rparen, semi]);
        Ok(call)
    }

    /// `( expression )` appended to `owner`
    fn parenthesized_condition(&mut self, owner: NodeId) -> ParseResult<()> {
        let lparen = self.expect_node(NodeKind::LParen, "(")?;
        let expr = self.expression_node()?;
        let rparen = self.expect_node(NodeKind::RParen, ")")?;
        self.tree.append_all(owner, &[lparen, expr, rparen]);
        Ok(())
    }

    fn if_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralIf)?;
        self.parenthesized_condition(node)?;
        self.statement(node)?;
        if self.at("else") {
            let else_node = self.token_node(NodeKind::LiteralElse)?;
            self.statement(else_node)?;
            self.tree.append(node, else_node);
        }
        Ok(node)
    }

    fn while_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralWhile)?;
        self.parenthesized_condition(node)?;
        self.statement(node)?;
        Ok(node)
    }

    fn do_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralDo)?;
        self.statement(node)?;
        let do_while = self.expect_node(NodeKind::DoWhile, "while")?;
        self.tree.append(node, do_while);
        self.parenthesized_condition(node)?;
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append(node, semi);
        Ok(node)
    }

    fn at_for_each(&self) -> bool {
        let mut i = self.skip_annotations(self.position() + 1);
        while self.index_is(i, "final") {
            i = self.skip_annotations(i + 1);
        }
        self.scan_type(i).is_some_and(|end| {
            self.token_at(end).is_some_and(|t| t.kind == TokenKind::Ident) && self.index_is(end + 1, ":")
        })
    }

    fn for_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralFor)?;
        let for_each = self.at_for_each();
        let lparen = self.expect_node(NodeKind::LParen, "(")?;
        self.tree.append(node, lparen);

        if for_each {
            let clause = self.imaginary_here(NodeKind::ForEachClause);
            self.local_variables(clause, false)?;
            let colon = self.expect_node(NodeKind::Colon, ":")?;
            let expr = self.expression_node()?;
            self.tree.append_all(clause, &[colon, expr]);
            self.tree.append(node, clause);
        } else {
            let init = self.imaginary_here(NodeKind::ForInit);
            if !self.at(";") {
                if self.at_local_variable() {
                    self.local_variables(init, true)?;
                } else {
                    let list = self.expression_list(";")?;
                    self.tree.append(init, list);
                }
            }
            self.tree.append(node, init);
            let semi = self.expect_node(NodeKind::Semi, ";")?;
            self.tree.append(node, semi);

            let condition = self.imaginary_here(NodeKind::ForCondition);
            if !self.at(";") {
                let expr = self.expression_node()?;
                self.tree.append(condition, expr);
            }
            self.tree.append(node, condition);
            let semi = self.expect_node(NodeKind::Semi, ";")?;
            self.tree.append(node, semi);

            let iterator = self.imaginary_here(NodeKind::ForIterator);
            if !self.at(")") {
                let list = self.expression_list(")")?;
                self.tree.append(iterator, list);
            }
            self.tree.append(node, iterator);
        }

        let rparen = self.expect_node(NodeKind::RParen, ")")?;
        self.tree.append(node, rparen);
        self.statement(node)?;
        Ok(node)
    }

    /// ELIST of comma separated expressions up to `end`
    fn expression_list(&mut self, end: &str) -> ParseResult<NodeId> {
        let list = self.imaginary_here(NodeKind::Elist);
        while !self.at(end) {
            let expr = self.expression_node()?;
            self.tree.append(list, expr);
            if !self.at(",") {
                break;
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(list, comma);
        }
        Ok(list)
    }

    fn try_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralTry)?;
        if self.at("(") {
            let specification = self.resource_specification()?;
            self.tree.append(node, specification);
        }
        let block = self.block()?;
        self.tree.append(node, block);
        while self.at("catch") {
            let catch = self.token_node(NodeKind::LiteralCatch)?;
            let lparen = self.expect_node(NodeKind::LParen, "(")?;
            let parameter = self.catch_parameter()?;
            let rparen = self.expect_node(NodeKind::RParen, ")")?;
            let block = self.block()?;
            self.tree.append_all(catch, &[lparen, parameter, rparen, block]);
            self.tree.append(node, catch);
        }
        if self.at("finally") {
            let finally = self.token_node(NodeKind::LiteralFinally)?;
            let block = self.block()?;
            self.tree.append(finally, block);
            self.tree.append(node, finally);
        }
        Ok(node)
    }

    fn resource_specification(&mut self) -> ParseResult<NodeId> {
        let specification = self.imaginary_here(NodeKind::ResourceSpecification);
        let lparen = self.expect_node(NodeKind::LParen, "(")?;
        self.tree.append(specification, lparen);
        let resources = self.imaginary_here(NodeKind::Resources);
        while !self.at(")") {
            let resource = self.imaginary_here(NodeKind::Resource);
            if self.at_local_variable() {
                let modifiers = self.modifiers()?;
                let ty = self.type_node()?;
                let ident = self.ident_node()?;
                let assign = self.expect_node(NodeKind::Assign, "=")?;
                let expr = self.expression_node()?;
                self.tree.append(assign, expr);
                self.tree.append_all(resource, &[modifiers, ty, ident, assign]);
            } else {
                let parts = self.expression_parts()?;
                self.tree.append_all(resource, &parts);
            }
            self.tree.append(resources, resource);
            if !self.at(";") {
                break;
            }
            let semi = self.token_node(NodeKind::Semi)?;
            self.tree.append(resources, semi);
        }
        self.tree.append(specification, resources);
        let rparen = self.expect_node(NodeKind::RParen, ")")?;
        self.tree.append(specification, rparen);
        Ok(specification)
    }

    /// `final A | B e` with union types joined by `|` operator nodes
    fn catch_parameter(&mut self) -> ParseResult<NodeId> {
        let parameter = self.imaginary_here(NodeKind::ParameterDef);
        let modifiers = self.modifiers()?;
        let ty = self.imaginary_here(NodeKind::Type);
        let mut parts = self.class_type_parts()?;
        while self.at("|") {
            let bor = self.token_node(NodeKind::BinaryOp)?;
            self.tree.append_all(bor, &parts);
            let rhs = self.class_type_parts()?;
            self.tree.append_all(bor, &rhs);
            parts = vec![bor];
        }
        self.tree.append_all(ty, &parts);
        let ident = self.ident_node()?;
        self.tree.append_all(parameter, &[modifiers, ty, ident]);
        Ok(parameter)
    }

    /// LITERAL_SWITCH used both as statement and as expression
    pub(super) fn switch_block(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralSwitch)?;
        self.parenthesized_condition(node)?;
        let lcurly = self.expect_node(NodeKind::LCurly, "{")?;
        self.tree.append(node, lcurly);
        while !self.at("}") {
            if self.at_end() {
                return Err(self.error_here("expected '}'"));
            }
            let entry = self.switch_entry()?;
            self.tree.append(node, entry);
        }
        let rcurly = self.token_node(NodeKind::RCurly)?;
        self.tree.append(node, rcurly);
        Ok(node)
    }

    fn at_switch_label(&self) -> bool {
        self.at("case") || (self.at("default") && (self.nth_is(1, ":") || self.nth_is(1, "->")))
    }

    fn switch_entry(&mut self) -> ParseResult<NodeId> {
        let start = self.position();
        let first_label = self.switch_label()?;
        if self.at("->") {
            let rule = self.tree.imaginary(NodeKind::SwitchRule, 0, 0);
            self.tree.append(rule, first_label);
            let arrow = self.token_node(NodeKind::Lambda)?;
            self.tree.append(rule, arrow);
            if self.at("{") {
                let block = self.block()?;
                self.tree.append(rule, block);
            } else if self.at("throw") {
                let throw = self.keyword_with_expression(NodeKind::LiteralThrow)?;
                self.tree.append(rule, throw);
            } else {
                let expr = self.expression_node()?;
                let semi = self.expect_node(NodeKind::Semi, ";")?;
                self.tree.append_all(rule, &[expr, semi]);
            }
            return Ok(rule);
        }

        if start == self.position() {
            return Err(self.error_here("expected switch label"));
        }
        let group = self.tree.imaginary(NodeKind::CaseGroup, 0, 0);
        self.tree.append(group, first_label);
        while self.at_switch_label() {
            let label = self.switch_label()?;
            self.tree.append(group, label);
        }
        if !self.at("}") {
            let slist = self.imaginary_here(NodeKind::Slist);
            while !self.at("}") && !self.at_switch_label() {
                if self.at_end() {
                    return Err(self.error_here("expected '}'"));
                }
                self.block_statement(slist)?;
            }
            self.tree.append(group, slist);
        }
        Ok(group)
    }

    /// LITERAL_CASE or LITERAL_DEFAULT; the `:` of a group label is its
    /// last child while a rule's `->` is left for the caller.
    fn switch_label(&mut self) -> ParseResult<NodeId> {
        let label = if self.at("default") {
            self.token_node(NodeKind::LiteralDefault)?
        } else {
            let label = self.expect_node(NodeKind::LiteralCase, "case")?;
            let saved = self.no_lambda;
            self.no_lambda = true;
            let result = self.case_elements(label);
            self.no_lambda = saved;
            result?;
            label
        };
        if self.at(":") {
            let colon = self.token_node(NodeKind::Colon)?;
            self.tree.append(label, colon);
        }
        Ok(label)
    }

    fn case_elements(&mut self, label: NodeId) -> ParseResult<()> {
        loop {
            if self.at("default") {
                let default = self.token_node(NodeKind::LiteralDefault)?;
                self.tree.append(label, default);
            } else if self.at_type_pattern() {
                let pattern = self.type_pattern()?;
                self.tree.append(label, pattern);
            } else {
                let expr = self.imaginary_here(NodeKind::Expr);
                let parts = self.ternary()?;
                self.tree.append_all(expr, &parts);
                self.tree.append(label, expr);
            }
            if !self.at(",") {
                return Ok(());
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(label, comma);
        }
    }

    /// `Type name` pattern used by `case` labels and `instanceof`
    pub(super) fn at_type_pattern(&self) -> bool {
        let mut i = self.position();
        while self.index_is(i, "final") {
            i += 1;
        }
        self.scan_type(i).is_some_and(|end| {
            self.token_at(end).is_some_and(|t| t.kind == TokenKind::Ident && t.text != "when")
        })
    }

    pub(super) fn type_pattern(&mut self) -> ParseResult<NodeId> {
        let pattern = self.imaginary_here(NodeKind::PatternVariableDef);
        let modifiers = self.modifiers()?;
        let ty = self.type_node()?;
        let ident = self.ident_node()?;
        self.tree.append_all(pattern, &[modifiers, ty, ident]);
        Ok(pattern)
    }

    /// `return`, `throw` and `yield`: keyword, optional EXPR, SEMI
    fn keyword_with_expression(&mut self, kind: NodeKind) -> ParseResult<NodeId> {
        let node = self.token_node(kind)?;
        if !self.at(";") {
            let expr = self.expression_node()?;
            self.tree.append(node, expr);
        }
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append(node, semi);
        Ok(node)
    }

    fn jump_statement(&mut self, kind: NodeKind) -> ParseResult<NodeId> {
        let node = self.token_node(kind)?;
        if self.at_ident() {
            let label = self.ident_node()?;
            self.tree.append(node, label);
        }
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append(node, semi);
        Ok(node)
    }

    fn synchronized_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralSynchronized)?;
        self.parenthesized_condition(node)?;
        let block = self.block()?;
        self.tree.append(node, block);
        Ok(node)
    }

    fn assert_statement(&mut self) -> ParseResult<NodeId> {
        let node = self.token_node(NodeKind::LiteralAssert)?;
        let condition = self.expression_node()?;
        self.tree.append(node, condition);
        if self.at(":") {
            let colon = self.token_node(NodeKind::Colon)?;
            let message = self.expression_node()?;
            self.tree.append_all(node, &[colon, message]);
        }
        let semi = self.expect_node(NodeKind::Semi, ";")?;
        self.tree.append(node, semi);
        Ok(node)
    }

    /// LABELED_STAT sits on the `:` with the label and statement as children
    fn labeled_statement(&mut self) -> ParseResult<NodeId> {
        let ident = self.ident_node()?;
        let node = self.expect_node(NodeKind::LabeledStat, ":")?;
        self.tree.append(node, ident);
        self.statement(node)?;
        Ok(node)
    }
}
