//! Expressions
//!
//! Expression functions return the list of nodes an expression contributes
//! to its parent. That is usually one node, but parentheses are kept as
//! LPAREN and RPAREN siblings around the inner expression.

use super::ast::{NodeId, NodeKind};
use super::grammar::{is_primitive, ParseResult, Parser};
use super::lexer::TokenKind;

type Parts = Vec<NodeId>;

const SINGLE_ASSIGNMENTS: &[&str] = &["=", "+=", "-=", "*=", "/=", "&=", "|=", "^=", "%=", "<<="];

impl Parser {
    /// EXPR wrapping a full expression
    pub(super) fn expression_node(&mut self) -> ParseResult<NodeId> {
        let expr = self.imaginary_here(NodeKind::Expr);
        let parts = self.expression_parts()?;
        self.tree.append_all(expr, &parts);
        Ok(expr)
    }

    /// Lambda, assignment or conditional expression
    pub(super) fn expression_parts(&mut self) -> ParseResult<Parts> {
        if self.is_lambda_start() {
            return Ok(vec![self.lambda()?]);
        }
        let lhs = self.ternary()?;
        let Some((op, count)) = self.assignment_operator() else {
            return Ok(lhs);
        };
        let kind = if op == "=" {
            NodeKind::Assign
        } else {
            NodeKind::CompoundAssign
        };
        let node = self.operator_node(kind, &op, count)?;
        let rhs = self.expression_parts()?;
        self.tree.append_all(node, &lhs);
        self.tree.append_all(node, &rhs);
        Ok(vec![node])
    }

    fn assignment_operator(&self) -> Option<(String, usize)> {
        let token = self.peek()?;
        if token.kind != TokenKind::Punct {
            return None;
        }
        if let Some(op) = SINGLE_ASSIGNMENTS.iter().find(|op| token.text == **op) {
            return Some((op.to_string(), 1));
        }
        let p = self.position();
        if token.is(">") && self.adjacent(p + 1, ">") {
            if self.adjacent(p + 2, "=") {
                return Some((">>=".to_string(), 3));
            }
            if self.adjacent(p + 2, ">") && self.adjacent(p + 3, "=") {
                return Some((">>>=".to_string(), 4));
            }
        }
        None
    }

    /// Binary operator at the cursor with its token count and precedence
    fn binary_operator(&self) -> Option<(String, usize, u8)> {
        let token = self.peek()?;
        if token.is("instanceof") {
            return Some(("instanceof".to_string(), 1, 7));
        }
        if token.kind != TokenKind::Punct {
            return None;
        }
        let p = self.position();
        if token.is(">") {
            if self.adjacent(p + 1, ">") {
                if self.adjacent(p + 2, ">") {
                    if self.adjacent(p + 3, "=") {
                        return None;
                    }
                    return Some((">>>".to_string(), 3, 8));
                }
                if self.adjacent(p + 2, "=") {
                    return None;
                }
                return Some((">>".to_string(), 2, 8));
            }
            if self.adjacent(p + 1, "=") {
                return Some((">=".to_string(), 2, 7));
            }
            return Some((">".to_string(), 1, 7));
        }
        let precedence = match token.text.as_str() {
            "||" => 1,
            "&&" => 2,
            "|" => 3,
            "^" => 4,
            "&" => 5,
            "==" | "!=" => 6,
            "<" | "<=" => 7,
            "<<" => 8,
            "+" | "-" => 9,
            "*" | "/" | "%" => 10,
            _ => return None,
        };
        Some((token.text.clone(), 1, precedence))
    }

    /// Node for an operator spanning `count` tokens, placed on the first
    fn operator_node(&mut self, kind: NodeKind, text: &str, count: usize) -> ParseResult<NodeId> {
        let first = self.bump()?;
        for _ in 1..count {
            self.bump()?;
        }
        Ok(self.tree.token(kind, text, first.line, first.column))
    }

    /// Conditional expression: `a ? b : c` or anything tighter
    pub(super) fn ternary(&mut self) -> ParseResult<Parts> {
        let condition = self.binary(1)?;
        if !self.at("?") {
            return Ok(condition);
        }
        let question = self.token_node(NodeKind::Question)?;
        self.tree.append_all(question, &condition);
        let when_true = self.expression_parts()?;
        self.tree.append_all(question, &when_true);
        let colon = self.expect_node(NodeKind::Colon, ":")?;
        self.tree.append(question, colon);
        let when_false = if self.is_lambda_start() {
            vec![self.lambda()?]
        } else {
            self.ternary()?
        };
        self.tree.append_all(question, &when_false);
        Ok(vec![question])
    }

    fn binary(&mut self, min_precedence: u8) -> ParseResult<Parts> {
        let mut lhs = self.unary()?;
        while let Some((op, count, precedence)) = self.binary_operator() {
            if precedence < min_precedence {
                break;
            }
            if op == "instanceof" {
                let node = self.token_node(NodeKind::LiteralInstanceof)?;
                self.tree.append_all(node, &lhs);
                let target = if self.at_type_pattern() {
                    self.type_pattern()?
                } else {
                    self.type_node()?
                };
                self.tree.append(node, target);
                lhs = vec![node];
                continue;
            }
            let node = self.operator_node(NodeKind::BinaryOp, &op, count)?;
            let rhs = self.binary(precedence + 1)?;
            self.tree.append_all(node, &lhs);
            self.tree.append_all(node, &rhs);
            lhs = vec![node];
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> ParseResult<Parts> {
        if ["+", "-", "!", "~", "++", "--"].iter().any(|op| self.at(op)) {
            let node = self.token_node(NodeKind::UnaryOp)?;
            let operand = self.unary()?;
            self.tree.append_all(node, &operand);
            return Ok(vec![node]);
        }
        if self.at("(") && self.is_cast() {
            return self.cast();
        }
        let primary = self.primary()?;
        self.postfix(primary)
    }

    fn is_cast(&self) -> bool {
        let open = self.position();
        let Some(first) = self.token_at(open + 1) else {
            return false;
        };
        let primitive = is_primitive(first);
        let Some(mut end) = self.scan_type(open + 1) else {
            return false;
        };
        while self.index_is(end, "&") {
            match self.scan_type(end + 1) {
                Some(next) => end = next,
                None => return false,
            }
        }
        if !self.index_is(end, ")") {
            return false;
        }
        if primitive {
            return true;
        }
        self.token_at(end + 1).is_some_and(|t| match t.kind {
            TokenKind::Ident | TokenKind::Literal | TokenKind::TextBlock => true,
            TokenKind::Keyword => {
                ["this", "super", "new", "true", "false", "null", "switch"]
                    .iter()
                    .any(|k| t.text == *k)
                    || is_primitive(t)
            }
            TokenKind::Punct => t.text == "(" || t.text == "!" || t.text == "~",
        })
    }

    /// TEXT_BLOCK on the opening `"""` with a TEXT_BLOCK_END child on the
    /// closing one
    fn text_block(&mut self) -> ParseResult<NodeId> {
        let token = self.bump()?;
        let node = self.tree.token(NodeKind::TextBlock, &token.text, token.line, token.column);
        let (line, column) = token.text_block_end();
        let end = self.tree.token(NodeKind::TextBlockEnd, "\"\"\"", line, column);
        self.tree.append(node, end);
        Ok(node)
    }

    /// TYPECAST on the `(`: TYPE, RPAREN, operand
    fn cast(&mut self) -> ParseResult<Parts> {
        let cast = self.token_node(NodeKind::TypeCast)?;
        let ty = self.type_node()?;
        self.tree.append(cast, ty);
        while self.at("&") {
            let and = self.token_node(NodeKind::BinaryOp)?;
            let bound = self.type_node()?;
            self.tree.append_all(cast, &[and, bound]);
        }
        let rparen = self.expect_node(NodeKind::RParen, ")")?;
        self.tree.append(cast, rparen);
        let operand = if self.is_lambda_start() {
            vec![self.lambda()?]
        } else {
            self.unary()?
        };
        self.tree.append_all(cast, &operand);
        Ok(vec![cast])
    }

    fn primary(&mut self) -> ParseResult<Parts> {
        let Some(token) = self.peek().cloned() else {
            return Err(self.error_here("expected expression"));
        };
        let node = match token.kind {
            TokenKind::Literal => self.token_node(NodeKind::Literal)?,
            TokenKind::TextBlock => self.text_block()?,
            TokenKind::Ident => self.token_node(NodeKind::Ident)?,
            TokenKind::Keyword => match token.text.as_str() {
                "true" | "false" | "null" => self.token_node(NodeKind::Literal)?,
                "this" => self.token_node(NodeKind::LiteralThis)?,
                "super" => self.token_node(NodeKind::LiteralSuper)?,
                "new" => self.creator()?,
                "switch" => self.switch_block()?,
                _ if is_primitive(&token) => self.token_node(NodeKind::PrimitiveType)?,
                _ => return Err(self.error_here("expected expression")),
            },
            TokenKind::Punct if token.text == "(" => {
                let lparen = self.token_node(NodeKind::LParen)?;
                let inner = self.expression_parts()?;
                let rparen = self.expect_node(NodeKind::RParen, ")")?;
                let mut parts = vec![lparen];
                parts.extend(inner);
                parts.push(rparen);
                return Ok(parts);
            }
            TokenKind::Punct => return Err(self.error_here("expected expression")),
        };
        Ok(vec![node])
    }

    fn postfix(&mut self, mut parts: Parts) -> ParseResult<Parts> {
        loop {
            if self.at(".") {
                let dot = self.token_node(NodeKind::Dot)?;
                self.tree.append_all(dot, &parts);
                if self.at("<") {
                    let arguments = self.type_arguments()?;
                    self.tree.append(dot, arguments);
                }
                let rhs = if self.at_ident() {
                    self.ident_node()?
                } else if self.at("new") {
                    self.creator()?
                } else if self.at("this") {
                    self.token_node(NodeKind::LiteralThis)?
                } else if self.at("super") {
                    self.token_node(NodeKind::LiteralSuper)?
                } else if self.at("class") {
                    self.token_node(NodeKind::LiteralClass)?
                } else {
                    return Err(self.error_here("expected member name"));
                };
                self.tree.append(dot, rhs);
                parts = vec![dot];
            } else if self.at("(") {
                let call = self.token_node(NodeKind::MethodCall)?;
                self.tree.append_all(call, &parts);
                let elist = self.argument_list()?;
                let rparen = self.expect_node(NodeKind::RParen, ")")?;
                self.tree.append_all(call, &[elist, rparen]);
                parts = vec![call];
            } else if self.at("[") && self.nth_is(1, "]") {
                parts = self.array_dimensions(parts)?;
            } else if self.at("[") {
                let index = self.token_node(NodeKind::IndexOp)?;
                self.tree.append_all(index, &parts);
                let expr = self.expression_node()?;
                let rbrack = self.expect_node(NodeKind::RBrack, "]")?;
                self.tree.append_all(index, &[expr, rbrack]);
                parts = vec![index];
            } else if self.at("++") || self.at("--") {
                let node = self.token_node(NodeKind::PostIncDec)?;
                self.tree.append_all(node, &parts);
                parts = vec![node];
            } else if self.at("::") {
                let reference = self.token_node(NodeKind::MethodRef)?;
                self.tree.append_all(reference, &parts);
                if self.at("<") {
                    let arguments = self.type_arguments()?;
                    self.tree.append(reference, arguments);
                }
                let name = if self.at("new") {
                    self.token_node(NodeKind::LiteralNew)?
                } else {
                    self.ident_node()?
                };
                self.tree.append(reference, name);
                parts = vec![reference];
            } else {
                return Ok(parts);
            }
        }
    }

    /// LITERAL_NEW: instance creation, anonymous class or array creation
    fn creator(&mut self) -> ParseResult<NodeId> {
        let new = self.expect_node(NodeKind::LiteralNew, "new")?;
        if self.at("<") {
            let arguments = self.type_arguments()?;
            self.tree.append(new, arguments);
        }
        while self.at("@") {
            let annotation = self.annotation()?;
            self.tree.append(new, annotation);
        }
        if self.at_primitive() {
            let primitive = self.token_node(NodeKind::PrimitiveType)?;
            self.tree.append(new, primitive);
        } else {
            let parts = self.class_type_parts()?;
            self.tree.append_all(new, &parts);
        }

        if self.at("[") {
            while self.at("[") {
                let declarator = self.token_node(NodeKind::ArrayDeclarator)?;
                if !self.at("]") {
                    let size = self.expression_node()?;
                    self.tree.append(declarator, size);
                }
                let rbrack = self.expect_node(NodeKind::RBrack, "]")?;
                self.tree.append(declarator, rbrack);
                self.tree.append(new, declarator);
            }
            if self.at("{") {
                let init = self.array_initializer()?;
                self.tree.append(new, init);
            }
        } else {
            let (lparen, elist, rparen) = self.arguments()?;
            self.tree.append_all(new, &[lparen, elist, rparen]);
            if self.at("{") {
                let body = self.anonymous_class_body()?;
                self.tree.append(new, body);
            }
        }
        Ok(new)
    }

    /// `( args )` as LPAREN, ELIST, RPAREN
    pub(super) fn arguments(&mut self) -> ParseResult<(NodeId, NodeId, NodeId)> {
        let lparen = self.expect_node(NodeKind::LParen, "(")?;
        let elist = self.argument_list()?;
        let rparen = self.expect_node(NodeKind::RParen, ")")?;
        Ok((lparen, elist, rparen))
    }

    /// ELIST up to (not including) `)`; lambdas are not wrapped in EXPR
    fn argument_list(&mut self) -> ParseResult<NodeId> {
        let saved = self.no_lambda;
        self.no_lambda = false;
        let result = self.argument_list_inner();
        self.no_lambda = saved;
        result
    }

    fn argument_list_inner(&mut self) -> ParseResult<NodeId> {
        let elist = self.imaginary_here(NodeKind::Elist);
        while !self.at(")") {
            let argument = if self.is_lambda_start() {
                self.lambda()?
            } else {
                self.expression_node()?
            };
            self.tree.append(elist, argument);
            if !self.at(",") {
                break;
            }
            let comma = self.token_node(NodeKind::Comma)?;
            self.tree.append(elist, comma);
        }
        Ok(elist)
    }

    /// LAMBDA on the `->`: parameters, then the body
    fn lambda(&mut self) -> ParseResult<NodeId> {
        let mut head = Vec::new();
        if self.at_ident() {
            head.push(self.ident_node()?);
        } else {
            head.push(self.expect_node(NodeKind::LParen, "(")?);
            let parameters = self.imaginary_here(NodeKind::Parameters);
            while !self.at(")") {
                let parameter = if self.at_untyped_lambda_parameter() {
                    let parameter = self.imaginary_here(NodeKind::ParameterDef);
                    let modifiers = self.imaginary_here(NodeKind::Modifiers);
                    let ty = self.imaginary_here(NodeKind::Type);
                    let ident = self.ident_node()?;
                    self.tree.append_all(parameter, &[modifiers, ty, ident]);
                    parameter
                } else {
                    self.parameter_def()?
                };
                self.tree.append(parameters, parameter);
                if !self.at(",") {
                    break;
                }
                let comma = self.token_node(NodeKind::Comma)?;
                self.tree.append(parameters, comma);
            }
            head.push(parameters);
            head.push(self.expect_node(NodeKind::RParen, ")")?);
        }
        let arrow = self.expect_node(NodeKind::Lambda, "->")?;
        self.tree.append_all(arrow, &head);
        let body = if self.at("{") {
            vec![self.block()?]
        } else {
            self.expression_parts()?
        };
        self.tree.append_all(arrow, &body);
        Ok(arrow)
    }

    fn at_untyped_lambda_parameter(&self) -> bool {
        self.at_ident() && (self.nth_is(1, ",") || self.nth_is(1, ")"))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::{parse_source, NodeId, NodeKind, SyntaxTree};

    /// Parse `x = <expr>;` and return the right-hand side of the assignment
    fn rhs(source: &str) -> (SyntaxTree, NodeId) {
        let wrapped = format!("class A {{ void f() {{ x = {}; }} }}", source);
        let tree = parse_source(&wrapped).unwrap();
        let root = tree.root().unwrap();
        let assign = tree.preorder(root).find(|&n| tree.kind(n) == NodeKind::Assign).unwrap();
        let value = tree.last_child(assign).unwrap();
        (tree, value)
    }

    fn kinds(tree: &SyntaxTree, id: NodeId) -> Vec<NodeKind> {
        tree.children(id).map(|c| tree.kind(c)).collect()
    }

    #[test]
    fn test_text_block_closing_delimiter() {
        let (tree, value) = rhs("\"\"\"\n    hi\n      \"\"\"");
        assert_eq!(tree.kind(value), NodeKind::TextBlock);
        assert_eq!(kinds(&tree, value), vec![NodeKind::TextBlockEnd]);
        let end = tree.first_child(value).unwrap();
        assert_eq!((tree.line(end), tree.column(end)), (3, 6));
        assert_eq!(tree.text(end), "\"\"\"");
    }

    #[test]
    fn test_precedence() {
        let (tree, value) = rhs("a + b * c");
        assert_eq!(tree.text(value), "+");
        let mul = tree.last_child(value).unwrap();
        assert_eq!(tree.text(mul), "*");
    }

    #[test]
    fn test_shift_operators_are_glued() {
        let (tree, value) = rhs("a >>> 2 >= b >> 1");
        assert_eq!(tree.text(value), ">=");
        assert_eq!(tree.text(tree.first_child(value).unwrap()), ">>>");
        assert_eq!(tree.text(tree.last_child(value).unwrap()), ">>");
    }

    #[test]
    fn test_parentheses_are_flattened() {
        let (tree, value) = rhs("(a + b) * c");
        assert_eq!(tree.text(value), "*");
        assert_eq!(
            kinds(&tree, value),
            vec![NodeKind::LParen, NodeKind::BinaryOp, NodeKind::RParen, NodeKind::Ident]
        );
    }

    #[test]
    fn test_chained_method_calls() {
        let (tree, value) = rhs("a.b(1).c()");
        assert_eq!(tree.kind(value), NodeKind::MethodCall);
        let dot = tree.first_child(value).unwrap();
        assert_eq!(kinds(&tree, dot), vec![NodeKind::MethodCall, NodeKind::Ident]);
    }

    #[test]
    fn test_lambda_arguments_are_not_wrapped() {
        let (tree, value) = rhs("list.map(v -> v + 1, (a, b) -> { return a; })");
        let elist = tree.find_first_child(value, NodeKind::Elist).unwrap();
        assert_eq!(
            kinds(&tree, elist),
            vec![NodeKind::Lambda, NodeKind::Comma, NodeKind::Lambda]
        );
        let second = tree.last_child(elist).unwrap();
        assert_eq!(
            kinds(&tree, second),
            vec![NodeKind::LParen, NodeKind::Parameters, NodeKind::RParen, NodeKind::Slist]
        );
    }

    #[test]
    fn test_casts() {
        let (tree, value) = rhs("(String) o");
        assert_eq!(tree.kind(value), NodeKind::TypeCast);
        assert_eq!(
            kinds(&tree, value),
            vec![NodeKind::Type, NodeKind::RParen, NodeKind::Ident]
        );
        let (tree, value) = rhs("(a) - b");
        assert_eq!(tree.kind(value), NodeKind::BinaryOp);
    }

    #[test]
    fn test_new_with_anonymous_class_and_arrays() {
        let (tree, value) = rhs("new Runnable() { public void run() {} }");
        assert_eq!(
            kinds(&tree, value),
            vec![
                NodeKind::Ident,
                NodeKind::LParen,
                NodeKind::Elist,
                NodeKind::RParen,
                NodeKind::ObjBlock
            ]
        );
        let (tree, value) = rhs("new int[] {1, 2}");
        assert_eq!(
            kinds(&tree, value),
            vec![NodeKind::PrimitiveType, NodeKind::ArrayDeclarator, NodeKind::ArrayInit]
        );
    }

    #[test]
    fn test_ternary_and_method_reference() {
        let (tree, value) = rhs("ok ? String::valueOf : Objects::toString");
        assert_eq!(tree.kind(value), NodeKind::Question);
        assert_eq!(
            kinds(&tree, value),
            vec![NodeKind::Ident, NodeKind::MethodRef, NodeKind::Colon, NodeKind::MethodRef]
        );
    }

    #[test]
    fn test_instanceof_pattern() {
        let (tree, value) = rhs("o instanceof String s && s.isEmpty()");
        let instanceof = tree.first_child(value).unwrap();
        assert_eq!(tree.kind(instanceof), NodeKind::LiteralInstanceof);
        assert_eq!(
            tree.kind(tree.last_child(instanceof).unwrap()),
            NodeKind::PatternVariableDef
        );
    }
}
