use std::rc::Rc;

use simplejs_syntax::{Diagnostic, DiagnosticKind, Span, TokenKind, codes, unquote};

use super::Parser;
use crate::parser::{infix_binding_power, parse_number_literal, prefix_binding_power};
use crate::{
    AssignExpr, AssignOp, BinaryOp, CallExpr, Code, CodeKind, ConditionalExpr, Expr, IndexExpr,
    MemberExpr, Stmt, UnaryOp, UpdateOp,
};

impl<'a> Parser<'a> {
    /// Full expression (assignment level; the comma operator is not supported).
    pub(crate) fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_assign()
    }

    pub(crate) fn parse_assign(&mut self) -> Option<Expr> {
        self.nested(Self::parse_assign_level)
    }

    fn parse_assign_level(&mut self) -> Option<Expr> {
        self.skip_trivia();
        if self.at_arrow_params() {
            return self.parse_arrow();
        }
        let start = self.cur_span();
        let lhs = self.parse_conditional()?;
        let op = match self.peek_kind() {
            TokenKind::Eq => AssignOp::Set,
            TokenKind::PlusEq => AssignOp::Add,
            TokenKind::MinusEq => AssignOp::Sub,
            TokenKind::StarEq => AssignOp::Mul,
            TokenKind::SlashEq => AssignOp::Div,
            TokenKind::PercentEq => AssignOp::Mod,
            _ => return Some(lhs),
        };
        if !lhs.is_assignable() {
            let span = self.span_from(start);
            self.diagnostics.push(
                Diagnostic::error_kind(DiagnosticKind::InvalidAssignmentTarget, Some(span))
                    .with_code(codes::INVALID_ASSIGNMENT),
            );
            return None;
        }
        self.bump();
        let value = self.parse_assign()?;
        Some(Expr::Assign(Box::new(AssignExpr {
            target: lhs,
            op,
            value,
        })))
    }

    fn parse_conditional(&mut self) -> Option<Expr> {
        let cond = self.parse_binary(0)?;
        if !self.at(TokenKind::Question) {
            return Some(cond);
        }
        self.bump();
        let then_expr = self.parse_assign()?;
        self.expect(TokenKind::Colon)?;
        let else_expr = self.parse_assign()?;
        Some(Expr::Conditional(Box::new(ConditionalExpr {
            cond,
            then_expr,
            else_expr,
        })))
    }

    fn parse_binary(&mut self, min_bp: u8) -> Option<Expr> {
        let base = self.depth;
        let expr = self.parse_binary_chain(min_bp);
        self.depth = base;
        expr
    }

    /// Each folded operator deepens the left spine, so it counts as one nesting level.
    fn parse_binary_chain(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::PipePipe => BinaryOp::Or,
                TokenKind::AmpAmp => BinaryOp::And,
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::Ne => BinaryOp::Ne,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NeEq => BinaryOp::StrictNe,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Ge => BinaryOp::Ge,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };

            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.deepen()?;
            self.bump();
            let rhs = self.parse_binary(r_bp)?;
            lhs = Expr::Binary {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        self.nested(Self::parse_unary_level)
    }

    fn parse_unary_level(&mut self) -> Option<Expr> {
        self.skip_trivia();
        let op = match self.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::KwTypeof => UnaryOp::Typeof,
            TokenKind::KwVoid => UnaryOp::Void,
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                let op = if self.at(TokenKind::PlusPlus) {
                    UpdateOp::Inc
                } else {
                    UpdateOp::Dec
                };
                let start = self.bumped().span;
                let target = self.parse_unary()?;
                return self.update_expr(op, true, target, start);
            }
            _ => return self.parse_postfix(),
        };
        self.bump();
        let expr = self.parse_binary(prefix_binding_power())?;
        Some(Expr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let start = self.cur_span();
        let expr = self.parse_call_member()?;
        let op = match self.peek_kind() {
            TokenKind::PlusPlus => UpdateOp::Inc,
            TokenKind::MinusMinus => UpdateOp::Dec,
            _ => return Some(expr),
        };
        self.bump();
        self.update_expr(op, false, expr, start)
    }

    fn update_expr(&mut self, op: UpdateOp, prefix: bool, target: Expr, start: Span) -> Option<Expr> {
        if !target.is_assignable() {
            let span = self.span_from(start);
            self.diagnostics.push(
                Diagnostic::error_kind(DiagnosticKind::InvalidAssignmentTarget, Some(span))
                    .with_code(codes::INVALID_ASSIGNMENT),
            );
            return None;
        }
        Some(Expr::Update {
            op,
            prefix,
            target: Box::new(target),
        })
    }

    fn parse_call_member(&mut self) -> Option<Expr> {
        let expr = if self.at(TokenKind::KwNew) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        self.parse_member_tail(expr, true)
    }

    /// `new Callee(args)`; the argument list is optional.
    fn parse_new(&mut self) -> Option<Expr> {
        self.nested(Self::parse_new_level)
    }

    fn parse_new_level(&mut self) -> Option<Expr> {
        self.expect(TokenKind::KwNew)?;
        self.skip_trivia();
        let callee = if self.at(TokenKind::KwNew) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        let callee = self.parse_member_tail(callee, false)?;
        let args = if self.at(TokenKind::LParen) {
            self.parse_args()?
        } else {
            Box::new([])
        };
        Some(Expr::New(Box::new(CallExpr { callee, args })))
    }

    fn parse_member_tail(&mut self, expr: Expr, allow_call: bool) -> Option<Expr> {
        let base = self.depth;
        let expr = self.parse_member_chain(expr, allow_call);
        self.depth = base;
        expr
    }

    fn parse_member_chain(&mut self, mut expr: Expr, allow_call: bool) -> Option<Expr> {
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.deepen()?;
                    self.bump();
                    self.skip_trivia();
                    let field = if self.at(TokenKind::Ident) || self.peek_kind().is_keyword() {
                        // Keywords are fine as property names (`e.catch`, `o.new`).
                        let t = self.bumped();
                        self.token_text(&t).to_string()
                    } else {
                        let span = self.cur_span();
                        self.diagnostics.push(
                            Diagnostic::error_kind(
                                DiagnosticKind::ExpectedToken("property name".to_string()),
                                Some(span),
                            )
                            .with_code(codes::EXPECTED_TOKEN),
                        );
                        return None;
                    };
                    expr = Expr::Member(Box::new(MemberExpr {
                        object: expr,
                        field,
                    }));
                }
                TokenKind::LBracket => {
                    self.deepen()?;
                    self.bump();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expr::Index(Box::new(IndexExpr {
                        object: expr,
                        index,
                    }));
                }
                TokenKind::LParen if allow_call => {
                    self.deepen()?;
                    let args = self.parse_args()?;
                    expr = Expr::Call(Box::new(CallExpr { callee: expr, args }));
                }
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_args(&mut self) -> Option<Box<[Expr]>> {
        self.expect(TokenKind::LParen)?;
        let mut args: Vec<Expr> = Vec::new();
        self.skip_trivia();
        if !self.at(TokenKind::RParen) {
            loop {
                args.push(self.parse_assign()?);
                self.skip_trivia();
                if !self.at(TokenKind::Comma) {
                    break;
                }
                self.bump();
                self.skip_trivia();
                if self.at(TokenKind::RParen) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Some(args.into_boxed_slice())
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        self.skip_trivia();
        match self.peek_kind() {
            TokenKind::Ident => {
                let t = self.bumped();
                Some(Expr::Ident(self.token_text(&t).to_string()))
            }
            TokenKind::Number => {
                let t = self.bumped();
                let text = self.token_text(&t);
                match parse_number_literal(text) {
                    Some(v) => Some(Expr::Number(v)),
                    // Already reported by the lexer.
                    None => Some(Expr::Error(t.span)),
                }
            }
            TokenKind::Str => {
                let t = self.bumped();
                Some(Expr::Str(self.string_literal(t.span)))
            }
            TokenKind::KwTrue => {
                self.bump();
                Some(Expr::Bool(true))
            }
            TokenKind::KwFalse => {
                self.bump();
                Some(Expr::Bool(false))
            }
            TokenKind::KwNull => {
                self.bump();
                Some(Expr::Null)
            }
            TokenKind::KwThis => {
                self.bump();
                Some(Expr::This)
            }
            TokenKind::KwFunction => {
                let code = self.parse_function(CodeKind::Function, false)?;
                Some(Expr::Function(code))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Some(inner)
            }
            TokenKind::LBrace => self.parse_object(),
            kind => {
                let span = self.cur_span();
                self.error(DiagnosticKind::ExpectedExpression, span);
                // Consume the token unless it closes an enclosing construct.
                if !matches!(
                    kind,
                    TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket | TokenKind::Eof
                ) {
                    self.bump();
                }
                Some(Expr::Error(span))
            }
        }
    }

    fn parse_object(&mut self) -> Option<Expr> {
        self.expect(TokenKind::LBrace)?;
        let mut props: Vec<(String, Expr)> = Vec::new();
        loop {
            self.skip_trivia();
            if self.at(TokenKind::RBrace) {
                break;
            }
            let t = self.bumped();
            let key = match t.kind {
                TokenKind::Ident => self.token_text(&t).to_string(),
                k if k.is_keyword() => self.token_text(&t).to_string(),
                TokenKind::Str => self.string_literal(t.span),
                TokenKind::Number => match parse_number_literal(self.token_text(&t)) {
                    Some(v) => number_key(v, self.token_text(&t)),
                    None => return None,
                },
                _ => {
                    self.diagnostics.push(
                        Diagnostic::error_kind(
                            DiagnosticKind::ExpectedToken("property name".to_string()),
                            Some(t.span),
                        )
                        .with_code(codes::EXPECTED_TOKEN),
                    );
                    return None;
                }
            };
            self.skip_trivia();
            let value = if t.kind == TokenKind::Ident
                && matches!(self.peek_kind(), TokenKind::Comma | TokenKind::RBrace)
            {
                Expr::Ident(key.clone())
            } else {
                self.expect(TokenKind::Colon)?;
                self.parse_assign()?
            };
            props.push((key, value));
            self.skip_trivia();
            if !self.at(TokenKind::Comma) {
                break;
            }
            self.bump();
        }
        self.expect(TokenKind::RBrace)?;
        Some(Expr::Object(props.into_boxed_slice()))
    }

    /// `x =>` or `( ... ) =>` at the cursor.
    fn at_arrow_params(&self) -> bool {
        match self.peek_kind() {
            TokenKind::Ident => self.peek_kind_n(1) == Some(TokenKind::Arrow),
            TokenKind::LParen => self
                .matching_paren_end()
                .and_then(|end| self.tokens.get(end))
                .is_some_and(|t| t.kind == TokenKind::Arrow),
            _ => false,
        }
    }

    fn parse_arrow(&mut self) -> Option<Expr> {
        let start = self.cur_span();
        let params = if self.at(TokenKind::Ident) {
            let name = self.expect_ident()?;
            vec![name].into_boxed_slice()
        } else {
            self.expect(TokenKind::LParen)?;
            self.parse_params()?
        };
        self.expect(TokenKind::Arrow)?;
        self.skip_trivia();
        let body: Box<[Stmt]> = if self.at(TokenKind::LBrace) {
            self.parse_function_body()?
        } else {
            let saved_loops = std::mem::replace(&mut self.loop_depth, 0);
            let value = self.parse_assign();
            self.loop_depth = saved_loops;
            Box::new([Stmt::Return(Some(value?))])
        };
        let span = self.span_from(start);
        Some(Expr::Function(Rc::new(Code::new(
            CodeKind::Arrow,
            None,
            params,
            body,
            span,
        ))))
    }

    fn string_literal(&mut self, span: Span) -> String {
        let input = self.input;
        let end = (span.end.0 as usize).min(input.len());
        let start = (span.start.0 as usize).min(end);
        match unquote(&input[start..end]) {
            Ok(s) => s,
            Err(e) => {
                let at = span.start.0 + e.offset as u32;
                self.error(
                    DiagnosticKind::InvalidEscape(e.ch),
                    Span::new(at, at + 1 + e.ch.len_utf8() as u32),
                );
                String::new()
            }
        }
    }
}

/// Property key spelled by a numeric literal (`{1: x}` and `{1.0: x}` both use "1").
fn number_key(v: f64, text: &str) -> String {
    if v.fract() == 0.0 && v.abs() < 9.007_199_254_740_992e15 {
        format!("{}", v as i64)
    } else {
        text.to_string()
    }
}
