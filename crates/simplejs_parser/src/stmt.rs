use std::rc::Rc;

use simplejs_syntax::{DiagnosticKind, Span, TokenKind};

use super::Parser;
use crate::{
    CatchClause, Code, CodeKind, DeclKind, ForStmt, IfStmt, Stmt, TryStmt, VarDecl, VarStmt,
    WhileStmt,
};

impl<'a> Parser<'a> {
    /// Parse a single statement.
    pub(crate) fn parse_stmt(&mut self) -> Option<Stmt> {
        self.nested(Self::parse_stmt_level)
    }

    fn parse_stmt_level(&mut self) -> Option<Stmt> {
        self.skip_trivia();
        match self.peek_kind() {
            TokenKind::Semi => {
                self.bump();
                Some(Stmt::Empty)
            }
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            TokenKind::KwVar | TokenKind::KwLet | TokenKind::KwConst => {
                let stmt = self.parse_var_decls()?;
                self.expect_stmt_terminator()?;
                Some(stmt)
            }
            TokenKind::KwFunction => {
                let code = self.parse_function(CodeKind::Function, true)?;
                Some(Stmt::FuncDecl(code))
            }
            TokenKind::KwIf => self.parse_if(),
            TokenKind::KwWhile => self.parse_while(),
            TokenKind::KwDo => self.parse_do_while(),
            TokenKind::KwFor => self.parse_for(),
            TokenKind::KwReturn => self.parse_return(),
            TokenKind::KwBreak => self.parse_loop_jump(TokenKind::KwBreak, Stmt::Break, "break"),
            TokenKind::KwContinue => {
                self.parse_loop_jump(TokenKind::KwContinue, Stmt::Continue, "continue")
            }
            TokenKind::KwThrow => self.parse_throw(),
            TokenKind::KwTry => self.parse_try(),
            _ => {
                let expr = self.parse_expr()?;
                self.expect_stmt_terminator()?;
                Some(Stmt::Expr(expr))
            }
        }
    }

    /// `var a = 1, b` without the terminator (shared with `for` headers).
    pub(crate) fn parse_var_decls(&mut self) -> Option<Stmt> {
        let kind = match self.bumped().kind {
            TokenKind::KwLet => DeclKind::Let,
            TokenKind::KwConst => DeclKind::Const,
            _ => DeclKind::Var,
        };
        let mut decls: Vec<VarDecl> = Vec::with_capacity(1);
        loop {
            let name = self.expect_ident()?;
            let init = if self.at(TokenKind::Eq) {
                self.bump();
                Some(self.parse_assign()?)
            } else {
                if kind == DeclKind::Const {
                    let span = self.cur_span();
                    self.error(DiagnosticKind::ExpectedToken("'=' after const name".into()), span);
                    return None;
                }
                None
            };
            decls.push(VarDecl { name, init });
            if !self.at(TokenKind::Comma) {
                break;
            }
            self.bump();
        }
        Some(Stmt::Var(Box::new(VarStmt {
            kind,
            decls: decls.into_boxed_slice(),
        })))
    }

    /// `function name(params) { body }`; the name is optional for expressions.
    pub(crate) fn parse_function(&mut self, kind: CodeKind, require_name: bool) -> Option<Rc<Code>> {
        let start = self.expect(TokenKind::KwFunction)?.span;
        self.skip_trivia();
        let name = if require_name || self.at(TokenKind::Ident) {
            Some(self.expect_ident()?)
        } else {
            None
        };
        self.expect(TokenKind::LParen)?;
        let params = self.parse_params()?;
        let body = self.parse_function_body()?;
        let span = self.span_from(start);
        Some(Rc::new(Code::new(kind, name, params, body, span)))
    }

    /// Parameter names after `(`, consuming the closing `)`.
    pub(crate) fn parse_params(&mut self) -> Option<Box<[String]>> {
        let mut params: Vec<String> = Vec::new();
        self.skip_trivia();
        if !self.at(TokenKind::RParen) {
            loop {
                let name = self.expect_ident()?;
                params.push(name);
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
        Some(params.into_boxed_slice())
    }

    pub(crate) fn parse_function_body(&mut self) -> Option<Box<[Stmt]>> {
        let saved_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.fn_depth += 1;
        let body = self.parse_block();
        self.fn_depth -= 1;
        self.loop_depth = saved_loops;
        body
    }

    fn parse_if(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::KwIf)?;
        let cond = self.parse_paren_cond()?;
        let then_branch = self.parse_substmt()?;
        let else_branch = if self.peek_past_newlines() == TokenKind::KwElse {
            self.skip_trivia();
            self.bump();
            Some(self.parse_substmt()?)
        } else {
            None
        };
        Some(Stmt::If(Box::new(IfStmt {
            cond,
            then_branch,
            else_branch,
        })))
    }

    fn parse_while(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::KwWhile)?;
        let cond = self.parse_paren_cond()?;
        let body = self.parse_loop_body()?;
        Some(Stmt::While(Box::new(WhileStmt { cond, body })))
    }

    fn parse_do_while(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::KwDo)?;
        let body = self.parse_loop_body()?;
        self.expect(TokenKind::KwWhile)?;
        let cond = self.parse_paren_cond()?;
        // `do ... while (c)` needs no terminator.
        if self.at(TokenKind::Semi) {
            self.bump();
        }
        Some(Stmt::DoWhile(Box::new(WhileStmt { cond, body })))
    }

    fn parse_for(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::KwFor)?;
        self.expect(TokenKind::LParen)?;
        let init = match self.peek_kind() {
            TokenKind::Semi => None,
            TokenKind::KwVar | TokenKind::KwLet | TokenKind::KwConst => {
                Some(self.parse_var_decls()?)
            }
            _ => Some(Stmt::Expr(self.parse_expr()?)),
        };
        self.expect(TokenKind::Semi)?;
        let cond = if self.at(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semi)?;
        let step = if self.at(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::RParen)?;
        let body = self.parse_loop_body()?;
        Some(Stmt::For(Box::new(ForStmt {
            init,
            cond,
            step,
            body,
        })))
    }

    fn parse_return(&mut self) -> Option<Stmt> {
        let t = self.bumped();
        if self.fn_depth == 0 {
            self.error(DiagnosticKind::MisplacedControlFlow("return"), t.span);
        }
        let value = if matches!(
            self.peek_kind(),
            TokenKind::Semi | TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof
        ) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect_stmt_terminator()?;
        Some(Stmt::Return(value))
    }

    fn parse_loop_jump(&mut self, kw: TokenKind, stmt: Stmt, what: &'static str) -> Option<Stmt> {
        let t = self.expect(kw)?;
        if self.loop_depth == 0 {
            self.error(DiagnosticKind::MisplacedControlFlow(what), t.span);
        }
        self.expect_stmt_terminator()?;
        Some(stmt)
    }

    fn parse_throw(&mut self) -> Option<Stmt> {
        let t = self.bumped();
        if matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Semi | TokenKind::Eof) {
            self.error(DiagnosticKind::ExpectedExpression, t.span);
            return None;
        }
        let value = self.parse_expr()?;
        self.expect_stmt_terminator()?;
        Some(Stmt::Throw(value))
    }

    fn parse_try(&mut self) -> Option<Stmt> {
        let t = self.expect(TokenKind::KwTry)?;
        let body = self.parse_block()?;
        let catch = if self.peek_past_newlines() == TokenKind::KwCatch {
            self.skip_trivia();
            self.bump();
            self.skip_trivia();
            let param = if self.at(TokenKind::LParen) {
                self.bump();
                let name = self.expect_ident()?;
                self.expect(TokenKind::RParen)?;
                Some(name)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause { param, body })
        } else {
            None
        };
        let finally = if self.peek_past_newlines() == TokenKind::KwFinally {
            self.skip_trivia();
            self.bump();
            Some(self.parse_block()?)
        } else {
            None
        };
        if catch.is_none() && finally.is_none() {
            self.error(DiagnosticKind::MissingCatchOrFinally, t.span);
            return None;
        }
        Some(Stmt::Try(Box::new(TryStmt {
            body,
            catch,
            finally,
        })))
    }

    fn parse_paren_cond(&mut self) -> Option<crate::Expr> {
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Some(cond)
    }

    fn parse_loop_body(&mut self) -> Option<Stmt> {
        self.loop_depth += 1;
        let body = self.parse_substmt();
        self.loop_depth -= 1;
        body
    }

    /// Body of `if`/`while`/`for`: a statement, never a declaration-only position error.
    fn parse_substmt(&mut self) -> Option<Stmt> {
        self.skip_trivia();
        if self.at(TokenKind::Eof) {
            let span = self.cur_span();
            self.error(DiagnosticKind::ExpectedToken("statement".into()), span);
            return None;
        }
        match self.parse_stmt() {
            Some(s) => Some(s),
            None => Some(self.recover_stmt()),
        }
    }

    /// Span from `start` through the last consumed token.
    pub(crate) fn span_from(&self, start: Span) -> Span {
        match self.tokens.get(self.i.saturating_sub(1)) {
            Some(t) => start.merge(t.span),
            None => start,
        }
    }
}
