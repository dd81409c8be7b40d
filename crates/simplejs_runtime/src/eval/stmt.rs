use simplejs_ir::{CatchClause, ForStmt, Stmt, TryStmt, WhileStmt};

use crate::config::Flow;
use crate::core::Value;
use crate::errors::{ErrorKind, EvalResult, Unwind};
use crate::interpreter::Interpreter;

impl Interpreter {
    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            match self.exec_stmt(stmt)? {
                Flow::None => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::None)
    }

    /// Execute one statement; temporaries it rooted are released on every exit path.
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        let mark = self.roots.len();
        let flow = self.exec_stmt_inner(stmt);
        self.roots.truncate(mark);
        flow
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Var(v) => {
                for decl in v.decls.iter() {
                    if let Some(init) = &decl.init {
                        let value = self.eval_expr(init)?;
                        self.assign_ident(&decl.name, value)?;
                    }
                }
                Ok(Flow::None)
            }
            // Hoisted when the enclosing scope was entered.
            Stmt::FuncDecl(_) => Ok(Flow::None),
            Stmt::If(s) => {
                let cond = self.eval_expr(&s.cond)?;
                if cond.to_boolean() {
                    self.exec_stmt(&s.then_branch)
                } else if let Some(e) = &s.else_branch {
                    self.exec_stmt(e)
                } else {
                    Ok(Flow::None)
                }
            }
            Stmt::While(s) => self.exec_while(s),
            Stmt::DoWhile(s) => self.exec_do_while(s),
            Stmt::For(s) => self.exec_for(s),
            Stmt::Block(stmts) => self.exec_block(stmts),
            Stmt::Try(t) => self.exec_try(t),
            Stmt::Return(e) => {
                let v = match e {
                    Some(e) => self.eval_expr(e)?,
                    None => Value::UNDEFINED,
                };
                Ok(Flow::Return(v))
            }
            Stmt::Throw(e) => {
                let v = self.eval_expr(e)?;
                Err(Unwind::Throw(v))
            }
            Stmt::Break => Ok(Flow::Break),
            Stmt::Continue => Ok(Flow::Continue),
            Stmt::Expr(e) => {
                let v = self.eval_expr(e)?;
                if self.in_script_frame() {
                    self.completion = v;
                }
                Ok(Flow::None)
            }
            Stmt::Empty => Ok(Flow::None),
            Stmt::Error(_) => Err(self.throw_error(ErrorKind::SyntaxError, "invalid statement")),
        }
    }

    /// Condition check that does not keep its temporaries alive.
    fn test(&mut self, cond: &simplejs_ir::Expr) -> EvalResult<bool> {
        let mark = self.roots.len();
        let v = self.eval_expr(cond);
        self.roots.truncate(mark);
        Ok(v?.to_boolean())
    }

    fn exec_while(&mut self, s: &WhileStmt) -> EvalResult<Flow> {
        while self.test(&s.cond)? {
            match self.exec_stmt(&s.body)? {
                Flow::Break => break,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::None | Flow::Continue => {}
            }
        }
        Ok(Flow::None)
    }

    fn exec_do_while(&mut self, s: &WhileStmt) -> EvalResult<Flow> {
        loop {
            match self.exec_stmt(&s.body)? {
                Flow::Break => break,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::None | Flow::Continue => {}
            }
            if !self.test(&s.cond)? {
                break;
            }
        }
        Ok(Flow::None)
    }

    fn exec_for(&mut self, s: &ForStmt) -> EvalResult<Flow> {
        if let Some(init) = &s.init {
            self.exec_stmt(init)?;
        }
        loop {
            if let Some(cond) = &s.cond {
                if !self.test(cond)? {
                    break;
                }
            }
            match self.exec_stmt(&s.body)? {
                Flow::Break => break,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::None | Flow::Continue => {}
            }
            if let Some(step) = &s.step {
                let mark = self.roots.len();
                let r = self.eval_expr(step);
                self.roots.truncate(mark);
                r?;
            }
        }
        Ok(Flow::None)
    }

    fn exec_try(&mut self, t: &TryStmt) -> EvalResult<Flow> {
        let mut result = self.exec_block(&t.body);
        if let Some(catch) = &t.catch {
            if let Err(Unwind::Throw(thrown)) = result {
                result = self.exec_catch(catch, thrown);
            }
        }
        let Some(finally) = &t.finally else {
            return result;
        };
        if let Err(Unwind::Fatal(_)) = result {
            return result;
        }
        // The pending completion must survive whatever the finally block allocates.
        let mark = self.roots.len();
        if let Ok(Flow::Return(v)) | Err(Unwind::Throw(v)) = &result {
            self.roots.push(*v);
        }
        let fin = self.exec_block(finally);
        self.roots.truncate(mark);
        match fin? {
            Flow::None => result,
            flow => Ok(flow),
        }
    }

    fn exec_catch(&mut self, catch: &CatchClause, thrown: Value) -> EvalResult<Flow> {
        let mark = self.roots.len();
        self.roots.push(thrown);
        let outer = self.scope();
        let result = self.exec_catch_body(catch, thrown, outer);
        self.set_scope(outer);
        self.roots.truncate(mark);
        result
    }

    fn exec_catch_body(&mut self, catch: &CatchClause, thrown: Value, outer: Value) -> EvalResult<Flow> {
        let scope = self.new_object(outer)?;
        self.set_scope(scope);
        if let Some(param) = &catch.param {
            self.put_own(scope, param, thrown)?;
        }
        self.exec_block(&catch.body)
    }
}
