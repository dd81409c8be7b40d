use std::rc::Rc;

use simplejs_syntax::Span;

use crate::{Stmt, TryStmt};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeKind {
    /// Top-level script.
    Script,
    /// `function` declaration or expression.
    Function,
    /// Arrow function: `this` is taken from the defining scope.
    Arrow,
}

/// An executable unit: parameters, body and the names hoisted into its scope.
#[derive(Debug, PartialEq)]
pub struct Code {
    pub kind: CodeKind,
    pub name: Option<String>,
    pub params: Box<[String]>,
    pub body: Box<[Stmt]>,
    pub span: Span,
    /// `var`/`let`/`const` names declared anywhere in the body (not in nested functions).
    pub hoisted_vars: Box<[String]>,
    /// Function declarations instantiated when the scope is entered.
    pub hoisted_funcs: Box<[Rc<Code>]>,
}

impl Code {
    pub fn new(
        kind: CodeKind,
        name: Option<String>,
        params: Box<[String]>,
        body: Box<[Stmt]>,
        span: Span,
    ) -> Self {
        let mut vars = Vec::new();
        let mut funcs = Vec::new();
        collect_hoisted(&body, &mut vars, &mut funcs);
        Self {
            kind,
            name,
            params,
            body,
            span,
            hoisted_vars: vars.into_boxed_slice(),
            hoisted_funcs: funcs.into_boxed_slice(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }
}

fn push_unique(vars: &mut Vec<String>, name: &str) {
    if !vars.iter().any(|v| v == name) {
        vars.push(name.to_string());
    }
}

fn collect_hoisted(stmts: &[Stmt], vars: &mut Vec<String>, funcs: &mut Vec<Rc<Code>>) {
    for s in stmts {
        collect_stmt(s, vars, funcs);
    }
}

fn collect_stmt(stmt: &Stmt, vars: &mut Vec<String>, funcs: &mut Vec<Rc<Code>>) {
    match stmt {
        Stmt::Var(v) => {
            for d in v.decls.iter() {
                push_unique(vars, &d.name);
            }
        }
        Stmt::FuncDecl(code) => {
            if let Some(name) = &code.name {
                push_unique(vars, name);
            }
            funcs.push(code.clone());
        }
        Stmt::If(s) => {
            collect_stmt(&s.then_branch, vars, funcs);
            if let Some(e) = &s.else_branch {
                collect_stmt(e, vars, funcs);
            }
        }
        Stmt::While(s) | Stmt::DoWhile(s) => collect_stmt(&s.body, vars, funcs),
        Stmt::For(s) => {
            if let Some(init) = &s.init {
                collect_stmt(init, vars, funcs);
            }
            collect_stmt(&s.body, vars, funcs);
        }
        Stmt::Block(b) => collect_hoisted(b, vars, funcs),
        Stmt::Try(t) => {
            let TryStmt {
                body,
                catch,
                finally,
            } = &**t;
            collect_hoisted(body, vars, funcs);
            if let Some(c) = catch {
                collect_hoisted(&c.body, vars, funcs);
            }
            if let Some(f) = finally {
                collect_hoisted(f, vars, funcs);
            }
        }
        Stmt::Return(_)
        | Stmt::Throw(_)
        | Stmt::Break
        | Stmt::Continue
        | Stmt::Expr(_)
        | Stmt::Empty
        | Stmt::Error(_) => {}
    }
}

/// A parsed script.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub code: Rc<Code>,
}

impl Program {
    pub fn new(body: Box<[Stmt]>, span: Span) -> Self {
        Self {
            code: Rc::new(Code::new(CodeKind::Script, None, Box::new([]), body, span)),
        }
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.code.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeclKind, Expr, IfStmt, VarDecl, VarStmt};

    fn var(name: &str) -> Stmt {
        Stmt::Var(Box::new(VarStmt {
            kind: DeclKind::Var,
            decls: Box::new([VarDecl {
                name: name.to_string(),
                init: None,
            }]),
        }))
    }

    #[test]
    fn hoists_nested_vars_and_functions_once() {
        let inner = Rc::new(Code::new(
            CodeKind::Function,
            Some("g".into()),
            Box::new([]),
            Box::new([var("hidden")]),
            Span::default(),
        ));
        let body: Box<[Stmt]> = Box::new([
            var("a"),
            Stmt::If(Box::new(IfStmt {
                cond: Expr::Bool(true),
                then_branch: Stmt::Block(Box::new([var("b"), var("a")])),
                else_branch: None,
            })),
            Stmt::FuncDecl(inner),
        ]);
        let code = Code::new(CodeKind::Function, None, Box::new([]), body, Span::default());
        assert_eq!(&*code.hoisted_vars, &["a", "b", "g"]);
        assert_eq!(code.hoisted_funcs.len(), 1);
    }
}
