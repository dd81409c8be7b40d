//! Statement and expression trees.
use std::rc::Rc;

use simplejs_syntax::Span;

use crate::Code;

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Var(Box<VarStmt>),
    FuncDecl(Rc<Code>),
    If(Box<IfStmt>),
    While(Box<WhileStmt>),
    DoWhile(Box<WhileStmt>),
    For(Box<ForStmt>),
    Block(Box<[Stmt]>),
    Try(Box<TryStmt>),
    Return(Option<Expr>),
    Throw(Expr),
    Break,
    Continue,
    Expr(Expr),
    Empty,
    Error(Span),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Let,
    Const,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarStmt {
    pub kind: DeclKind,
    pub decls: Box<[VarDecl]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Stmt,
    pub else_branch: Option<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Stmt,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub init: Option<Stmt>,
    pub cond: Option<Expr>,
    pub step: Option<Expr>,
    pub body: Stmt,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TryStmt {
    pub body: Box<[Stmt]>,
    pub catch: Option<CatchClause>,
    pub finally: Option<Box<[Stmt]>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub param: Option<String>,
    pub body: Box<[Stmt]>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Ident(String),
    This,
    Object(Box<[(String, Expr)]>),
    Function(Rc<Code>),
    Member(Box<MemberExpr>),
    Index(Box<IndexExpr>),
    Call(Box<CallExpr>),
    New(Box<CallExpr>),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional(Box<ConditionalExpr>),
    Assign(Box<AssignExpr>),
    Error(Span),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MemberExpr {
    pub object: Expr,
    pub field: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexExpr {
    pub object: Expr,
    pub index: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub callee: Expr,
    pub args: Box<[Expr]>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalExpr {
    pub cond: Expr,
    pub then_expr: Expr,
    pub else_expr: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssignExpr {
    pub target: Expr,
    pub op: AssignOp,
    pub value: Expr,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    Set,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    /// Arithmetic performed by a compound assignment.
    pub fn binary(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Set => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Mod => Some(BinaryOp::Mod),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    Typeof,
    Void,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOp {
    Inc,
    Dec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    StrictEq,
    StrictNe,
    And,
    Or,
}

impl Expr {
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Ident(_) | Expr::Member(_) | Expr::Index(_))
    }
}
