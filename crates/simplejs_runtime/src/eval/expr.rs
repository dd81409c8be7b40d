use smallvec::SmallVec;

use simplejs_ir::{AssignExpr, BinaryOp, CallExpr, Expr, UnaryOp, UpdateOp};

use super::ops::type_name;
use crate::core::Value;
use crate::errors::{ErrorKind, EvalResult};
use crate::interpreter::Interpreter;

/// Where an assignment or update stores its result.
enum Place {
    Binding(String),
    Member(Value, String),
}

impl Interpreter {
    /// Evaluate an expression. The result is rooted until the enclosing statement ends.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        let v = match expr {
            Expr::Number(n) => return Ok(Value::make_number(*n)),
            Expr::Bool(b) => return Ok(Value::make_boolean(*b)),
            Expr::Null => return Ok(Value::NULL),
            Expr::Str(s) => self.intern(s)?,
            Expr::Ident(name) => self.resolve_ident(name)?,
            Expr::This => self.this_value(),
            Expr::Object(props) => {
                let obj = self.new_object(Value::NULL)?;
                self.roots.push(obj);
                for (key, value) in props.iter() {
                    let v = self.eval_expr(value)?;
                    self.put_own(obj, key, v)?;
                }
                return Ok(obj);
            }
            Expr::Function(code) => self.make_closure(code)?,
            Expr::Member(m) => {
                let obj = self.eval_expr(&m.object)?;
                self.get_member(obj, &m.field)?
            }
            Expr::Index(ix) => {
                let obj = self.eval_expr(&ix.object)?;
                let key = self.eval_expr(&ix.index)?;
                let key = self.property_key(key)?;
                self.get_member(obj, &key)?
            }
            Expr::Call(c) => self.eval_call(c)?,
            Expr::New(c) => {
                let func = self.eval_expr(&c.callee)?;
                let args = self.eval_args(&c.args)?;
                self.construct(func, &args, &describe_callee(&c.callee))?
            }
            Expr::Unary { op, expr } => return self.eval_unary(*op, expr),
            Expr::Update {
                op,
                prefix,
                target,
            } => return self.eval_update(*op, *prefix, target),
            Expr::Binary { op, left, right } => {
                let l = self.eval_expr(left)?;
                match op {
                    BinaryOp::And if !l.to_boolean() => return Ok(l),
                    BinaryOp::Or if l.to_boolean() => return Ok(l),
                    BinaryOp::And | BinaryOp::Or => {
                        return self.eval_expr(right);
                    }
                    _ => {}
                }
                let r = self.eval_expr(right)?;
                self.binary_op(*op, l, r)?
            }
            Expr::Conditional(c) => {
                let cond = self.eval_expr(&c.cond)?;
                return if cond.to_boolean() {
                    self.eval_expr(&c.then_expr)
                } else {
                    self.eval_expr(&c.else_expr)
                };
            }
            Expr::Assign(a) => return self.eval_assign(a),
            Expr::Error(_) => {
                return Err(self.throw_error(ErrorKind::SyntaxError, "invalid expression"));
            }
        };
        Ok(self.rooted(v))
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<SmallVec<[Value; 8]>> {
        let mut out: SmallVec<[Value; 8]> = SmallVec::with_capacity(args.len());
        for a in args {
            out.push(self.eval_expr(a)?);
        }
        Ok(out)
    }

    fn eval_call(&mut self, c: &CallExpr) -> EvalResult<Value> {
        let (func, this) = match &c.callee {
            Expr::Member(m) => {
                let obj = self.eval_expr(&m.object)?;
                let f = self.get_member(obj, &m.field)?;
                (self.rooted(f), obj)
            }
            Expr::Index(ix) => {
                let obj = self.eval_expr(&ix.object)?;
                let key = self.eval_expr(&ix.index)?;
                let key = self.property_key(key)?;
                let f = self.get_member(obj, &key)?;
                (self.rooted(f), obj)
            }
            callee => (self.eval_expr(callee)?, Value::UNDEFINED),
        };
        let args = self.eval_args(&c.args)?;
        let name = describe_callee(&c.callee);
        self.call_value(func, this, &args, Some(&name))
    }

    fn eval_unary(&mut self, op: UnaryOp, expr: &Expr) -> EvalResult<Value> {
        if op == UnaryOp::Typeof {
            // `typeof` of an unbound name is not an error.
            if let Expr::Ident(name) = expr {
                if !self.is_bound(name)? {
                    let t = self.intern("undefined")?;
                    return Ok(self.rooted(t));
                }
            }
            let v = self.eval_expr(expr)?;
            let t = self.intern(type_name(v))?;
            return Ok(self.rooted(t));
        }
        let v = self.eval_expr(expr)?;
        Ok(match op {
            UnaryOp::Neg => Value::make_number(-self.to_number(v)?),
            UnaryOp::Plus => Value::make_number(self.to_number(v)?),
            UnaryOp::Not => Value::make_boolean(!v.to_boolean()),
            UnaryOp::Void | UnaryOp::Typeof => Value::UNDEFINED,
        })
    }

    /// Evaluate an assignment target's container without reading the current value.
    fn eval_place(&mut self, target: &Expr) -> EvalResult<Place> {
        match target {
            Expr::Ident(name) => Ok(Place::Binding(name.clone())),
            Expr::Member(m) => {
                let obj = self.eval_expr(&m.object)?;
                Ok(Place::Member(obj, m.field.clone()))
            }
            Expr::Index(ix) => {
                let obj = self.eval_expr(&ix.object)?;
                let key = self.eval_expr(&ix.index)?;
                let key = self.property_key(key)?;
                Ok(Place::Member(obj, key))
            }
            _ => Err(self.throw_error(ErrorKind::SyntaxError, "Invalid assignment target")),
        }
    }

    fn read_place(&mut self, place: &Place) -> EvalResult<Value> {
        let v = match place {
            Place::Binding(name) => self.resolve_ident(name)?,
            Place::Member(obj, key) => self.get_member(*obj, key)?,
        };
        Ok(self.rooted(v))
    }

    fn write_place(&mut self, place: &Place, value: Value) -> EvalResult<()> {
        match place {
            Place::Binding(name) => self.assign_ident(name, value),
            Place::Member(obj, key) => self.set_member(*obj, key, value),
        }
    }

    fn eval_assign(&mut self, a: &AssignExpr) -> EvalResult<Value> {
        let place = self.eval_place(&a.target)?;
        let value = match a.op.binary() {
            None => self.eval_expr(&a.value)?,
            Some(op) => {
                let current = self.read_place(&place)?;
                let rhs = self.eval_expr(&a.value)?;
                let v = self.binary_op(op, current, rhs)?;
                self.rooted(v)
            }
        };
        self.write_place(&place, value)?;
        Ok(value)
    }

    fn eval_update(&mut self, op: UpdateOp, prefix: bool, target: &Expr) -> EvalResult<Value> {
        let place = self.eval_place(target)?;
        let current = self.read_place(&place)?;
        let old = self.to_number(current)?;
        let new = match op {
            UpdateOp::Inc => old + 1.0,
            UpdateOp::Dec => old - 1.0,
        };
        self.write_place(&place, Value::make_number(new))?;
        Ok(Value::make_number(if prefix { new } else { old }))
    }
}

/// Source-like name of a callee for error messages.
fn describe_callee(expr: &Expr) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::This => "this".to_string(),
        Expr::Member(m) => format!("{}.{}", describe_callee(&m.object), m.field),
        Expr::Index(ix) => format!("{}[...]", describe_callee(&ix.object)),
        Expr::Call(c) => format!("{}(...)", describe_callee(&c.callee)),
        _ => "expression".to_string(),
    }
}
