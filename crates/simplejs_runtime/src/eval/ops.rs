use std::cmp::Ordering;

use simplejs_ir::BinaryOp;

use crate::core::{Type, Value};
use crate::errors::{EvalResult, FatalError};
use crate::interpreter::Interpreter;

impl Interpreter {
    pub(crate) fn binary_op(&mut self, op: BinaryOp, l: Value, r: Value) -> EvalResult<Value> {
        let v = match op {
            BinaryOp::Add => return self.add(l, r),
            BinaryOp::Sub => Value::make_number(self.to_number(l)? - self.to_number(r)?),
            BinaryOp::Mul => Value::make_number(self.to_number(l)? * self.to_number(r)?),
            BinaryOp::Div => Value::make_number(self.to_number(l)? / self.to_number(r)?),
            BinaryOp::Mod => Value::make_number(self.to_number(l)? % self.to_number(r)?),
            BinaryOp::Lt => Value::make_boolean(self.compare(l, r)? == Some(Ordering::Less)),
            BinaryOp::Gt => Value::make_boolean(self.compare(l, r)? == Some(Ordering::Greater)),
            BinaryOp::Le => Value::make_boolean(matches!(
                self.compare(l, r)?,
                Some(Ordering::Less | Ordering::Equal)
            )),
            BinaryOp::Ge => Value::make_boolean(matches!(
                self.compare(l, r)?,
                Some(Ordering::Greater | Ordering::Equal)
            )),
            BinaryOp::Eq => Value::make_boolean(self.loose_equals(l, r)?),
            BinaryOp::Ne => Value::make_boolean(!self.loose_equals(l, r)?),
            BinaryOp::StrictEq => Value::make_boolean(self.strict_equals(l, r)?),
            BinaryOp::StrictNe => Value::make_boolean(!self.strict_equals(l, r)?),
            BinaryOp::And => {
                if l.to_boolean() {
                    r
                } else {
                    l
                }
            }
            BinaryOp::Or => {
                if l.to_boolean() {
                    l
                } else {
                    r
                }
            }
        };
        Ok(v)
    }

    /// `+`: string concatenation when either side is a string or object, else addition.
    fn add(&mut self, l: Value, r: Value) -> EvalResult<Value> {
        if l.is_number() && r.is_number() {
            return Ok(Value::make_number(l.as_number() + r.as_number()));
        }
        if stringish(l) || stringish(r) {
            if l.is_empty_string() && r.is_string() {
                return Ok(r);
            }
            if r.is_empty_string() && l.is_string() {
                return Ok(l);
            }
            let mut s = self.to_string(l)?;
            s.push_str(&self.to_string(r)?);
            return Ok(self.new_string(&s)?);
        }
        Ok(Value::make_number(self.to_number(l)? + self.to_number(r)?))
    }

    /// Relational ordering; `None` when either side is NaN.
    fn compare(&self, l: Value, r: Value) -> Result<Option<Ordering>, FatalError> {
        if stringish(l) && stringish(r) {
            let a = self.to_string(l)?;
            let b = self.to_string(r)?;
            return Ok(Some(a.encode_utf16().cmp(b.encode_utf16())));
        }
        let a = self.to_number(l)?;
        let b = self.to_number(r)?;
        Ok(a.partial_cmp(&b))
    }

    pub(crate) fn strict_equals(&self, l: Value, r: Value) -> Result<bool, FatalError> {
        if l.is_number() && r.is_number() {
            return Ok(l.as_number() == r.as_number());
        }
        if l.is_string() && r.is_string() {
            return Ok(self.str_of(l)? == self.str_of(r)?);
        }
        Ok(l.raw() == r.raw())
    }

    pub(crate) fn loose_equals(&self, l: Value, r: Value) -> Result<bool, FatalError> {
        if l.is_nullish() || r.is_nullish() {
            return Ok(l.is_nullish() && r.is_nullish());
        }
        if same_kind(l, r) {
            return self.strict_equals(l, r);
        }
        if l.is_object_like() || r.is_object_like() {
            if l.is_object_like() && r.is_object_like() {
                return Ok(l.raw() == r.raw());
            }
            // Compare the object's string form against the primitive.
            let (obj, prim) = if l.is_object_like() { (l, r) } else { (r, l) };
            let text = self.to_string(obj)?;
            if prim.is_string() {
                return Ok(self.str_of(prim)? == Some(text.as_str()));
            }
            return Ok(crate::number::string_to_number(&text) == self.to_number(prim)?);
        }
        Ok(self.to_number(l)? == self.to_number(r)?)
    }
}

/// Operand that `+` and relational operators treat as a string.
fn stringish(v: Value) -> bool {
    v.is_string() || v.is_object_like()
}

fn same_kind(l: Value, r: Value) -> bool {
    let kind = |v: Value| match v.type_of() {
        Type::NaN => Type::Number,
        t => t,
    };
    kind(l) == kind(r)
}

/// `typeof v`.
pub(crate) fn type_name(v: Value) -> &'static str {
    match v.type_of() {
        Type::Number | Type::NaN => "number",
        Type::String => "string",
        Type::Boolean => "boolean",
        Type::Undefined => "undefined",
        Type::Function | Type::CFunc => "function",
        _ => "object",
    }
}
