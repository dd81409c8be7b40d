use crate::core::{Type, Value};
use crate::errors::{ErrorKind, EvalResult};
use crate::interpreter::Interpreter;

impl Interpreter {
    /// `obj[key]` inside the language.
    pub(crate) fn get_member(&mut self, obj: Value, key: &str) -> EvalResult<Value> {
        match obj.type_of() {
            Type::Undefined | Type::Null => {
                let what = if obj.is_null() { "null" } else { "undefined" };
                Err(self.throw_error(
                    ErrorKind::TypeError,
                    format!("Cannot read properties of {what} (reading '{key}')"),
                ))
            }
            Type::String => self.string_member(obj, key),
            Type::Object => Ok(self.get_own_or_inherited(obj, key)?.unwrap_or_default()),
            Type::Function => {
                if let Some(v) = self.get_own_or_inherited(obj, key)? {
                    return Ok(v);
                }
                match key {
                    "prototype" => Ok(self.function_prototype(obj)?),
                    "name" => {
                        let name = self.function_name(obj)?;
                        Ok(self.new_string(&name)?)
                    }
                    _ => Ok(Value::UNDEFINED),
                }
            }
            Type::Error => {
                if let Some(v) = self.get_own_or_inherited(obj, key)? {
                    return Ok(v);
                }
                match key {
                    "name" => {
                        let kind = self.error_kind(obj)?;
                        Ok(self.intern(kind.name())?)
                    }
                    "message" => {
                        let message = self.error_message(obj)?;
                        Ok(self.new_string(&message)?)
                    }
                    _ => Ok(Value::UNDEFINED),
                }
            }
            _ => Ok(Value::UNDEFINED),
        }
    }

    fn string_member(&mut self, s: Value, key: &str) -> EvalResult<Value> {
        let text = self.str_of(s)?.unwrap_or_default();
        if key == "length" {
            return Ok(Value::make_number(text.encode_utf16().count() as f64));
        }
        let Ok(index) = key.parse::<usize>() else {
            return Ok(Value::UNDEFINED);
        };
        // Indices address UTF-16 code units, like `length`. Half of a surrogate pair has no
        // UTF-8 spelling and reads as U+FFFD.
        match text.encode_utf16().nth(index) {
            Some(unit) => Ok(self.new_string(&String::from_utf16_lossy(&[unit]))?),
            None => Ok(Value::UNDEFINED),
        }
    }

    /// `obj[key] = value` inside the language. Writes to primitives are ignored.
    pub(crate) fn set_member(&mut self, obj: Value, key: &str, value: Value) -> EvalResult<()> {
        if obj.is_nullish() {
            let what = if obj.is_null() { "null" } else { "undefined" };
            return Err(self.throw_error(
                ErrorKind::TypeError,
                format!("Cannot set properties of {what} (setting '{key}')"),
            ));
        }
        if obj.is_object_like() {
            self.put_own(obj, key, value)?;
        }
        Ok(())
    }

    /// Property key for a computed member access.
    pub(crate) fn property_key(&self, key: Value) -> EvalResult<String> {
        Ok(self.to_string(key)?)
    }

    /// Value bound to `name` in the current scope chain.
    pub(crate) fn resolve_ident(&mut self, name: &str) -> EvalResult<Value> {
        match self.lookup(self.scope(), name)? {
            Some(prop) => Ok(self.heap.property(prop)?.value),
            None => Err(self.throw_error(ErrorKind::ReferenceError, format!("{name} is not defined"))),
        }
    }

    /// Whether `name` is bound anywhere in the current scope chain.
    pub(crate) fn is_bound(&self, name: &str) -> EvalResult<bool> {
        Ok(self.lookup(self.scope(), name)?.is_some())
    }

    /// Assign to the nearest binding of `name`; an unbound name becomes a global.
    pub(crate) fn assign_ident(&mut self, name: &str, value: Value) -> EvalResult<()> {
        match self.lookup(self.scope(), name)? {
            Some(prop) => self.heap.property_mut(prop)?.value = value,
            None => {
                let global = self.global;
                self.put_own(global, name, value)?;
            }
        }
        Ok(())
    }
}
