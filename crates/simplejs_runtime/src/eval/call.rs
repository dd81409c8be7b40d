use simplejs_ir::{Code, CodeKind};

use super::{Frame, FrameState};
use crate::config::Flow;
use crate::core::Value;
use crate::errors::{ErrorKind, EvalResult, FatalError, Unwind, messages};
use crate::interpreter::{Interpreter, heap_id};

impl Interpreter {
    /// Call a function value. `func`, `this` and `args` must already be rooted.
    pub(crate) fn call_value(
        &mut self,
        func: Value,
        this: Value,
        args: &[Value],
        name: Option<&str>,
    ) -> EvalResult<Value> {
        if !func.is_function() {
            let what = match name {
                Some(n) => n.to_string(),
                None => self.to_string(func)?,
            };
            return Err(self.throw_error(ErrorKind::TypeError, format!("{what} is not a function")));
        }
        let f = self.heap.function(heap_id(func)?)?;
        let (callee, closure_scope, bound_this) = (f.callee, f.scope, f.this);

        let mut frame = Frame {
            scope: Value::UNDEFINED,
            this,
            callee: func,
            state: FrameState::Pending,
        };
        if self.frames.len() >= self.config.max_stack_size {
            frame.state = FrameState::StackOverflow;
            self.frame_outcomes.record(frame.state);
            tracing::trace!(depth = self.frames.len(), state = ?frame.state, "call rejected");
            return Err(self.throw_error(ErrorKind::RangeError, messages::STACK_OVERFLOW));
        }

        if let Some(index) = callee.native_index() {
            let native = self.native(index)?.func.clone();
            frame.scope = self.global;
            self.push_frame(frame);
            let mark = self.roots.len();
            let result = native(self, args);
            self.roots.truncate(mark);
            self.pop_frame(result.is_ok());
            return result.map_err(Unwind::from);
        }

        let code = self.heap.code(heap_id(callee)?)?.clone();
        if code.kind == CodeKind::Arrow {
            frame.this = bound_this;
        }
        self.push_frame(frame);
        let result = self.enter_function(&code, closure_scope, args);
        self.pop_frame(result.is_ok());
        result
    }

    fn push_frame(&mut self, mut frame: Frame) {
        frame.state = FrameState::Executing;
        self.frames.push(frame);
        tracing::trace!(depth = self.frames.len(), state = ?frame.state, "frame enter");
    }

    fn pop_frame(&mut self, ok: bool) {
        if let Some(mut frame) = self.frames.pop() {
            frame.state = if ok {
                FrameState::Returned
            } else {
                FrameState::Thrown
            };
            self.frame_outcomes.record(frame.state);
            tracing::trace!(depth = self.frames.len(), state = ?frame.state, "frame exit");
        }
    }

    /// Bind parameters and hoisted names in a fresh scope, then run the body.
    fn enter_function(&mut self, code: &Code, closure_scope: Value, args: &[Value]) -> EvalResult<Value> {
        let scope = self.new_object(closure_scope)?;
        self.set_scope(scope);
        for (i, param) in code.params.iter().enumerate() {
            let arg = args.get(i).copied().unwrap_or_default();
            self.put_own(scope, param, arg)?;
        }
        self.instantiate(code, scope)?;
        match self.exec_block(&code.body)? {
            Flow::Return(v) => Ok(v),
            _ => Ok(Value::UNDEFINED),
        }
    }

    /// `new func(args)`. `func` and `args` must already be rooted.
    pub(crate) fn construct(&mut self, func: Value, args: &[Value], name: &str) -> EvalResult<Value> {
        if !self.is_constructor(func)? {
            return Err(self.throw_error(ErrorKind::TypeError, format!("{name} is not a constructor")));
        }
        let proto = self.function_prototype(func)?;
        let proto = if proto.is_object() { proto } else { Value::NULL };
        let obj = self.new_object(proto)?;
        self.roots.push(obj);
        let result = self.call_value(func, obj, args, Some(name))?;
        Ok(if result.is_object_like() { result } else { obj })
    }

    fn is_constructor(&self, func: Value) -> Result<bool, FatalError> {
        if !func.is_function() {
            return Ok(false);
        }
        let callee = self.heap.function(heap_id(func)?)?.callee;
        if callee.native_index().is_some() {
            return Ok(true);
        }
        Ok(self.heap.code(heap_id(callee)?)?.kind != CodeKind::Arrow)
    }

    /// `F.prototype`, created on first use for interpreted functions.
    pub(crate) fn function_prototype(&mut self, func: Value) -> Result<Value, FatalError> {
        let id = heap_id(func)?;
        if let Some(prop) = self.find_own(id, "prototype")? {
            return Ok(self.heap.property(prop)?.value);
        }
        let callee = self.heap.function(id)?.callee;
        if callee.native_index().is_some()
            || self.heap.code(heap_id(callee)?)?.kind == CodeKind::Arrow
        {
            return Ok(Value::UNDEFINED);
        }
        let mark = self.roots.len();
        self.roots.push(func);
        let result = self.materialize_prototype(func);
        self.roots.truncate(mark);
        result
    }

    fn materialize_prototype(&mut self, func: Value) -> Result<Value, FatalError> {
        let proto = self.new_object(Value::NULL)?;
        self.roots.push(proto);
        self.put_own(proto, "constructor", func)?;
        self.put_own(func, "prototype", proto)?;
        Ok(proto)
    }
}
