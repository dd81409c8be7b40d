//! Tree-walking evaluator.
//!
//! Executes `Code` units directly from the AST. Every value an expression produces is
//! pushed on the interpreter's temporary root stack; each statement truncates the stack
//! back to where it started, on every exit path.

mod access;
mod call;
mod expr;
mod ops;
mod stmt;

use std::rc::Rc;

use simplejs_ir::{Code, CodeKind};

use crate::config::Flow;
use crate::core::{Cell, FunctionCell, PropList, Value};
use crate::errors::{ErrorKind, EvalResult, FatalError, Unwind};
use crate::interpreter::{Interpreter, heap_id};

/// Lifecycle of a call frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameState {
    Pending,
    Executing,
    Returned,
    Thrown,
    StackOverflow,
}

/// Settled call frames, counted by final state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcomes {
    pub returned: u64,
    pub thrown: u64,
    /// Calls refused at the stack limit; these frames never executed.
    pub overflowed: u64,
}

impl FrameOutcomes {
    pub(crate) fn record(&mut self, state: FrameState) {
        match state {
            FrameState::Returned => self.returned += 1,
            FrameState::Thrown => self.thrown += 1,
            FrameState::StackOverflow => self.overflowed += 1,
            FrameState::Pending | FrameState::Executing => {}
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub scope: Value,
    pub this: Value,
    /// Function being executed; Undefined for a top-level script.
    pub callee: Value,
    pub state: FrameState,
}

impl Interpreter {
    pub(crate) fn scope(&self) -> Value {
        self.frames.last().map_or(self.global, |f| f.scope)
    }

    pub(crate) fn set_scope(&mut self, scope: Value) {
        if let Some(f) = self.frames.last_mut() {
            f.scope = scope;
        }
    }

    pub(crate) fn this_value(&self) -> Value {
        self.frames.last().map_or(Value::UNDEFINED, |f| f.this)
    }

    fn in_script_frame(&self) -> bool {
        self.frames.last().is_some_and(|f| f.callee.is_undefined())
    }

    /// Push `v` on the temporary root stack if it references the heap.
    #[inline]
    pub(crate) fn rooted(&mut self, v: Value) -> Value {
        if v.heap_id().is_some() {
            self.roots.push(v);
        }
        v
    }

    /// Run a script body at top level and produce its completion value.
    pub(crate) fn run_script(&mut self, code: &Rc<Code>) -> EvalResult<Value> {
        let frame_mark = self.frames.len();
        let root_mark = self.roots.len();
        let saved_completion = std::mem::replace(&mut self.completion, Value::UNDEFINED);
        self.roots.push(saved_completion);
        self.frames.push(Frame {
            scope: self.global,
            this: self.global,
            callee: Value::UNDEFINED,
            state: FrameState::Executing,
        });
        tracing::trace!(depth = self.frames.len(), "script start");

        let global = self.global;
        let result = match self.instantiate(code, global) {
            Ok(()) => self.exec_block(&code.body),
            Err(e) => Err(e),
        };

        let completion = std::mem::replace(&mut self.completion, saved_completion);
        self.frames.truncate(frame_mark);
        self.roots.truncate(root_mark);
        match result? {
            Flow::Return(v) => Ok(v),
            _ => Ok(completion),
        }
    }

    /// Hoist `var` names (as Undefined, unless already bound) and function declarations into
    /// `scope`.
    pub(crate) fn instantiate(&mut self, code: &Code, scope: Value) -> EvalResult<()> {
        let scope_id = heap_id(scope)?;
        for name in code.hoisted_vars.iter() {
            if self.find_own(scope_id, name)?.is_none() {
                self.put_own(scope, name, Value::UNDEFINED)?;
            }
        }
        for func in code.hoisted_funcs.iter() {
            let closure = self.make_closure(func)?;
            if let Some(name) = &func.name {
                self.put_own(scope, name, closure)?;
            }
        }
        Ok(())
    }

    /// Function value for `code` closing over the current scope.
    pub(crate) fn make_closure(&mut self, code: &Rc<Code>) -> Result<Value, FatalError> {
        let mark = self.roots.len();
        let callee = self.code_ref(code)?;
        self.roots.push(callee);
        let this = if code.kind == CodeKind::Arrow {
            self.this_value()
        } else {
            Value::UNDEFINED
        };
        let scope = self.scope();
        let func = self.alloc(Cell::Function(FunctionCell {
            callee,
            scope,
            this,
            props: PropList::default(),
        }));
        self.roots.truncate(mark);
        func
    }

    /// Language-level error ready to be thrown.
    pub(crate) fn throw_error(&mut self, kind: ErrorKind, message: impl AsRef<str>) -> Unwind {
        match self.create_error_with_kind(kind, message.as_ref()) {
            Ok(v) => Unwind::Throw(v),
            Err(e) => Unwind::Fatal(e),
        }
    }

    /// Host view of an evaluation result: uncaught throws become Error values.
    pub(crate) fn settle(&mut self, result: EvalResult<Value>) -> Result<Value, FatalError> {
        match result {
            Ok(v) => Ok(v),
            Err(Unwind::Fatal(e)) => Err(e),
            Err(Unwind::Throw(v)) if v.is_error() => Ok(v),
            Err(Unwind::Throw(v)) => {
                let mark = self.roots.len();
                self.roots.push(v);
                let wrapped = self
                    .to_string(v)
                    .and_then(|msg| self.create_error(&msg));
                self.roots.truncate(mark);
                wrapped
            }
        }
    }
}
