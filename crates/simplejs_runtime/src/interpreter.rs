//! The interpreter instance and its host API.

use std::rc::Rc;

use simplejs_driver::Driver;
use simplejs_ir::{Code, Frontend, Program};
use simplejs_syntax::SourceText;

use crate::config::InterpreterConfig;
use crate::core::{
    Cell, ErrorCell, FastHashMap, FunctionCell, Heap, HeapId, ObjectCell, PropList, PropertyCell,
    Type, Value, fast_map_new,
};
use crate::errors::{ErrorKind, FatalError, NativeError, messages};
use crate::eval::{Frame, FrameOutcomes};
use crate::number::{number_to_string, string_to_number};

/// Host callback. Receives the interpreter (for re-entrant calls and allocation) and the
/// call arguments, which stay rooted for the duration of the call.
pub type NativeFn = Rc<dyn Fn(&mut Interpreter, &[Value]) -> Result<Value, NativeError>>;

pub(crate) struct Native {
    pub name: Box<str>,
    pub func: NativeFn,
}

/// Handle to a host-registered persistent root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RootId(u32);

/// An embeddable SimpleJS engine: one heap, one call stack, one global object.
pub struct Interpreter {
    pub(crate) heap: Heap,
    pub(crate) config: InterpreterConfig,
    pub(crate) global: Value,
    pub(crate) frames: Vec<Frame>,
    pub(crate) frame_outcomes: FrameOutcomes,
    /// Temporary roots: operands, arguments and pending completions.
    pub(crate) roots: Vec<Value>,
    pub(crate) persistent_roots: Vec<Option<Value>>,
    free_root_ids: Vec<u32>,
    pub(crate) natives: Vec<Native>,
    /// Interned string literals. Weak: pruned after each collection.
    pub(crate) string_literals: FastHashMap<Box<str>, Value>,
    /// CodeRef cell per function definition, keyed by the definition's address. Weak.
    pub(crate) code_refs: FastHashMap<usize, (Rc<Code>, Value)>,
    /// Value of the last expression statement of the running script.
    pub(crate) completion: Value,
    frontend: Box<dyn Frontend>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::with_config(InterpreterConfig::default())
    }
}

impl Interpreter {
    pub fn new(heap_size: usize) -> Self {
        Self::with_config(InterpreterConfig::with_heap_size(heap_size))
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        let mut interp = Self {
            heap: Heap::new(config.heap_size),
            config,
            global: Value::UNDEFINED,
            frames: Vec::with_capacity(16),
            frame_outcomes: FrameOutcomes::default(),
            roots: Vec::with_capacity(64),
            persistent_roots: Vec::new(),
            free_root_ids: Vec::new(),
            natives: Vec::new(),
            string_literals: fast_map_new(),
            code_refs: fast_map_new(),
            completion: Value::UNDEFINED,
            frontend: Box::new(Driver::new()),
        };
        interp.install_globals();
        interp
    }

    /// Global object and its bindings. These cells are charged on top of the configured
    /// capacity, so the whole budget stays available to scripts and host values.
    fn install_globals(&mut self) {
        let global_id = self.heap.alloc_reserved(Cell::Object(ObjectCell {
            props: PropList::default(),
            proto: Value::NULL,
        }));
        let global = Value::from_heap(Type::Object, global_id);
        self.global = global;

        let mut bindings: Vec<(&'static str, Value)> = vec![
            ("globalThis", global),
            ("undefined", Value::UNDEFINED),
            ("NaN", Value::NAN),
            ("Infinity", Value::make_number(f64::INFINITY)),
        ];
        for kind in ErrorKind::ALL {
            let index = self.natives.len() as u32;
            self.natives.push(Native {
                name: kind.name().into(),
                func: Rc::new(move |interp: &mut Interpreter, args: &[Value]| {
                    interp.construct_error(kind, args)
                }),
            });
            let id = self.heap.alloc_reserved(Cell::Function(native_cell(index)));
            bindings.push((kind.name(), Value::from_heap(Type::Function, id)));
        }

        // Built back to front so every cell is created with its link.
        let mut next = None;
        let mut tail = None;
        for (key, value) in bindings.iter().rev() {
            let id = self.heap.alloc_reserved(Cell::Property(PropertyCell {
                key: (*key).into(),
                value: *value,
                next,
            }));
            tail = tail.or(Some(id));
            next = Some(id);
        }
        if let Ok(props) = self.heap.props_mut(global_id) {
            *props = PropList {
                head: next,
                tail,
                len: bindings.len() as u32,
            };
        }
    }

    fn construct_error(&mut self, kind: ErrorKind, args: &[Value]) -> Result<Value, NativeError> {
        let message = match args.first() {
            Some(v) if !v.is_undefined() => self.to_string(*v)?,
            _ => String::new(),
        };
        Ok(self.create_error_with_kind(kind, &message)?)
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Maximum number of nested call frames.
    pub fn set_max_stack_size(&mut self, frames: usize) {
        self.config.max_stack_size = frames;
    }

    /// Heap occupancy (percent) at which allocation collects first. Must be in `1..=100`.
    pub fn set_gc_trigger(&mut self, percent: u8) -> Result<(), FatalError> {
        if !(1..=100).contains(&percent) {
            return Err(FatalError::contract(messages::GC_TRIGGER_RANGE));
        }
        self.config.gc_trigger_percent = percent;
        Ok(())
    }

    pub fn set_frontend(&mut self, frontend: Box<dyn Frontend>) {
        self.frontend = frontend;
    }

    pub fn global_object(&self) -> Value {
        self.global
    }

    /// Number of active call frames.
    pub fn call_depth(&self) -> usize {
        self.frames.len()
    }

    /// Evaluate a script at top level. Uncaught throws come back as Error values; only fatal
    /// conditions are returned as `Err`.
    pub fn eval(&mut self, source: &str) -> Result<Value, FatalError> {
        self.eval_named("<eval>", source)
    }

    pub fn eval_named(&mut self, name: &str, source: &str) -> Result<Value, FatalError> {
        let unit = match self.frontend.compile_text(name, source) {
            Ok(unit) => unit,
            Err(msg) => return self.create_error_with_kind(ErrorKind::SyntaxError, &msg),
        };
        if let Some(diag) = unit.diagnostics.iter().find(|d| d.is_error()) {
            let message = match diag.span {
                Some(span) => {
                    let (line, col) = SourceText::new(unit.text.clone()).line_col(span.start.0);
                    format!("{} ({}:{})", diag.message, line + 1, col + 1)
                }
                None => diag.message.clone(),
            };
            return self.create_error_with_kind(ErrorKind::SyntaxError, &message);
        }
        self.eval_program(&unit.program)
    }

    /// Run an already parsed program. Reporting its diagnostics is up to the caller.
    pub fn eval_program(&mut self, program: &Program) -> Result<Value, FatalError> {
        let code = program.code.clone();
        let result = self.run_script(&code);
        self.settle(result)
    }

    /// Call `func` with `this` and `args`. Throws come back as Error values.
    pub fn call(&mut self, func: Value, this: Value, args: &[Value]) -> Result<Value, FatalError> {
        let mark = self.roots.len();
        self.roots.push(func);
        self.roots.push(this);
        self.roots.extend_from_slice(args);
        let result = self.call_value(func, this, args, None);
        self.roots.truncate(mark);
        self.settle(result)
    }

    pub fn create_string(&mut self, s: &str) -> Result<Value, FatalError> {
        self.new_string(s)
    }

    /// A fresh object with no properties and a Null prototype.
    pub fn create_object(&mut self) -> Result<Value, FatalError> {
        self.new_object(Value::NULL)
    }

    pub fn create_function<F>(&mut self, f: F) -> Result<Value, FatalError>
    where
        F: Fn(&mut Interpreter, &[Value]) -> Result<Value, NativeError> + 'static,
    {
        self.create_named_function("anonymous", f)
    }

    pub fn create_named_function<F>(&mut self, name: &str, f: F) -> Result<Value, FatalError>
    where
        F: Fn(&mut Interpreter, &[Value]) -> Result<Value, NativeError> + 'static,
    {
        let index = self.natives.len() as u32;
        self.natives.push(Native {
            name: name.into(),
            func: Rc::new(f),
        });
        self.alloc(Cell::Function(native_cell(index)))
    }

    /// Create a native function and bind it on the global object.
    pub fn register_function<F>(&mut self, name: &str, f: F) -> Result<Value, FatalError>
    where
        F: Fn(&mut Interpreter, &[Value]) -> Result<Value, NativeError> + 'static,
    {
        let func = self.create_named_function(name, f)?;
        self.put_own(self.global, name, func)?;
        Ok(func)
    }

    pub fn create_error(&mut self, message: &str) -> Result<Value, FatalError> {
        self.create_error_with_kind(ErrorKind::Error, message)
    }

    pub fn create_error_with_kind(
        &mut self,
        kind: ErrorKind,
        message: &str,
    ) -> Result<Value, FatalError> {
        self.alloc(Cell::Error(ErrorCell {
            kind,
            message: message.into(),
            props: PropList::default(),
        }))
    }

    pub fn get_property(&self, obj: Value, key: &str) -> Result<Value, FatalError> {
        expect_object(obj)?;
        match self.lookup(obj, key)? {
            Some(prop) => Ok(self.heap.property(prop)?.value),
            None => Ok(Value::UNDEFINED),
        }
    }

    pub fn set_property(&mut self, obj: Value, key: &str, value: Value) -> Result<(), FatalError> {
        expect_object(obj)?;
        self.put_own(obj, key, value)
    }

    pub fn get_prototype(&self, obj: Value) -> Result<Value, FatalError> {
        let id = expect_object(obj)?;
        Ok(self.heap.object(id)?.proto)
    }

    /// Link `obj` to `proto` (an Object or Null). Cycles are rejected.
    pub fn set_prototype(&mut self, obj: Value, proto: Value) -> Result<(), FatalError> {
        let id = expect_object(obj)?;
        if !proto.is_null() && !proto.is_object() {
            return Err(FatalError::contract(messages::BAD_PROTOTYPE));
        }
        self.check_prototype_link(obj, proto)?;
        self.heap.object_mut(id)?.proto = proto;
        Ok(())
    }

    /// String form of any value, as `String(v)` would produce.
    pub fn to_string(&self, v: Value) -> Result<String, FatalError> {
        match v.type_of() {
            Type::Number | Type::NaN => Ok(number_to_string(v.as_number())),
            Type::String => Ok(self.str_of(v)?.unwrap_or_default().to_string()),
            Type::Undefined => Ok("undefined".to_string()),
            Type::Null => Ok("null".to_string()),
            Type::Boolean => Ok(v.to_boolean().to_string()),
            Type::Object => Ok("[object Object]".to_string()),
            Type::Function => {
                let body = if self.heap.function(heap_id(v)?)?.callee.is_native() {
                    "[native code]"
                } else {
                    "[code]"
                };
                Ok(format!("function {}() {{ {body} }}", self.function_name(v)?))
            }
            Type::CFunc => Ok("function () { [native code] }".to_string()),
            Type::Error => {
                let e = self.heap.error(heap_id(v)?)?;
                if e.message.is_empty() {
                    Ok(e.kind.name().to_string())
                } else {
                    Ok(format!("{}: {}", e.kind.name(), e.message))
                }
            }
            Type::CodeRef => Ok("[code]".to_string()),
            Type::Prop => Ok("[property]".to_string()),
        }
    }

    /// `Number(v)`: strings are parsed, everything else follows `Value::to_number`.
    pub fn to_number(&self, v: Value) -> Result<f64, FatalError> {
        match self.str_of(v)? {
            Some(s) => Ok(string_to_number(s)),
            None => Ok(v.to_number()),
        }
    }

    pub fn string_value(&self, v: Value) -> Result<String, FatalError> {
        self.str_of(v)?
            .map(str::to_string)
            .ok_or_else(|| FatalError::contract(messages::NOT_A_STRING))
    }

    pub fn error_message(&self, v: Value) -> Result<String, FatalError> {
        Ok(self.error_cell(v)?.message.to_string())
    }

    pub fn error_kind(&self, v: Value) -> Result<ErrorKind, FatalError> {
        Ok(self.error_cell(v)?.kind)
    }

    /// Keep `v` alive across collections until `remove_root`.
    pub fn add_root(&mut self, v: Value) -> RootId {
        match self.free_root_ids.pop() {
            Some(i) => {
                self.persistent_roots[i as usize] = Some(v);
                RootId(i)
            }
            None => {
                self.persistent_roots.push(Some(v));
                RootId(self.persistent_roots.len() as u32 - 1)
            }
        }
    }

    pub fn remove_root(&mut self, id: RootId) -> Result<(), FatalError> {
        match self.persistent_roots.get_mut(id.0 as usize) {
            Some(slot @ Some(_)) => {
                *slot = None;
                self.free_root_ids.push(id.0);
                Ok(())
            }
            _ => Err(FatalError::contract(messages::UNKNOWN_ROOT)),
        }
    }

    /// Whether `v` is usable: inline values always are, heap values until reclaimed.
    pub fn is_live(&self, v: Value) -> bool {
        v.heap_id().is_none_or(|id| self.heap.is_live(id))
    }

    // ---- internal helpers ----

    /// Allocate a cell, collecting once first when the heap is over its trigger or the
    /// request would not fit.
    pub(crate) fn alloc(&mut self, cell: Cell) -> Result<Value, FatalError> {
        let ty = cell.kind();
        let size = cell.size();
        if self.heap.should_gc(size, self.config.gc_trigger_percent) {
            self.collect_garbage();
        }
        match self.heap.alloc(cell) {
            Ok(id) => Ok(Value::from_heap(ty, id)),
            Err(e) => {
                tracing::warn!(
                    requested = size,
                    used = self.heap.used_bytes,
                    capacity = self.heap.capacity(),
                    "heap exhausted"
                );
                Err(e)
            }
        }
    }

    pub(crate) fn new_object(&mut self, proto: Value) -> Result<Value, FatalError> {
        let mark = self.roots.len();
        self.roots.push(proto);
        let obj = self.alloc(Cell::Object(ObjectCell {
            props: PropList::default(),
            proto,
        }));
        self.roots.truncate(mark);
        obj
    }

    pub(crate) fn new_string(&mut self, s: &str) -> Result<Value, FatalError> {
        if s.is_empty() {
            return Ok(Value::EMPTY_STRING);
        }
        self.alloc(Cell::String(s.into()))
    }

    /// String for a source literal, shared while it stays reachable.
    pub(crate) fn intern(&mut self, s: &str) -> Result<Value, FatalError> {
        if let Some(v) = self.string_literals.get(s) {
            if self.is_live(*v) {
                return Ok(*v);
            }
        }
        let v = self.new_string(s)?;
        if !v.is_empty_string() {
            self.string_literals.insert(s.into(), v);
        }
        Ok(v)
    }

    /// CodeRef cell for a function definition; all closures of it share one cell.
    pub(crate) fn code_ref(&mut self, code: &Rc<Code>) -> Result<Value, FatalError> {
        let key = Rc::as_ptr(code) as usize;
        if let Some((_, v)) = self.code_refs.get(&key) {
            if self.is_live(*v) {
                return Ok(*v);
            }
        }
        let v = self.alloc(Cell::CodeRef(code.clone()))?;
        self.code_refs.insert(key, (code.clone(), v));
        Ok(v)
    }

    /// Contents of a String value; `None` for other kinds.
    pub(crate) fn str_of(&self, v: Value) -> Result<Option<&str>, FatalError> {
        if v.is_empty_string() {
            return Ok(Some(""));
        }
        if !v.is_string() {
            return Ok(None);
        }
        Ok(Some(self.heap.string(heap_id(v)?)?))
    }

    fn error_cell(&self, v: Value) -> Result<&ErrorCell, FatalError> {
        if !v.is_error() {
            return Err(FatalError::contract(messages::NOT_AN_ERROR));
        }
        self.heap.error(heap_id(v)?)
    }

    pub(crate) fn function_name(&self, func: Value) -> Result<String, FatalError> {
        let f = self.heap.function(heap_id(func)?)?;
        if let Some(index) = f.callee.native_index() {
            return Ok(self.native(index)?.name.to_string());
        }
        Ok(self
            .heap
            .code(heap_id(f.callee)?)?
            .display_name()
            .to_string())
    }

    pub(crate) fn native(&self, index: u32) -> Result<&Native, FatalError> {
        self.natives
            .get(index as usize)
            .ok_or_else(|| FatalError::contract(messages::UNKNOWN_NATIVE))
    }
}

fn native_cell(index: u32) -> FunctionCell {
    FunctionCell {
        callee: Value::native(index),
        scope: Value::UNDEFINED,
        this: Value::UNDEFINED,
        props: PropList::default(),
    }
}

pub(crate) fn heap_id(v: Value) -> Result<HeapId, FatalError> {
    v.heap_id()
        .ok_or_else(|| FatalError::contract(messages::WRONG_CELL_KIND))
}

fn expect_object(v: Value) -> Result<HeapId, FatalError> {
    if !v.is_object() {
        return Err(FatalError::contract(messages::NOT_AN_OBJECT));
    }
    heap_id(v)
}
