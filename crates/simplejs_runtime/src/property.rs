//! Property and prototype resolution.
//!
//! Own properties are a linked chain of Property cells hanging off an Object, Function or
//! Error cell. Reads walk the own chain and then the prototype links; writes only ever
//! touch the own chain. Scope objects use the same representation with the enclosing scope
//! as prototype, so identifier resolution goes through here too.

use crate::core::{Cell, HeapId, PropertyCell, Value};
use crate::errors::{FatalError, messages};
use crate::interpreter::{Interpreter, heap_id};

/// Resolution gives up after this many prototype hops.
pub const MAX_PROTOTYPE_CHAIN: usize = 10_000;

impl Interpreter {
    /// Own Property cell of `holder` named `key`.
    pub(crate) fn find_own(&self, holder: HeapId, key: &str) -> Result<Option<HeapId>, FatalError> {
        let mut cur = self.heap.props(holder)?.head;
        while let Some(id) = cur {
            let p = self.heap.property(id)?;
            if &*p.key == key {
                return Ok(Some(id));
            }
            cur = p.next;
        }
        Ok(None)
    }

    /// Prototype link of an object-like value; Null for functions and errors.
    pub(crate) fn proto_of(&self, holder: HeapId) -> Result<Value, FatalError> {
        match self.heap.get(holder)? {
            Cell::Object(o) => Ok(o.proto),
            _ => Ok(Value::NULL),
        }
    }

    /// Property cell for `key` along the prototype chain of `holder`.
    pub(crate) fn lookup(&self, holder: Value, key: &str) -> Result<Option<HeapId>, FatalError> {
        let mut cur = holder;
        for _ in 0..MAX_PROTOTYPE_CHAIN {
            if !cur.is_object_like() {
                return Ok(None);
            }
            let id = heap_id(cur)?;
            if let Some(prop) = self.find_own(id, key)? {
                return Ok(Some(prop));
            }
            cur = self.proto_of(id)?;
        }
        tracing::debug!(key, "prototype chain too long");
        Ok(None)
    }

    pub(crate) fn get_own_or_inherited(&self, holder: Value, key: &str) -> Result<Option<Value>, FatalError> {
        match self.lookup(holder, key)? {
            Some(prop) => Ok(Some(self.heap.property(prop)?.value)),
            None => Ok(None),
        }
    }

    /// Write `key` on `holder`'s own chain: overwrite in place, else append at the tail.
    pub(crate) fn put_own(&mut self, holder: Value, key: &str, value: Value) -> Result<(), FatalError> {
        let id = heap_id(holder)?;
        if let Some(prop) = self.find_own(id, key)? {
            self.heap.property_mut(prop)?.value = value;
            return Ok(());
        }

        let mark = self.roots.len();
        self.roots.push(holder);
        self.roots.push(value);
        let cell = self.alloc(Cell::Property(PropertyCell {
            key: key.into(),
            value,
            next: None,
        }));
        self.roots.truncate(mark);
        let new_id = heap_id(cell?)?;

        let props = self.heap.props_mut(id)?;
        let old_tail = props.tail.replace(new_id);
        if props.head.is_none() {
            props.head = Some(new_id);
        }
        props.len += 1;
        if let Some(tail) = old_tail {
            self.heap.property_mut(tail)?.next = Some(new_id);
        }
        Ok(())
    }

    /// Reject a prototype link from `obj` to `proto` that would close a cycle.
    pub(crate) fn check_prototype_link(&self, obj: Value, proto: Value) -> Result<(), FatalError> {
        let mut cur = proto;
        for _ in 0..MAX_PROTOTYPE_CHAIN {
            if !cur.is_object() {
                return Ok(());
            }
            if cur == obj {
                return Err(FatalError::contract(messages::PROTOTYPE_CYCLE));
            }
            cur = self.proto_of(heap_id(cur)?)?;
        }
        Err(FatalError::contract(messages::PROTOTYPE_CHAIN_TOO_LONG))
    }

    /// Own keys in insertion order.
    pub fn own_keys(&self, obj: Value) -> Result<Vec<String>, FatalError> {
        if !obj.is_object_like() {
            return Err(FatalError::contract(messages::NOT_AN_OBJECT));
        }
        let mut keys = Vec::new();
        let mut cur = self.heap.props(heap_id(obj)?)?.head;
        while let Some(id) = cur {
            let p = self.heap.property(id)?;
            keys.push(p.key.to_string());
            cur = p.next;
        }
        Ok(keys)
    }
}
