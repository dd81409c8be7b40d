//! Garbage collection for the Interpreter.
//!
//! Collection is synchronous and happens only inside allocation or on an explicit
//! `collect_garbage()` call. Everything reachable from the root set survives; every other
//! cell is reclaimed and its slot generation bumped.

use crate::core::Value;
use crate::interpreter::Interpreter;

impl Interpreter {
    /// Collect all GC roots from the interpreter state.
    fn collect_gc_roots(&self) -> Vec<Value> {
        let mut roots: Vec<Value> =
            Vec::with_capacity(2 + self.frames.len() * 3 + self.roots.len() + self.persistent_roots.len());
        roots.push(self.global);
        roots.push(self.completion);
        for frame in &self.frames {
            roots.push(frame.scope);
            roots.push(frame.this);
            roots.push(frame.callee);
        }
        roots.extend_from_slice(&self.roots);
        roots.extend(self.persistent_roots.iter().flatten());
        roots
    }

    /// Drop weak cache entries whose cells were reclaimed.
    fn cleanup_caches(&mut self) {
        let heap = &self.heap;
        let live = |v: &Value| v.heap_id().is_some_and(|id| heap.is_live(id));
        self.string_literals.retain(|_, v| live(v));
        self.code_refs.retain(|_, (_, v)| live(v));
    }

    /// Run a full mark-sweep collection now.
    pub fn collect_garbage(&mut self) {
        let before = self.heap.used_bytes;
        tracing::debug!(
            used = before,
            capacity = self.heap.capacity(),
            live = self.heap.live_cells,
            "gc start"
        );
        let roots = self.collect_gc_roots();
        self.heap.mark_all(roots);
        let swept = self.heap.sweep();
        self.cleanup_caches();
        tracing::debug!(
            freed_cells = swept.freed_cells,
            freed_bytes = swept.freed_bytes,
            live = self.heap.live_cells,
            used = self.heap.used_bytes,
            "gc finish"
        );
    }
}
