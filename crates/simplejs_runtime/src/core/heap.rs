//! Fixed-capacity heap arena.
//!
//! Cells live in a slot table addressed by generation-checked [`HeapId`]s. The arena has a
//! byte budget fixed at construction; every cell is charged an accounted size and the
//! budget never grows once the interpreter's bootstrap cells are placed. Reclaimed slots bump
//! their generation so old handles are reported as stale instead of being reinterpreted; a slot
//! whose generation is exhausted is retired rather than wrapped.

use std::rc::Rc;

use simplejs_ir::Code;

use super::value::{GENERATION_MASK, HeapId, INDEX_MASK, Type, Value};
use crate::errors::{ErrorKind, FatalError, messages};

const HEADER_BYTES: usize = 8;
const WORD: usize = 8;
/// Smallest accounted cell; bounds the slot table size for a given capacity.
pub(crate) const MIN_CELL_BYTES: usize = 16;
/// Slot indices must stay below the empty-string payload.
const MAX_SLOTS: usize = INDEX_MASK as usize;

fn align8(n: usize) -> usize {
    (n + WORD - 1) & !(WORD - 1)
}

/// Singly linked chain of Property cells, in insertion order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PropList {
    pub head: Option<HeapId>,
    pub tail: Option<HeapId>,
    pub len: u32,
}

#[derive(Debug)]
pub(crate) struct ObjectCell {
    pub props: PropList,
    /// Object or Null.
    pub proto: Value,
}

#[derive(Debug)]
pub(crate) struct PropertyCell {
    pub key: Box<str>,
    pub value: Value,
    pub next: Option<HeapId>,
}

#[derive(Debug)]
pub(crate) struct FunctionCell {
    /// CodeRef handle for interpreted functions, CFunc id for natives.
    pub callee: Value,
    /// Captured scope object (Undefined for natives).
    pub scope: Value,
    /// Bound `this` of arrow functions.
    pub this: Value,
    pub props: PropList,
}

#[derive(Debug)]
pub(crate) struct ErrorCell {
    pub kind: ErrorKind,
    pub message: Box<str>,
    pub props: PropList,
}

#[derive(Debug)]
pub(crate) enum Cell {
    Object(ObjectCell),
    Property(PropertyCell),
    String(Box<str>),
    Function(FunctionCell),
    CodeRef(Rc<Code>),
    Error(ErrorCell),
}

impl Cell {
    pub fn kind(&self) -> Type {
        match self {
            Cell::Object(_) => Type::Object,
            Cell::Property(_) => Type::Prop,
            Cell::String(_) => Type::String,
            Cell::Function(_) => Type::Function,
            Cell::CodeRef(_) => Type::CodeRef,
            Cell::Error(_) => Type::Error,
        }
    }

    /// Accounted size in bytes: header plus inline payload, 8-byte aligned.
    pub fn size(&self) -> usize {
        HEADER_BYTES
            + match self {
                Cell::Object(_) => 2 * WORD,
                Cell::Property(p) => 2 * WORD + align8(p.key.len()),
                Cell::String(s) => align8(s.len().max(1)),
                Cell::Function(_) => 4 * WORD,
                Cell::CodeRef(_) => WORD,
                Cell::Error(e) => 2 * WORD + align8(e.message.len()),
            }
    }

    pub fn props(&self) -> Option<&PropList> {
        match self {
            Cell::Object(o) => Some(&o.props),
            Cell::Function(f) => Some(&f.props),
            Cell::Error(e) => Some(&e.props),
            _ => None,
        }
    }

    pub fn props_mut(&mut self) -> Option<&mut PropList> {
        match self {
            Cell::Object(o) => Some(&mut o.props),
            Cell::Function(f) => Some(&mut f.props),
            Cell::Error(e) => Some(&mut e.props),
            _ => None,
        }
    }

    fn trace(&self, pending: &mut Vec<HeapId>) {
        match self {
            Cell::Object(o) => {
                pending.extend(o.proto.heap_id());
                pending.extend(o.props.head);
            }
            Cell::Property(p) => {
                pending.extend(p.value.heap_id());
                pending.extend(p.next);
            }
            Cell::Function(f) => {
                pending.extend(f.callee.heap_id());
                pending.extend(f.scope.heap_id());
                pending.extend(f.this.heap_id());
                pending.extend(f.props.head);
            }
            Cell::Error(e) => pending.extend(e.props.head),
            Cell::String(_) | Cell::CodeRef(_) => {}
        }
    }
}

struct Slot {
    generation: u32,
    cell: Option<Cell>,
}

/// Outcome of one sweep.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SweepStats {
    pub freed_cells: usize,
    pub freed_bytes: usize,
}

pub(crate) struct Heap {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    marks: Vec<u64>,
    capacity: usize,
    pub(crate) used_bytes: usize,
    pub(crate) live_cells: usize,
    pub(crate) peak_bytes: usize,
    pub(crate) collections: u64,
    pub(crate) freed_total: u64,
}

impl Heap {
    pub fn new(capacity: usize) -> Self {
        let max_slots = capacity / MIN_CELL_BYTES;
        Self {
            slots: Vec::with_capacity(max_slots),
            free_list: Vec::new(),
            marks: Vec::with_capacity(max_slots.div_ceil(64)),
            capacity,
            used_bytes: 0,
            live_cells: 0,
            peak_bytes: 0,
            collections: 0,
            freed_total: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn fits(&self, size: usize) -> bool {
        self.used_bytes + size <= self.capacity
    }

    /// Whether an allocation of `size` bytes should collect first.
    #[inline]
    pub fn should_gc(&self, size: usize, trigger_percent: u8) -> bool {
        let threshold = self.capacity * trigger_percent as usize / 100;
        self.used_bytes >= threshold || !self.fits(size)
    }

    /// Store a cell. The caller is responsible for collecting beforehand.
    pub fn alloc(&mut self, cell: Cell) -> Result<HeapId, FatalError> {
        let size = cell.size();
        if !self.fits(size) || (self.free_list.is_empty() && self.slots.len() >= MAX_SLOTS) {
            return Err(FatalError::OutOfMemory {
                requested: size,
                used: self.used_bytes,
                capacity: self.capacity,
            });
        }
        Ok(self.place(cell, size))
    }

    /// Store a bootstrap cell, growing the capacity by its size.
    pub fn alloc_reserved(&mut self, cell: Cell) -> HeapId {
        let size = cell.size();
        self.capacity += size;
        self.place(cell, size)
    }

    fn place(&mut self, cell: Cell, size: usize) -> HeapId {
        self.used_bytes += size;
        self.live_cells += 1;
        self.peak_bytes = self.peak_bytes.max(self.used_bytes);

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.cell = Some(cell);
            HeapId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                cell: Some(cell),
            });
            HeapId::new(index, 0)
        }
    }

    pub fn is_live(&self, id: HeapId) -> bool {
        self.slots
            .get(id.index as usize)
            .is_some_and(|s| s.generation == id.generation && s.cell.is_some())
    }

    pub fn get(&self, id: HeapId) -> Result<&Cell, FatalError> {
        match self.slots.get(id.index as usize) {
            Some(Slot {
                generation,
                cell: Some(cell),
            }) if *generation == id.generation => Ok(cell),
            _ => Err(stale(id)),
        }
    }

    pub fn get_mut(&mut self, id: HeapId) -> Result<&mut Cell, FatalError> {
        match self.slots.get_mut(id.index as usize) {
            Some(Slot {
                generation,
                cell: Some(cell),
            }) if *generation == id.generation => Ok(cell),
            _ => Err(stale(id)),
        }
    }

    pub fn property(&self, id: HeapId) -> Result<&PropertyCell, FatalError> {
        match self.get(id)? {
            Cell::Property(p) => Ok(p),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn property_mut(&mut self, id: HeapId) -> Result<&mut PropertyCell, FatalError> {
        match self.get_mut(id)? {
            Cell::Property(p) => Ok(p),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn object(&self, id: HeapId) -> Result<&ObjectCell, FatalError> {
        match self.get(id)? {
            Cell::Object(o) => Ok(o),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn object_mut(&mut self, id: HeapId) -> Result<&mut ObjectCell, FatalError> {
        match self.get_mut(id)? {
            Cell::Object(o) => Ok(o),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn function(&self, id: HeapId) -> Result<&FunctionCell, FatalError> {
        match self.get(id)? {
            Cell::Function(f) => Ok(f),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn code(&self, id: HeapId) -> Result<&Rc<Code>, FatalError> {
        match self.get(id)? {
            Cell::CodeRef(c) => Ok(c),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn string(&self, id: HeapId) -> Result<&str, FatalError> {
        match self.get(id)? {
            Cell::String(s) => Ok(s),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn error(&self, id: HeapId) -> Result<&ErrorCell, FatalError> {
        match self.get(id)? {
            Cell::Error(e) => Ok(e),
            _ => Err(FatalError::contract(messages::WRONG_CELL_KIND)),
        }
    }

    pub fn props(&self, id: HeapId) -> Result<PropList, FatalError> {
        self.get(id)?
            .props()
            .copied()
            .ok_or_else(|| FatalError::contract(messages::WRONG_CELL_KIND))
    }

    pub fn props_mut(&mut self, id: HeapId) -> Result<&mut PropList, FatalError> {
        self.get_mut(id)?
            .props_mut()
            .ok_or_else(|| FatalError::contract(messages::WRONG_CELL_KIND))
    }

    /// Live cells, for statistics.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.slots.iter().filter_map(|s| s.cell.as_ref())
    }

    pub fn is_marked(&self, index: u32) -> bool {
        let word = (index >> 6) as usize;
        let bit = index & 63;
        self.marks.get(word).is_some_and(|w| (w & (1 << bit)) != 0)
    }

    fn set_mark(&mut self, index: u32) -> bool {
        let word = (index >> 6) as usize;
        let bit = index & 63;
        if word >= self.marks.len() {
            self.marks.resize(word + 1, 0);
        }
        let w = &mut self.marks[word];
        let mask = 1 << bit;
        if (*w & mask) != 0 {
            return false;
        }
        *w |= mask;
        true
    }

    /// Mark everything reachable from `roots` with an explicit worklist.
    pub(crate) fn mark_all(&mut self, roots: impl IntoIterator<Item = Value>) {
        self.marks.clear();
        let mut pending: Vec<HeapId> = roots.into_iter().filter_map(Value::heap_id).collect();
        while let Some(id) = pending.pop() {
            // A stale root refers to nothing live.
            if !self.is_live(id) || !self.set_mark(id.index) {
                continue;
            }
            if let Some(cell) = &self.slots[id.index as usize].cell {
                cell.trace(&mut pending);
            }
        }
    }

    /// Free every unmarked cell and rebuild the free list.
    pub(crate) fn sweep(&mut self) -> SweepStats {
        let mut stats = SweepStats::default();
        self.free_list.clear();
        for i in 0..self.slots.len() {
            let index = i as u32;
            let size = match &self.slots[i].cell {
                Some(_) if self.is_marked(index) => continue,
                Some(cell) => cell.size(),
                None => {
                    if self.slots[i].generation < GENERATION_MASK {
                        self.free_list.push(index);
                    }
                    continue;
                }
            };
            let slot = &mut self.slots[i];
            slot.cell = None;
            // Live slots never hold the last generation, so this cannot overflow the mask.
            slot.generation += 1;
            // An exhausted slot stays empty for good so no old handle can match it again.
            if slot.generation < GENERATION_MASK {
                self.free_list.push(index);
            }
            stats.freed_cells += 1;
            stats.freed_bytes += size;
        }
        // Lowest indices are reused first.
        self.free_list.reverse();
        self.marks.clear();

        self.used_bytes -= stats.freed_bytes;
        self.live_cells -= stats.freed_cells;
        self.collections += 1;
        self.freed_total += stats.freed_cells as u64;
        stats
    }
}

fn stale(id: HeapId) -> FatalError {
    FatalError::StaleReference {
        index: id.index,
        generation: id.generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(proto: Value) -> Cell {
        Cell::Object(ObjectCell {
            props: PropList::default(),
            proto,
        })
    }

    #[test]
    fn accounted_sizes_are_aligned() {
        assert_eq!(object(Value::NULL).size(), 24);
        assert_eq!(Cell::String("a".into()).size(), 16);
        assert_eq!(Cell::String("123456789".into()).size(), 24);
        let prop = Cell::Property(PropertyCell {
            key: "x".into(),
            value: Value::UNDEFINED,
            next: None,
        });
        assert_eq!(prop.size(), 32);
        for cell in [object(Value::NULL), Cell::String("s".into()), prop] {
            assert_eq!(cell.size() % 8, 0);
            assert!(cell.size() >= MIN_CELL_BYTES);
        }
    }

    #[test]
    fn alloc_respects_byte_budget() {
        let mut heap = Heap::new(48);
        heap.alloc(object(Value::NULL)).unwrap();
        heap.alloc(object(Value::NULL)).unwrap();
        let err = heap.alloc(object(Value::NULL)).unwrap_err();
        assert!(matches!(err, FatalError::OutOfMemory { requested: 24, used: 48, capacity: 48 }));
        assert_eq!(heap.used_bytes, 48);
    }

    #[test]
    fn sweep_frees_unmarked_and_bumps_generation() {
        let mut heap = Heap::new(1024);
        let keep = heap.alloc(object(Value::NULL)).unwrap();
        let drop = heap.alloc(Cell::String("gone".into())).unwrap();
        heap.mark_all([Value::from_heap(Type::Object, keep)]);
        let stats = heap.sweep();
        assert_eq!(stats.freed_cells, 1);
        assert!(heap.is_live(keep));
        assert!(!heap.is_live(drop));
        assert!(matches!(heap.get(drop), Err(FatalError::StaleReference { .. })));

        let reused = heap.alloc(Cell::String("new".into())).unwrap();
        assert_eq!(reused.index, drop.index);
        assert_ne!(reused.generation, drop.generation);
        assert!(heap.get(drop).is_err());
        assert_eq!(heap.string(reused).unwrap(), "new");
    }

    #[test]
    fn exhausted_slot_is_retired_instead_of_wrapping() {
        let mut heap = Heap::new(1024);
        let first = heap.alloc(Cell::String("old".into())).unwrap();
        heap.slots[first.index as usize].generation = GENERATION_MASK - 1;
        let last = HeapId::new(first.index, GENERATION_MASK - 1);

        heap.mark_all(Vec::<Value>::new());
        assert_eq!(heap.sweep().freed_cells, 1);
        assert_eq!(heap.slots[first.index as usize].generation, GENERATION_MASK);

        let next = heap.alloc(Cell::String("new".into())).unwrap();
        assert_ne!(next.index, first.index);
        assert!(!heap.is_live(last));
        assert!(!heap.is_live(first));

        // Later sweeps keep the retired slot off the free list.
        heap.mark_all([Value::from_heap(Type::String, next)]);
        heap.sweep();
        assert!(!heap.free_list.contains(&first.index));
    }

    #[test]
    fn marking_follows_prototype_and_property_chain() {
        let mut heap = Heap::new(1024);
        let proto = heap.alloc(object(Value::NULL)).unwrap();
        let s = heap.alloc(Cell::String("payload".into())).unwrap();
        let p = heap
            .alloc(Cell::Property(PropertyCell {
                key: "k".into(),
                value: Value::from_heap(Type::String, s),
                next: None,
            }))
            .unwrap();
        let obj = heap
            .alloc(object(Value::from_heap(Type::Object, proto)))
            .unwrap();
        heap.object_mut(obj).unwrap().props = PropList {
            head: Some(p),
            tail: Some(p),
            len: 1,
        };
        heap.mark_all([Value::from_heap(Type::Object, obj)]);
        assert_eq!(heap.sweep().freed_cells, 0);
        assert_eq!(heap.live_cells, 4);
    }

    #[test]
    fn wrong_kind_is_a_contract_violation() {
        let mut heap = Heap::new(256);
        let id = heap.alloc(Cell::String("x".into())).unwrap();
        assert!(matches!(
            heap.object(id),
            Err(FatalError::ContractViolation(_))
        ));
    }
}
