//! Value representation and the heap arena.

pub(crate) mod heap;
pub mod value;

pub(crate) use heap::{Cell, ErrorCell, FunctionCell, Heap, ObjectCell, PropList, PropertyCell};
pub use value::{HeapId, Type, Value};
pub(crate) use value::{FastHashMap, fast_map_new};
