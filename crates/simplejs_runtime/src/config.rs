//! Interpreter configuration and control-flow results.

use crate::core::Value;

pub const DEFAULT_HEAP_SIZE: usize = 16 * 1024;
pub const DEFAULT_MAX_STACK_SIZE: usize = 128;
pub const DEFAULT_GC_TRIGGER_PERCENT: u8 = 80;

/// Interpreter configuration options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Arena capacity in bytes. Never grows.
    pub heap_size: usize,
    /// Maximum number of nested call frames.
    pub max_stack_size: usize,
    /// Occupancy (percent of `heap_size`) at which an allocation first collects.
    pub gc_trigger_percent: u8,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            heap_size: DEFAULT_HEAP_SIZE,
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            gc_trigger_percent: DEFAULT_GC_TRIGGER_PERCENT,
        }
    }
}

impl InterpreterConfig {
    pub fn with_heap_size(heap_size: usize) -> Self {
        Self {
            heap_size,
            ..Self::default()
        }
    }
}

/// Control flow result from statement execution.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Flow {
    None,
    Return(Value),
    Break,
    Continue,
}
