//! Runtime error tiers and message constants.
//!
//! Language-level errors are Error-tagged heap values and can be caught by `try/catch`.
//! `FatalError` covers host-level failures that no script can observe or recover from.

use thiserror::Error;

use crate::core::Value;

pub mod messages {
    pub const NOT_AN_OBJECT: &str = "receiver is not an object";
    pub const NOT_A_STRING: &str = "value is not a string";
    pub const NOT_AN_ERROR: &str = "value is not an error";
    pub const BAD_PROTOTYPE: &str = "prototype must be an object or null";
    pub const PROTOTYPE_CYCLE: &str = "prototype link would create a cycle";
    pub const PROTOTYPE_CHAIN_TOO_LONG: &str = "prototype chain too long";
    pub const UNKNOWN_ROOT: &str = "root id was not registered";
    pub const UNKNOWN_NATIVE: &str = "native function id was not registered";
    pub const WRONG_CELL_KIND: &str = "heap cell has an unexpected kind";
    pub const STACK_OVERFLOW: &str = "Maximum call stack size exceeded";
    pub const GC_TRIGGER_RANGE: &str = "gc trigger must be a percentage between 1 and 100";
}

/// Host-level failure. After one of these the interpreter should be considered unusable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("out of memory: requested {requested} bytes, {used} of {capacity} in use after collection")]
    OutOfMemory {
        requested: usize,
        used: usize,
        capacity: usize,
    },
    #[error("contract violation: {0}")]
    ContractViolation(String),
    #[error("stale reference to heap slot {index} (generation {generation})")]
    StaleReference { index: u32, generation: u32 },
}

impl FatalError {
    pub(crate) fn contract(msg: impl Into<String>) -> Self {
        FatalError::ContractViolation(msg.into())
    }
}

/// Result of a native callback that did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NativeError {
    /// Throw the value in-language; `try/catch` in the caller can observe it.
    #[error("native function threw {0:?}")]
    Throw(Value),
    #[error(transparent)]
    Fatal(#[from] FatalError),
}

/// Kind of a language-level Error value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Error,
    TypeError,
    RangeError,
    ReferenceError,
    SyntaxError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Error,
        ErrorKind::TypeError,
        ErrorKind::RangeError,
        ErrorKind::ReferenceError,
        ErrorKind::SyntaxError,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
        }
    }
}

/// Abrupt completion inside the evaluator.
#[derive(Debug)]
pub(crate) enum Unwind {
    Throw(Value),
    Fatal(FatalError),
}

impl From<FatalError> for Unwind {
    fn from(e: FatalError) -> Self {
        Unwind::Fatal(e)
    }
}

impl From<NativeError> for Unwind {
    fn from(e: NativeError) -> Self {
        match e {
            NativeError::Throw(v) => Unwind::Throw(v),
            NativeError::Fatal(f) => Unwind::Fatal(f),
        }
    }
}

pub(crate) type EvalResult<T> = Result<T, Unwind>;
