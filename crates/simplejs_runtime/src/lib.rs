//! SimpleJS runtime: NaN-boxed values, a fixed-capacity heap with mark-sweep collection,
//! and a tree-walking evaluator behind an embeddable host API.

#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::new_without_default)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::unnecessary_cast)]
#![allow(clippy::inherent_to_string)]

pub mod config;
pub mod core;
pub mod errors;
mod eval;
mod gc;
mod interpreter;
pub mod number;
mod property;
mod stats;

pub use config::InterpreterConfig;
pub use crate::core::{HeapId, Type, Value};
pub use errors::{ErrorKind, FatalError, NativeError};
pub use eval::{FrameOutcomes, FrameState};
pub use interpreter::{Interpreter, NativeFn, RootId};
pub use property::MAX_PROTOTYPE_CHAIN;
pub use stats::HeapStats;
