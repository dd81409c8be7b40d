//! simplejs_ir: the tree representation handed from the front end to the runtime.
//!
//! `Code` is the executable unit (a function body or a whole program); it is reference
//! counted so every closure created from one definition shares the same body.
mod ast;
mod code;
mod frontend;

pub use ast::*;
pub use code::*;
pub use frontend::*;
