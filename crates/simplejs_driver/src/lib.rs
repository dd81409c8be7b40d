//! simplejs_driver: runs the front end (normalize → lex → parse) and hands the runtime a
//! `CompiledUnit`.
mod frontend;

pub use frontend::{Driver, LexedFile, ParsedFile, Timings};
