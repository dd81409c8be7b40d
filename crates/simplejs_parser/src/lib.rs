//! simplejs_parser: builds `simplejs_ir` trees from lexer tokens.
//!
//! Statements are parsed by recursive descent, expressions by Pratt parsing. Errors are
//! collected as diagnostics and the parser resynchronises at the next statement.
mod expr;
mod parser;
mod stmt;

pub use parser::{MAX_NESTING_DEPTH, ParseResult, Parser};
pub use simplejs_ir::*;
