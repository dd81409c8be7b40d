//! Shared syntax types for the SimpleJS front end: spans, tokens, diagnostics and
//! their rendering against source text.
mod diagnostic;
mod loc;
mod render;
mod source;
mod span;
mod str_util;
mod token;
mod util;

pub use diagnostic::{Diagnostic, Label, Severity, codes};
pub use loc::{DiagnosticKind, DiagnosticsFormatter};
pub use render::{render_diagnostic, render_diagnostics};
pub use source::{SourceFile, SourceText};
pub use span::{ByteIndex, Span};
pub use str_util::{EscapeError, unescape, unquote};
pub use token::{Token, TokenKind};
pub use util::{is_ident_continue, is_ident_start, is_js_whitespace};
