use simplejs_syntax::{Diagnostic, SourceFile, render_diagnostic};

pub(crate) mod ast;
pub(crate) mod check;
pub(crate) mod common;
pub(crate) mod run;
pub(crate) mod tokens;

pub(crate) fn emit_diagnostics(source: &SourceFile, diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        eprintln!("{}", render_diagnostic(source, d));
    }
}
