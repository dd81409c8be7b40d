use crate::{Diagnostic, SourceFile, Span};

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Appends the source line containing `span` with a caret under its start.
fn push_excerpt(out: &mut String, source: &SourceFile, span: Span, gutter: &str) -> (u32, u32) {
    let text = source.text.as_str();
    let start = floor_char_boundary(text, span.start.0 as usize);
    let (line, col) = source.text.line_col(start as u32);
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[start..]
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(text.len());
    out.push('\n');
    out.push_str(gutter);
    out.push_str(&text[line_start..line_end]);
    out.push('\n');
    out.push_str(gutter);
    out.extend(std::iter::repeat_n(' ', col as usize));
    out.push('^');
    (line, col)
}

pub fn render_diagnostic(source: &SourceFile, diag: &Diagnostic) -> String {
    let code_str = diag.code.map(|c| format!(" [{c}]")).unwrap_or_default();
    let mut out = match diag.span {
        Some(span) => {
            let start = floor_char_boundary(source.text.as_str(), span.start.0 as usize);
            let (line, col) = source.text.line_col(start as u32);
            let mut out = format!(
                "{:?}{}:{}:{}: {}: {}",
                diag.severity,
                code_str,
                line + 1,
                col + 1,
                source.name,
                diag.message
            );
            push_excerpt(&mut out, source, span, "  | ");
            out
        }
        None => format!(
            "{:?}{}: {}: {}",
            diag.severity, code_str, source.name, diag.message
        ),
    };
    for label in &diag.labels {
        out.push_str("\n  = note: ");
        out.push_str(&label.message);
        let (ll, lc) = push_excerpt(&mut out, source, label.span, "    | ");
        out.push_str(&format!("  ({}:{}:{})", source.name, ll + 1, lc + 1));
    }
    if let Some(h) = &diag.help {
        out.push_str("\n  = help: ");
        out.push_str(h);
    }
    out
}

pub fn render_diagnostics(source: &SourceFile, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for (idx, d) in diagnostics.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&render_diagnostic(source, d));
    }
    out
}
