use simplejs_syntax::{Diagnostic, Span};

pub struct NormalizedSource {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Folds every line terminator to `\n` and drops a leading byte-order mark.
pub fn normalize_source(input: &str) -> NormalizedSource {
    let mut diagnostics = Vec::new();

    let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{2028}' | '\u{2029}' => out.push('\n'),
            '\0' => {
                let start = out.len() as u32;
                diagnostics.push(Diagnostic::warning(
                    "NUL character in source; replaced with a space",
                    Some(Span::new(start, start.saturating_add(1))),
                ));
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    NormalizedSource {
        text: out,
        diagnostics,
    }
}
