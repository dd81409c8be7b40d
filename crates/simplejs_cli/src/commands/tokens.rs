use simplejs_driver::Driver;
use simplejs_syntax::TokenKind;

use crate::args::CliArgs;
use crate::commands::common::{single_path, write_line};
use crate::commands::emit_diagnostics;

pub(crate) fn run(args: &CliArgs, driver: &Driver) {
    let path = single_path(args);
    let lexed = match driver.lex_file(path) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    emit_diagnostics(&lexed.source, &lexed.diagnostics);
    let mut out = std::io::stdout().lock();
    for t in &lexed.tokens {
        if matches!(t.kind, TokenKind::Newline) {
            continue;
        }
        let text = lexed.source.text.slice(t.span);
        write_line(
            &mut out,
            format_args!("{:?}\t{:?}\t{}", t.kind, t.span, escape_visible(text)),
        );
    }
}

fn escape_visible(s: &str) -> String {
    let mut out = String::new();
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
