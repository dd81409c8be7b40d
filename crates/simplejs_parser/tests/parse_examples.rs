use std::fs;

use simplejs_lexer::{Lexer, normalize_source};
use simplejs_parser::Parser;
use simplejs_syntax::Severity;

#[test]
fn parse_all_inputs() {
    let inputs_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("inputs");
    let mut entries: Vec<_> = fs::read_dir(&inputs_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("js"))
        .collect();
    entries.sort();
    assert!(!entries.is_empty());

    for path in entries {
        let src = fs::read_to_string(&path).unwrap();
        let normalized = normalize_source(&src);
        assert!(
            normalized.diagnostics.is_empty(),
            "normalize diagnostics in {:?}: {:?}",
            path,
            normalized.diagnostics
        );
        let lex = Lexer::new(&normalized.text).lex();
        assert!(
            lex.diagnostics.is_empty(),
            "lex diagnostics in {:?}: {:?}",
            path,
            lex.diagnostics
        );
        let parse = Parser::new(&normalized.text, &lex.tokens).parse();
        let errors: Vec<_> = parse
            .diagnostics
            .into_iter()
            .filter(|d| matches!(d.severity, Severity::Error))
            .collect();
        assert!(errors.is_empty(), "parse errors in {:?}: {errors:?}", path);
    }
}
