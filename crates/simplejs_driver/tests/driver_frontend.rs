use std::io::Write;

use simplejs_driver::Driver;
use simplejs_ir::Frontend;
use simplejs_syntax::{Severity, TokenKind};

fn collect_errors(src: &str) -> Vec<String> {
    let driver = Driver::new();
    let parsed = driver.parse_text("<test>", src).unwrap();
    parsed
        .diagnostics
        .iter()
        .filter(|d| matches!(d.severity, Severity::Error))
        .map(|d| d.message.clone())
        .collect::<Vec<_>>()
}

#[test]
fn clean_program_has_no_errors() {
    let errs = collect_errors("var o = {}\no.x = 5\no.x\n");
    assert!(errs.is_empty(), "{:?}", errs);
}

#[test]
fn lexer_and_parser_errors_are_merged() {
    let errs = collect_errors("var s = 'open\nvar = 2\n");
    assert!(errs.iter().any(|e| e.contains("Unterminated")), "{:?}", errs);
    assert!(errs.iter().any(|e| e.contains("Expected identifier")), "{:?}", errs);
}

#[test]
fn crlf_sources_are_normalized() {
    let parsed = Driver::new().parse_text("<test>", "var a = 1\r\nvar b = 2\r\n").unwrap();
    assert!(!parsed.has_errors());
    assert!(!parsed.source.text.as_str().contains('\r'));
    assert_eq!(parsed.program.stmts().len(), 2);
}

#[test]
fn compile_text_keeps_warnings() {
    let unit = Driver::new()
        .compile_text("<test>", "function f() { return 1; f() }")
        .unwrap();
    assert!(!unit.has_errors());
    assert_eq!(unit.diagnostics.len(), 1);
    assert_eq!(unit.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn lex_and_compile_files_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "var answer = 6 * 7;").unwrap();
    let path = file.path().to_string_lossy().to_string();

    let driver = Driver::new();
    let lexed = driver.lex_file(&path).unwrap();
    assert_eq!(lexed.tokens[0].kind, TokenKind::KwVar);
    let unit = driver.compile_file(&path).unwrap();
    assert!(!unit.has_errors());
    assert_eq!(&*unit.program.code.hoisted_vars, &["answer"]);
}

#[test]
fn missing_file_reports_path() {
    let err = Driver::new().parse_file("/definitely/not/here.js").err().unwrap();
    assert!(err.contains("/definitely/not/here.js"));
}
