use simplejs_lexer::{Lexer, normalize_source};
use simplejs_syntax::TokenKind;

fn kinds(src: &str) -> Vec<TokenKind> {
    let normalized = normalize_source(src);
    Lexer::new(&normalized.text)
        .lex()
        .tokens
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != TokenKind::Newline)
        .collect()
}

#[test]
fn lex_smoke_function_declaration() {
    let src = "function add(a, b) {\n  return a + b;\n}\nadd(1, 2);\n";
    let normalized = normalize_source(src);
    assert!(normalized.diagnostics.is_empty());
    let result = Lexer::new(&normalized.text).lex();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    assert_eq!(result.tokens[0].kind, TokenKind::KwFunction);
    assert_eq!(result.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn numeric_forms() {
    let src = "0 1.5 .5 1e3 2E-2 0xff 0b101 0o17";
    let normalized = normalize_source(src);
    let result = Lexer::new(&normalized.text).lex();
    assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    let numbers = result
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Number)
        .count();
    assert_eq!(numbers, 8);
}

#[test]
fn strings_with_both_quotes() {
    assert_eq!(
        kinds(r#"'a"b' "c'd" "e\"f""#),
        vec![TokenKind::Str, TokenKind::Str, TokenKind::Str, TokenKind::Eof]
    );
}

#[test]
fn unterminated_string_reports_and_recovers() {
    let result = Lexer::new("var s = 'abc\nvar t = 1;").lex();
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].message.contains("Unterminated"));
    assert!(result.tokens.iter().any(|t| t.kind == TokenKind::KwVar));
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(
        kinds("typeof thisx this"),
        vec![
            TokenKind::KwTypeof,
            TokenKind::Ident,
            TokenKind::KwThis,
            TokenKind::Eof
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("a // line\n/* block\n */ b"),
        vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
    );
}

#[test]
fn unclosed_brace_is_reported() {
    let result = Lexer::new("function f() {").lex();
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].message.contains("Unclosed"));
}
