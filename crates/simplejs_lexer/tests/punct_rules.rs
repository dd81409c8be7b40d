use simplejs_lexer::Lexer;
use simplejs_syntax::TokenKind;

fn kinds(src: &str) -> Vec<TokenKind> {
    Lexer::new(src).lex().tokens.into_iter().map(|t| t.kind).collect()
}

#[test]
fn newline_before_member_access_continues_statement() {
    assert!(!kinds("a\n  .b").contains(&TokenKind::Newline));
}

#[test]
fn newline_between_statements_is_emitted() {
    assert_eq!(
        kinds("a = 1\nb = 2"),
        vec![
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::Number,
            TokenKind::Newline,
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::Number,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn newline_inside_object_literal_after_comma_is_suppressed() {
    assert!(!kinds("var o = {a: 1,\n b: 2}").contains(&TokenKind::Newline));
}

#[test]
fn newline_after_return_is_emitted() {
    let k = kinds("return\nx");
    assert_eq!(k[1], TokenKind::Newline);
}

#[test]
fn bang_on_next_line_starts_statement() {
    assert_eq!(kinds("a\n!b")[1], TokenKind::Newline);
    assert!(!kinds("a\n!= b").contains(&TokenKind::Newline));
}

#[test]
fn compound_assignment_operators() {
    assert_eq!(
        kinds("a += 1; a -= 1; a *= 1; a /= 1; a %= 1")
            .into_iter()
            .filter(|k| matches!(
                k,
                TokenKind::PlusEq
                    | TokenKind::MinusEq
                    | TokenKind::StarEq
                    | TokenKind::SlashEq
                    | TokenKind::PercentEq
            ))
            .count(),
        5
    );
}
