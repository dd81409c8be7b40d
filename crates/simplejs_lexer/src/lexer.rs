//! Lexer implementation.
//!
//! Scans normalized source into tokens (keywords/idents/literals/punctuators) and emits
//! `Newline` layout tokens where a line break may end a statement. Diagnostics are collected
//! rather than aborting, so the parser always receives a token stream ending in `Eof`.
//!
//! Design: single linear pass, delimiter stack, minimal allocations.
use crate::keywords::KEYWORDS;
use simplejs_syntax::{
    Diagnostic, DiagnosticKind, Span, Token, TokenKind, codes, is_ident_continue,
    is_ident_start, is_js_whitespace,
};

/// Lexing result.
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// JavaScript lexer.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    i: usize,
    diagnostics: Vec<Diagnostic>,
    tokens: Vec<Token>,
    /// `(` and `[` nesting; line breaks inside them never end a statement.
    group_depth: u32,
    delim_stack: Vec<(char, usize)>,
    last_sig_kind: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            i: 0,
            diagnostics: Vec::new(),
            tokens: Vec::new(),
            group_depth: 0,
            delim_stack: Vec::new(),
            last_sig_kind: None,
        }
    }

    /// Run the lexer and return tokens + diagnostics.
    pub fn lex(mut self) -> LexResult {
        let approx = self.bytes.len().saturating_div(4).max(32);
        self.tokens.reserve(approx);
        while self.i < self.bytes.len() {
            let start = self.i;
            let Some(c) = self.peek_char() else {
                break;
            };

            match c {
                '\n' => {
                    self.i += 1;
                    if self.should_emit_newline() {
                        self.push(TokenKind::Newline, start, self.i);
                    }
                }
                c if is_js_whitespace(c) => {
                    self.i += c.len_utf8();
                }
                '/' if self.peek_str("//") => self.skip_line_comment(),
                '/' if self.peek_str("/*") => self.skip_block_comment(),
                '(' | '[' | '{' => {
                    self.i += 1;
                    if c != '{' {
                        self.group_depth = self.group_depth.saturating_add(1);
                    }
                    self.delim_stack.push((c, start));
                    let kind = match c {
                        '(' => TokenKind::LParen,
                        '[' => TokenKind::LBracket,
                        _ => TokenKind::LBrace,
                    };
                    self.push(kind, start, self.i);
                }
                ')' | ']' | '}' => {
                    self.i += 1;
                    let open = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match self.delim_stack.pop() {
                        Some((top, _)) if top == open => {}
                        Some(other) => {
                            self.delim_stack.push(other);
                            self.error(DiagnosticKind::UnmatchedDelimiter(c), start);
                        }
                        None => self.error(DiagnosticKind::UnmatchedDelimiter(c), start),
                    }
                    if c != '}' {
                        self.group_depth = self.group_depth.saturating_sub(1);
                    }
                    let kind = match c {
                        ')' => TokenKind::RParen,
                        ']' => TokenKind::RBracket,
                        _ => TokenKind::RBrace,
                    };
                    self.push(kind, start, self.i);
                }
                '"' | '\'' => self.lex_string(c),
                '.' if self.peek_nth_byte(1).is_some_and(|b| b.is_ascii_digit()) => {
                    self.lex_number();
                }
                c if c.is_ascii_digit() => self.lex_number(),
                c if is_ident_start(c) => self.lex_ident_or_keyword(),
                '\\' => {
                    self.i += 1;
                    self.error_with_code(
                        DiagnosticKind::UnexpectedChar('\\'),
                        start,
                        codes::UNEXPECTED_CHAR,
                    );
                }
                _ => {
                    if let Some((kind, len)) = self.punctuator() {
                        self.i += len;
                        self.push(kind, start, self.i);
                    } else {
                        self.i += c.len_utf8();
                        self.error_with_code(
                            DiagnosticKind::UnexpectedChar(c),
                            start,
                            codes::UNEXPECTED_CHAR,
                        );
                    }
                }
            }
        }

        self.tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::point(self.i as u32),
        });
        for (ch, at) in std::mem::take(&mut self.delim_stack).into_iter().rev() {
            self.diagnostics.push(
                Diagnostic::error_kind(DiagnosticKind::UnclosedDelimiter(ch), Some(Span::point(self.i as u32)))
                    .with_label("opened here", Span::new(at as u32, at as u32 + 1)),
            );
        }

        LexResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Longest-match punctuator at the cursor.
    fn punctuator(&self) -> Option<(TokenKind, usize)> {
        const TABLE: &[(&str, TokenKind)] = &[
            ("===", TokenKind::EqEqEq),
            ("!==", TokenKind::NeEq),
            ("=>", TokenKind::Arrow),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::Ne),
            (">=", TokenKind::Ge),
            ("<=", TokenKind::Le),
            ("&&", TokenKind::AmpAmp),
            ("||", TokenKind::PipePipe),
            ("++", TokenKind::PlusPlus),
            ("--", TokenKind::MinusMinus),
            ("+=", TokenKind::PlusEq),
            ("-=", TokenKind::MinusEq),
            ("*=", TokenKind::StarEq),
            ("/=", TokenKind::SlashEq),
            ("%=", TokenKind::PercentEq),
            ("=", TokenKind::Eq),
            ("!", TokenKind::Bang),
            (">", TokenKind::Gt),
            ("<", TokenKind::Lt),
            ("+", TokenKind::Plus),
            ("-", TokenKind::Minus),
            ("*", TokenKind::Star),
            ("/", TokenKind::Slash),
            ("%", TokenKind::Percent),
            (".", TokenKind::Dot),
            (";", TokenKind::Semi),
            (",", TokenKind::Comma),
            (":", TokenKind::Colon),
            ("?", TokenKind::Question),
        ];
        TABLE
            .iter()
            .find(|(text, _)| self.peek_str(text))
            .map(|(text, kind)| (*kind, text.len()))
    }

    fn skip_line_comment(&mut self) {
        self.i += 2;
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.i += ch.len_utf8();
        }
    }

    fn skip_block_comment(&mut self) {
        let start = self.i;
        self.i += 2;
        let mut saw_newline = false;
        while self.i < self.bytes.len() {
            if self.peek_str("*/") {
                self.i += 2;
                // A block comment spanning lines acts as a line break.
                if saw_newline && self.should_emit_newline() {
                    self.push(TokenKind::Newline, start, self.i);
                }
                return;
            }
            let Some(ch) = self.peek_char() else {
                break;
            };
            saw_newline |= ch == '\n';
            self.i += ch.len_utf8();
        }
        self.error(DiagnosticKind::UnterminatedBlockComment, start);
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start as u32, end as u32),
        });
        if kind != TokenKind::Newline {
            self.last_sig_kind = Some(kind);
        }
    }

    fn error(&mut self, kind: DiagnosticKind, start: usize) {
        self.diagnostics.push(Diagnostic::error_kind(
            kind,
            Some(Span::new(start as u32, self.i as u32)),
        ));
    }

    fn error_with_code(&mut self, kind: DiagnosticKind, start: usize, code: &'static str) {
        self.diagnostics.push(
            Diagnostic::error_kind(kind, Some(Span::new(start as u32, self.i as u32)))
                .with_code(code),
        );
    }

    fn should_emit_newline(&self) -> bool {
        if self.group_depth > 0 {
            return false;
        }
        match self.last_sig_kind {
            None => return false,
            Some(k) if k.continues_expression() => return false,
            Some(TokenKind::Newline) => return false,
            _ => {}
        }

        let rest = self.next_line_significant();
        let Some(next) = rest.chars().next() else {
            return true;
        };
        if rest.starts_with("++") || rest.starts_with("--") {
            return true;
        }
        if next == '!' {
            return !rest.starts_with("!=");
        }
        !matches!(
            next,
            '.' | ')' | ']' | '}' | '?' | ':' | ',' | '+' | '-' | '*' | '/' | '%' | '=' | '>'
                | '<' | '|' | '&'
        )
    }

    /// Rest of the input starting at the next significant char on the following line(s).
    fn next_line_significant(&self) -> &'a str {
        let mut j = self.i;
        while j < self.input.len() {
            let rest = &self.input[j..];
            let Some(ch) = rest.chars().next() else {
                break;
            };
            if is_js_whitespace(ch) {
                j += ch.len_utf8();
                continue;
            }
            if rest.starts_with("//") {
                match rest.find('\n') {
                    Some(nl) => {
                        j += nl + 1;
                        continue;
                    }
                    None => return "",
                }
            }
            if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => {
                        j += 2 + end + 2;
                        continue;
                    }
                    None => return "",
                }
            }
            return rest;
        }
        ""
    }

    fn lex_string(&mut self, quote: char) {
        let start = self.i;
        self.i += 1;
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            if ch == quote {
                self.i += 1;
                self.push(TokenKind::Str, start, self.i);
                return;
            }
            if ch == '\\' {
                self.i += 1;
                if let Some(esc) = self.peek_char() {
                    self.i += esc.len_utf8();
                }
                continue;
            }
            self.i += ch.len_utf8();
        }
        self.error_with_code(DiagnosticKind::UnterminatedString, start, codes::UNTERMINATED);
        // Keep the parser in sync with a best-effort token.
        self.push(TokenKind::Str, start, self.i);
    }

    fn eat_digits(&mut self, radix: u32) -> usize {
        let mut digits = 0usize;
        while let Some(ch) = self.peek_char() {
            if ch.is_digit(radix) {
                digits += 1;
                self.i += 1;
            } else if ch == '_' && digits > 0 {
                self.i += 1;
            } else {
                break;
            }
        }
        digits
    }

    fn lex_number(&mut self) {
        let start = self.i;
        let radix = match (self.peek_nth_byte(0), self.peek_nth_byte(1)) {
            (Some(b'0'), Some(b'x' | b'X')) => 16,
            (Some(b'0'), Some(b'b' | b'B')) => 2,
            (Some(b'0'), Some(b'o' | b'O')) => 8,
            _ => 10,
        };
        let mut valid;
        if radix != 10 {
            self.i += 2;
            valid = self.eat_digits(radix) > 0;
        } else {
            let int_digits = self.eat_digits(10);
            let mut frac_digits = 0;
            if self.peek_char() == Some('.') {
                self.i += 1;
                frac_digits = self.eat_digits(10);
            }
            valid = int_digits + frac_digits > 0;
            if matches!(self.peek_char(), Some('e' | 'E')) {
                self.i += 1;
                if matches!(self.peek_char(), Some('+' | '-')) {
                    self.i += 1;
                }
                valid &= self.eat_digits(10) > 0;
            }
        }
        // `3in` and friends are a single malformed literal.
        while let Some(ch) = self.peek_char() {
            if !is_ident_continue(ch) {
                break;
            }
            valid = false;
            self.i += ch.len_utf8();
        }
        if !valid {
            let text = self.input[start..self.i].to_string();
            self.error(DiagnosticKind::InvalidNumber(text), start);
        }
        self.push(TokenKind::Number, start, self.i);
    }

    fn lex_ident_or_keyword(&mut self) {
        let start = self.i;
        while let Some(ch) = self.peek_char() {
            if self.i > start && !is_ident_continue(ch) {
                break;
            }
            self.i += ch.len_utf8();
        }

        let s = &self.input[start..self.i];
        let kind = KEYWORDS.get(s).copied().unwrap_or(TokenKind::Ident);

        self.push(kind, start, self.i);
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.i..].chars().next()
    }

    fn peek_nth_byte(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.i + n).copied()
    }

    fn peek_str(&self, s: &str) -> bool {
        self.input[self.i..].starts_with(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).lex().tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn longest_punctuator_wins() {
        assert_eq!(
            kinds("a === b !== c => d"),
            vec![
                TokenKind::Ident,
                TokenKind::EqEqEq,
                TokenKind::Ident,
                TokenKind::NeEq,
                TokenKind::Ident,
                TokenKind::Arrow,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newline_suppressed_after_operator_and_inside_parens() {
        assert_eq!(
            kinds("1 +\n2\nf(a,\nb)"),
            vec![
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newline_kept_before_prefix_increment() {
        let k = kinds("a\n++b");
        assert_eq!(k[1], TokenKind::Newline);
        assert_eq!(k[2], TokenKind::PlusPlus);
    }

    #[test]
    fn malformed_number_is_reported() {
        let r = Lexer::new("0x").lex();
        assert_eq!(r.diagnostics.len(), 1);
        let r = Lexer::new("12abc").lex();
        assert_eq!(r.diagnostics.len(), 1);
    }
}
