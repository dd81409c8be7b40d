//! Parser.
//!
//! Converts lexer tokens into a `Program` and collects diagnostics. `Newline` tokens that
//! survive lexing terminate statements; everywhere else they are skipped as trivia.
use simplejs_syntax::{Diagnostic, DiagnosticKind, Span, Token, TokenKind, codes};

use crate::{BinaryOp, Program, Stmt};

/// Deepest syntactic nesting the parser accepts. Expression levels, statement levels and each
/// link of an operator or member chain count once, which also bounds the evaluator's recursion.
pub const MAX_NESTING_DEPTH: u32 = 256;

/// Parse result.
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

/// SimpleJS parser.
pub struct Parser<'a> {
    pub(crate) input: &'a str,
    pub(crate) tokens: &'a [Token],
    pub(crate) i: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Enclosing loops in the current function body.
    pub(crate) loop_depth: u32,
    /// Enclosing function bodies.
    pub(crate) fn_depth: u32,
    /// Current syntactic nesting, see [`MAX_NESTING_DEPTH`].
    pub(crate) depth: u32,
}

impl<'a> Parser<'a> {
    /// Create a new parser.
    pub fn new(input: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            input,
            tokens,
            i: 0,
            diagnostics: Vec::with_capacity(8),
            loop_depth: 0,
            fn_depth: 0,
            depth: 0,
        }
    }

    /// Parse the full input and return a program plus diagnostics.
    pub fn parse(mut self) -> ParseResult {
        let mut stmts: Vec<Stmt> = Vec::with_capacity(8);
        let mut after_jump = false;
        loop {
            self.skip_trivia();
            if self.at(TokenKind::Eof) {
                break;
            }
            if self.at(TokenKind::RBrace) {
                // Nothing at top level can close it; report and move past it.
                let span = self.cur_span();
                self.diagnostics.push(
                    Diagnostic::error_kind(DiagnosticKind::UnexpectedToken("}".into()), Some(span))
                        .with_code(codes::UNEXPECTED_TOKEN),
                );
                self.bump();
                stmts.push(Stmt::Error(span));
                continue;
            }
            self.parse_stmt_into(&mut stmts, &mut after_jump);
        }

        let span = Span::new(0, self.input.len() as u32);
        ParseResult {
            program: Program::new(stmts.into_boxed_slice(), span),
            diagnostics: self.diagnostics,
        }
    }

    /// `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Option<Box<[Stmt]>> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts: Vec<Stmt> = Vec::with_capacity(8);
        let mut after_jump = false;
        loop {
            self.skip_trivia();
            if self.at(TokenKind::RBrace) || self.at(TokenKind::Eof) {
                break;
            }
            self.parse_stmt_into(&mut stmts, &mut after_jump);
        }
        self.expect(TokenKind::RBrace)?;
        Some(stmts.into_boxed_slice())
    }

    /// Parse one statement of a statement list, warning once about code that follows an
    /// unconditional `return`/`throw`/`break`/`continue`.
    fn parse_stmt_into(&mut self, stmts: &mut Vec<Stmt>, after_jump: &mut bool) {
        let start = self.cur_span();
        let stmt = match self.parse_stmt() {
            Some(stmt) => stmt,
            None => self.recover_stmt(),
        };
        let reachable_matters = !matches!(stmt, Stmt::FuncDecl(_) | Stmt::Empty | Stmt::Error(_));
        if *after_jump && reachable_matters {
            let span = self.span_from(start);
            self.diagnostics.push(
                Diagnostic::warning_kind(DiagnosticKind::UnreachableCode, Some(span))
                    .with_code(codes::UNREACHABLE_CODE),
            );
            *after_jump = false;
        } else if matches!(
            stmt,
            Stmt::Return(_) | Stmt::Throw(_) | Stmt::Break | Stmt::Continue
        ) {
            *after_jump = true;
        }
        stmts.push(stmt);
    }

    /// Skip to the end of the broken statement and leave an `Error` marker in its place.
    pub(crate) fn recover_stmt(&mut self) -> Stmt {
        let start_span = self.cur_span();
        let mut brace_depth = 0u32;
        while !self.at(TokenKind::Eof) {
            match self.peek_kind() {
                TokenKind::LBrace => brace_depth += 1,
                TokenKind::RBrace => {
                    if brace_depth == 0 {
                        // Leave the unmatched brace for the enclosing block.
                        break;
                    }
                    brace_depth -= 1;
                }
                TokenKind::Semi | TokenKind::Newline if brace_depth == 0 => break,
                _ => {}
            }
            self.bump();
        }
        if self.at(TokenKind::Semi) || self.at(TokenKind::Newline) {
            self.bump();
        }
        Stmt::Error(Span::new(start_span.start.0, self.cur_span().end.0))
    }

    pub(crate) fn expect_ident(&mut self) -> Option<String> {
        self.skip_trivia();
        if self.peek_kind().is_keyword() {
            let t = self.bumped();
            let kw = self.token_text(&t).to_string();
            self.diagnostics.push(Diagnostic::error_kind(
                DiagnosticKind::KeywordAsIdentifier(kw),
                Some(t.span),
            ));
            return None;
        }
        let t = self.expect(TokenKind::Ident)?;
        Some(self.token_text(&t).to_string())
    }

    pub(crate) fn expect_stmt_terminator(&mut self) -> Option<()> {
        match self.peek_kind() {
            TokenKind::Semi | TokenKind::Newline => {
                self.bump();
                Some(())
            }
            TokenKind::Eof | TokenKind::RBrace => Some(()),
            _ => {
                let span = self.cur_span();
                self.diagnostics.push(
                    Diagnostic::error_kind(
                        DiagnosticKind::ExpectedToken("';' or line break".to_string()),
                        Some(span),
                    )
                    .with_code(codes::EXPECTED_TOKEN),
                );
                None
            }
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        self.skip_trivia();
        if self.at(kind) {
            return Some(self.bumped());
        }
        let span = self.cur_span();
        self.diagnostics.push(
            Diagnostic::error_kind(
                DiagnosticKind::ExpectedToken(describe(kind).to_string()),
                Some(span),
            )
            .with_code(codes::EXPECTED_TOKEN),
        );
        None
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.i)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn peek_kind_n(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.i + n).map(|t| t.kind)
    }

    /// Kind of the next token that is not a `Newline`.
    pub(crate) fn peek_past_newlines(&self) -> TokenKind {
        self.tokens[self.i.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .find(|k| *k != TokenKind::Newline)
            .unwrap_or(TokenKind::Eof)
    }

    /// Index just past the `)` matching the `(` at the cursor.
    pub(crate) fn matching_paren_end(&self) -> Option<usize> {
        let mut depth = 0u32;
        for (j, t) in self.tokens.iter().enumerate().skip(self.i) {
            match t.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(j + 1);
                    }
                }
                TokenKind::Eof => return None,
                _ => {}
            }
        }
        None
    }

    pub(crate) fn bumped(&mut self) -> Token {
        let t = self.tokens.get(self.i).cloned().unwrap_or(Token {
            kind: TokenKind::Eof,
            span: Span::point(self.input.len() as u32),
        });
        if self.i < self.tokens.len() {
            self.i += 1;
        }
        t
    }

    pub(crate) fn bump(&mut self) {
        if self.i < self.tokens.len() {
            self.i += 1;
        }
    }

    pub(crate) fn skip_trivia(&mut self) {
        while self.at(TokenKind::Newline) {
            self.i += 1;
        }
    }

    pub(crate) fn cur_span(&self) -> Span {
        self.tokens
            .get(self.i)
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(self.input.len() as u32))
    }

    pub(crate) fn token_text(&self, t: &Token) -> &'a str {
        let end = (t.span.end.0 as usize).min(self.input.len());
        let start = (t.span.start.0 as usize).min(end);
        &self.input[start..end]
    }

    /// Run `parse` one nesting level deeper.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let base = self.depth;
        self.deepen()?;
        let out = parse(self);
        self.depth = base;
        out
    }

    /// Count one more nesting level; reports and fails once the limit is reached.
    pub(crate) fn deepen(&mut self) -> Option<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            let span = self.cur_span();
            self.diagnostics.push(
                Diagnostic::error_kind(DiagnosticKind::NestingTooDeep(MAX_NESTING_DEPTH), Some(span))
                    .with_code(codes::NESTING_TOO_DEEP),
            );
            return None;
        }
        self.depth += 1;
        Some(())
    }

    pub(crate) fn error(&mut self, kind: DiagnosticKind, span: Span) {
        self.diagnostics
            .push(Diagnostic::error_kind(kind, Some(span)));
    }
}

/// Human-readable token name for "expected ..." messages.
pub(crate) fn describe(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Ident => "identifier",
        TokenKind::LParen => "'('",
        TokenKind::RParen => "')'",
        TokenKind::LBracket => "'['",
        TokenKind::RBracket => "']'",
        TokenKind::LBrace => "'{'",
        TokenKind::RBrace => "'}'",
        TokenKind::Semi => "';'",
        TokenKind::Comma => "','",
        TokenKind::Colon => "':'",
        TokenKind::Arrow => "'=>'",
        TokenKind::Eq => "'='",
        TokenKind::KwWhile => "'while'",
        TokenKind::KwFunction => "'function'",
        TokenKind::Eof => "end of input",
        _ => "token",
    }
}

pub(crate) fn infix_binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (1, 2),
        BinaryOp::And => (3, 4),
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::StrictEq | BinaryOp::StrictNe => (5, 6),
        BinaryOp::Gt | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Le => (7, 8),
        BinaryOp::Add | BinaryOp::Sub => (9, 10),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (11, 12),
    }
}

pub(crate) fn prefix_binding_power() -> u8 {
    13
}

/// Value of a numeric literal token (`_` separators, `0x`/`0b`/`0o` prefixes).
pub(crate) fn parse_number_literal(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != '_').collect();
    let radix_digits = |digits: &str, radix: u32| -> Option<f64> {
        if digits.is_empty() {
            return None;
        }
        digits.chars().try_fold(0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * radix as f64 + d as f64)
        })
    };
    let lower = cleaned.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        radix_digits(hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        radix_digits(bin, 2)
    } else if let Some(oct) = lower.strip_prefix("0o") {
        radix_digits(oct, 8)
    } else {
        cleaned.parse::<f64>().ok()
    }
}
