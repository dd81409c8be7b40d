#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    // Lexer
    UnterminatedBlockComment,
    UnmatchedDelimiter(char),
    UnclosedDelimiter(char),
    UnterminatedString,
    InvalidEscape(char),
    InvalidNumber(String),
    UnexpectedChar(char),

    // Parser
    ExpectedToken(String),
    ExpectedExpression,
    InvalidAssignmentTarget,
    KeywordAsIdentifier(String),
    MisplacedControlFlow(&'static str),
    MissingCatchOrFinally,
    UnexpectedToken(String),
    NestingTooDeep(u32),
    UnreachableCode,

    // Custom
    Raw(String),
}

pub struct DiagnosticsFormatter;

impl DiagnosticsFormatter {
    pub fn format(kind: &DiagnosticKind) -> String {
        match kind {
            DiagnosticKind::UnterminatedBlockComment => "Unterminated block comment".into(),
            DiagnosticKind::UnmatchedDelimiter(c) => format!("Unmatched '{}'", c),
            DiagnosticKind::UnclosedDelimiter(c) => format!("Unclosed '{}'", c),
            DiagnosticKind::UnterminatedString => "Unterminated string literal".into(),
            DiagnosticKind::InvalidEscape(c) => format!("Invalid escape sequence: \\{}", c),
            DiagnosticKind::InvalidNumber(s) => format!("Invalid numeric literal: {}", s),
            DiagnosticKind::UnexpectedChar(c) => format!("Unexpected character: {}", c),

            DiagnosticKind::ExpectedToken(s) => format!("Expected {}", s),
            DiagnosticKind::ExpectedExpression => "Expected expression".into(),
            DiagnosticKind::InvalidAssignmentTarget => "Invalid assignment target".into(),
            DiagnosticKind::KeywordAsIdentifier(kw) => {
                format!("Keyword '{}' cannot be used as an identifier", kw)
            }
            DiagnosticKind::MisplacedControlFlow(what) => {
                format!("Illegal {} statement", what)
            }
            DiagnosticKind::MissingCatchOrFinally => {
                "Missing catch or finally after try".into()
            }
            DiagnosticKind::UnexpectedToken(s) => format!("Unexpected '{}'", s),
            DiagnosticKind::NestingTooDeep(limit) => {
                format!("Nesting exceeds the limit of {} levels", limit)
            }

            DiagnosticKind::UnreachableCode => "Unreachable code".into(),

            DiagnosticKind::Raw(s) => s.clone(),
        }
    }
}
