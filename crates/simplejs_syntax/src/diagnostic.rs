//! Front-end diagnostics.

use crate::{DiagnosticKind, DiagnosticsFormatter, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub message: String,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub code: Option<&'static str>,
    pub span: Option<Span>,
    pub labels: Vec<Label>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: DiagnosticKind, span: Option<Span>) -> Self {
        Self::with_message(severity, DiagnosticsFormatter::format(&kind), span)
    }

    fn with_message(severity: Severity, message: String, span: Option<Span>) -> Self {
        Self {
            severity,
            message,
            code: None,
            span,
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn error(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::with_message(Severity::Error, message.into(), span)
    }

    pub fn error_kind(kind: DiagnosticKind, span: Option<Span>) -> Self {
        Self::new(Severity::Error, kind, span)
    }

    pub fn warning(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::with_message(Severity::Warning, message.into(), span)
    }

    pub fn warning_kind(kind: DiagnosticKind, span: Option<Span>) -> Self {
        Self::new(Severity::Warning, kind, span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, message: impl Into<String>, span: Span) -> Self {
        self.labels.push(Label {
            message: message.into(),
            span,
        });
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

pub mod codes {
    pub const UNEXPECTED_CHAR: &str = "E0001";
    pub const UNTERMINATED: &str = "E0002";
    pub const EXPECTED_TOKEN: &str = "E0003";
    pub const INVALID_ASSIGNMENT: &str = "E0004";
    pub const UNEXPECTED_TOKEN: &str = "E0005";
    pub const NESTING_TOO_DEEP: &str = "E0006";
    pub const UNREACHABLE_CODE: &str = "W0001";
}
