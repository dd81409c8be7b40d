//! Token definitions.
//!
//! Covers the JavaScript subset understood by the front end: keywords, punctuators,
//! literals, and the layout `Newline` token used for automatic statement termination.
use crate::Span;

/// Token kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Newline that may terminate a statement.
    Newline,

    /// Identifier.
    Ident,
    /// Numeric literal.
    Number,
    /// String literal (quotes included in the span).
    Str,

    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,

    /// `.`
    Dot,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `?`
    Question,
    /// `=>`
    Arrow,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,

    /// `=`
    Eq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,

    /// `==`
    EqEq,
    /// `!=`
    Ne,
    /// `===`
    EqEqEq,
    /// `!==`
    NeEq,
    /// `>`
    Gt,
    /// `<`
    Lt,
    /// `>=`
    Ge,
    /// `<=`
    Le,

    /// `!`
    Bang,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,

    KwVar,
    KwLet,
    KwConst,
    KwFunction,
    KwReturn,
    KwIf,
    KwElse,
    KwWhile,
    KwDo,
    KwFor,
    KwBreak,
    KwContinue,
    KwThrow,
    KwTry,
    KwCatch,
    KwFinally,
    KwNew,
    KwThis,
    KwTypeof,
    KwVoid,
    KwTrue,
    KwFalse,
    KwNull,

    /// End of file.
    Eof,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwVar
                | TokenKind::KwLet
                | TokenKind::KwConst
                | TokenKind::KwFunction
                | TokenKind::KwReturn
                | TokenKind::KwIf
                | TokenKind::KwElse
                | TokenKind::KwWhile
                | TokenKind::KwDo
                | TokenKind::KwFor
                | TokenKind::KwBreak
                | TokenKind::KwContinue
                | TokenKind::KwThrow
                | TokenKind::KwTry
                | TokenKind::KwCatch
                | TokenKind::KwFinally
                | TokenKind::KwNew
                | TokenKind::KwThis
                | TokenKind::KwTypeof
                | TokenKind::KwVoid
                | TokenKind::KwTrue
                | TokenKind::KwFalse
                | TokenKind::KwNull
        )
    }

    /// Tokens after which a line break never ends the statement.
    pub fn continues_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Colon
                | TokenKind::Question
                | TokenKind::Arrow
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::EqEq
                | TokenKind::Ne
                | TokenKind::EqEqEq
                | TokenKind::NeEq
                | TokenKind::Gt
                | TokenKind::Lt
                | TokenKind::Ge
                | TokenKind::Le
                | TokenKind::Bang
                | TokenKind::AmpAmp
                | TokenKind::PipePipe
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
        )
    }
}

/// Token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Token kind.
    pub kind: TokenKind,
    /// Span in source text.
    pub span: Span,
}
