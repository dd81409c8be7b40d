use simplejs_syntax::TokenKind;

pub(crate) static KEYWORDS: phf::Map<&'static str, TokenKind> = phf::phf_map! {
    "var" => TokenKind::KwVar,
    "let" => TokenKind::KwLet,
    "const" => TokenKind::KwConst,
    "function" => TokenKind::KwFunction,
    "return" => TokenKind::KwReturn,
    "if" => TokenKind::KwIf,
    "else" => TokenKind::KwElse,
    "while" => TokenKind::KwWhile,
    "do" => TokenKind::KwDo,
    "for" => TokenKind::KwFor,
    "break" => TokenKind::KwBreak,
    "continue" => TokenKind::KwContinue,
    "throw" => TokenKind::KwThrow,
    "try" => TokenKind::KwTry,
    "catch" => TokenKind::KwCatch,
    "finally" => TokenKind::KwFinally,
    "new" => TokenKind::KwNew,
    "this" => TokenKind::KwThis,
    "typeof" => TokenKind::KwTypeof,
    "void" => TokenKind::KwVoid,
    "true" => TokenKind::KwTrue,
    "false" => TokenKind::KwFalse,
    "null" => TokenKind::KwNull,
};
