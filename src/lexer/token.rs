use std::fmt;

use phf::phf_set;

pub static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "int",
    "void",
    "if",
    "else",
    "while",
    "for",
    "return",
    "printf",
};

/// Tried before the single-character operators so that `<=` never splits
/// into `<` and `=`.
pub static TWO_SYMBOLS_OPERATORS: phf::Set<&'static str> = phf_set! {
    "==",
    "!=",
    "<=",
    ">=",
    "&&",
    "||",
};

pub static ONE_SYMBOL_OPERATORS: phf::Set<char> = phf_set! {
    '+',
    '-',
    '*',
    '/',
    '=',
    '<',
    '>',
    '!',
};

pub static SEPARATORS: phf::Set<char> = phf_set! {
    '(',
    ')',
    '{',
    '}',
    ';',
    ',',
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    FloatLit,
    IntLit,
    StringLit,
    Keyword,
    Identifier,
    Operator,
    Separator,
    /// Any single character no other rule accepts.
    Mismatch,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::FloatLit => "FLOAT_LIT",
            TokenKind::IntLit => "INT_LIT",
            TokenKind::StringLit => "STRING_LIT",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Mismatch => "MISMATCH",
        };
        f.pad(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:<16} {}:{}",
            self.kind, self.text, self.line, self.column
        )
    }
}
