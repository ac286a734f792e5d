use log::debug;

use crate::error::LexError;

use super::{
    token::{KEYWORDS, ONE_SYMBOL_OPERATORS, SEPARATORS, TWO_SYMBOLS_OPERATORS},
    Token, TokenKind,
};

/// Returns the length of the match anchored at the start of `chars`.
type Matcher = fn(&[char]) -> Option<usize>;

/// Tried top to bottom at the current position. Order matters: floats before
/// integers, keywords before identifiers, and the catch-all last.
const RULES: [(TokenKind, Matcher); 8] = [
    (TokenKind::FloatLit, match_float),
    (TokenKind::IntLit, match_int),
    (TokenKind::StringLit, match_string),
    (TokenKind::Keyword, match_keyword),
    (TokenKind::Identifier, match_identifier),
    (TokenKind::Operator, match_operator),
    (TokenKind::Separator, match_separator),
    (TokenKind::Mismatch, match_any),
];

fn count_digits(chars: &[char]) -> usize {
    chars.iter().take_while(|c| c.is_ascii_digit()).count()
}

fn match_float(chars: &[char]) -> Option<usize> {
    let int_part = count_digits(chars);
    if int_part == 0 || chars.get(int_part) != Some(&'.') {
        return None;
    }
    let frac_part = count_digits(&chars[int_part + 1..]);
    (frac_part > 0).then_some(int_part + 1 + frac_part)
}

fn match_int(chars: &[char]) -> Option<usize> {
    let len = count_digits(chars);
    (len > 0).then_some(len)
}

/// No escapes, no embedded quotes. An unterminated string does not match.
fn match_string(chars: &[char]) -> Option<usize> {
    if chars.first() != Some(&'"') {
        return None;
    }
    chars[1..]
        .iter()
        .position(|&c| c == '"')
        .map(|close| close + 2)
}

fn match_identifier(chars: &[char]) -> Option<usize> {
    match chars.first() {
        Some(&c) if c.is_ascii_alphabetic() || c == '_' => Some(
            chars
                .iter()
                .take_while(|&&c| c.is_ascii_alphanumeric() || c == '_')
                .count(),
        ),
        _ => None,
    }
}

fn match_keyword(chars: &[char]) -> Option<usize> {
    let len = match_identifier(chars)?;
    let word: String = chars[..len].iter().collect();
    KEYWORDS.contains(word.as_str()).then_some(len)
}

fn match_operator(chars: &[char]) -> Option<usize> {
    let c2: String = chars.iter().take(2).collect();
    if TWO_SYMBOLS_OPERATORS.contains(c2.as_str()) {
        return Some(2);
    }
    let c = chars.first()?;
    ONE_SYMBOL_OPERATORS.contains(c).then_some(1)
}

fn match_separator(chars: &[char]) -> Option<usize> {
    let c = chars.first()?;
    SEPARATORS.contains(c).then_some(1)
}

fn match_any(chars: &[char]) -> Option<usize> {
    (!chars.is_empty()).then_some(1)
}

#[derive(Debug)]
pub struct Lexer {
    tokens: Vec<Token>,
    index: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    fn new() -> Self {
        Self {
            tokens: vec![],
            index: 0,
            line: 1,
            column: 1,
        }
    }

    fn advance(&mut self, consumed: &[char]) {
        for &c in consumed {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.index += consumed.len();
    }

    fn new_token(&mut self, kind: TokenKind, chars: &[char]) {
        self.tokens.push(Token {
            kind,
            text: chars.iter().collect(),
            line: self.line,
            column: self.column,
        });
        self.advance(chars);
    }

    fn _tokenize(&mut self, s: &str) -> Result<(), LexError> {
        let chars: Vec<_> = s.chars().collect();

        while self.index < chars.len() {
            let rest = &chars[self.index..];
            if rest[0].is_whitespace() {
                self.advance(&rest[..1]);
                continue;
            }

            let Some((kind, len)) = RULES
                .iter()
                .find_map(|(kind, matcher)| matcher(rest).map(|len| (*kind, len)))
            else {
                // Unreachable while `match_any` closes the rule table.
                return Err(LexError::UnmatchedCharacter {
                    character: rest[0],
                    line: self.line,
                    column: self.column,
                });
            };
            self.new_token(kind, &rest[..len]);
        }

        Ok(())
    }

    pub fn tokenize(s: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new();
        lexer._tokenize(s)?;
        debug!("lexed {} tokens over {} lines", lexer.tokens.len(), lexer.line);

        Ok(lexer.tokens)
    }
}
