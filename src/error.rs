//! Error taxonomy of the pipeline.
//!
//! Syntax and semantic errors are collected as data and handed back to the
//! caller. Only [`CompileError`] is ever returned through `Err`.

use thiserror::Error;

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

fn at_line_or_eof(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!("line {}", line),
        None => "EOF".to_string(),
    }
}

/// Fatal tokenizer failure.
///
/// The catch-all rule of the lexer matches any single character, so this is
/// unreachable with the current rule table. It is kept so a stricter rule
/// table can surface invalid input as a hard failure.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{character}' at line {line}, column {column}")]
    UnmatchedCharacter {
        character: char,
        line: usize,
        column: usize,
    },
}

/// A parse failure. `line` is `None` when the token stream ran out.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("Syntax error at {}: {message}", at_line_or_eof(.line))]
pub struct SyntaxError {
    pub message: String,
    pub line: Option<usize>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
#[error("Semantic error{}: {message}", at_line(.line))]
pub struct SemanticError {
    pub message: String,
    pub line: Option<usize>,
}

impl SemanticError {
    pub fn new(message: impl Into<String>, line: Option<usize>) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),
}
