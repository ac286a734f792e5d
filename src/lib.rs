//! Front end for a small C-like language.
//!
//! ```text
//! Source → Lexer → Parser → SemanticVisitor → TacGenerator → TAC
//! ```
//!
//! Each stage consumes the previous stage's full output. A stage only runs
//! when every earlier stage reported zero errors; [`compile`] checks this
//! and returns either every artifact or only the diagnostics.
//!
//! Comment stripping and rendering are left to the caller.

pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

use log::info;

use analyzer::{Analysis, Scope, SemanticVisitor};
use codegen::TacGenerator;
use error::{CompileError, LexError, SemanticError, SyntaxError};
use lexer::{Lexer, Token};
use parser::{Parsed, Parser, Program};

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::tokenize(source)
}

pub fn parse(tokens: Vec<Token>) -> Parsed {
    Parser::new(tokens).parse()
}

pub fn analyze(program: &Program) -> Analysis {
    SemanticVisitor::new().analyze(program)
}

/// Call only with a program that produced no syntax or semantic errors.
pub fn generate(program: &Program) -> Vec<String> {
    TacGenerator::new()
        .generate(program)
        .iter()
        .map(|i| i.to_string())
        .collect()
}

/// Everything a successful run produces.
#[derive(Clone, Debug)]
pub struct Artifacts {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub scopes: Vec<Scope>,
    pub tac: Vec<String>,
}

/// Errors of a halted run. `semantic` is empty whenever `syntax` is not,
/// since analysis never ran.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    pub syntax: Vec<SyntaxError>,
    pub semantic: Vec<SemanticError>,
}

#[derive(Clone, Debug)]
pub enum Outcome {
    Compiled(Artifacts),
    Halted(Diagnostics),
}

impl Outcome {
    pub fn is_compiled(&self) -> bool {
        matches!(self, Outcome::Compiled(_))
    }
}

pub fn compile(source: &str) -> Result<Outcome, CompileError> {
    let tokens = tokenize(source)?;
    info!("tokenized {} tokens", tokens.len());

    let Parsed { program, errors } = parse(tokens.clone());
    if !errors.is_empty() {
        info!("halting after parse with {} syntax errors", errors.len());
        return Ok(Outcome::Halted(Diagnostics {
            syntax: errors,
            semantic: vec![],
        }));
    }
    info!("parsed {} functions", program.0.len());

    let analysis = analyze(&program);
    if !analysis.errors.is_empty() {
        info!(
            "halting after analysis with {} semantic errors",
            analysis.errors.len()
        );
        return Ok(Outcome::Halted(Diagnostics {
            syntax: vec![],
            semantic: analysis.errors,
        }));
    }
    info!("analysis created {} scopes", analysis.scopes().len());

    let tac = generate(&program);
    info!("generated {} instructions", tac.len());

    Ok(Outcome::Compiled(Artifacts {
        tokens,
        program,
        scopes: analysis.symbol_table.into_scopes(),
        tac,
    }))
}
