use std::process::ExitCode;

use clap::{ArgAction, Parser as CliParser};
use clap_stdin::FileOrStdin;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use tacc::{analyzer::Scope, compile, Outcome};

/// Lower a small C-like language to three-address code.
#[derive(CliParser, Debug)]
#[command(name = "tacc", version)]
struct Cli {
    /// Source file, or `-` to read stdin
    #[arg(default_value = "-")]
    input: FileOrStdin,

    /// Print the token table
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,

    /// Print every scope with its symbols
    #[arg(long)]
    scopes: bool,

    /// Do not print the generated three-address code
    #[arg(long)]
    no_tac: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Removes `//` and `/* */` comments. Newlines inside block comments are
/// kept so token lines still match the original file.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            in_string = c != '"';
            out.push(c);
            continue;
        }
        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

fn print_scopes(scopes: &[Scope]) {
    for (index, scope) in scopes.iter().enumerate() {
        let parent = scope
            .parent
            .map(|p| format!("#{}", p.index()))
            .unwrap_or_else(|| "-".to_string());
        println!("#{} {} (parent: {})", index, scope.name, parent);
        for symbol in scope.symbols() {
            let line = symbol
                .line
                .map(|l| l.to_string())
                .unwrap_or_else(|| "builtin".to_string());
            if symbol.params.is_empty() {
                println!("    {:<12} {:?} [{}]", symbol.name, symbol.kind, line);
            } else {
                println!(
                    "    {:<12} {:?}({}) [{}]",
                    symbol.name,
                    symbol.kind,
                    symbol.params.join(", "),
                    line
                );
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("failed to install logger: {}", e);
    }

    let source = match cli.input.contents() {
        Ok(source) => source,
        Err(e) => {
            eprintln!("failed to read input: {}", e);
            return ExitCode::from(2);
        }
    };

    let outcome = match compile(&strip_comments(&source)) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    match outcome {
        Outcome::Compiled(artifacts) => {
            if cli.tokens {
                for token in artifacts.tokens.iter() {
                    println!("{}", token);
                }
            }
            if cli.ast {
                println!("{:#?}", artifacts.program);
            }
            if cli.scopes {
                print_scopes(&artifacts.scopes);
            }
            if !cli.no_tac {
                for line in artifacts.tac.iter() {
                    println!("{}", line);
                }
            }
            ExitCode::SUCCESS
        }
        Outcome::Halted(diagnostics) => {
            for e in diagnostics.syntax.iter() {
                eprintln!("{}", e);
            }
            for e in diagnostics.semantic.iter() {
                eprintln!("{}", e);
            }
            ExitCode::from(1)
        }
    }
}
