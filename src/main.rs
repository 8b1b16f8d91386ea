// cminus: LL(1) front end for C-minus, emitting three-address code

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cminus::compile::{CompileError, Frontend};
use cminus::semantic::code::listing;

/// Compile a C-minus source file to three-address code
#[derive(Debug, Parser)]
#[command(name = "cminus", version, about)]
struct Args {
    /// Source file to compile
    source: PathBuf,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the parse tree
    #[arg(long)]
    tree: bool,

    /// Print the First and Follow sets of every non-terminal
    #[arg(long)]
    sets: bool,

    /// Print the predictive parsing table
    #[arg(long)]
    table: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter)
        .init();
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let source = fs::read_to_string(&args.source)
        .with_context(|| format!("failed to read '{}'", args.source.display()))?;

    let frontend = Frontend::new().context("failed to build the parse table")?;

    if args.sets {
        print!("{}", frontend.sets().display(frontend.grammar()));
    }

    if args.table {
        print!("{}", frontend.table().display(frontend.grammar()));
    }

    let tokens = match frontend.tokenize(&source) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(false);
        }
    };

    if args.tokens {
        for token in &tokens {
            println!("{:>4}  {:<12} {}", token.line, token.kind.to_string(), token.lexeme);
        }
    }

    if args.tree {
        match frontend.parse_tokens(&tokens) {
            Ok(tree) => print!("{}", tree),
            Err(e) => {
                eprintln!("Syntax error: {}", e);
                return Ok(false);
            }
        }
    }

    match frontend.compile_tokens(&tokens) {
        Ok(code) => {
            print!("{}", listing(&code));
            Ok(true)
        }
        Err(CompileError::Semantic(errors)) => {
            for error in &errors {
                eprintln!("Semantic error: {}", error);
            }
            eprintln!("{} error(s)", errors.len());
            Ok(false)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
