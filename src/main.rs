use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use awa::bytecode::asm::{self, AsmError};
use awa::bytecode::disasm::print_tokens;
use awa::frontend::lexer::{LexError, tokenize};
use awa::frontend::token_dumper::TokenDumper;
use awa::runtime::io::{BufferInput, InputSource, StdinInput, StdoutSink};
use awa::{Interpreter, RuntimeError};

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("expected a .awa file, got {0}")]
    Extension(PathBuf),

    #[error("lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("assembler error: {0}")]
    Asm(#[from] AsmError),

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("failed to encode result: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "awa", version)]
#[command(about = "Interpreter for the awa bit-stream language", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program
    Run {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Input line for red/r3d (repeatable); without it input comes from stdin
        #[arg(short, long, value_name = "LINE")]
        input: Vec<String>,

        /// Print the result bubble as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show decoded tokens only
    Tokens {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long)]
        no_color: bool,
    },

    /// Show the instruction listing
    Disasm {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Assemble mnemonics (one per line) into awa source
    Encode {
        #[arg(value_name = "ASM_FILE")]
        file: PathBuf,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Run { file, input, json } => cmd_run(&file, input, json).await,
        Commands::Tokens { file, no_color } => cmd_tokens(&file, no_color),
        Commands::Disasm { file } => cmd_disasm(&file),
        Commands::Encode { file } => cmd_encode(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn read_source(path: &Path) -> CliResult<String> {
    fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_program(path: &Path) -> CliResult<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("awa") {
        return Err(CliError::Extension(path.to_path_buf()));
    }
    read_source(path)
}

async fn cmd_run(path: &Path, input: Vec<String>, json: bool) -> CliResult<()> {
    let source = read_program(path)?;
    info!(file = %path.display(), "running");

    if input.is_empty() {
        run_with(StdinInput::new(), &source, json).await
    } else {
        run_with(BufferInput::new(input), &source, json).await
    }
}

async fn run_with<I: InputSource>(input: I, source: &str, json: bool) -> CliResult<()> {
    let mut vm = Interpreter::new(input, StdoutSink);
    let result = vm.run(source).await?;

    if json {
        println!("{}", serde_json::to_string(&result)?);
    }
    Ok(())
}

fn cmd_tokens(path: &Path, no_color: bool) -> CliResult<()> {
    let tokens = tokenize(&read_program(path)?)?;

    let mut dumper = TokenDumper::new();
    if no_color {
        dumper = dumper.no_color();
    }
    dumper.dump(&tokens);
    Ok(())
}

fn cmd_disasm(path: &Path) -> CliResult<()> {
    let tokens = tokenize(&read_program(path)?)?;
    print_tokens(&tokens);
    Ok(())
}

fn cmd_encode(path: &Path) -> CliResult<()> {
    let tokens = asm::assemble(&read_source(path)?)?;
    println!("{}", asm::encode(&tokens)?);
    Ok(())
}
