//! Brisk interpreter CLI

use brisk::{InterpConfig, Interpreter, Program};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "brisk", version, about = "Brisk - tree-walking interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program from its JSON AST
    Run {
        /// AST file to run
        file: PathBuf,
        /// Interpreter configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Log every executed statement
        #[arg(long)]
        trace: bool,
        /// Maximum call depth
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Decode and pretty-print a JSON AST (debug)
    Dump {
        /// AST file to dump
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run {
            file,
            config,
            trace,
            max_depth,
        } => run_file(&file, config.as_deref(), trace, max_depth),
        Command::Dump { file } => dump_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(trace: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if trace {
        EnvFilter::new("brisk=debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_program(path: &Path) -> brisk::Result<Program> {
    let source = std::fs::read_to_string(path)?;
    Program::from_json(&source)
}

fn run_file(
    path: &Path,
    config_path: Option<&Path>,
    trace: bool,
    max_depth: Option<usize>,
) -> brisk::Result<()> {
    let mut config = match config_path {
        Some(config_path) => InterpConfig::load(config_path)?,
        None => InterpConfig::default(),
    };
    if trace {
        config = config.trace(true);
    }
    if let Some(depth) = max_depth {
        config = config.max_call_depth(depth);
    }

    init_tracing(config.trace);
    tracing::debug!(file = %path.display(), ?config, "running");

    let program = load_program(path)?;
    let mut interp = Interpreter::with_stdio(config);
    interp.run(&program)?;
    Ok(())
}

fn dump_file(path: &Path) -> brisk::Result<()> {
    let program = load_program(path)?;
    println!("{}", program.to_json()?);
    Ok(())
}
