//! `leaky`: compile and run Leaky Bucket programs.
//!
//! Program output goes to stdout; diagnostics, crash reports, state dumps and
//! logs (`RUST_LOG`, default `warn`) go to stderr.

mod compile;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leaky_eval::{EngineConfig, Interpreter, StdIo};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "leaky", version, about = "Run programs written in Leaky Bucket")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile and execute a program. God speaks on stdin.
    Run {
        file: PathBuf,
        /// Crash once this many ticks have passed. Overrides LEAKY_TICK_LIMIT.
        #[arg(long)]
        tick_limit: Option<u64>,
        /// JSON engine configuration, used instead of the environment.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the final world as JSON to stderr.
        #[arg(long)]
        dump_state: bool,
    },
    /// Compile only and report diagnostics.
    Check {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            file,
            tick_limit,
            config,
            dump_state,
        } => {
            let config = load_config(config.as_deref(), tick_limit)?;
            run(&file, config, dump_state)
        }
        Command::Check { file, json } => check(&file, json),
    }
}

fn load_config(path: Option<&Path>, tick_limit: Option<u64>) -> Result<EngineConfig> {
    let config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            EngineConfig::from_json(&text)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => EngineConfig::from_env()?,
    };
    Ok(match tick_limit {
        Some(limit) => config.with_tick_limit(limit),
        None => config,
    })
}

fn run(file: &Path, config: EngineConfig, dump_state: bool) -> Result<ExitCode> {
    let compiled = compile::compile_file(file)?;
    compile::report(&compiled.diagnostics);
    let Some(program) = compiled.program else {
        return Ok(ExitCode::FAILURE);
    };
    debug!(
        file = %file.display(),
        instructions = program.len(),
        tick_limit = ?config.tick_limit,
        "compiled"
    );

    let mut interp = Interpreter::with_config(&program, StdIo::new(), config);
    let result = interp.run();

    if dump_state {
        let snapshot = serde_json::to_string_pretty(&interp.snapshot())?;
        eprintln!("{snapshot}");
    }

    match result {
        Ok(summary) => {
            info!(
                ticks = summary.ticks,
                executed = summary.instructions_executed,
                "finished"
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(crash) => {
            eprintln!("RuntimeError: {crash}\n\tat line {}", crash.line());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn check(file: &Path, json: bool) -> Result<ExitCode> {
    let compiled = compile::compile_file(file)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&compiled.diagnostics)?);
    } else {
        compile::report(&compiled.diagnostics);
    }
    Ok(if compiled.diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
