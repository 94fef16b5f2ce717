mod commands;
mod diagnostics;
mod report;
mod watch;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::report::Format;

/// Exit code for config, path and watcher failures.
const RUNTIME_ERROR: u8 = 3;

/// Command line arguments.
#[derive(Parser)]
#[command(name = "phpclasscheck", about = "Find PHP class references that are never imported or declared")]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
    /// Log debug details to stderr (overrides RUST_LOG)
    #[arg(global = true, long, short)]
    verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Analyze documents once and report unresolved class references
    Check(Targets),
    /// Check, then re-check documents as they change
    Watch(Targets),
}

/// Paths and output format shared by `check` and `watch`.
#[derive(Args)]
struct Targets {
    /// Output format
    #[arg(default_value_t, long, value_enum)]
    format: Format,
    /// Files or directories to analyze
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,
}

/// Install the stderr subscriber. `-v` forces debug for this crate;
/// otherwise `RUST_LOG` applies, falling back to `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("phpclasscheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| return EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the subcommand and map runtime errors to exit code 3.
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check(targets) => commands::check(&targets.paths, targets.format),
        Commands::Watch(targets) => watch::run(&targets.paths, targets.format),
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(RUNTIME_ERROR)
        },
        Ok(code) => code,
    };
}
