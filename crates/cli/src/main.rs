//! leap-config - Command-line front end for the leap XML config loader.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Load config documents through `leap_config::AppConfigLoader`.
//! - Print summaries or the merged config in text or JSON.
//!
//! Does NOT handle:
//! - Config semantics (see `crates/config`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing to allow `.env` to provide clap defaults.
//! - Logs go to stderr; stdout carries only command output.

mod args;
mod dispatch;
mod dotenv;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Load .env file BEFORE CLI parsing so clap env defaults can read .env values
    if let Err(e) = dotenv::load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
