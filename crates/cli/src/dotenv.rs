//! `.env` loading for the CLI.
//!
//! Responsibilities:
//! - Load a `.env` file from the working directory before argument parsing, so
//!   `LEAP_PROFILE` and other clap env defaults can come from it.
//! - Honor the `DOTENV_DISABLED` gate.
//!
//! Invariants:
//! - Missing `.env` files are silently ignored.
//! - Error messages never include raw `.env` line contents.

use std::io::ErrorKind;

use thiserror::Error;

/// Errors from loading the `.env` file.
#[derive(Error, Debug)]
pub enum DotenvError {
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    Parse { error_index: usize },

    #[error("Failed to read .env file: {kind}")]
    Io { kind: ErrorKind },

    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    Unknown,
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var("DOTENV_DISABLED").ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Check if a dotenv error indicates the file was not found.
fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == ErrorKind::NotFound
    )
}

/// Load environment variables from `.env` if present and not disabled.
pub fn load_dotenv() -> Result<(), DotenvError> {
    if dotenv_disabled() {
        return Ok(());
    }

    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if is_not_found(&e) => Ok(()),
        Err(dotenvy::Error::LineParse(_, idx)) => Err(DotenvError::Parse { error_index: idx }),
        Err(dotenvy::Error::Io(io_err)) => Err(DotenvError::Io {
            kind: io_err.kind(),
        }),
        Err(_) => Err(DotenvError::Unknown),
    }
}
