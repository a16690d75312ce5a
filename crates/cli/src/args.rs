//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse `KEY=VALUE` external properties.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load config documents (see `leap_config::AppConfigLoader`).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "leap-config")]
#[command(about = "Load, validate and inspect leap XML application config", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  leap-config check conf/config.xml\n  leap-config --profile prod show conf/config.xml\n  leap-config --classpath src/main/resources --property db.host=localhost show conf/config.xml\n  leap-config -o json base conf/config.xml\n"
)]
pub struct Cli {
    /// Active profile; elements with a non-matching `if-profile` are skipped
    #[arg(long, global = true, env = "LEAP_PROFILE")]
    pub profile: Option<String>,

    /// Root directory for `classpath:` names (repeatable, searched in order)
    #[arg(long, global = true, value_name = "DIR")]
    pub classpath: Vec<PathBuf>,

    /// External property used for placeholder resolution (repeatable)
    #[arg(long = "property", short = 'D', global = true, value_name = "KEY=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// Also resolve placeholders against environment variables
    #[arg(long, global = true)]
    pub env_properties: bool,

    /// Log loader activity to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the documents and report whether the merged config is valid
    Check {
        /// Root config documents, loaded in order
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Load the documents and print the merged config (secrets redacted)
    Show {
        /// Root config documents, loaded in order
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Read only the base settings of one document
    Base {
        /// Config document to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parse a `KEY=VALUE` pair. The key must be non-empty; the value may be empty.
fn parse_property(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid property '{raw}': expected KEY=VALUE"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid property '{raw}': key must not be empty"));
    }
    Ok((key.to_string(), value.to_string()))
}
