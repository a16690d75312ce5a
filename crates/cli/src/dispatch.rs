//! Command dispatch logic for the CLI.
//!
//! Responsibilities:
//! - Build an `AppConfigLoader` from the global options.
//! - Route parsed subcommands to the loader and the selected formatter.
//!
//! Does NOT handle:
//! - Argument parsing (see `args`).
//! - Mapping errors to exit codes (see `error`).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use leap_config::types::AppConfigBuilder;
use leap_config::{AppConfigLoader, FileSystemResolver, Resource};

use crate::args::{Cli, Commands};
use crate::formatters::{BaseSettings, LoadSummary, get_formatter};

/// Build the loader described by the global options.
pub fn build_loader(cli: &Cli) -> AppConfigLoader {
    let resolver = cli
        .classpath
        .iter()
        .fold(FileSystemResolver::new(), |resolver, root| {
            resolver.with_root(root.clone())
        });

    let mut loader = AppConfigLoader::new(Arc::new(resolver))
        .with_external_properties(cli.properties.iter().cloned());
    if let Some(profile) = &cli.profile {
        loader = loader.with_profile(profile.clone());
    }
    if cli.env_properties {
        loader = loader.with_env_properties();
    }
    loader
}

fn to_resources(files: &[PathBuf]) -> Result<Vec<Resource>> {
    files
        .iter()
        .map(|file| {
            Resource::from_path(file)
                .with_context(|| format!("Invalid config path '{}'", file.display()))
        })
        .collect()
}

fn display_names(files: &[PathBuf]) -> Vec<String> {
    files.iter().map(|f| f.display().to_string()).collect()
}

fn load(loader: &AppConfigLoader, files: &[PathBuf]) -> Result<leap_config::AppConfig> {
    let resources = to_resources(files)?;
    loader
        .load(&resources)
        .context("Failed to load application config")
}

/// Run the parsed command, printing its output to stdout.
pub fn run_command(cli: Cli) -> Result<()> {
    let loader = build_loader(&cli);
    tracing::debug!(?loader, "Loader configured");
    let formatter = get_formatter(cli.output);

    let output = match &cli.command {
        Commands::Check { files } => {
            let config = load(&loader, files)?;
            formatter.format_summary(&LoadSummary::new(display_names(files), &config))?
        }
        Commands::Show { files } => {
            let config = load(&loader, files)?;
            formatter.format_config(&config)?
        }
        Commands::Base { file } => {
            let base = load_base(&loader, file)?;
            formatter.format_base(&base)?
        }
    };

    println!("{output}");
    Ok(())
}

fn load_base(loader: &AppConfigLoader, file: &Path) -> Result<BaseSettings> {
    let resource = Resource::from_path(file)
        .with_context(|| format!("Invalid config path '{}'", file.display()))?;
    let mut builder = AppConfigBuilder::new();
    loader
        .load_base_properties(&mut builder, &resource)
        .context("Failed to read base settings")?;
    Ok(BaseSettings::from(&builder))
}
