//! Output formatters for CLI commands.
//!
//! Provides plain text and JSON output for load summaries, merged configs and
//! base settings.

use std::fmt::Write as _;

use anyhow::Result;
use leap_config::types::AppConfigBuilder;
use leap_config::AppConfig;
use serde::Serialize;

use crate::args::OutputFormat;

/// Counts reported by `check`.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub files: Vec<String>,
    pub profile: Option<String>,
    pub properties: usize,
    pub resources: usize,
    pub permissions: usize,
    pub data_sources: usize,
}

impl LoadSummary {
    pub fn new(files: Vec<String>, config: &AppConfig) -> Self {
        Self {
            files,
            profile: config.profile().map(str::to_string),
            properties: config.properties().len(),
            resources: config.resources().len(),
            permissions: config.permissions().len(),
            data_sources: config.data_source_configs().len(),
        }
    }
}

/// Scalars reported by `base`.
#[derive(Debug, Clone, Serialize)]
pub struct BaseSettings {
    pub base_package: Option<String>,
    pub debug: Option<bool>,
    pub default_locale: Option<String>,
    pub default_charset: Option<String>,
}

impl From<&AppConfigBuilder> for BaseSettings {
    fn from(builder: &AppConfigBuilder) -> Self {
        Self {
            base_package: builder.base_package().map(str::to_string),
            debug: builder.debug(),
            default_locale: builder.default_locale().map(ToString::to_string),
            default_charset: builder.default_charset().map(|c| c.name().to_string()),
        }
    }
}

/// Formatter trait for different output types.
pub trait Formatter {
    fn format_summary(&self, summary: &LoadSummary) -> Result<String>;

    fn format_config(&self, config: &AppConfig) -> Result<String>;

    fn format_base(&self, base: &BaseSettings) -> Result<String>;
}

/// Get a formatter for the given output format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_summary(&self, summary: &LoadSummary) -> Result<String> {
        Ok(serde_json::to_string_pretty(summary)?)
    }

    fn format_config(&self, config: &AppConfig) -> Result<String> {
        Ok(serde_json::to_string_pretty(config)?)
    }

    fn format_base(&self, base: &BaseSettings) -> Result<String> {
        Ok(serde_json::to_string_pretty(base)?)
    }
}

/// Plain text formatter.
pub struct TextFormatter;

fn or_unset<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "(unset)".to_string(), |v| v.to_string())
}

impl Formatter for TextFormatter {
    fn format_summary(&self, summary: &LoadSummary) -> Result<String> {
        Ok(format!(
            "OK: {} file(s) loaded (profile: {}) - {} properties, {} resources, {} permissions, {} datasources",
            summary.files.len(),
            summary.profile.as_deref().unwrap_or("none"),
            summary.properties,
            summary.resources,
            summary.permissions,
            summary.data_sources
        ))
    }

    fn format_config(&self, config: &AppConfig) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "profile: {}", config.profile().unwrap_or("none"))?;
        writeln!(out, "base-package: {}", or_unset(config.base_package()))?;
        if !config.additional_packages().is_empty() {
            let packages: Vec<_> = config.additional_packages().iter().map(String::as_str).collect();
            writeln!(out, "additional-packages: {}", packages.join(", "))?;
        }
        writeln!(out, "debug: {}", or_unset(config.debug()))?;
        writeln!(out, "default-locale: {}", or_unset(config.default_locale()))?;
        writeln!(out, "default-charset: {}", or_unset(config.default_charset()))?;

        if !config.properties().is_empty() {
            writeln!(out, "\nproperties:")?;
            for (key, value) in config.properties() {
                writeln!(out, "  {key} = {value}")?;
            }
        }

        if !config.resources().is_empty() {
            writeln!(out, "\nresources:")?;
            for resource in config.resources() {
                writeln!(out, "  {resource}")?;
            }
        }

        if !config.data_source_configs().is_empty() {
            writeln!(out, "\ndatasources:")?;
            for (name, ds) in config.data_source_configs() {
                let mut header = format!("  {name}");
                if ds.is_default() {
                    header.push_str(" (default)");
                }
                if let Some(kind) = ds.data_source_type() {
                    write!(header, " [type: {kind}]")?;
                }
                writeln!(out, "{header}")?;
                for (key, value) in ds.properties() {
                    writeln!(out, "    {key} = {value}")?;
                }
                if ds.password().is_some() {
                    writeln!(out, "    password = <redacted>")?;
                }
            }
        }

        if !config.permissions().is_empty() {
            writeln!(out, "\npermissions:")?;
            for permission in config.permissions() {
                writeln!(out, "  {permission}")?;
            }
        }

        Ok(out.trim_end().to_string())
    }

    fn format_base(&self, base: &BaseSettings) -> Result<String> {
        Ok([
            format!("base-package: {}", or_unset(base.base_package.as_deref())),
            format!("debug: {}", or_unset(base.debug)),
            format!("default-locale: {}", or_unset(base.default_locale.as_deref())),
            format!("default-charset: {}", or_unset(base.default_charset.as_deref())),
        ]
        .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_summary() {
        let summary = LoadSummary {
            files: vec!["a.xml".to_string()],
            profile: None,
            properties: 3,
            resources: 0,
            permissions: 1,
            data_sources: 2,
        };
        let text = TextFormatter.format_summary(&summary).unwrap();
        assert_eq!(
            text,
            "OK: 1 file(s) loaded (profile: none) - 3 properties, 0 resources, 1 permissions, 2 datasources"
        );
    }

    #[test]
    fn test_base_formats() {
        let base = BaseSettings {
            base_package: Some("com.example".to_string()),
            debug: None,
            default_locale: Some("en_US".to_string()),
            default_charset: None,
        };

        let text = TextFormatter.format_base(&base).unwrap();
        assert!(text.contains("base-package: com.example"));
        assert!(text.contains("debug: (unset)"));

        let json: serde_json::Value =
            serde_json::from_str(&JsonFormatter.format_base(&base).unwrap()).unwrap();
        assert_eq!(json["default_locale"], "en_US");
        assert!(json["debug"].is_null());
    }
}
