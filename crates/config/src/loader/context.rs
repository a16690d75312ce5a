//! Per-branch load state.
//!
//! Responsibilities:
//! - Carry the active profile and inherited default-override flag down the import tree.
//! - Track the chain of resources from the root to the current document (cycle guard).
//! - Give block readers and extension processors access to the shared accumulator
//!   and to placeholder-resolved attribute/text values.
//!
//! Does NOT handle:
//! - Owning the accumulator; it is borrowed from the caller of `load`.
//!
//! Invariants:
//! - A child context copies its parent's chain, so sibling imports never see each
//!   other's resources while an ancestor re-imported below itself is a cycle.

use std::any::Any;

use super::builder::AppConfigLoader;
use super::error::ConfigError;
use crate::resource::Resource;
use crate::types::{AppConfigBuilder, DataSourceConfig, Origin, parse_bool};
use crate::xml::XmlReader;

/// State of one branch of a recursive load.
pub struct LoadContext<'a> {
    loader: &'a AppConfigLoader,
    config: &'a mut AppConfigBuilder,
    profile: Option<String>,
    default_override: bool,
    chain: Vec<String>,
}

impl<'a> LoadContext<'a> {
    pub(crate) fn new(
        loader: &'a AppConfigLoader,
        config: &'a mut AppConfigBuilder,
        profile: Option<String>,
        default_override: bool,
    ) -> Self {
        Self {
            loader,
            config,
            profile,
            default_override,
            chain: Vec::new(),
        }
    }

    /// Context for an imported document: same profile and chain, own override flag.
    pub(crate) fn child(&mut self, default_override: bool) -> LoadContext<'_> {
        LoadContext {
            loader: self.loader,
            config: &mut *self.config,
            profile: self.profile.clone(),
            default_override,
            chain: self.chain.clone(),
        }
    }

    /// Record that `location` is being loaded on this branch.
    pub(crate) fn enter(&mut self, location: &str) -> Result<(), ConfigError> {
        if self.chain.iter().any(|l| l == location) {
            return Err(ConfigError::CycleImport {
                location: location.to_string(),
            });
        }
        self.chain.push(location.to_string());
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.chain.pop();
    }

    pub(crate) fn loader(&self) -> &'a AppConfigLoader {
        self.loader
    }

    /// Active profile name.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Whether declarations in this branch override earlier ones by default.
    pub fn is_default_override(&self) -> bool {
        self.default_override
    }

    /// Resources from the root document down to the current one.
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    pub fn config(&self) -> &AppConfigBuilder {
        &*self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfigBuilder {
        &mut *self.config
    }

    /// Look up a property: loaded properties first, then external ones.
    pub fn property(&self, key: &str) -> Option<String> {
        self.config
            .property(key)
            .or_else(|| self.loader.external_property(key))
            .map(str::to_string)
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.config.add_resource(resource);
    }

    pub fn has_data_source_config(&self, name: &str) -> bool {
        self.config.has_data_source_config(name)
    }

    pub fn has_default_data_source_config(&self) -> bool {
        self.config.has_default_data_source()
    }

    pub fn set_data_source_config(
        &mut self,
        name: impl Into<String>,
        config: DataSourceConfig,
        location: &str,
    ) -> Result<(), ConfigError> {
        self.config.set_data_source_config(name, config, location)
    }

    pub(crate) fn set_data_source_config_from(
        &mut self,
        name: impl Into<String>,
        config: DataSourceConfig,
        origin: Origin,
    ) -> Result<(), ConfigError> {
        self.config.set_data_source_config_from(name, config, origin)
    }

    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.config.extension::<T>()
    }

    pub fn extension_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.config.extension_mut::<T>()
    }

    pub fn set_extension<T: Any + Send + Sync>(&mut self, extension: T) {
        self.config.set_extension(extension);
    }

    /// Substitute placeholders in `raw`.
    pub fn resolve(&self, raw: &str, location: &str) -> Result<String, ConfigError> {
        self.loader
            .placeholder_resolver()
            .resolve(raw, |key| self.property(key))
            .map_err(|cause| ConfigError::Placeholder {
                location: location.to_string(),
                cause,
            })
    }

    /// Resolved attribute of the element under the cursor.
    pub fn attribute(&self, reader: &XmlReader, name: &str) -> Result<Option<String>, ConfigError> {
        match reader.attribute(name) {
            Some(raw) => self.resolve(raw, &reader.location()).map(Some),
            None => Ok(None),
        }
    }

    /// Resolved attribute that must be present and non-empty.
    pub fn required_attribute(
        &self,
        reader: &XmlReader,
        name: &'static str,
    ) -> Result<String, ConfigError> {
        self.attribute(reader, name)?
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingAttribute {
                element: reader.local_name().unwrap_or_default().to_string(),
                attribute: name,
                location: reader.location(),
            })
    }

    /// Resolved boolean attribute; absent or empty yields `default`.
    pub fn bool_attribute(
        &self,
        reader: &XmlReader,
        name: &str,
        default: bool,
    ) -> Result<bool, ConfigError> {
        match self.attribute(reader, name)?.filter(|v| !v.is_empty()) {
            None => Ok(default),
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
                message: "must be a boolean".to_string(),
                location: reader.location(),
            }),
        }
    }

    /// Resolved, trimmed text of the element under the cursor; consumes its end tag.
    pub fn text(&self, reader: &mut XmlReader) -> Result<String, ConfigError> {
        let location = reader.location();
        let raw = reader.read_text()?;
        self.resolve(&raw, &location).map(|s| s.trim().to_string())
    }
}

impl std::fmt::Debug for LoadContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadContext")
            .field("profile", &self.profile)
            .field("default_override", &self.default_override)
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}
