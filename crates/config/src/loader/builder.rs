//! Application config loader.
//!
//! Responsibilities:
//! - Provide a builder-pattern `AppConfigLoader` holding the host seams: resource
//!   resolver, active profile, external properties, extension processors,
//!   permission registry and property post-processor.
//! - Drive a full load over one or more root documents into a shared accumulator.
//! - Run the base-settings pre-pass used during bootstrap.
//!
//! Does NOT handle:
//! - Per-element document processing (see `document.rs` and the block readers).
//! - Loading `.env` files (the CLI does that before building the loader).
//!
//! Invariants / Assumptions:
//! - The loader is immutable once built; every load gets its own contexts.
//! - Explicit external properties take precedence over environment variables.
//! - A failed load leaves the accumulator in an unspecified state; callers discard it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::context::LoadContext;
use super::document;
use super::env::env_properties;
use super::error::ConfigError;
use super::extension::{ProcessorRegistry, PropertyProcessor};
use crate::placeholder::PlaceholderResolver;
use crate::resource::{FileSystemResolver, Resource, ResourceResolver};
use crate::types::{AppConfig, AppConfigBuilder, PermissionRegistry};

/// Loader that merges XML config documents into an [`AppConfig`].
pub struct AppConfigLoader {
    resolver: Arc<dyn ResourceResolver>,
    profile: Option<String>,
    external_properties: HashMap<String, String>,
    processors: ProcessorRegistry,
    permissions: PermissionRegistry,
    property_processor: Option<Arc<dyn PropertyProcessor>>,
    placeholder: PlaceholderResolver,
}

impl Default for AppConfigLoader {
    fn default() -> Self {
        Self::new(Arc::new(FileSystemResolver::new()))
    }
}

impl AppConfigLoader {
    /// Create a loader that opens documents through `resolver`.
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self {
            resolver,
            profile: None,
            external_properties: HashMap::new(),
            processors: ProcessorRegistry::default(),
            permissions: PermissionRegistry::default(),
            property_processor: None,
            placeholder: PlaceholderResolver::new().with_ignore_unresolvable(true),
        }
    }

    /// Set the active profile. Blank names mean no profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        let profile = profile.into();
        let profile = profile.trim();
        self.profile = (!profile.is_empty()).then(|| profile.to_string());
        self
    }

    /// Add external properties consulted after the loaded ones.
    pub fn with_external_properties<I, K, V>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.external_properties
            .extend(properties.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Add the process environment as external properties.
    ///
    /// Keys already present (from `with_external_properties`) keep their value.
    pub fn with_env_properties(mut self) -> Self {
        for (key, value) in env_properties() {
            self.external_properties.entry(key).or_insert(value);
        }
        self
    }

    pub fn with_processors(mut self, processors: ProcessorRegistry) -> Self {
        self.processors = processors;
        self
    }

    pub fn with_permission_registry(mut self, permissions: PermissionRegistry) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_property_processor(mut self, processor: Arc<dyn PropertyProcessor>) -> Self {
        self.property_processor = Some(processor);
        self
    }

    /// Replace the placeholder policy (default: leave unresolved tokens verbatim).
    pub fn with_placeholder_resolver(mut self, placeholder: PlaceholderResolver) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn resolver(&self) -> &dyn ResourceResolver {
        self.resolver.as_ref()
    }

    pub fn processors(&self) -> &ProcessorRegistry {
        &self.processors
    }

    pub fn permission_registry(&self) -> &PermissionRegistry {
        &self.permissions
    }

    pub fn property_processor(&self) -> Option<&dyn PropertyProcessor> {
        self.property_processor.as_deref()
    }

    pub fn placeholder_resolver(&self) -> &PlaceholderResolver {
        &self.placeholder
    }

    pub fn external_property(&self, key: &str) -> Option<&str> {
        self.external_properties.get(key).map(String::as_str)
    }

    /// Load `resources` in order into a fresh configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] raised by any document; nothing is
    /// returned for a partially loaded configuration.
    pub fn load(&self, resources: &[Resource]) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfigBuilder::new();
        self.load_into(&mut config, resources)?;
        Ok(config.build())
    }

    /// Load `resources` in order into an existing accumulator.
    ///
    /// Useful after [`AppConfigLoader::load_base_properties`] has run on the same
    /// accumulator; settings read by the pre-pass are not counted twice.
    pub fn load_into(
        &self,
        config: &mut AppConfigBuilder,
        resources: &[Resource],
    ) -> Result<(), ConfigError> {
        config.set_profile(self.profile.clone());

        for resource in resources {
            let mut context = LoadContext::new(self, config, self.profile.clone(), false);
            document::load_resource(&mut context, resource)?;
        }

        tracing::info!(
            profile = ?self.profile,
            properties = config.properties().len(),
            resources = config.resources().len(),
            permissions = config.permissions().len(),
            data_sources = config.data_source_configs().len(),
            "Loaded {} config resource(s)",
            resources.len()
        );
        Ok(())
    }

    /// Read only the base settings (`base-package`, `debug`, `default-locale`,
    /// `default-charset`) of `resource`, following nested config blocks but not imports.
    pub fn load_base_properties(
        &self,
        config: &mut AppConfigBuilder,
        resource: &Resource,
    ) -> Result<(), ConfigError> {
        let mut context = LoadContext::new(self, config, self.profile.clone(), false);
        document::load_base_resource(&mut context, resource)
    }
}

impl fmt::Debug for AppConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut external: Vec<_> = self.external_properties.keys().collect();
        external.sort();
        f.debug_struct("AppConfigLoader")
            .field("profile", &self.profile)
            .field("external_properties", &external)
            .field("processors", &self.processors)
            .field("placeholder", &self.placeholder)
            .finish_non_exhaustive()
    }
}
