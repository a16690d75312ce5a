//! Merged application configuration.
//!
//! Responsibilities:
//! - `AppConfigBuilder`: the accumulator shared by every document of one load,
//!   enforcing write-once scalars, datasource uniqueness and permission merging.
//! - `AppConfig`: the immutable snapshot handed to consumers once loading succeeded.
//!
//! Does NOT handle:
//! - Reading documents (see `loader` module).
//! - Property duplicate policy, which depends on the declaring block's override flag.
//!
//! Invariants:
//! - `debug`, `default_locale` and `default_charset` are written at most once per
//!   builder. Re-reading the very element that set a value is not a second write.
//! - At most one datasource in the map is marked default.
//! - A builder whose load failed is discarded, never snapshotted.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::datasource::DataSourceConfig;
use super::locale::{Charset, Locale};
use super::permission::{PermissionSet, SysPermissionDefinition};
use crate::constants::DEFAULT_DATASOURCE_NAME;
use crate::loader::ConfigError;
use crate::resource::Resource;

type ExtensionMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// The element a write-once setting came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    resource: String,
    position: u64,
}

impl Origin {
    pub fn new(resource: impl Into<String>, position: u64) -> Self {
        Self {
            resource: resource.into(),
            position,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.resource, self.position)
    }
}

#[derive(Debug, Clone)]
struct Setting<T> {
    value: T,
    origin: Origin,
}

fn set_once<T: fmt::Display>(
    slot: &mut Option<Setting<T>>,
    setting: &'static str,
    value: T,
    origin: Origin,
) -> Result<(), ConfigError> {
    if let Some(existing) = slot {
        if existing.origin == origin {
            return Ok(());
        }
        return Err(ConfigError::DuplicateSetting {
            setting,
            existing: existing.value.to_string(),
            location: origin.to_string(),
        });
    }
    *slot = Some(Setting { value, origin });
    Ok(())
}

/// Accumulator shared across a whole recursive load.
#[derive(Default)]
pub struct AppConfigBuilder {
    profile: Option<String>,
    base_package: Option<String>,
    additional_packages: IndexSet<String>,
    debug: Option<Setting<bool>>,
    default_locale: Option<Setting<Locale>>,
    default_charset: Option<Setting<Charset>>,
    properties: IndexMap<String, String>,
    property_origins: HashMap<String, Origin>,
    resources: IndexSet<Resource>,
    permissions: PermissionSet,
    data_sources: IndexMap<String, DataSourceConfig>,
    data_source_origins: HashMap<String, Origin>,
    extensions: ExtensionMap,
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_profile(&mut self, profile: Option<String>) {
        self.profile = profile;
    }

    /// Last writer wins.
    pub fn set_base_package(&mut self, base_package: impl Into<String>) {
        self.base_package = Some(base_package.into());
    }

    pub fn base_package(&self) -> Option<&str> {
        self.base_package.as_deref()
    }

    /// Union; packages already present are ignored.
    pub fn add_additional_packages<I, S>(&mut self, packages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_packages
            .extend(packages.into_iter().map(Into::into));
    }

    pub fn set_debug(&mut self, debug: bool, origin: Origin) -> Result<(), ConfigError> {
        set_once(&mut self.debug, "debug", debug, origin)
    }

    pub fn debug(&self) -> Option<bool> {
        self.debug.as_ref().map(|s| s.value)
    }

    pub fn set_default_locale(&mut self, locale: Locale, origin: Origin) -> Result<(), ConfigError> {
        set_once(&mut self.default_locale, "default-locale", locale, origin)
    }

    pub fn default_locale(&self) -> Option<&Locale> {
        self.default_locale.as_ref().map(|s| &s.value)
    }

    pub fn set_default_charset(
        &mut self,
        charset: Charset,
        origin: Origin,
    ) -> Result<(), ConfigError> {
        set_once(&mut self.default_charset, "default-charset", charset, origin)
    }

    pub fn default_charset(&self) -> Option<Charset> {
        self.default_charset.as_ref().map(|s| s.value)
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Store a property, replacing any previous value. Duplicate policy is the caller's.
    pub fn insert_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.property_origins.remove(&key);
        self.properties.insert(key, value.into());
    }

    /// Store a property declared by the element at `origin`.
    pub fn insert_property_from(&mut self, key: impl Into<String>, value: impl Into<String>, origin: Origin) {
        let key = key.into();
        self.property_origins.insert(key.clone(), origin);
        self.properties.insert(key, value.into());
    }

    /// The element that declared `key`, if it came from a document.
    pub fn property_origin(&self, key: &str) -> Option<&Origin> {
        self.property_origins.get(key)
    }

    pub fn add_resource(&mut self, resource: Resource) {
        self.resources.insert(resource);
    }

    pub fn add_resources<I: IntoIterator<Item = Resource>>(&mut self, resources: I) {
        self.resources.extend(resources);
    }

    pub fn resources(&self) -> &IndexSet<Resource> {
        &self.resources
    }

    pub fn add_permission(
        &mut self,
        permission: SysPermissionDefinition,
        override_existing: bool,
    ) -> Result<(), ConfigError> {
        self.permissions.add(permission, override_existing)
    }

    /// Merge an externally supplied batch, e.g. permissions inherited from a parent load.
    pub fn add_permissions<I>(&mut self, permissions: I, override_existing: bool) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = SysPermissionDefinition>,
    {
        self.permissions.add_all(permissions, override_existing)
    }

    pub fn permissions(&self) -> &[SysPermissionDefinition] {
        self.permissions.as_slice()
    }

    pub fn has_data_source_config(&self, name: &str) -> bool {
        self.data_sources.contains_key(name)
    }

    pub fn has_default_data_source(&self) -> bool {
        self.data_sources.values().any(DataSourceConfig::is_default)
    }

    /// Register a datasource. Names are unique and at most one may be default.
    ///
    /// `location` only labels errors: every call made through this method is a
    /// fresh declaration, so a repeated name always fails.
    pub fn set_data_source_config(
        &mut self,
        name: impl Into<String>,
        config: DataSourceConfig,
        location: &str,
    ) -> Result<(), ConfigError> {
        self.register_data_source(name.into(), config, location, None)
    }

    /// Register a datasource read from a document element. Reading the same
    /// element again is a no-op.
    pub(crate) fn set_data_source_config_from(
        &mut self,
        name: impl Into<String>,
        config: DataSourceConfig,
        origin: Origin,
    ) -> Result<(), ConfigError> {
        let location = origin.to_string();
        self.register_data_source(name.into(), config, &location, Some(origin))
    }

    fn register_data_source(
        &mut self,
        name: String,
        config: DataSourceConfig,
        location: &str,
        origin: Option<Origin>,
    ) -> Result<(), ConfigError> {
        if self.has_data_source_config(&name) {
            if origin.is_some() && self.data_source_origins.get(&name) == origin.as_ref() {
                return Ok(());
            }
            return Err(ConfigError::DuplicateDataSource {
                name,
                location: location.to_string(),
            });
        }
        if config.is_default() && self.has_default_data_source() {
            return Err(ConfigError::DuplicateDefaultDataSource {
                name,
                location: location.to_string(),
            });
        }
        if let Some(origin) = origin {
            self.data_source_origins.insert(name.clone(), origin);
        }
        self.data_sources.insert(name, config);
        Ok(())
    }

    pub fn data_source_configs(&self) -> &IndexMap<String, DataSourceConfig> {
        &self.data_sources
    }

    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|e| e.downcast_ref::<T>())
    }

    pub fn extension_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.extensions
            .get_mut(&TypeId::of::<T>())
            .and_then(|e| e.downcast_mut::<T>())
    }

    /// Store `extension` in the slot for its type, replacing any previous value.
    pub fn set_extension<T: Any + Send + Sync>(&mut self, extension: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(extension));
    }

    /// Freeze the accumulated state.
    pub fn build(self) -> AppConfig {
        AppConfig {
            profile: self.profile,
            base_package: self.base_package,
            additional_packages: self.additional_packages,
            debug: self.debug.map(|s| s.value),
            default_locale: self.default_locale.map(|s| s.value),
            default_charset: self.default_charset.map(|s| s.value),
            properties: self.properties,
            resources: self.resources,
            permissions: self.permissions.into_vec(),
            data_sources: self.data_sources,
            extensions: self.extensions,
        }
    }
}

impl fmt::Debug for AppConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfigBuilder")
            .field("profile", &self.profile)
            .field("base_package", &self.base_package)
            .field("properties", &self.properties.len())
            .field("resources", &self.resources.len())
            .field("permissions", &self.permissions.len())
            .field("data_sources", &self.data_sources.len())
            .finish_non_exhaustive()
    }
}

/// Immutable configuration produced by a successful load.
#[derive(Serialize)]
pub struct AppConfig {
    profile: Option<String>,
    base_package: Option<String>,
    additional_packages: IndexSet<String>,
    debug: Option<bool>,
    default_locale: Option<Locale>,
    default_charset: Option<Charset>,
    properties: IndexMap<String, String>,
    resources: IndexSet<Resource>,
    permissions: Vec<SysPermissionDefinition>,
    data_sources: IndexMap<String, DataSourceConfig>,
    #[serde(skip)]
    extensions: ExtensionMap,
}

impl AppConfig {
    /// The profile the configuration was loaded for.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn base_package(&self) -> Option<&str> {
        self.base_package.as_deref()
    }

    pub fn additional_packages(&self) -> &IndexSet<String> {
        &self.additional_packages
    }

    pub fn debug(&self) -> Option<bool> {
        self.debug
    }

    pub fn default_locale(&self) -> Option<&Locale> {
        self.default_locale.as_ref()
    }

    pub fn default_charset(&self) -> Option<Charset> {
        self.default_charset
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn resources(&self) -> &IndexSet<Resource> {
        &self.resources
    }

    /// Permissions in merge order; consumers match first-fit.
    pub fn permissions(&self) -> &[SysPermissionDefinition] {
        &self.permissions
    }

    pub fn data_source_configs(&self) -> &IndexMap<String, DataSourceConfig> {
        &self.data_sources
    }

    pub fn data_source_config(&self, name: &str) -> Option<&DataSourceConfig> {
        self.data_sources.get(name)
    }

    /// The datasource marked default, else the one named `default`.
    pub fn default_data_source(&self) -> Option<(&str, &DataSourceConfig)> {
        self.data_sources
            .iter()
            .find(|(_, conf)| conf.is_default())
            .or_else(|| self.data_sources.get_key_value(DEFAULT_DATASOURCE_NAME))
            .map(|(name, conf)| (name.as_str(), conf))
    }

    pub fn extension<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|e| e.downcast_ref::<T>())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("profile", &self.profile)
            .field("base_package", &self.base_package)
            .field("additional_packages", &self.additional_packages)
            .field("debug", &self.debug)
            .field("default_locale", &self.default_locale)
            .field("default_charset", &self.default_charset)
            .field("properties", &self.properties)
            .field("resources", &self.resources)
            .field("permissions", &self.permissions)
            .field("data_sources", &self.data_sources)
            .finish_non_exhaustive()
    }
}
