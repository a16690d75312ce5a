//! Hierarchical XML application configuration for leap.
//!
//! This crate reads one or more `config` documents, following imports and nested
//! blocks, and merges them into a profile-aware [`AppConfig`] of base settings,
//! properties, resources, datasources and permissions.
//!
//! `default-charset` is checked against a fixed table of common encodings; see
//! [`Charset`] for the accepted names and aliases.

pub mod constants;
mod loader;
pub mod placeholder;
pub mod resource;
pub mod types;
pub mod xml;

pub use loader::{
    AppConfigLoader, BoxError, ConfigError, ConfigProcessor, ErrorCategory, LoadContext,
    ProcessorRegistry, PropertyProcessor, env_var_or_none, profile_from_env, profile_matches,
};
pub use placeholder::{PlaceholderError, PlaceholderResolver};
pub use resource::{FileSystemResolver, Resource, ResourceResolver};
pub use types::{
    AppConfig, AppConfigBuilder, Charset, DataSourceConfig, Locale, NamedPermission,
    PermissionRegistry, SysPermission, SysPermissionDefinition,
};
pub use xml::XmlReader;
