//! Configuration value types.
//!
//! Responsibilities:
//! - Define the accumulator (`AppConfigBuilder`) and snapshot (`AppConfig`) of a load.
//! - Define datasource, permission, locale and charset values.
//!
//! Does NOT handle:
//! - Reading XML documents (see `loader` module).
//! - Resolving resources (see `resource` module).
//!
//! Invariants:
//! - Secrets (datasource passwords) use `secrecy::SecretString` to prevent accidental logging.
//! - Every type that appears in `AppConfig` serializes for the CLI's JSON output.

mod app_config;
mod datasource;
mod locale;
mod permission;

pub use app_config::{AppConfig, AppConfigBuilder, Origin};
pub use datasource::{DataSourceConfig, DataSourceConfigBuilder};
pub use locale::{Charset, Locale, parse_bool};
pub use permission::{
    NamedPermission, PermissionFactory, PermissionLookup, PermissionRegistry, PermissionSet,
    SysPermission, SysPermissionDefinition,
};
