//! XML application config loader.
//!
//! Responsibilities:
//! - Merge one or more XML config documents, following imports, into an `AppConfig`.
//! - Provide a builder-pattern `AppConfigLoader` carrying the host seams.
//! - Expose the per-branch `LoadContext` and the extension traits to processors.
//!
//! Does NOT handle:
//! - Locating documents on disk or elsewhere (see `resource` module).
//! - XML tokenizing (see `xml` module).
//!
//! Invariants / Assumptions:
//! - Accumulated state is shared by the whole load; profile, override flag and
//!   import chain belong to the branch.
//! - Any error aborts the load; there is no partial success.

mod builder;
mod context;
mod datasource;
mod document;
mod env;
mod error;
mod extension;
mod permissions;
mod profile;
mod properties;

#[cfg(test)]
mod tests;

pub use builder::AppConfigLoader;
pub use context::LoadContext;
pub use env::{env_var_or_none, profile_from_env};
pub use error::{BoxError, ConfigError, ErrorCategory};
pub use extension::{ConfigProcessor, ProcessorRegistry, PropertyProcessor};
pub use profile::profile_matches;
