//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define the single error kind raised by every loading failure.
//! - Classify variants into the categories scripts and hosts react to.
//! - Wrap lower-level failures (I/O, XML syntax, placeholders) with the resource location.
//!
//! Does NOT handle:
//! - Recovering from errors. Any error aborts the whole load and the partially
//!   filled builder must be discarded.
//!
//! Invariants:
//! - Variants raised while reading a document carry its location
//!   (`<resource url> (at byte N)` or the bare resource url).
//! - Wrapped causes are reachable through `std::error::Error::source`.

use thiserror::Error;

use crate::placeholder::PlaceholderError;

/// Boxed cause returned by host-supplied factories and processors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed document structure: missing root, unsupported namespace, import cycle.
    Structural,
    /// A value that may only be defined once was defined again.
    Duplication,
    /// A referenced resource, permission class or classifier could not be resolved.
    Reference,
    /// An attribute or text value could not be interpreted.
    InvalidValue,
    /// Reading a resource or parsing its XML failed.
    Io,
}

/// Errors that can occur while loading configuration documents.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No valid root element found in resource : {location}")]
    NoRootElement { location: String },

    #[error("Namespace uri '{namespace}' not supported, check your config : {location}")]
    UnsupportedNamespace { namespace: String, location: String },

    #[error("Cycle importing detected, please check your config : {location}")]
    CycleImport { location: String },

    #[error("Unexpected end of document in resource : {location}")]
    UnexpectedEof { location: String },

    #[error("{setting} already defined as '{existing}', duplicated config in xml : {location}")]
    DuplicateSetting {
        setting: &'static str,
        existing: String,
        location: String,
    },

    #[error("Found duplicated property '{key}' in resource : {location}")]
    DuplicateProperty { key: String, location: String },

    #[error("Found duplicated datasource '{name}', check your config : {location}")]
    DuplicateDataSource { name: String, location: String },

    #[error("Found duplicated default datasource '{name}', check your config : {location}")]
    DuplicateDefaultDataSource { name: String, location: String },

    #[error("Found duplicated permission '{permission}', source : {location}, {existing}")]
    DuplicatePermission {
        permission: String,
        location: String,
        existing: String,
    },

    #[error("The import resource '{resource}' not exists, source : {location}")]
    ImportNotFound { resource: String, location: String },

    #[error("Permission class '{class}' not found, source : {location}")]
    PermissionClassNotFound { class: String, location: String },

    #[error("Permission type class '{type_name}' not found, source : {location}")]
    PermissionTypeNotFound { type_name: String, location: String },

    #[error(
        "Permission class '{class}' must define a (name, actions) constructor, source : {location}"
    )]
    PermissionNotConstructible { class: String, location: String },

    #[error("Error creating permission instance of class '{class}', source : {location}")]
    PermissionConstruction {
        class: String,
        location: String,
        #[source]
        cause: BoxError,
    },

    #[error("Attribute '{attribute}' of element '{element}' is required, source : {location}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
        location: String,
    },

    #[error("Invalid value '{value}' for '{name}': {message}, source : {location}")]
    InvalidValue {
        name: String,
        value: String,
        message: String,
        location: String,
    },

    #[error("Invalid resource pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Placeholder resolution failed in resource : {location}")]
    Placeholder {
        location: String,
        #[source]
        cause: PlaceholderError,
    },

    #[error("Extension processor for '{namespace}' failed, source : {location}")]
    Extension {
        namespace: String,
        location: String,
        #[source]
        cause: BoxError,
    },

    #[error("Malformed XML in resource : {location}")]
    Xml {
        location: String,
        #[source]
        cause: quick_xml::Error,
    },

    #[error("I/O Exception reading resource : {location}")]
    Io {
        location: String,
        #[source]
        cause: std::io::Error,
    },
}

impl ConfigError {
    /// Returns the category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::NoRootElement { .. }
            | ConfigError::UnsupportedNamespace { .. }
            | ConfigError::CycleImport { .. }
            | ConfigError::UnexpectedEof { .. } => ErrorCategory::Structural,

            ConfigError::DuplicateSetting { .. }
            | ConfigError::DuplicateProperty { .. }
            | ConfigError::DuplicateDataSource { .. }
            | ConfigError::DuplicateDefaultDataSource { .. }
            | ConfigError::DuplicatePermission { .. } => ErrorCategory::Duplication,

            ConfigError::ImportNotFound { .. }
            | ConfigError::PermissionClassNotFound { .. }
            | ConfigError::PermissionTypeNotFound { .. }
            | ConfigError::PermissionNotConstructible { .. }
            | ConfigError::PermissionConstruction { .. } => ErrorCategory::Reference,

            ConfigError::MissingAttribute { .. }
            | ConfigError::InvalidValue { .. }
            | ConfigError::InvalidPattern { .. }
            | ConfigError::Placeholder { .. }
            | ConfigError::Extension { .. } => ErrorCategory::InvalidValue,

            ConfigError::Xml { .. } | ConfigError::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Returns the document location attached to this error, if any.
    pub fn location(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidPattern { .. } => None,
            ConfigError::NoRootElement { location }
            | ConfigError::UnsupportedNamespace { location, .. }
            | ConfigError::CycleImport { location }
            | ConfigError::UnexpectedEof { location }
            | ConfigError::DuplicateSetting { location, .. }
            | ConfigError::DuplicateProperty { location, .. }
            | ConfigError::DuplicateDataSource { location, .. }
            | ConfigError::DuplicateDefaultDataSource { location, .. }
            | ConfigError::DuplicatePermission { location, .. }
            | ConfigError::ImportNotFound { location, .. }
            | ConfigError::PermissionClassNotFound { location, .. }
            | ConfigError::PermissionTypeNotFound { location, .. }
            | ConfigError::PermissionNotConstructible { location, .. }
            | ConfigError::PermissionConstruction { location, .. }
            | ConfigError::MissingAttribute { location, .. }
            | ConfigError::InvalidValue { location, .. }
            | ConfigError::Placeholder { location, .. }
            | ConfigError::Extension { location, .. }
            | ConfigError::Xml { location, .. }
            | ConfigError::Io { location, .. } => Some(location),
        }
    }

    /// Wraps an extension processor failure with the element location.
    pub fn extension(
        namespace: impl Into<String>,
        location: impl Into<String>,
        cause: impl Into<BoxError>,
    ) -> Self {
        ConfigError::Extension {
            namespace: namespace.into(),
            location: location.into(),
            cause: cause.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_of_each_group() {
        let cycle = ConfigError::CycleImport {
            location: "file:///a.xml".to_string(),
        };
        assert_eq!(cycle.category(), ErrorCategory::Structural);

        let dup = ConfigError::DuplicateProperty {
            key: "x".to_string(),
            location: "file:///a.xml".to_string(),
        };
        assert_eq!(dup.category(), ErrorCategory::Duplication);

        let missing = ConfigError::ImportNotFound {
            resource: "b.xml".to_string(),
            location: "file:///a.xml".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Reference);

        let io = ConfigError::Io {
            location: "file:///a.xml".to_string(),
            cause: std::io::Error::other("boom"),
        };
        assert_eq!(io.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_location_is_reported() {
        let err = ConfigError::DuplicateDataSource {
            name: "db".to_string(),
            location: "file:///conf/config.xml (at byte 42)".to_string(),
        };
        assert_eq!(err.location(), Some("file:///conf/config.xml (at byte 42)"));

        let pattern = ConfigError::InvalidPattern {
            pattern: "[".to_string(),
            message: "unclosed".to_string(),
        };
        assert_eq!(pattern.location(), None);
    }

    #[test]
    fn test_io_cause_is_exposed_as_source() {
        use std::error::Error as _;

        let err = ConfigError::Io {
            location: "file:///missing.xml".to_string(),
            cause: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let source = err.source().expect("io error should have a source");
        assert!(source.to_string().contains("no such file"));
        assert!(err.to_string().contains("file:///missing.xml"));
    }
}
