//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `ConfigError` categories to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-6 are reserved for specific error categories.

use leap_config::{ConfigError, ErrorCategory};

/// Structured exit codes for leap-config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - the documents loaded without error.
    Success = 0,

    /// General error - startup failure or unclassified error.
    GeneralError = 1,

    /// Structural error - missing root element, unsupported namespace, import cycle.
    Structural = 2,

    /// Duplication error - a setting, property, datasource or permission defined twice.
    Duplication = 3,

    /// Reference error - missing import or unresolvable permission class.
    Reference = 4,

    /// Invalid value - malformed attribute or element value.
    InvalidValue = 5,

    /// I/O error - unreadable or malformed document.
    Io = 6,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<ErrorCategory> for ExitCode {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Structural => ExitCode::Structural,
            ErrorCategory::Duplication => ExitCode::Duplication,
            ErrorCategory::Reference => ExitCode::Reference,
            ErrorCategory::InvalidValue => ExitCode::InvalidValue,
            ErrorCategory::Io => ExitCode::Io,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        Self::from(err.category())
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Extract the appropriate exit code from this error.
    ///
    /// Returns ExitCode::GeneralError if no ConfigError is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ConfigError>())
            .map_or(ExitCode::GeneralError, ExitCode::from)
    }
}
