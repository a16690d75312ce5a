//! Environment variable helpers for the loader.
//!
//! Responsibilities:
//! - Read environment variables with empty/whitespace filtering.
//! - Resolve the active profile from `LEAP_PROFILE`.
//! - Collect the process environment as an external property layer.
//!
//! Invariants:
//! - Empty or whitespace-only variables are treated as unset.
//! - Returned values are trimmed.

use std::collections::HashMap;

use crate::constants::PROFILE_ENV_VAR;

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value (leading/trailing whitespace removed) if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// The active profile named by `LEAP_PROFILE`, if any.
pub fn profile_from_env() -> Option<String> {
    env_var_or_none(PROFILE_ENV_VAR)
}

/// Every non-empty, valid-unicode environment variable.
pub(crate) fn env_properties() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .filter(|(_, v)| !v.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_or_none_filters_blank() {
        temp_env::with_var("LEAP_TEST_BLANK", Some("   "), || {
            assert_eq!(env_var_or_none("LEAP_TEST_BLANK"), None);
        });
        temp_env::with_var("LEAP_TEST_PADDED", Some("  dev "), || {
            assert_eq!(env_var_or_none("LEAP_TEST_PADDED"), Some("dev".to_string()));
        });
    }

    #[test]
    #[serial]
    fn test_profile_from_env() {
        temp_env::with_var(PROFILE_ENV_VAR, Some("prod"), || {
            assert_eq!(profile_from_env(), Some("prod".to_string()));
        });
        temp_env::with_var_unset(PROFILE_ENV_VAR, || {
            assert_eq!(profile_from_env(), None);
        });
    }

    #[test]
    #[serial]
    fn test_env_properties_include_set_vars() {
        temp_env::with_var("LEAP_TEST_DB_HOST", Some("db.internal"), || {
            let props = env_properties();
            assert_eq!(
                props.get("LEAP_TEST_DB_HOST").map(String::as_str),
                Some("db.internal")
            );
        });
    }
}
