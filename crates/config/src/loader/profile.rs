//! Profile gating of config elements.
//!
//! Responsibilities:
//! - Decide whether an element's `if-profile` attribute admits the active profile.
//!
//! Does NOT handle:
//! - Skipping the rejected subtree (callers consume it with `skip_element`).
//!
//! Invariants:
//! - An element without `if-profile` (or with an empty one) always matches.
//! - Matching is case-insensitive.
//! - With no active profile, only ungated elements match.

use crate::constants::IF_PROFILE_ATTRIBUTE;
use crate::xml::XmlReader;

/// Whether `required` admits `active`.
pub fn profile_matches(active: Option<&str>, required: Option<&str>) -> bool {
    match required.map(str::trim).filter(|p| !p.is_empty()) {
        None => true,
        Some(required) => active.is_some_and(|a| a.trim().to_lowercase() == required.to_lowercase()),
    }
}

/// Whether the element under the cursor is admitted by `active`.
pub(crate) fn element_matches(active: Option<&str>, reader: &XmlReader) -> bool {
    let admitted = profile_matches(active, reader.attribute(IF_PROFILE_ATTRIBUTE));
    if !admitted {
        tracing::trace!(
            "Skip element '{}' not enabled for profile {:?}, source : {}",
            reader.local_name().unwrap_or_default(),
            active,
            reader.location()
        );
    }
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungated_always_matches() {
        assert!(profile_matches(None, None));
        assert!(profile_matches(Some("dev"), None));
        assert!(profile_matches(Some("dev"), Some("  ")));
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(profile_matches(Some("PROD"), Some("prod")));
        assert!(profile_matches(Some("prod"), Some("Prod")));
        assert!(!profile_matches(Some("dev"), Some("prod")));
    }

    #[test]
    fn test_gated_element_needs_active_profile() {
        assert!(!profile_matches(None, Some("prod")));
    }
}
