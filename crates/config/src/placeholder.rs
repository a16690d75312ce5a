//! `${name}` placeholder substitution.
//!
//! Responsibilities:
//! - Replace `${name}` tokens in attribute values and element text using a caller-supplied lookup.
//! - Resolve nested names (`${db.${env}.url}`) inside-out and resolved values recursively.
//! - Apply the configured policy to tokens the lookup cannot resolve.
//!
//! Does NOT handle:
//! - Deciding where values come from. The loader supplies a lookup that consults
//!   properties loaded so far first, then external properties.
//!
//! Invariants:
//! - Text without the `${` prefix is returned unchanged.
//! - An unclosed `${` is kept verbatim.
//! - A circular reference is an error under every policy.

use std::collections::HashSet;

use thiserror::Error;

use crate::constants::{PLACEHOLDER_PREFIX, PLACEHOLDER_SUFFIX};

/// Errors raised while substituting placeholders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderError {
    #[error("Could not resolve placeholder '{0}'")]
    Unresolvable(String),

    #[error("Circular placeholder reference '{0}'")]
    Circular(String),
}

/// Substitutes `${name}` tokens.
///
/// The default policy is strict: an unresolved token is an error. The loader
/// switches on [`PlaceholderResolver::ignore_unresolvable`] so unknown tokens
/// survive verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaceholderResolver {
    empty_unresolvable: bool,
    ignore_unresolvable: bool,
}

impl PlaceholderResolver {
    /// Create a strict resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace unresolved tokens with the empty string.
    pub fn with_empty_unresolvable(mut self, empty: bool) -> Self {
        self.empty_unresolvable = empty;
        self
    }

    /// Leave unresolved tokens verbatim.
    pub fn with_ignore_unresolvable(mut self, ignore: bool) -> Self {
        self.ignore_unresolvable = ignore;
        self
    }

    pub fn empty_unresolvable(&self) -> bool {
        self.empty_unresolvable
    }

    pub fn ignore_unresolvable(&self) -> bool {
        self.ignore_unresolvable
    }

    /// Resolve every placeholder in `text`.
    pub fn resolve<F>(&self, text: &str, lookup: F) -> Result<String, PlaceholderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if !text.contains(PLACEHOLDER_PREFIX) {
            return Ok(text.to_string());
        }
        let mut visiting = HashSet::new();
        self.parse(text, &lookup, &mut visiting)
    }

    fn parse(
        &self,
        text: &str,
        lookup: &dyn Fn(&str) -> Option<String>,
        visiting: &mut HashSet<String>,
    ) -> Result<String, PlaceholderError> {
        let mut result = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
            result.push_str(&rest[..start]);
            let body = &rest[start + PLACEHOLDER_PREFIX.len()..];

            let Some(end) = find_placeholder_end(body) else {
                result.push_str(&rest[start..]);
                return Ok(result);
            };

            let raw = &rest[start..start + PLACEHOLDER_PREFIX.len() + end + PLACEHOLDER_SUFFIX.len()];
            let key = self.parse(&body[..end], lookup, visiting)?;

            if !visiting.insert(key.clone()) {
                return Err(PlaceholderError::Circular(key));
            }

            let replacement = match lookup(&key) {
                Some(value) => self.parse(&value, lookup, visiting),
                None if self.empty_unresolvable => Ok(String::new()),
                None if self.ignore_unresolvable => Ok(raw.to_string()),
                None => Err(PlaceholderError::Unresolvable(key.clone())),
            };
            visiting.remove(&key);

            result.push_str(&replacement?);
            rest = &body[end + PLACEHOLDER_SUFFIX.len()..];
        }

        result.push_str(rest);
        Ok(result)
    }
}

/// Finds the suffix closing the placeholder whose body starts at `body[0]`.
fn find_placeholder_end(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let prefix = PLACEHOLDER_PREFIX.as_bytes();
    let suffix = PLACEHOLDER_SUFFIX.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i..].starts_with(prefix) {
            depth += 1;
            i += prefix.len();
        } else if bytes[i..].starts_with(suffix) {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
            i += suffix.len();
        } else {
            i += 1;
        }
    }
    None
}
