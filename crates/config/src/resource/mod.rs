//! Resource abstraction for config documents.
//!
//! Responsibilities:
//! - Define `Resource`, the URL-identified handle of a config document or scanned file.
//! - Define the `ResourceResolver` seam through which the host opens, resolves and scans resources.
//!
//! Does NOT handle:
//! - Parsing document content (see `xml` module).
//!
//! Invariants:
//! - Two resources are equal iff their URLs are equal; the URL string is the
//!   identity used for cycle detection and diagnostics.

mod filesystem;

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;
use url::Url;

use crate::loader::ConfigError;

pub use filesystem::FileSystemResolver;

/// A config document or scanned file, identified by URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Resource {
    url: Url,
}

impl Resource {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Build a resource from a filesystem path, making it absolute first.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let absolute = std::path::absolute(path).map_err(|cause| ConfigError::Io {
            location: path.display().to_string(),
            cause,
        })?;
        let url = Url::from_file_path(&absolute).map_err(|_| ConfigError::InvalidValue {
            name: "path".to_string(),
            value: absolute.display().to_string(),
            message: "cannot be expressed as a file url".to_string(),
            location: path.display().to_string(),
        })?;
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The URL string used in diagnostics and cycle tracking.
    pub fn location(&self) -> &str {
        self.url.as_str()
    }

    /// The local path of a `file:` resource.
    pub fn file_path(&self) -> Option<PathBuf> {
        if self.url.scheme() == "file" {
            self.url.to_file_path().ok()
        } else {
            None
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl From<Url> for Resource {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

/// Host-supplied access to resources.
///
/// The loader only ever reaches documents through this trait, so hosts can back
/// it with the filesystem, embedded assets or anything else addressable by URL.
pub trait ResourceResolver: Send + Sync {
    /// Whether the resource can be opened.
    fn exists(&self, resource: &Resource) -> bool;

    /// Open the resource for streaming.
    fn open(&self, resource: &Resource) -> Result<Box<dyn BufRead>, ConfigError>;

    /// Resolve `name` as referenced from `base` (for `<import resource="..."/>`).
    ///
    /// Returns `None` when the name cannot be mapped to any resource.
    fn resolve(&self, base: &Resource, name: &str) -> Option<Resource>;

    /// Find every resource matching `pattern` (for `<resources location="..."/>`).
    fn scan(&self, base: &Resource, pattern: &str) -> Result<Vec<Resource>, ConfigError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_identity_is_url() {
        let a = Resource::new(Url::parse("file:///conf/config.xml").unwrap());
        let b = Resource::new(Url::parse("file:///conf/config.xml").unwrap());
        let c = Resource::new(Url::parse("file:///conf/other.xml").unwrap());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.location(), "file:///conf/config.xml");
    }

    #[test]
    fn test_from_path_builds_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.xml");
        let resource = Resource::from_path(&path).unwrap();
        assert_eq!(resource.url().scheme(), "file");
        assert_eq!(resource.file_path().unwrap(), path);
    }
}
