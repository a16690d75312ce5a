//! Filesystem-backed `ResourceResolver`.
//!
//! Responsibilities:
//! - Open `file:` resources.
//! - Resolve import names: relative to the importing document, absolute paths,
//!   `file:` urls, and `classpath:` names against configured root directories.
//! - Scan glob patterns for `<resources location="..."/>`.
//!
//! Does NOT handle:
//! - Non-file url schemes (they never exist for this resolver).
//!
//! Invariants:
//! - Scan results are sorted so repeated loads see the same order.
//! - Only regular files are returned by a scan.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use url::Url;

use super::{Resource, ResourceResolver};
use crate::constants::{CLASSPATH_ALL_PREFIX, CLASSPATH_PREFIX};
use crate::loader::ConfigError;

/// Resolves resources on the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSystemResolver {
    roots: Vec<PathBuf>,
}

impl FileSystemResolver {
    /// Create a resolver without `classpath:` roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root directory searched by `classpath:` names, in insertion order.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn classpath_name(name: &str) -> Option<&str> {
        name.strip_prefix(CLASSPATH_ALL_PREFIX)
            .or_else(|| name.strip_prefix(CLASSPATH_PREFIX))
            .map(|rest| rest.trim_start_matches('/'))
    }

    fn base_dir(base: &Resource) -> Option<PathBuf> {
        base.file_path()
            .and_then(|path| path.parent().map(Path::to_path_buf))
    }

    fn to_resource(path: &Path) -> Option<Resource> {
        let absolute = std::path::absolute(path).ok()?;
        Url::from_file_path(absolute).ok().map(Resource::new)
    }

    /// Expand a scan pattern into the absolute glob patterns it stands for.
    fn expand_pattern(&self, base: &Resource, pattern: &str) -> Vec<PathBuf> {
        if let Some(rest) = Self::classpath_name(pattern) {
            return self.roots.iter().map(|root| root.join(rest)).collect();
        }
        if let Ok(url) = Url::parse(pattern)
            && url.scheme() == "file"
            && let Ok(path) = url.to_file_path()
        {
            return vec![path];
        }
        let path = Path::new(pattern);
        if path.is_absolute() {
            return vec![path.to_path_buf()];
        }
        match Self::base_dir(base) {
            Some(dir) => vec![dir.join(path)],
            None => self.roots.iter().map(|root| root.join(path)).collect(),
        }
    }
}

impl ResourceResolver for FileSystemResolver {
    fn exists(&self, resource: &Resource) -> bool {
        resource.file_path().is_some_and(|path| path.is_file())
    }

    fn open(&self, resource: &Resource) -> Result<Box<dyn BufRead>, ConfigError> {
        let path = resource.file_path().ok_or_else(|| ConfigError::Io {
            location: resource.location().to_string(),
            cause: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "only file resources can be opened",
            ),
        })?;
        let file = File::open(&path).map_err(|cause| ConfigError::Io {
            location: resource.location().to_string(),
            cause,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn resolve(&self, base: &Resource, name: &str) -> Option<Resource> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        if let Some(rest) = Self::classpath_name(name) {
            let found = self
                .roots
                .iter()
                .map(|root| root.join(rest))
                .find(|path| path.is_file());
            return match found {
                Some(path) => Self::to_resource(&path),
                None => self.roots.first().and_then(|root| Self::to_resource(&root.join(rest))),
            };
        }

        if let Ok(url) = Url::parse(name)
            && url.scheme().len() > 1
        {
            return Some(Resource::new(url));
        }

        let path = Path::new(name);
        if path.is_absolute() {
            return Self::to_resource(path);
        }

        base.url().join(name).ok().map(Resource::new)
    }

    fn scan(&self, base: &Resource, pattern: &str) -> Result<Vec<Resource>, ConfigError> {
        let mut found = Vec::new();

        for full in self.expand_pattern(base, pattern) {
            let full_pattern = full.to_string_lossy();
            let entries =
                glob::glob(&full_pattern).map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;

            for entry in entries {
                match entry {
                    Ok(path) if path.is_file() => {
                        if let Some(resource) = Self::to_resource(&path) {
                            found.push(resource);
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!("Error reading scan entry for '{}': {}", pattern, e);
                    }
                }
            }
        }

        found.sort();
        found.dedup();
        Ok(found)
    }
}
