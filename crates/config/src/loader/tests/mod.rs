//! Tests for the XML config loader.
//!
//! Responsibilities:
//! - Exercise full loads over documents written to temporary directories.
//! - Cover imports and cycles, profile gating, property/permission/datasource
//!   merge rules, extension processors and the base-settings pre-pass.
//!
//! Invariants:
//! - Every test writes its own documents; temporary directories are cleaned up
//!   automatically via `tempfile`.

use std::path::Path;

use crate::constants::DEFAULT_NAMESPACE_URI;
use crate::resource::Resource;

pub mod profile_tests;

/// Write a `config` document with `body` as its children and return its resource.
pub fn write_config(dir: &Path, name: &str, body: &str) -> Resource {
    write_raw(
        dir,
        name,
        &format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<config xmlns=\"{DEFAULT_NAMESPACE_URI}\">\n{body}\n</config>\n"
        ),
    )
}

/// Write `content` verbatim and return its resource.
pub fn write_raw(dir: &Path, name: &str, content: &str) -> Resource {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    Resource::from_path(&path).unwrap()
}
