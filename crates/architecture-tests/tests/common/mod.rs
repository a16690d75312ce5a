//! Shared helpers for architecture tests.
//!
//! Invariants:
//! - Paths are anchored at the workspace root, independent of the test's working directory.
//! - `target/` directories and this crate itself are never scanned.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

/// The workspace root (two levels above this crate's manifest).
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .expect("architecture-tests lives at crates/architecture-tests")
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && matches!(
            entry.file_name().to_str(),
            Some("target") | Some("architecture-tests")
        )
}

/// All `.rs` files below `crates/`, sorted.
pub fn crate_rust_files() -> Vec<PathBuf> {
    let crates_dir = workspace_root().join("crates");
    assert!(
        crates_dir.exists(),
        "crates/ directory not found at {:?}",
        crates_dir
    );

    let mut files: Vec<PathBuf> = WalkDir::new(&crates_dir)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Whether a file holds tests (a `tests/` directory or a `*_tests.rs` module).
#[allow(dead_code)]
pub fn is_test_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    path_str.contains("/tests/") || path_str.ends_with("_tests.rs")
}
