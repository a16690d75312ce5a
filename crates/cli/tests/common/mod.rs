//! Shared test utilities for leap-config CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write config documents into temp directories.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper will be hermetic by default.
//! - `LEAP_PROFILE` is cleared unless a test sets it explicitly.

use std::path::{Path, PathBuf};

use assert_cmd::Command;

pub const NAMESPACE: &str = "http://www.leapframework.org/schema/config";

/// Returns a hermetic `leap-config` command for integration testing.
pub fn leap_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("leap-config");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");

    cmd.env_remove("LEAP_PROFILE").env_remove("RUST_LOG");

    cmd
}

/// Write a `<config>` document with the given body and return its path.
pub fn write_config(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(
        &path,
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<config xmlns=\"{NAMESPACE}\">\n{body}\n</config>\n"),
    )
    .unwrap();
    path
}
