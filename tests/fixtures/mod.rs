//! Test fixtures for golden-file assertions
//!
//! This module provides test fixtures for:
//! - Migration scenarios (v0 documents, legacy v1 prefixes)
//! - Stylesheet compilation (a v0 theme and its expected CSS sections)

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Root of the fixture tree
pub fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Load a JSON fixture relative to the fixture root
pub fn load_json(relative: &str) -> Value {
    let path = fixtures_dir().join(relative);
    let contents = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    serde_json::from_str(&contents)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
}

/// Load a text fixture relative to the fixture root, without trailing newlines
pub fn load_text(relative: &str) -> String {
    let path = fixtures_dir().join(relative);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
        .trim_end_matches('\n')
        .to_string()
}
