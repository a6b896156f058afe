//! Schema versions and vocabulary for theme configuration documents.
//!
//! ## Version handling
//! - Documents carry an integer `version` field at the root
//! - A missing or non-integer version means version 0 (the oldest layout)
//! - Versions above [`CURRENT_VERSION`] are passed through untouched
//!
//! ## Unknown keys
//! Keys outside the known vocabulary are tolerated by migration and removed
//! by [`sanitize`], so newer documents degrade instead of failing.

mod vocabulary;

pub use vocabulary::{sanitize, Element, FeatureGroup, VALID_TOP_LEVEL_KEYS};

use serde_json::Value;

/// Schema version produced by a full migration.
pub const CURRENT_VERSION: u64 = 2;

/// Name of the v0 settings/styles scope that applies to every block.
pub const ALL_BLOCKS_NAME: &str = "defaults";

/// Name of the v0 settings/styles scope for the document root.
pub const ROOT_BLOCK_NAME: &str = "root";

/// Key holding per-block scopes from version 1 on.
pub const BLOCKS_KEY: &str = "blocks";

/// Key holding element overrides inside a styles scope.
pub const ELEMENTS_KEY: &str = "elements";

/// Detect the schema version of a raw document.
///
/// Absent, negative, fractional and non-numeric values all yield 0.
pub fn detect_version(document: &Value) -> u64 {
    document
        .get("version")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Returns true if the document is already at (or beyond) the current version.
pub fn is_current(document: &Value) -> bool {
    detect_version(document) >= CURRENT_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_version() {
        assert_eq!(detect_version(&json!({"version": 1})), 1);
        assert_eq!(detect_version(&json!({"version": 2, "settings": {}})), 2);
    }

    #[test]
    fn test_missing_version_is_zero() {
        assert_eq!(detect_version(&json!({"settings": {}})), 0);
        assert_eq!(detect_version(&json!({})), 0);
    }

    #[test]
    fn test_malformed_version_is_zero() {
        assert_eq!(detect_version(&json!({"version": "2"})), 0);
        assert_eq!(detect_version(&json!({"version": -1})), 0);
        assert_eq!(detect_version(&json!({"version": 1.5})), 0);
        assert_eq!(detect_version(&json!({"version": null})), 0);
        assert_eq!(detect_version(&json!({"version": [1]})), 0);
    }

    #[test]
    fn test_non_object_document_is_zero() {
        assert_eq!(detect_version(&json!([1, 2])), 0);
        assert_eq!(detect_version(&json!("version")), 0);
    }

    #[test]
    fn test_future_version_detected() {
        let doc = json!({"version": 7});
        assert_eq!(detect_version(&doc), 7);
        assert!(is_current(&doc));
    }

    #[test]
    fn test_is_current() {
        assert!(is_current(&json!({"version": CURRENT_VERSION})));
        assert!(!is_current(&json!({"version": 1})));
        assert!(!is_current(&json!({})));
    }
}
