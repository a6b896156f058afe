//! Normalized theme documents
//!
//! [`ThemeJson`] owns a document that has been migrated to the current
//! schema version and sanitized against the known vocabulary. Merging and
//! stylesheet compilation operate on these normalized values.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ThemeJsonError;
use crate::merge::deep_merge;
use crate::migrate::{migrate_with, MigrateOptions};
use crate::schema::{detect_version, sanitize};
use crate::stylesheet::{compile, CompileOptions, StylesheetSection};

/// A migrated, sanitized theme configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeJson {
    document: Value,
}

impl Default for ThemeJson {
    fn default() -> Self {
        Self::new(&Value::Object(Map::new()))
    }
}

impl ThemeJson {
    /// Normalize a raw document with default migration options.
    pub fn new(raw: &Value) -> Self {
        Self::with_options(raw, &MigrateOptions::default())
    }

    /// Normalize a raw document.
    pub fn with_options(raw: &Value, options: &MigrateOptions) -> Self {
        let from = detect_version(raw);
        let document = sanitize(&migrate_with(raw, options));
        debug!(from, to = detect_version(&document), "theme document normalized");
        Self { document }
    }

    /// Parse and normalize a JSON document.
    ///
    /// The root must be an object.
    pub fn from_json_str(json: &str, options: &MigrateOptions) -> Result<Self, ThemeJsonError> {
        let raw = parse_document(json)?;
        Ok(Self::with_options(&raw, options))
    }

    /// Read, parse and normalize a JSON file.
    pub fn from_file(path: &Path, options: &MigrateOptions) -> Result<Self, ThemeJsonError> {
        let raw = read_document(path)?;
        Ok(Self::with_options(&raw, options))
    }

    /// Merge `other` over `self`; `other` wins on every shared leaf.
    pub fn merge(&self, other: &ThemeJson) -> ThemeJson {
        let mut document = deep_merge(self.document.clone(), other.document.clone());
        if let Value::Object(map) = &mut document {
            let version = detect_version(&self.document).max(detect_version(&other.document));
            map.insert("version".to_string(), Value::from(version));
        }
        ThemeJson { document }
    }

    /// Merge documents left to right (defaults, theme, user).
    pub fn merge_all<'a>(documents: impl IntoIterator<Item = &'a ThemeJson>) -> ThemeJson {
        documents
            .into_iter()
            .fold(ThemeJson::default(), |merged, next| merged.merge(next))
    }

    /// Schema version of the normalized document
    pub fn version(&self) -> u64 {
        detect_version(&self.document)
    }

    /// The whole normalized document
    pub fn raw_data(&self) -> &Value {
        &self.document
    }

    pub fn into_value(self) -> Value {
        self.document
    }

    /// Top-level settings, including `blocks`. Empty when absent.
    pub fn settings(&self) -> Value {
        self.document
            .get("settings")
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// Compile the stylesheet with default options.
    pub fn stylesheet(&self, filter: Option<&[StylesheetSection]>) -> String {
        self.stylesheet_with(filter, &CompileOptions::default())
    }

    pub fn stylesheet_with(&self, filter: Option<&[StylesheetSection]>, options: &CompileOptions) -> String {
        compile(&self.document, filter, options)
    }
}

/// Parse a raw document without migrating it. The root must be an object.
pub fn parse_document(json: &str) -> Result<Value, ThemeJsonError> {
    let raw: Value = serde_json::from_str(json).map_err(|e| ThemeJsonError::Parse(e.to_string()))?;
    if !raw.is_object() {
        return Err(ThemeJsonError::Malformed(
            "document root must be an object".to_string(),
        ));
    }
    Ok(raw)
}

/// Read a raw document from disk without migrating it.
pub fn read_document(path: &Path) -> Result<Value, ThemeJsonError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| ThemeJsonError::Io(format!("{}: {}", path.display(), e)))?;
    parse_document(&contents).map_err(|e| match e {
        ThemeJsonError::Parse(msg) => ThemeJsonError::Parse(format!("{}: {}", path.display(), msg)),
        ThemeJsonError::Malformed(msg) => {
            ThemeJsonError::Malformed(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CURRENT_VERSION;
    use serde_json::json;

    #[test]
    fn test_default_is_current_and_empty() {
        let theme = ThemeJson::default();
        assert_eq!(theme.version(), CURRENT_VERSION);
        assert_eq!(theme.raw_data(), &json!({"version": CURRENT_VERSION}));
        assert_eq!(theme.settings(), json!({}));
        assert_eq!(theme.stylesheet(None), "");
    }

    #[test]
    fn test_new_migrates_and_sanitizes() {
        let theme = ThemeJson::new(&json!({
            "settings": {
                "root": {"color": {"link": true, "text": "value"}},
                "invalid": true
            },
            "misc": "value"
        }));

        assert_eq!(
            theme.raw_data(),
            &json!({"version": CURRENT_VERSION, "settings": {"color": {"link": true}}})
        );
    }

    #[test]
    fn test_from_json_str_rejects_non_object() {
        let result = ThemeJson::from_json_str("[1, 2, 3]", &MigrateOptions::default());
        assert!(matches!(result, Err(ThemeJsonError::Malformed(_))));

        let result = ThemeJson::from_json_str("{not json", &MigrateOptions::default());
        assert!(matches!(result, Err(ThemeJsonError::Parse(_))));
    }

    #[test]
    fn test_merge_precedence() {
        let base = ThemeJson::new(&json!({
            "version": 2,
            "settings": {"color": {"custom": true, "link": false}}
        }));
        let overlay = ThemeJson::new(&json!({
            "version": 2,
            "settings": {"color": {"link": true}}
        }));
        let merged = base.merge(&overlay);

        assert_eq!(merged.settings(), json!({"color": {"custom": true, "link": true}}));
        assert_eq!(merged.version(), CURRENT_VERSION);
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let base = ThemeJson::new(&json!({"version": 2, "settings": {"color": {"link": false}}}));
        let overlay = ThemeJson::new(&json!({"version": 2, "settings": {"color": {"link": true}}}));
        let before = base.clone();

        let _ = base.merge(&overlay);
        assert_eq!(base, before);
    }

    #[test]
    fn test_merge_all_order() {
        let defaults = ThemeJson::new(&json!({"version": 2, "settings": {"typography": {"dropCap": true}}}));
        let theme = ThemeJson::new(&json!({"version": 2, "settings": {"typography": {"dropCap": false}}}));
        let user = ThemeJson::new(&json!({"version": 2, "settings": {"color": {"link": true}}}));

        let merged = ThemeJson::merge_all([&defaults, &theme, &user]);

        assert_eq!(
            merged.settings(),
            json!({"typography": {"dropCap": false}, "color": {"link": true}})
        );
    }
}
