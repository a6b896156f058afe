//! Effective configuration with full provenance
//!
//! The effective config captures the merged configuration plus
//! information about where each value came from.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::defaults::BuiltinDefaults;
use crate::merge::merge_layers;
use crate::migrate::{MigrateOptions, VariantPolicy};
use crate::stylesheet::{BlockSelectors, CompileOptions, StylesheetSection};

/// Project config file name, looked up in the working directory
pub const DEFAULT_PROJECT_CONFIG: &str = "theme-json.toml";

/// Top-level config tables and the keys each one accepts
const KNOWN_KEYS: &[(&str, &[&str])] = &[
    ("stylesheet", &["sections"]),
    ("migration", &["variant_policy"]),
    ("selectors", &[]),
];

/// Host config location: `$HOME/.config/theme-json/config.toml`
pub fn default_host_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/theme-json/config.toml"))
}

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Project,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// The merged configuration object
    pub config: Value,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build effective config from layers
    pub fn build(
        host_config_path: Option<&Path>,
        project_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        let defaults = BuiltinDefaults::default();
        layers.push(defaults.to_value());
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Host config
        if let Some(path) = host_config_path {
            if path.exists() {
                let (value, digest) = Self::load_toml_file(path)?;
                layers.push(value);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Host,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        // Layer 3: Project config
        if let Some(path) = project_config_path {
            if path.exists() {
                let (value, digest) = Self::load_toml_file(path)?;
                layers.push(value);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Project,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            }
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        Self::validate_config(&merged)?;
        debug!(sources = sources.len(), "effective config built");

        Ok(Self {
            config: merged,
            sources,
        })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
        let bytes = fs::read(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        // Compute digest
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        // Parse TOML
        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> Value {
        match toml {
            toml::Value::String(s) => Value::String(s),
            toml::Value::Integer(i) => Value::Number(i.into()),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::String(dt.to_string()),
            toml::Value::Array(arr) => Value::Array(arr.into_iter().map(Self::toml_to_json).collect()),
            toml::Value::Table(table) => {
                let map: serde_json::Map<String, Value> = table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect();
                Value::Object(map)
            }
        }
    }

    /// Validate configuration values
    fn validate_config(config: &Value) -> Result<(), ConfigError> {
        let Some(tables) = config.as_object() else {
            return Err(ConfigError::ValidationError(
                "configuration root must be a table".to_string(),
            ));
        };

        for (table, value) in tables {
            let Some((_, keys)) = KNOWN_KEYS.iter().find(|(name, _)| name == table) else {
                return Err(ConfigError::ValidationError(format!("unknown table '{}'", table)));
            };
            let Some(entries) = value.as_object() else {
                return Err(ConfigError::ValidationError(format!("'{}' must be a table", table)));
            };
            if keys.is_empty() {
                continue;
            }
            if let Some(key) = entries.keys().find(|key| !keys.contains(&key.as_str())) {
                return Err(ConfigError::ValidationError(format!("unknown key '{}.{}'", table, key)));
            }
        }

        // stylesheet.sections must name known sections
        if let Some(sections) = config.get("stylesheet").and_then(|s| s.get("sections")) {
            Self::parse_sections(sections)?;
        }

        // migration.variant_policy must be a known policy
        if let Some(policy) = config.get("migration").and_then(|m| m.get("variant_policy")) {
            Self::parse_variant_policy(policy)?;
        }

        // selectors values must be non-empty strings
        if let Some(selectors) = config.get("selectors").and_then(Value::as_object) {
            for (block, selector) in selectors {
                if !selector.as_str().is_some_and(|s| !s.trim().is_empty()) {
                    return Err(ConfigError::ValidationError(format!(
                        "selector for '{}' must be a non-empty string",
                        block
                    )));
                }
            }
        }

        Ok(())
    }

    fn parse_sections(value: &Value) -> Result<Vec<StylesheetSection>, ConfigError> {
        let items = value.as_array().ok_or_else(|| {
            ConfigError::ValidationError("stylesheet.sections must be an array".to_string())
        })?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| ConfigError::ValidationError("section names must be strings".to_string()))?
                    .parse::<StylesheetSection>()
                    .map_err(ConfigError::ValidationError)
            })
            .collect()
    }

    fn parse_variant_policy(value: &Value) -> Result<VariantPolicy, ConfigError> {
        value.as_str().and_then(VariantPolicy::parse).ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "migration.variant_policy must be \"intersect\" or \"last-wins\", got {}",
                value
            ))
        })
    }

    /// Stylesheet sections to emit
    pub fn sections(&self) -> Vec<StylesheetSection> {
        self.get("stylesheet.sections")
            .and_then(|value| Self::parse_sections(value).ok())
            .unwrap_or_else(|| StylesheetSection::ALL.to_vec())
    }

    /// Options for the migration chain
    pub fn migrate_options(&self) -> MigrateOptions {
        let variant_policy = self
            .get("migration.variant_policy")
            .and_then(|value| Self::parse_variant_policy(value).ok())
            .unwrap_or_default();
        MigrateOptions { variant_policy }
    }

    /// Options for the stylesheet compiler
    pub fn compile_options(&self) -> CompileOptions {
        let mut selectors = BlockSelectors::empty();
        if let Some(table) = self.get("selectors").and_then(Value::as_object) {
            for (block, selector) in table {
                if let Some(selector) = selector.as_str() {
                    selectors.insert(block.clone(), selector);
                }
            }
        }
        CompileOptions { selectors }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a config value as string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
