//! theme-json - Theme configuration normalization
//!
//! This crate migrates theme.json documents of any schema version to the
//! current one, merges layered documents (defaults, theme, user) and
//! compiles the result into a stylesheet.

pub mod config;
pub mod error;
pub mod merge;
pub mod migrate;
pub mod schema;
pub mod stylesheet;
pub mod theme;

pub use config::{ConfigError, EffectiveConfig};
pub use error::ThemeJsonError;
pub use merge::{deep_merge, merge_layers};
pub use migrate::{migrate, migrate_with, MigrateOptions, MigrationChain, VariantPolicy};
pub use schema::{detect_version, sanitize, CURRENT_VERSION};
pub use stylesheet::{compile, CompileOptions, StylesheetSection};
pub use theme::{parse_document, read_document, ThemeJson};
