//! Schema migration chain
//!
//! A document is moved to [`CURRENT_VERSION`] by running an ordered list of
//! steps:
//! 1. v0 → v1: scope reclassification, variant collapse, link hoisting
//! 2. v1 prefix removal: legacy `customX` flags renamed (stays at v1)
//! 3. v1 → v2: remaining legacy spacing/line-height flags renamed
//!
//! Each step is a pure function over a document value. A step only runs when
//! its eligibility predicate holds, so documents already at or above a step's
//! target version pass through it untouched.

mod prefixes;
mod v0;
mod v2;

pub use prefixes::{RemoveCustomPrefixes, PRESERVED_PREFIXED_SETTINGS};
pub use v0::{VariantPolicy, V0ToV1};
pub use v2::V1ToV2;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::schema::{detect_version, BLOCKS_KEY, CURRENT_VERSION};

/// A single migration step.
pub trait Migration {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Version a document must be at for this step to apply
    fn source_version(&self) -> u64;

    /// Version of the document this step produces
    fn target_version(&self) -> u64;

    /// Whether this step applies to the document.
    ///
    /// Defaults to an exact match on the source version.
    fn is_eligible(&self, document: &Value) -> bool {
        detect_version(document) == self.source_version()
    }

    /// Transform a document at `source_version` into one at `target_version`.
    fn migrate(&self, document: Value) -> Value;
}

/// Options that change how the chain treats ambiguous input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateOptions {
    /// How v0 block-variant settings collapse onto their base block
    pub variant_policy: VariantPolicy,
}

/// The ordered list of migration steps.
pub struct MigrationChain {
    steps: Vec<Box<dyn Migration + Send + Sync>>,
}

impl MigrationChain {
    /// The standard chain ending at [`CURRENT_VERSION`].
    pub fn new(options: &MigrateOptions) -> Self {
        Self {
            steps: vec![
                Box::new(V0ToV1::new(options.variant_policy)),
                Box::new(RemoveCustomPrefixes),
                Box::new(V1ToV2),
            ],
        }
    }

    /// Names of the steps, in execution order
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run every eligible step in order.
    pub fn run(&self, document: &Value) -> Value {
        let mut current = document.clone();

        for step in &self.steps {
            if !step.is_eligible(&current) {
                trace!(step = step.name(), "migration step skipped");
                continue;
            }
            let from = detect_version(&current);
            current = step.migrate(current);
            let to = detect_version(&current);
            debug!(step = step.name(), from, to, "migration step applied");
        }

        current
    }
}

impl Default for MigrationChain {
    fn default() -> Self {
        Self::new(&MigrateOptions::default())
    }
}

impl std::fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationChain")
            .field("steps", &self.step_names())
            .field("target", &CURRENT_VERSION)
            .finish()
    }
}

/// Migrate a document to the current schema version with default options.
pub fn migrate(document: &Value) -> Value {
    MigrationChain::default().run(document)
}

/// Migrate a document with explicit options.
pub fn migrate_with(document: &Value, options: &MigrateOptions) -> Value {
    MigrationChain::new(options).run(document)
}

/// Set the `version` field, keeping its position when already present.
pub(crate) fn set_version(document: &mut Map<String, Value>, version: u64) {
    document.insert("version".to_string(), Value::from(version));
}

/// Apply `rewrite` to the top-level settings scope and to every block scope.
pub(crate) fn for_each_settings_scope(
    document: &mut Map<String, Value>,
    mut rewrite: impl FnMut(&mut Map<String, Value>),
) {
    let Some(Value::Object(settings)) = document.get_mut("settings") else {
        return;
    };
    rewrite(settings);
    if let Some(Value::Object(blocks)) = settings.get_mut(BLOCKS_KEY) {
        for block in blocks.values_mut() {
            if let Value::Object(scope) = block {
                rewrite(scope);
            }
        }
    }
}

/// Returns true if any settings scope satisfies `predicate`.
pub(crate) fn any_settings_scope(
    document: &Value,
    predicate: impl Fn(&Map<String, Value>) -> bool,
) -> bool {
    let Some(settings) = document.get("settings").and_then(Value::as_object) else {
        return false;
    };
    if predicate(settings) {
        return true;
    }
    settings
        .get(BLOCKS_KEY)
        .and_then(Value::as_object)
        .map(|blocks| {
            blocks
                .values()
                .filter_map(Value::as_object)
                .any(|scope| predicate(scope))
        })
        .unwrap_or(false)
}

/// A fixed `group.from → group.to` rename.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rename {
    pub group: &'static str,
    pub from: &'static str,
    pub to: &'static str,
}

/// Returns true if the scope holds a key that one of `renames` would move.
pub(crate) fn has_renamable_key(scope: &Map<String, Value>, renames: &[Rename]) -> bool {
    renames.iter().any(|rename| {
        scope
            .get(rename.group)
            .and_then(Value::as_object)
            .is_some_and(|group| group.contains_key(rename.from))
    })
}

/// Rename keys inside the feature groups of one settings scope.
///
/// The renamed key takes the position of the legacy key. When the new key
/// is already present, it wins and the legacy key is dropped.
pub(crate) fn apply_renames(scope: &mut Map<String, Value>, renames: &[Rename]) {
    for (group_key, group_value) in scope.iter_mut() {
        let Value::Object(group) = group_value else {
            continue;
        };
        let applicable: Vec<&Rename> = renames
            .iter()
            .filter(|rename| rename.group == group_key.as_str() && group.contains_key(rename.from))
            .collect();
        if applicable.is_empty() {
            continue;
        }

        let original = std::mem::take(group);
        for (key, value) in original.iter() {
            match applicable.iter().find(|rename| rename.from == key.as_str()) {
                Some(rename) if original.contains_key(rename.to) => {
                    debug!(group = rename.group, from = rename.from, to = rename.to,
                        "legacy key shadowed by explicit key");
                }
                Some(rename) => {
                    group.insert(rename.to.to_string(), value.clone());
                }
                None => {
                    group.insert(key.clone(), value.clone());
                }
            }
        }
    }
}
