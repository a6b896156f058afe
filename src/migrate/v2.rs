//! v1 → v2 migration
//!
//! Renames the remaining spacing and line-height flags and bumps the version.

use serde_json::Value;

use super::{apply_renames, for_each_settings_scope, set_version, Migration, Rename};

const RENAMED_SETTINGS: &[Rename] = &[
    Rename { group: "spacing", from: "customMargin", to: "margin" },
    Rename { group: "spacing", from: "customPadding", to: "padding" },
    Rename { group: "typography", from: "customLineHeight", to: "lineHeight" },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct V1ToV2;

impl Migration for V1ToV2 {
    fn name(&self) -> &'static str {
        "v1-to-v2"
    }

    fn source_version(&self) -> u64 {
        1
    }

    fn target_version(&self) -> u64 {
        2
    }

    fn migrate(&self, document: Value) -> Value {
        let Value::Object(mut root) = document else {
            return document;
        };
        for_each_settings_scope(&mut root, |scope| apply_renames(scope, RENAMED_SETTINGS));
        set_version(&mut root, self.target_version());
        Value::Object(root)
    }
}
