//! Built-in defaults (layer 1)
//!
//! Hardcoded defaults for all configuration values.

use serde::{Deserialize, Serialize};

use crate::migrate::VariantPolicy;
use crate::stylesheet::{BlockSelectors, StylesheetSection};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Stylesheet sections to emit (default: all, in output order)
    pub sections: Vec<StylesheetSection>,

    /// Variant collapse policy for v0 settings (default: "intersect")
    pub variant_policy: VariantPolicy,

    /// Block selector table (default: core/heading → h1..h6)
    pub selectors: BlockSelectors,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            sections: StylesheetSection::ALL.to_vec(),
            variant_policy: VariantPolicy::default(),
            selectors: BlockSelectors::default(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        let sections: Vec<&str> = self.sections.iter().map(StylesheetSection::as_str).collect();
        let selectors: serde_json::Map<String, serde_json::Value> = self
            .selectors
            .iter()
            .map(|(block, selector)| (block.to_string(), serde_json::Value::from(selector)))
            .collect();

        serde_json::json!({
            "stylesheet": {
                "sections": sections
            },
            "migration": {
                "variant_policy": self.variant_policy.as_str()
            },
            "selectors": selectors
        })
    }
}
