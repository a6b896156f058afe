//! Block selector resolution

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::Element;

/// Selector used for the root settings and styles scope.
pub const ROOT_SELECTOR: &str = "body";

/// Selectors of blocks that do not follow the `.wp-block-*` convention.
const DEFAULT_OVERRIDES: &[(&str, &str)] = &[("core/heading", "h1,h2,h3,h4,h5,h6")];

/// Maps block names to CSS selectors.
///
/// Blocks without an explicit entry get `.wp-block-<name>` for the `core`
/// namespace and `.wp-block-<namespace>-<name>` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockSelectors {
    overrides: BTreeMap<String, String>,
}

impl Default for BlockSelectors {
    fn default() -> Self {
        Self {
            overrides: DEFAULT_OVERRIDES
                .iter()
                .map(|(block, selector)| (block.to_string(), selector.to_string()))
                .collect(),
        }
    }
}

impl BlockSelectors {
    /// A table without any explicit selectors
    pub fn empty() -> Self {
        Self {
            overrides: BTreeMap::new(),
        }
    }

    /// Register an explicit selector for a block
    pub fn with_selector(mut self, block: impl Into<String>, selector: impl Into<String>) -> Self {
        self.overrides.insert(block.into(), selector.into());
        self
    }

    pub fn insert(&mut self, block: impl Into<String>, selector: impl Into<String>) {
        self.overrides.insert(block.into(), selector.into());
    }

    /// Explicit entries, sorted by block name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .map(|(block, selector)| (block.as_str(), selector.as_str()))
    }

    /// Selector for a block name
    pub fn block(&self, name: &str) -> String {
        if let Some(selector) = self.overrides.get(name) {
            return selector.clone();
        }
        let class = name.strip_prefix("core/").unwrap_or(name).replace('/', "-");
        format!(".wp-block-{}", class)
    }

    /// Selector for an element nested in a block selector.
    ///
    /// Every comma-separated part of the block selector gets the element as
    /// a descendant.
    pub fn element_within(scope_selector: &str, element: Element) -> String {
        scope_selector
            .split(',')
            .map(|part| format!("{} {}", part.trim(), element.selector()))
            .collect::<Vec<_>>()
            .join(",")
    }
}
