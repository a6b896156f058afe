//! v0 → v1 migration
//!
//! Version 0 documents key both `settings` and `styles` by scope:
//! `defaults` (every block), `root`, and block names that may carry a
//! variant suffix (`core/heading/h1`). Version 1 lifts the defaults and root
//! scopes to the top of each section and moves block scopes under `blocks`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{set_version, Migration};
use crate::merge::{deep_merge, merge_into};
use crate::schema::{Element, ALL_BLOCKS_NAME, BLOCKS_KEY, ELEMENTS_KEY, ROOT_BLOCK_NAME};

/// Block whose heading-level variants style root heading elements.
const HEADING_BLOCK: &str = "core/heading";

/// How settings of variant scopes (`ns/block/variant`) collapse onto `ns/block`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantPolicy {
    /// Keep a setting only when every variant agrees on its value
    #[default]
    Intersect,
    /// Deep-merge the variants in input order, last one wins
    LastWins,
}

impl VariantPolicy {
    /// Returns the configuration spelling of the policy
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantPolicy::Intersect => "intersect",
            VariantPolicy::LastWins => "last-wins",
        }
    }

    /// Parse the configuration spelling of the policy
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "intersect" => Some(VariantPolicy::Intersect),
            "last-wins" => Some(VariantPolicy::LastWins),
            _ => None,
        }
    }

    fn collapse(&self, base: &str, variants: Vec<Value>) -> Map<String, Value> {
        match self {
            VariantPolicy::Intersect => intersect(base, &variants),
            VariantPolicy::LastWins => {
                match variants.into_iter().fold(Value::Object(Map::new()), deep_merge) {
                    Value::Object(map) => map,
                    _ => Map::new(),
                }
            }
        }
    }
}

/// Migration from the scope-keyed v0 layout to v1.
#[derive(Debug, Clone, Copy, Default)]
pub struct V0ToV1 {
    variant_policy: VariantPolicy,
}

impl V0ToV1 {
    pub fn new(variant_policy: VariantPolicy) -> Self {
        Self { variant_policy }
    }

    fn migrate_settings(&self, settings: Value) -> Value {
        let Value::Object(scopes) = settings else {
            return settings;
        };

        let mut defaults = None;
        let mut root = None;
        let mut groups: IndexMap<String, ScopeGroup> = IndexMap::new();

        for (name, scope) in scopes {
            match name.as_str() {
                ALL_BLOCKS_NAME => defaults = Some(scope),
                ROOT_BLOCK_NAME => root = Some(scope),
                _ => {
                    let (base, variant) = split_variant(&name);
                    let group = groups.entry(base.to_string()).or_default();
                    match variant {
                        Some(_) => group.variants.push(scope),
                        None => group.own = Some(scope),
                    }
                }
            }
        }

        let mut output = match defaults.into_iter().chain(root).fold(Value::Null, deep_merge) {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let mut blocks = Map::new();
        for (base, group) in groups {
            let collapsed = if group.variants.is_empty() {
                Map::new()
            } else {
                self.variant_policy.collapse(&base, group.variants)
            };
            let merged = match group.own {
                Some(own) => deep_merge(Value::Object(collapsed), own),
                None => Value::Object(collapsed),
            };
            if merged.as_object().is_some_and(Map::is_empty) {
                continue;
            }
            blocks.insert(base, merged);
        }

        if !blocks.is_empty() {
            merge_into(&mut output, BLOCKS_KEY.to_string(), Value::Object(blocks));
        }

        Value::Object(output)
    }

    fn migrate_styles(&self, styles: Value) -> Value {
        let Value::Object(scopes) = styles else {
            return styles;
        };

        let mut defaults = None;
        let mut root = None;
        let mut heading_elements = Map::new();
        let mut blocks = Map::new();

        for (name, scope) in scopes {
            match name.as_str() {
                ALL_BLOCKS_NAME => defaults = Some(hoist_link(scope)),
                ROOT_BLOCK_NAME => root = Some(hoist_link(scope)),
                _ => {
                    let (base, variant) = split_variant(&name);
                    match variant.and_then(Element::from_name) {
                        Some(element) if base == HEADING_BLOCK && element.is_heading() => {
                            let (rest, link) = split_link(scope);
                            if let Some(link) = link {
                                merge_into(&mut blocks, base.to_string(), link_elements(link));
                            }
                            if rest.as_object().is_some_and(|map| !map.is_empty()) {
                                merge_into(&mut heading_elements, element.name().to_string(), rest);
                            }
                        }
                        _ => merge_into(&mut blocks, base.to_string(), hoist_link(scope)),
                    }
                }
            }
        }

        let mut output = match defaults.into_iter().chain(root).fold(Value::Null, deep_merge) {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        if !heading_elements.is_empty() {
            merge_into(&mut output, ELEMENTS_KEY.to_string(), Value::Object(heading_elements));
        }
        if !blocks.is_empty() {
            merge_into(&mut output, BLOCKS_KEY.to_string(), Value::Object(blocks));
        }

        Value::Object(output)
    }
}

impl Migration for V0ToV1 {
    fn name(&self) -> &'static str {
        "v0-to-v1"
    }

    fn source_version(&self) -> u64 {
        0
    }

    fn target_version(&self) -> u64 {
        1
    }

    fn migrate(&self, document: Value) -> Value {
        let Value::Object(root) = document else {
            return document;
        };

        let mut output = Map::new();
        set_version(&mut output, self.target_version());

        for (key, value) in root {
            match key.as_str() {
                "version" => {}
                "settings" => {
                    output.insert(key, self.migrate_settings(value));
                }
                "styles" => {
                    output.insert(key, self.migrate_styles(value));
                }
                _ => {
                    output.insert(key, value);
                }
            }
        }

        Value::Object(output)
    }
}

/// Scopes sharing one base block name.
#[derive(Debug, Default)]
struct ScopeGroup {
    own: Option<Value>,
    variants: Vec<Value>,
}

/// Split `ns/block/variant` into (`ns/block`, `variant`).
fn split_variant(name: &str) -> (&str, Option<&str>) {
    let mut slashes = name.match_indices('/').map(|(index, _)| index);
    match (slashes.next(), slashes.next()) {
        (Some(_), Some(second)) if second + 1 < name.len() => {
            (&name[..second], Some(&name[second + 1..]))
        }
        _ => (name, None),
    }
}

/// Keep the settings every variant agrees on.
fn intersect(base: &str, variants: &[Value]) -> Map<String, Value> {
    let mut output = Map::new();
    let Some((first, rest)) = variants.split_first() else {
        return output;
    };
    let Some(first) = first.as_object() else {
        return output;
    };

    for (feature, value) in first {
        match value {
            Value::Object(leaves) => {
                let mut agreed = Map::new();
                for (leaf, leaf_value) in leaves {
                    let unanimous = rest.iter().all(|other| {
                        other.get(feature).and_then(|group| group.get(leaf)) == Some(leaf_value)
                    });
                    if unanimous {
                        agreed.insert(leaf.clone(), leaf_value.clone());
                    } else {
                        debug!(block = base, feature = feature.as_str(), setting = leaf.as_str(),
                            "variants disagree, setting dropped");
                    }
                }
                if !agreed.is_empty() {
                    output.insert(feature.clone(), Value::Object(agreed));
                }
            }
            other => {
                if rest.iter().all(|variant| variant.get(feature) == Some(other)) {
                    output.insert(feature.clone(), other.clone());
                } else {
                    debug!(block = base, feature = feature.as_str(), "variants disagree, feature dropped");
                }
            }
        }
    }

    output
}

/// Separate `color.link` from the rest of a styles scope.
///
/// An emptied `color` object is removed.
fn split_link(scope: Value) -> (Value, Option<Value>) {
    let Value::Object(mut scope) = scope else {
        return (scope, None);
    };

    let mut link = None;
    let mut color_emptied = false;
    if let Some(Value::Object(color)) = scope.get_mut("color") {
        link = color.get("link").cloned();
        color.retain(|key, _| key != "link");
        color_emptied = color.is_empty();
    }
    if color_emptied {
        scope.retain(|key, _| key != "color");
    }

    (Value::Object(scope), link)
}

/// Move `color.link` to `elements.link.color.text` within the same scope.
fn hoist_link(scope: Value) -> Value {
    let (rest, link) = split_link(scope);
    match (rest, link) {
        (Value::Object(mut map), Some(link)) => {
            if let Value::Object(elements) = link_elements(link) {
                for (key, value) in elements {
                    merge_into(&mut map, key, value);
                }
            }
            Value::Object(map)
        }
        (rest, _) => rest,
    }
}

/// `{"elements": {"link": {"color": {"text": link}}}}`
fn link_elements(link: Value) -> Value {
    let mut color = Map::new();
    color.insert("text".to_string(), link);
    let mut element = Map::new();
    element.insert("color".to_string(), Value::Object(color));
    let mut elements = Map::new();
    elements.insert(Element::Link.name().to_string(), Value::Object(element));
    let mut scope = Map::new();
    scope.insert(ELEMENTS_KEY.to_string(), Value::Object(elements));
    Value::Object(scope)
}
