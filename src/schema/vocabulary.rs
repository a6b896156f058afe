//! Known settings and styles vocabulary
//!
//! Feature groups and elements are closed sets; everything else is dropped
//! when a document is sanitized.

use serde_json::{Map, Value};

use super::{BLOCKS_KEY, ELEMENTS_KEY};

/// Top-level keys kept by [`sanitize`].
pub const VALID_TOP_LEVEL_KEYS: &[&str] = &[
    "version",
    "settings",
    "styles",
    "customTemplates",
    "templateParts",
];

/// A named category of settings and styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureGroup {
    Border,
    Color,
    Custom,
    Filter,
    Layout,
    Spacing,
    Typography,
}

impl FeatureGroup {
    /// Every feature group, in canonical order.
    pub const ALL: [FeatureGroup; 7] = [
        FeatureGroup::Border,
        FeatureGroup::Color,
        FeatureGroup::Custom,
        FeatureGroup::Filter,
        FeatureGroup::Layout,
        FeatureGroup::Spacing,
        FeatureGroup::Typography,
    ];

    /// Look up a feature group by its document key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == key)
    }

    /// Returns the document key for this group
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureGroup::Border => "border",
            FeatureGroup::Color => "color",
            FeatureGroup::Custom => "custom",
            FeatureGroup::Filter => "filter",
            FeatureGroup::Layout => "layout",
            FeatureGroup::Spacing => "spacing",
            FeatureGroup::Typography => "typography",
        }
    }

    /// Leaf settings this group accepts.
    ///
    /// `Some(&[])` means the group has no settings; `None` means any subtree
    /// is accepted (the `custom` namespace).
    pub fn valid_settings(&self) -> Option<&'static [&'static str]> {
        match self {
            FeatureGroup::Border => Some(&["color", "customRadius", "radius", "style", "width"]),
            FeatureGroup::Color => Some(&[
                "custom",
                "customDuotone",
                "customGradient",
                "duotone",
                "gradients",
                "link",
                "palette",
            ]),
            FeatureGroup::Custom => None,
            FeatureGroup::Filter => Some(&[]),
            FeatureGroup::Layout => Some(&["contentSize", "wideSize"]),
            FeatureGroup::Spacing => Some(&["blockGap", "margin", "padding", "units"]),
            FeatureGroup::Typography => Some(&[
                "customFontSize",
                "dropCap",
                "fontFamilies",
                "fontSizes",
                "fontStyle",
                "fontWeight",
                "letterSpacing",
                "lineHeight",
                "textDecoration",
                "textTransform",
            ]),
        }
    }

    /// Leaf style properties this group accepts.
    pub fn valid_styles(&self) -> &'static [&'static str] {
        match self {
            FeatureGroup::Border => &["color", "radius", "style", "width"],
            FeatureGroup::Color => &["background", "gradient", "text"],
            FeatureGroup::Custom | FeatureGroup::Layout => &[],
            FeatureGroup::Filter => &["duotone"],
            FeatureGroup::Spacing => &["margin", "padding"],
            FeatureGroup::Typography => &[
                "fontFamily",
                "fontSize",
                "fontStyle",
                "fontWeight",
                "letterSpacing",
                "lineHeight",
                "textDecoration",
                "textTransform",
            ],
        }
    }
}

/// A semantic sub-element that can be styled separately from its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Link,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl Element {
    /// Every element, in canonical order.
    pub const ALL: [Element; 7] = [
        Element::Link,
        Element::H1,
        Element::H2,
        Element::H3,
        Element::H4,
        Element::H5,
        Element::H6,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|element| element.name() == name)
    }

    /// Key used under `elements`
    pub fn name(&self) -> &'static str {
        match self {
            Element::Link => "link",
            Element::H1 => "h1",
            Element::H2 => "h2",
            Element::H3 => "h3",
            Element::H4 => "h4",
            Element::H5 => "h5",
            Element::H6 => "h6",
        }
    }

    /// CSS selector matching the element
    pub fn selector(&self) -> &'static str {
        match self {
            Element::Link => "a",
            other => other.name(),
        }
    }

    pub fn is_heading(&self) -> bool {
        !matches!(self, Element::Link)
    }
}

/// Remove every key outside the known vocabulary.
///
/// Expects a migrated document. Non-object input yields an empty object.
pub fn sanitize(document: &Value) -> Value {
    let mut output = Map::new();
    let Some(root) = document.as_object() else {
        return Value::Object(output);
    };

    for (key, value) in root {
        if !VALID_TOP_LEVEL_KEYS.contains(&key.as_str()) {
            continue;
        }
        let sanitized = match key.as_str() {
            "settings" => sanitize_settings_scope(value, true),
            "styles" => sanitize_styles_scope(value, true, true),
            _ => Some(value.clone()),
        };
        if let Some(sanitized) = sanitized {
            output.insert(key.clone(), sanitized);
        }
    }

    Value::Object(output)
}

fn sanitize_settings_scope(scope: &Value, allow_blocks: bool) -> Option<Value> {
    let scope = scope.as_object()?;
    let mut output = Map::new();

    for (key, value) in scope {
        if allow_blocks && key == BLOCKS_KEY {
            if let Some(blocks) = sanitize_blocks(value, |block| sanitize_settings_scope(block, false)) {
                output.insert(key.clone(), blocks);
            }
            continue;
        }
        let Some(group) = FeatureGroup::from_key(key) else {
            continue;
        };
        let kept = match group.valid_settings() {
            None => value.as_object().map(|_| value.clone()),
            Some(valid) => filter_leaves(value, valid),
        };
        if let Some(kept) = kept {
            output.insert(key.clone(), kept);
        }
    }

    non_empty(output)
}

fn sanitize_styles_scope(scope: &Value, allow_blocks: bool, allow_elements: bool) -> Option<Value> {
    let scope = scope.as_object()?;
    let mut output = Map::new();

    for (key, value) in scope {
        if allow_blocks && key == BLOCKS_KEY {
            if let Some(blocks) = sanitize_blocks(value, |block| sanitize_styles_scope(block, false, true)) {
                output.insert(key.clone(), blocks);
            }
            continue;
        }
        if allow_elements && key == ELEMENTS_KEY {
            if let Some(elements) = sanitize_elements(value) {
                output.insert(key.clone(), elements);
            }
            continue;
        }
        let Some(group) = FeatureGroup::from_key(key) else {
            continue;
        };
        if let Some(kept) = filter_leaves(value, group.valid_styles()) {
            output.insert(key.clone(), kept);
        }
    }

    non_empty(output)
}

fn sanitize_elements(elements: &Value) -> Option<Value> {
    let elements = elements.as_object()?;
    let output = elements
        .iter()
        .filter(|(name, _)| Element::from_name(name).is_some())
        .filter_map(|(name, styles)| {
            sanitize_styles_scope(styles, false, false).map(|styles| (name.clone(), styles))
        })
        .collect();
    non_empty(output)
}

fn sanitize_blocks(blocks: &Value, sanitize_block: impl Fn(&Value) -> Option<Value>) -> Option<Value> {
    let blocks = blocks.as_object()?;
    let output = blocks
        .iter()
        .filter_map(|(name, block)| sanitize_block(block).map(|block| (name.clone(), block)))
        .collect();
    non_empty(output)
}

fn filter_leaves(group: &Value, valid: &[&str]) -> Option<Value> {
    let group = group.as_object()?;
    let output = group
        .iter()
        .filter(|(leaf, _)| valid.contains(&leaf.as_str()))
        .map(|(leaf, value)| (leaf.clone(), value.clone()))
        .collect();
    non_empty(output)
}

fn non_empty(map: Map<String, Value>) -> Option<Value> {
    if map.is_empty() {
        None
    } else {
        Some(Value::Object(map))
    }
}
