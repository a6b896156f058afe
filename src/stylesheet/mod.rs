//! Stylesheet compiler
//!
//! Walks a normalized (current-version) document and produces up to three
//! blocks of CSS, always concatenated in this order:
//! 1. variables: custom properties for presets and the `custom` namespace
//! 2. styles: one rule per styles scope and element
//! 3. presets: `.has-*` utility classes for the root presets
//!
//! Compilation never fails. Unknown keys are ignored and empty scopes emit
//! nothing.

mod presets;
mod properties;
mod selectors;

pub use presets::{to_kebab_case, PresetClass, PresetKind};
pub use properties::{resolve_value, Declaration};
pub use selectors::{BlockSelectors, ROOT_SELECTOR};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Element, BLOCKS_KEY, ELEMENTS_KEY};

/// Layout rules emitted right after the root style rule.
pub const LAYOUT_RULES: &str = "body { margin: 0; }\
.wp-site-blocks > .alignleft { float: left; margin-right: 2em; }\
.wp-site-blocks > .alignright { float: right; margin-left: 2em; }\
.wp-site-blocks > .aligncenter { justify-content: center; margin-left: auto; margin-right: auto; }";

/// One of the three stylesheet blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StylesheetSection {
    Variables,
    Styles,
    Presets,
}

impl StylesheetSection {
    /// Every section, in output order.
    pub const ALL: [StylesheetSection; 3] = [
        StylesheetSection::Variables,
        StylesheetSection::Styles,
        StylesheetSection::Presets,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StylesheetSection::Variables => "variables",
            StylesheetSection::Styles => "styles",
            StylesheetSection::Presets => "presets",
        }
    }
}

impl fmt::Display for StylesheetSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StylesheetSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown stylesheet section '{}'", s))
    }
}

/// Inputs to compilation that are not part of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Block name → selector table
    pub selectors: BlockSelectors,
}

/// A scope of the document together with its selector.
#[derive(Debug)]
struct Node<'a> {
    selector: String,
    value: &'a Value,
}

/// Compile a normalized document.
///
/// `filter` selects sections; `None` means all of them. The filter is a set:
/// output order never depends on the order of its items.
pub fn compile(document: &Value, filter: Option<&[StylesheetSection]>, options: &CompileOptions) -> String {
    let mut out = String::new();

    for section in StylesheetSection::ALL {
        if filter.is_some_and(|wanted| !wanted.contains(&section)) {
            continue;
        }
        match section {
            StylesheetSection::Variables => out.push_str(&compile_variables(document, options)),
            StylesheetSection::Styles => out.push_str(&compile_styles(document, options)),
            StylesheetSection::Presets => out.push_str(&compile_presets(document)),
        }
    }

    out
}

fn compile_variables(document: &Value, options: &CompileOptions) -> String {
    setting_nodes(document, options)
        .into_iter()
        .map(|node| properties::rule(&node.selector, &presets::variable_declarations(node.value)))
        .collect()
}

fn compile_styles(document: &Value, options: &CompileOptions) -> String {
    let Some(styles) = document.get("styles") else {
        return String::new();
    };

    let mut out = properties::rule(ROOT_SELECTOR, &properties::style_declarations(styles));
    out.push_str(LAYOUT_RULES);

    for node in element_nodes(styles, None) {
        out.push_str(&properties::rule(&node.selector, &properties::style_declarations(node.value)));
    }
    for (name, block) in blocks(styles) {
        let selector = options.selectors.block(name);
        out.push_str(&properties::rule(&selector, &properties::style_declarations(block)));
        for node in element_nodes(block, Some(&selector)) {
            out.push_str(&properties::rule(&node.selector, &properties::style_declarations(node.value)));
        }
    }

    out
}

fn compile_presets(document: &Value) -> String {
    document
        .get("settings")
        .map(presets::class_rules)
        .unwrap_or_default()
}

/// Root settings first, then every block in document order.
fn setting_nodes<'a>(document: &'a Value, options: &CompileOptions) -> Vec<Node<'a>> {
    let Some(settings) = document.get("settings") else {
        return Vec::new();
    };
    let mut nodes = vec![Node {
        selector: ROOT_SELECTOR.to_string(),
        value: settings,
    }];
    nodes.extend(blocks(settings).map(|(name, block)| Node {
        selector: options.selectors.block(name),
        value: block,
    }));
    nodes
}

/// Elements of a styles scope in canonical element order.
fn element_nodes<'a>(scope: &'a Value, scope_selector: Option<&str>) -> Vec<Node<'a>> {
    let Some(elements) = scope.get(ELEMENTS_KEY) else {
        return Vec::new();
    };
    Element::ALL
        .into_iter()
        .filter_map(|element| {
            let value = elements.get(element.name())?;
            let selector = match scope_selector {
                Some(parent) => BlockSelectors::element_within(parent, element),
                None => element.selector().to_string(),
            };
            Some(Node { selector, value })
        })
        .collect()
}

fn blocks(scope: &Value) -> impl Iterator<Item = (&String, &Value)> {
    scope
        .get(BLOCKS_KEY)
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|blocks| blocks.iter())
}
