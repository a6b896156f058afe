//! Style property metadata and value resolution

use serde_json::Value;

use crate::schema::FeatureGroup;

/// How a style value maps onto CSS properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// One property, scalar value
    Single,
    /// Scalar, or an object keyed by side (`top`, `right`, `bottom`, `left`)
    Sides,
    /// Scalar, or an object keyed by corner (`topLeft`, ...)
    Corners,
}

/// A CSS property and where its value lives in a styles scope.
#[derive(Debug, Clone, Copy)]
struct Property {
    css: &'static str,
    group: FeatureGroup,
    key: &'static str,
    shape: Shape,
}

const fn property(css: &'static str, group: FeatureGroup, key: &'static str, shape: Shape) -> Property {
    Property { css, group, key, shape }
}

/// Known properties, in emission order.
const PROPERTIES: &[Property] = &[
    property("background", FeatureGroup::Color, "gradient", Shape::Single),
    property("background-color", FeatureGroup::Color, "background", Shape::Single),
    property("border-radius", FeatureGroup::Border, "radius", Shape::Corners),
    property("border-color", FeatureGroup::Border, "color", Shape::Single),
    property("border-width", FeatureGroup::Border, "width", Shape::Single),
    property("border-style", FeatureGroup::Border, "style", Shape::Single),
    property("color", FeatureGroup::Color, "text", Shape::Single),
    property("font-family", FeatureGroup::Typography, "fontFamily", Shape::Single),
    property("font-size", FeatureGroup::Typography, "fontSize", Shape::Single),
    property("font-style", FeatureGroup::Typography, "fontStyle", Shape::Single),
    property("font-weight", FeatureGroup::Typography, "fontWeight", Shape::Single),
    property("letter-spacing", FeatureGroup::Typography, "letterSpacing", Shape::Single),
    property("line-height", FeatureGroup::Typography, "lineHeight", Shape::Single),
    property("margin", FeatureGroup::Spacing, "margin", Shape::Sides),
    property("padding", FeatureGroup::Spacing, "padding", Shape::Sides),
    property("text-decoration", FeatureGroup::Typography, "textDecoration", Shape::Single),
    property("text-transform", FeatureGroup::Typography, "textTransform", Shape::Single),
    property("filter", FeatureGroup::Filter, "duotone", Shape::Single),
];

const SIDES: &[(&str, &str)] = &[
    ("top", "top"),
    ("right", "right"),
    ("bottom", "bottom"),
    ("left", "left"),
];

const CORNERS: &[(&str, &str)] = &[
    ("topLeft", "top-left"),
    ("topRight", "top-right"),
    ("bottomRight", "bottom-right"),
    ("bottomLeft", "bottom-left"),
];

/// A single `name: value;` CSS declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
}

impl Declaration {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Render `selector{name: value;...}`, or nothing when there are no declarations.
pub fn rule(selector: &str, declarations: &[Declaration]) -> String {
    if declarations.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(selector.len() + declarations.len() * 24);
    out.push_str(selector);
    out.push('{');
    for declaration in declarations {
        out.push_str(&declaration.name);
        out.push_str(": ");
        out.push_str(&declaration.value);
        out.push(';');
    }
    out.push('}');
    out
}

/// Resolve `var:a|b|c` preset references to `var(--wp--a--b--c)`.
///
/// Any other value is returned as is.
pub fn resolve_value(value: &str) -> String {
    match value.strip_prefix("var:") {
        Some(reference) if !reference.is_empty() => {
            format!("var(--wp--{})", reference.replace('|', "--"))
        }
        _ => value.to_string(),
    }
}

/// Render a scalar leaf as CSS text. Objects, arrays, booleans and empty
/// strings produce nothing.
pub fn css_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(resolve_value(text)),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Declarations for one styles scope, in canonical property order.
///
/// Unknown groups and keys are ignored.
pub fn style_declarations(scope: &Value) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    for property in PROPERTIES {
        let Some(value) = scope.get(property.group.as_str()).and_then(|group| group.get(property.key)) else {
            continue;
        };

        match (property.shape, value) {
            (Shape::Sides, Value::Object(sides)) => expand(&mut declarations, property.css, sides, SIDES, false),
            (Shape::Corners, Value::Object(corners)) => {
                expand(&mut declarations, property.css, corners, CORNERS, true)
            }
            (_, value) => {
                if let Some(css) = css_value(value) {
                    declarations.push(Declaration::new(property.css, css));
                }
            }
        }
    }

    declarations
}

/// Expand a per-side or per-corner object into longhand properties.
///
/// Corner longhands put the corner between the prefix and suffix:
/// `border-radius` + `top-left` → `border-top-left-radius`.
fn expand(
    declarations: &mut Vec<Declaration>,
    css: &str,
    parts: &serde_json::Map<String, Value>,
    names: &[(&str, &str)],
    infix: bool,
) {
    for (key, suffix) in names {
        let Some(css_text) = parts.get(*key).and_then(css_value) else {
            continue;
        };
        let name = match (infix, css.split_once('-')) {
            (true, Some((head, tail))) => format!("{}-{}-{}", head, suffix, tail),
            _ => format!("{}-{}", css, suffix),
        };
        declarations.push(Declaration::new(name, css_text));
    }
}
