//! Preset and custom-property compilation

use serde_json::Value;

use super::properties::{css_value, Declaration};

/// Prefix of preset custom properties.
const PRESET_PREFIX: &str = "--wp--preset--";

/// Prefix of custom-namespace custom properties.
const CUSTOM_PREFIX: &str = "--wp--custom--";

/// A preset-bearing settings feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetKind {
    Color,
    Gradient,
    FontSize,
    FontFamily,
}

/// A utility class derived from a preset: `.has-{slug}-{suffix}{property: ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetClass {
    pub suffix: &'static str,
    pub property: &'static str,
}

impl PresetKind {
    /// Every preset kind, in canonical order.
    pub const ALL: [PresetKind; 4] = [
        PresetKind::Color,
        PresetKind::Gradient,
        PresetKind::FontSize,
        PresetKind::FontFamily,
    ];

    /// Settings path holding the preset list
    pub fn path(&self) -> (&'static str, &'static str) {
        match self {
            PresetKind::Color => ("color", "palette"),
            PresetKind::Gradient => ("color", "gradients"),
            PresetKind::FontSize => ("typography", "fontSizes"),
            PresetKind::FontFamily => ("typography", "fontFamilies"),
        }
    }

    /// Entry key holding the preset value
    pub fn value_key(&self) -> &'static str {
        match self {
            PresetKind::Color => "color",
            PresetKind::Gradient => "gradient",
            PresetKind::FontSize => "size",
            PresetKind::FontFamily => "fontFamily",
        }
    }

    /// Custom-property infix: `--wp--preset--{infix}--{slug}`
    pub fn css_var_infix(&self) -> &'static str {
        match self {
            PresetKind::Color => "color",
            PresetKind::Gradient => "gradient",
            PresetKind::FontSize => "font-size",
            PresetKind::FontFamily => "font-family",
        }
    }

    pub fn classes(&self) -> &'static [PresetClass] {
        match self {
            PresetKind::Color => &[
                PresetClass { suffix: "color", property: "color" },
                PresetClass { suffix: "background-color", property: "background-color" },
                PresetClass { suffix: "border-color", property: "border-color" },
            ],
            PresetKind::Gradient => &[PresetClass { suffix: "gradient-background", property: "background" }],
            PresetKind::FontSize => &[PresetClass { suffix: "font-size", property: "font-size" }],
            PresetKind::FontFamily => &[PresetClass { suffix: "font-family", property: "font-family" }],
        }
    }

    /// Custom-property name for a slug
    pub fn css_var(&self, slug: &str) -> String {
        format!("{}{}--{}", PRESET_PREFIX, self.css_var_infix(), to_kebab_case(slug))
    }

    /// `(slug, value)` pairs of a settings scope, in input order.
    ///
    /// Entries without a slug or a renderable value are skipped.
    pub fn entries(&self, settings: &Value) -> Vec<(String, String)> {
        let (group, key) = self.path();
        let Some(list) = settings.get(group).and_then(|g| g.get(key)).and_then(Value::as_array) else {
            return Vec::new();
        };
        list.iter()
            .filter_map(|entry| {
                let slug = entry.get("slug").and_then(Value::as_str).filter(|slug| !slug.is_empty())?;
                let value = entry.get(self.value_key()).and_then(css_value)?;
                Some((slug.to_string(), value))
            })
            .collect()
    }
}

/// Custom-property declarations of one settings scope: presets first, in
/// canonical kind order, then the flattened `custom` namespace.
pub fn variable_declarations(settings: &Value) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    for kind in PresetKind::ALL {
        for (slug, value) in kind.entries(settings) {
            declarations.push(Declaration::new(kind.css_var(&slug), value));
        }
    }
    if let Some(custom) = settings.get("custom") {
        flatten_custom(custom, CUSTOM_PREFIX, &mut declarations);
    }
    declarations
}

fn flatten_custom(tree: &Value, prefix: &str, declarations: &mut Vec<Declaration>) {
    let Some(map) = tree.as_object() else {
        return;
    };
    for (key, value) in map {
        let name = format!("{}{}", prefix, to_kebab_case(key));
        match value {
            Value::Object(_) => flatten_custom(value, &format!("{}--", name), declarations),
            _ => {
                if let Some(css) = css_value(value) {
                    declarations.push(Declaration::new(name, css));
                }
            }
        }
    }
}

/// Utility class rules for the presets of one settings scope.
///
/// Rules are grouped by class shape, then by entry.
pub fn class_rules(settings: &Value) -> String {
    let mut out = String::new();
    for kind in PresetKind::ALL {
        let entries = kind.entries(settings);
        for class in kind.classes() {
            for (slug, _) in &entries {
                out.push_str(&format!(
                    ".has-{}-{}{{{}: var({}) !important;}}",
                    to_kebab_case(slug),
                    class.suffix,
                    class.property,
                    kind.css_var(slug)
                ));
            }
        }
    }
    out
}

/// Convert a name to `kebab-case`.
///
/// Words are runs of lowercase letters with an optional leading capital,
/// runs of capitals (the last capital starts the next word when a lowercase
/// letter follows it) and runs of digits. Everything else separates words:
/// `XMLHttp2Request` → `xml-http-2-request`.
pub fn to_kebab_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

fn split_words(name: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let end_of = |index: usize| chars.get(index).map_or(name.len(), |(offset, _)| *offset);
    let mut words = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let (start, ch) = chars[i];
        let mut j = i + 1;
        if ch.is_ascii_digit() {
            while j < chars.len() && chars[j].1.is_ascii_digit() {
                j += 1;
            }
        } else if ch.is_uppercase() {
            while j < chars.len() && chars[j].1.is_uppercase() {
                j += 1;
            }
            let followed_by_lower = chars.get(j).is_some_and(|(_, next)| next.is_lowercase());
            if followed_by_lower {
                if j - i > 1 {
                    // acronym ends before the capital that starts the next word
                    j -= 1;
                } else {
                    while j < chars.len() && chars[j].1.is_lowercase() {
                        j += 1;
                    }
                }
            }
        } else if ch.is_lowercase() {
            while j < chars.len() && chars[j].1.is_lowercase() {
                j += 1;
            }
        } else {
            i += 1;
            continue;
        }
        words.push(&name[start..end_of(j)]);
        i = j;
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kebab_case() {
        assert_eq!(to_kebab_case("base-font"), "base-font");
        assert_eq!(to_kebab_case("lineHeight"), "line-height");
        assert_eq!(to_kebab_case("font_size"), "font-size");
        assert_eq!(to_kebab_case("Pale Pink"), "pale-pink");
        assert_eq!(to_kebab_case("trailing_"), "trailing");
        assert_eq!(to_kebab_case("--double--dash"), "double-dash");
    }

    #[test]
    fn test_kebab_case_acronyms_and_digits() {
        assert_eq!(to_kebab_case("ABCDef"), "abc-def");
        assert_eq!(to_kebab_case("XMLHttp2Request"), "xml-http-2-request");
        assert_eq!(to_kebab_case("x2Large"), "x-2-large");
        assert_eq!(to_kebab_case("h1"), "h-1");
        assert_eq!(to_kebab_case("CSS"), "css");
    }

    #[test]
    fn test_preset_declarations_in_kind_order() {
        let settings = json!({
            "typography": {
                "fontFamilies": [{"slug": "small", "fontFamily": "14px"}],
                "fontSizes": [{"slug": "big", "size": "2rem"}]
            },
            "color": {
                "palette": [{"slug": "grey", "color": "grey"}],
                "gradients": [{"slug": "dusk", "gradient": "linear-gradient(red, blue)"}]
            }
        });
        let names: Vec<String> = variable_declarations(&settings).into_iter().map(|d| d.name).collect();

        assert_eq!(
            names,
            [
                "--wp--preset--color--grey",
                "--wp--preset--gradient--dusk",
                "--wp--preset--font-size--big",
                "--wp--preset--font-family--small",
            ]
        );
    }

    #[test]
    fn test_custom_flattening() {
        let settings = json!({
            "custom": {
                "base-font": 16,
                "lineHeight": {"small": 1.2, "large": 1.8},
                "flag": true
            }
        });
        let declarations = variable_declarations(&settings);

        assert_eq!(
            declarations,
            vec![
                Declaration::new("--wp--custom--base-font", "16"),
                Declaration::new("--wp--custom--line-height--small", "1.2"),
                Declaration::new("--wp--custom--line-height--large", "1.8"),
            ]
        );
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let settings = json!({
            "color": {
                "palette": [
                    {"slug": "ok", "color": "#fff"},
                    {"color": "#000"},
                    {"slug": "", "color": "#111"},
                    {"slug": "missing"},
                    "not-an-entry"
                ]
            }
        });

        assert_eq!(
            PresetKind::Color.entries(&settings),
            vec![("ok".to_string(), "#fff".to_string())]
        );
    }

    #[test]
    fn test_class_rules_grouped_by_class() {
        let settings = json!({
            "color": {"palette": [{"slug": "a", "color": "#a"}, {"slug": "b", "color": "#b"}]}
        });
        let css = class_rules(&settings);

        assert!(css.starts_with(
            ".has-a-color{color: var(--wp--preset--color--a) !important;}\
             .has-b-color{color: var(--wp--preset--color--b) !important;}\
             .has-a-background-color"
        ));
        assert!(css.ends_with(".has-b-border-color{border-color: var(--wp--preset--color--b) !important;}"));
    }

    #[test]
    fn test_gradient_and_font_size_classes() {
        let settings = json!({
            "color": {"gradients": [{"slug": "dusk", "gradient": "linear-gradient(red, blue)"}]},
            "typography": {"fontSizes": [{"slug": "huge", "size": "3rem"}]}
        });

        assert_eq!(
            class_rules(&settings),
            ".has-dusk-gradient-background{background: var(--wp--preset--gradient--dusk) !important;}\
             .has-huge-font-size{font-size: var(--wp--preset--font-size--huge) !important;}"
        );
    }
}
