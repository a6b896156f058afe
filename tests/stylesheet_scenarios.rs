//! Stylesheet compilation scenarios
//!
//! A v0 theme merged over an empty document must compile to the golden
//! CSS sections, alone and concatenated.

mod fixtures;

use serde_json::json;
use theme_json::stylesheet::BlockSelectors;
use theme_json::{CompileOptions, StylesheetSection, ThemeJson};

fn merged_theme() -> ThemeJson {
    let base = ThemeJson::new(&json!({}));
    let theme = ThemeJson::new(&fixtures::load_json("stylesheet/v0_theme.json"));
    base.merge(&theme)
}

fn expected(section: &str) -> String {
    fixtures::load_text(&format!("stylesheet/expected_{}.css", section))
}

#[test]
fn test_full_stylesheet() {
    let css = merged_theme().stylesheet(None);

    assert_eq!(
        css,
        format!("{}{}{}", expected("variables"), expected("styles"), expected("presets"))
    );
}

#[test]
fn test_variables_only() {
    let css = merged_theme().stylesheet(Some(&[StylesheetSection::Variables]));
    assert_eq!(css, expected("variables"));
}

#[test]
fn test_styles_only() {
    let css = merged_theme().stylesheet(Some(&[StylesheetSection::Styles]));
    assert_eq!(css, expected("styles"));
}

#[test]
fn test_presets_only() {
    let css = merged_theme().stylesheet(Some(&[StylesheetSection::Presets]));
    assert_eq!(css, expected("presets"));
}

#[test]
fn test_section_filter_concatenates_in_fixed_order() {
    let theme = merged_theme();
    let css = theme.stylesheet(Some(&[StylesheetSection::Presets, StylesheetSection::Variables]));

    assert_eq!(css, format!("{}{}", expected("variables"), expected("presets")));
}

#[test]
fn test_all_sections_equal_no_filter() {
    let theme = merged_theme();

    assert_eq!(
        theme.stylesheet(Some(&StylesheetSection::ALL[..])),
        theme.stylesheet(None)
    );
}

#[test]
fn test_unknown_keys_do_not_reach_output() {
    let css = merged_theme().stylesheet(None);

    assert!(!css.contains("misc"));
    assert!(!css.contains("value"));
}

#[test]
fn test_custom_heading_selector() {
    let options = CompileOptions {
        selectors: BlockSelectors::default().with_selector("core/heading", ".wp-block-heading"),
    };
    let css = merged_theme().stylesheet_with(Some(&[StylesheetSection::Styles]), &options);

    assert!(css.contains(".wp-block-heading a{color: #222;}"));
    assert!(!css.contains("h1 a,h2 a"));
}

#[test]
fn test_user_layer_overrides_theme() {
    let user = ThemeJson::new(&json!({
        "version": 2,
        "settings": {"color": {"palette": [{"slug": "accent", "color": "#f00"}]}},
        "styles": {"color": {"text": "#000"}}
    }));
    let merged = merged_theme().merge(&user);

    let variables = merged.stylesheet(Some(&[StylesheetSection::Variables]));
    assert!(variables.starts_with("body{--wp--preset--color--accent: #f00;--wp--preset--font-family--small: 14px;"));
    assert!(!variables.contains("--wp--preset--color--grey"));

    let styles = merged.stylesheet(Some(&[StylesheetSection::Styles]));
    assert!(styles.starts_with("body{color: #000;}"));
}
