//! v1 legacy prefix removal
//!
//! Early v1 documents spelled several boolean feature flags with a `custom`
//! prefix. This step renames them in place and leaves the version at 1.
//! `border.customRadius` keeps its prefix.

use serde_json::Value;

use super::{any_settings_scope, apply_renames, for_each_settings_scope, has_renamable_key, Migration, Rename};
use crate::schema::detect_version;

/// Legacy flags and their replacements.
const RENAMED_SETTINGS: &[Rename] = &[
    Rename { group: "border", from: "customColor", to: "color" },
    Rename { group: "border", from: "customStyle", to: "style" },
    Rename { group: "border", from: "customWidth", to: "width" },
    Rename { group: "typography", from: "customFontStyle", to: "fontStyle" },
    Rename { group: "typography", from: "customFontWeight", to: "fontWeight" },
    Rename { group: "typography", from: "customLetterSpacing", to: "letterSpacing" },
    Rename { group: "typography", from: "customTextDecorations", to: "textDecoration" },
    Rename { group: "typography", from: "customTextTransforms", to: "textTransform" },
];

/// Prefixed keys that are current spellings and must not be renamed.
pub const PRESERVED_PREFIXED_SETTINGS: &[(&str, &str)] = &[("border", "customRadius")];

/// Rename legacy `customX` settings within version 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveCustomPrefixes;

impl Migration for RemoveCustomPrefixes {
    fn name(&self) -> &'static str {
        "v1-remove-custom-prefixes"
    }

    fn source_version(&self) -> u64 {
        1
    }

    fn target_version(&self) -> u64 {
        1
    }

    fn is_eligible(&self, document: &Value) -> bool {
        detect_version(document) == self.source_version()
            && any_settings_scope(document, |scope| has_renamable_key(scope, RENAMED_SETTINGS))
    }

    fn migrate(&self, document: Value) -> Value {
        let Value::Object(mut root) = document else {
            return document;
        };
        for_each_settings_scope(&mut root, |scope| apply_renames(scope, RENAMED_SETTINGS));
        Value::Object(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preserved_keys_are_never_renamed() {
        for (group, key) in PRESERVED_PREFIXED_SETTINGS {
            assert!(!RENAMED_SETTINGS
                .iter()
                .any(|rename| rename.group == *group && rename.from == *key));
        }
    }

    #[test]
    fn test_border_prefixes() {
        let doc = json!({
            "version": 1,
            "settings": {
                "border": {
                    "customColor": false,
                    "customRadius": false,
                    "customStyle": false,
                    "customWidth": false
                }
            }
        });
        let migrated = RemoveCustomPrefixes.migrate(doc);

        assert_eq!(
            migrated["settings"]["border"],
            json!({"color": false, "customRadius": false, "style": false, "width": false})
        );
        assert_eq!(migrated["version"], 1);
    }

    #[test]
    fn test_typography_irregular_plurals() {
        let doc = json!({
            "version": 1,
            "settings": {
                "blocks": {
                    "core/group": {
                        "typography": {
                            "customTextDecorations": true,
                            "customTextTransforms": true,
                            "customFontSize": true
                        }
                    }
                }
            }
        });
        let migrated = RemoveCustomPrefixes.migrate(doc);

        assert_eq!(
            migrated["settings"]["blocks"]["core/group"]["typography"],
            json!({"textDecoration": true, "textTransform": true, "customFontSize": true})
        );
    }

    #[test]
    fn test_color_group_untouched() {
        let doc = json!({
            "version": 1,
            "settings": {
                "color": {"custom": false, "customGradient": true},
                "border": {"customColor": true}
            }
        });
        let migrated = RemoveCustomPrefixes.migrate(doc);

        assert_eq!(
            migrated["settings"]["color"],
            json!({"custom": false, "customGradient": true})
        );
    }

    #[test]
    fn test_eligibility() {
        let legacy = json!({"version": 1, "settings": {"border": {"customWidth": true}}});
        let legacy_block = json!({
            "version": 1,
            "settings": {"blocks": {"core/group": {"typography": {"customFontWeight": true}}}}
        });
        let clean = json!({"version": 1, "settings": {"border": {"customRadius": true}}});
        let newer = json!({"version": 2, "settings": {"border": {"customWidth": true}}});

        assert!(RemoveCustomPrefixes.is_eligible(&legacy));
        assert!(RemoveCustomPrefixes.is_eligible(&legacy_block));
        assert!(!RemoveCustomPrefixes.is_eligible(&clean));
        assert!(!RemoveCustomPrefixes.is_eligible(&newer));
        assert!(!RemoveCustomPrefixes.is_eligible(&json!({})));
    }

    #[test]
    fn test_styles_untouched() {
        let doc = json!({
            "version": 1,
            "settings": {"border": {"customColor": true}},
            "styles": {"border": {"customColor": "red"}}
        });
        let migrated = RemoveCustomPrefixes.migrate(doc);

        assert_eq!(migrated["styles"], json!({"border": {"customColor": "red"}}));
    }
}
