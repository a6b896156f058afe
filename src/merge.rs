//! Tree merge engine
//!
//! Merges configuration trees with:
//! - Objects: deep-merge by key
//! - Arrays: REPLACE (last wins)
//! - Scalars: override (last wins)
//!
//! Base keys keep their position; keys only present in the overlay are
//! appended in overlay order.

use serde_json::{Map, Value};

/// Deep merge two JSON values.
///
/// Merge semantics:
/// - Objects: deep-merge by key (recursive)
/// - Arrays: REPLACE (second wins entirely)
/// - Scalars: override (second wins)
/// - Null: override (null can override any value)
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both objects: deep merge
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                merge_into(&mut base_map, key, overlay_value);
            }
            Value::Object(base_map)
        }

        // Arrays: REPLACE (no concatenation)
        (Value::Array(_), overlay @ Value::Array(_)) => overlay,

        // Scalars and any other case: overlay wins
        (_, overlay) => overlay,
    }
}

/// Deep merge `value` into `map[key]` in place, keeping the key's position.
pub fn merge_into(map: &mut Map<String, Value>, key: String, value: Value) {
    match map.get_mut(&key) {
        Some(slot) => {
            let existing = std::mem::take(slot);
            *slot = deep_merge(existing, value);
        }
        None => {
            map.insert(key, value);
        }
    }
}

/// Merge multiple layers in order (first is base, last has highest precedence)
pub fn merge_layers(layers: Vec<Value>) -> Value {
    layers.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_override() {
        let base = json!({"color": {"link": false}});
        let overlay = json!({"color": {"link": true}});
        let result = deep_merge(base, overlay);
        assert_eq!(result["color"]["link"], true);
    }

    #[test]
    fn test_object_deep_merge() {
        let base = json!({
            "typography": {
                "dropCap": false,
                "fontStyle": true
            }
        });
        let overlay = json!({
            "typography": {
                "dropCap": true
            }
        });
        let result = deep_merge(base, overlay);

        // dropCap should be overridden
        assert_eq!(result["typography"]["dropCap"], true);
        // fontStyle should be preserved
        assert_eq!(result["typography"]["fontStyle"], true);
    }

    #[test]
    fn test_palette_replace() {
        let base = json!({
            "palette": [
                {"slug": "white", "color": "#fff"},
                {"slug": "black", "color": "#000"},
                {"slug": "red", "color": "#f00"}
            ]
        });
        let overlay = json!({
            "palette": [
                {"slug": "grey", "color": "grey"}
            ]
        });
        let result = deep_merge(base, overlay);

        // Array should be completely replaced
        let palette = result["palette"].as_array().unwrap();
        assert_eq!(palette.len(), 1);
        assert_eq!(palette[0]["slug"], "grey");
    }

    #[test]
    fn test_add_new_key() {
        let base = json!({"a": 1});
        let overlay = json!({"b": 2});
        let result = deep_merge(base, overlay);

        assert_eq!(result["a"], 1);
        assert_eq!(result["b"], 2);
    }

    #[test]
    fn test_null_override() {
        let base = json!({"value": 100});
        let overlay = json!({"value": null});
        let result = deep_merge(base, overlay);

        assert!(result["value"].is_null());
    }

    #[test]
    fn test_object_replaces_scalar() {
        let base = json!({"padding": "10px"});
        let overlay = json!({"padding": {"top": "4px"}});
        let result = deep_merge(base, overlay);

        assert_eq!(result["padding"], json!({"top": "4px"}));
    }

    #[test]
    fn test_merge_preserves_key_order() {
        let base = json!({"a": 1, "b": {"x": 1}, "c": 3});
        let overlay = json!({"d": 4, "b": {"y": 2}, "a": 10});
        let result = deep_merge(base, overlay);

        let keys: Vec<&String> = result.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "b", "c", "d"]);
        let inner: Vec<&String> = result["b"].as_object().unwrap().keys().collect();
        assert_eq!(inner, ["x", "y"]);
    }

    #[test]
    fn test_merge_into_existing_key() {
        let mut map = Map::new();
        map.insert("elements".to_string(), json!({"link": {"color": {"text": "red"}}}));
        map.insert("color".to_string(), json!({"background": "blue"}));

        merge_into(&mut map, "elements".to_string(), json!({"h1": {"typography": {}}}));

        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["elements", "color"]);
        assert_eq!(map["elements"]["link"]["color"]["text"], "red");
        assert!(map["elements"].get("h1").is_some());
    }

    #[test]
    fn test_merge_layers() {
        let defaults = json!({
            "color": {"custom": true, "link": false},
            "typography": {"dropCap": true}
        });
        let theme = json!({
            "color": {"link": true}
        });
        let user = json!({
            "typography": {"dropCap": false}
        });

        let result = merge_layers(vec![defaults, theme, user]);

        assert_eq!(result["color"]["custom"], true);
        assert_eq!(result["color"]["link"], true);
        assert_eq!(result["typography"]["dropCap"], false);
    }

    #[test]
    fn test_merge_layers_empty() {
        assert!(merge_layers(Vec::new()).is_null());
    }

    #[test]
    fn test_nested_deep_merge() {
        let base = json!({
            "custom": {
                "line-height": {
                    "small": 1.2,
                    "medium": 1.4
                }
            }
        });
        let overlay = json!({
            "custom": {
                "line-height": {
                    "medium": 1.5,
                    "large": 1.8
                }
            }
        });
        let result = deep_merge(base, overlay);

        assert_eq!(result["custom"]["line-height"]["small"], 1.2);
        assert_eq!(result["custom"]["line-height"]["medium"], 1.5);
        assert_eq!(result["custom"]["line-height"]["large"], 1.8);
    }
}
