//! Lenient model of the third-party preset export format.
//!
//! An export file carries a `prompts` array and a `prompt_order` section:
//! a list of `{character_id, order}` scopes where each order entry names a
//! prompt by `identifier` and carries an `enabled` flag. Field names are
//! fixed by the external tool. Real exports are frequently hand-edited, so
//! everything beyond the top-level JSON shape is parsed leniently: a
//! malformed order section degrades to file-declaration order instead of
//! failing the file.

use serde::Deserialize;
use serde_json::Value;

/// Top-level shape of an export file.
#[derive(Debug, Deserialize)]
pub struct ExportFile {
    /// Raw prompt records; entries are validated individually.
    #[serde(default)]
    pub prompts: Vec<Value>,

    /// Raw order section; interpreted by [`resolve_order`].
    #[serde(default)]
    pub prompt_order: Value,
}

/// One prompt record pulled out of the `prompts` array.
#[derive(Debug, Clone)]
pub struct RawPrompt {
    pub identifier: String,
    pub name: Option<String>,
    pub content: Option<String>,
}

/// One entry of the chosen order array. The `enabled` flag is preserved
/// but affects nothing.
#[derive(Debug, Clone)]
pub struct OrderEntry {
    pub identifier: String,
    pub enabled: Option<bool>,
}

/// Coerces a JSON value to a string: strings pass through, null is
/// treated as absent, anything else is stringified.
fn lenient_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

impl RawPrompt {
    /// Parses a prompt record, returning None when it has no identifier.
    ///
    /// Records without an identifier cannot participate in ordering or
    /// the derived tree and are dropped up front.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let identifier = obj.get("identifier").and_then(lenient_string)?;
        if identifier.is_empty() {
            return None;
        }

        Some(Self {
            identifier,
            name: obj.get("name").and_then(lenient_string),
            content: obj.get("content").and_then(lenient_string),
        })
    }
}

/// Resolves the ordering from a raw `prompt_order` section.
///
/// The order array of the scope with the maximum `character_id` wins; when
/// the maximum is duplicated, the last occurrence wins. Returns an empty
/// vector (= use file-declaration order) when the section is missing,
/// malformed, or has no valid scope.
pub fn resolve_order(section: &Value) -> Vec<OrderEntry> {
    let Some(scopes) = section.as_array() else {
        return Vec::new();
    };

    let mut best: Option<(i64, &Value)> = None;
    for scope in scopes {
        let Some(obj) = scope.as_object() else {
            continue;
        };
        let Some(character_id) = obj.get("character_id").and_then(Value::as_i64) else {
            continue;
        };
        let Some(order) = obj.get("order") else {
            continue;
        };
        match best {
            Some((max_id, _)) if character_id < max_id => {}
            _ => best = Some((character_id, order)),
        }
    }

    let Some((_, order)) = best else {
        return Vec::new();
    };
    let Some(entries) = order.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let obj = entry.as_object()?;
            let identifier = obj.get("identifier").and_then(lenient_string)?;
            Some(OrderEntry {
                identifier,
                enabled: obj.get("enabled").and_then(Value::as_bool),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_prompt_requires_identifier() {
        assert!(RawPrompt::from_value(&json!({"name": "A", "content": "x"})).is_none());
        assert!(RawPrompt::from_value(&json!({"identifier": "", "name": "A"})).is_none());
        assert!(RawPrompt::from_value(&json!("not an object")).is_none());
    }

    #[test]
    fn test_raw_prompt_coerces_content() {
        let prompt =
            RawPrompt::from_value(&json!({"identifier": "a", "name": "A", "content": 7}))
                .unwrap();
        assert_eq!(prompt.content.as_deref(), Some("7"));
    }

    #[test]
    fn test_raw_prompt_missing_fields() {
        let prompt = RawPrompt::from_value(&json!({"identifier": "a"})).unwrap();
        assert!(prompt.name.is_none());
        assert!(prompt.content.is_none());
    }

    #[test]
    fn test_resolve_order_picks_max_scope() {
        let section = json!([
            {"character_id": 1, "order": [{"identifier": "low"}]},
            {"character_id": 9, "order": [{"identifier": "high"}]},
            {"character_id": 3, "order": [{"identifier": "mid"}]},
        ]);

        let order = resolve_order(&section);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].identifier, "high");
    }

    #[test]
    fn test_resolve_order_last_max_wins() {
        let section = json!([
            {"character_id": 5, "order": [{"identifier": "first"}]},
            {"character_id": 5, "order": [{"identifier": "second"}]},
        ]);

        let order = resolve_order(&section);
        assert_eq!(order[0].identifier, "second");
    }

    #[test]
    fn test_resolve_order_skips_invalid_scopes() {
        let section = json!([
            "junk",
            {"order": [{"identifier": "no_id"}]},
            {"character_id": 2},
            {"character_id": 1, "order": [{"identifier": "ok"}]},
        ]);

        let order = resolve_order(&section);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].identifier, "ok");
    }

    #[test]
    fn test_resolve_order_malformed_section() {
        assert!(resolve_order(&json!("nope")).is_empty());
        assert!(resolve_order(&Value::Null).is_empty());
        assert!(resolve_order(&json!([{"character_id": 1, "order": "bad"}])).is_empty());
    }

    #[test]
    fn test_resolve_order_preserves_enabled() {
        let section = json!([
            {"character_id": 1, "order": [
                {"identifier": "a", "enabled": false},
                {"identifier": "b", "enabled": true},
                {"identifier": "c"},
            ]},
        ]);

        let order = resolve_order(&section);
        assert_eq!(order[0].enabled, Some(false));
        assert_eq!(order[1].enabled, Some(true));
        assert_eq!(order[2].enabled, None);
    }

    #[test]
    fn test_export_file_defaults() {
        let file: ExportFile = serde_json::from_str("{}").unwrap();
        assert!(file.prompts.is_empty());
        assert!(file.prompt_order.is_null());
    }
}
