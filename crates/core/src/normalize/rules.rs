//! Ordered extraction rules for each display field.
//!
//! Upstream records differ between API versions and the offline snapshot, so
//! every field is read through a priority list of locations. The first rule
//! producing a non-empty value wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Single location a field value may be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Scalar value at a key path.
    Path(&'static [&'static str]),
    /// Scalar value at a key path with any `Namespace:` prefix removed.
    StripPrefix(&'static [&'static str]),
}

impl Rule {
    /// Evaluate the rule against a raw record.
    pub fn apply(&self, raw: &Value) -> Option<String> {
        match self {
            Rule::Path(path) => lookup(raw, path).and_then(scalar_text),
            Rule::StripPrefix(path) => lookup(raw, path)
                .and_then(scalar_text)
                .map(|text| DEV_PREFIX_RE.replace(&text, "").into_owned())
                .filter(|text| !text.is_empty()),
        }
    }
}

/// Location of a list of granted-item ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdRule {
    /// Array of plain ids.
    Ids(&'static str),
    /// Array of objects carrying an `id` key.
    ObjectIds(&'static str),
}

impl IdRule {
    /// Evaluate the rule, returning the ids in upstream order.
    pub fn apply(&self, raw: &Value) -> Vec<String> {
        let (key, nested) = match self {
            IdRule::Ids(key) => (*key, false),
            IdRule::ObjectIds(key) => (*key, true),
        };
        let Some(values) = raw.get(key).and_then(Value::as_array) else {
            return Vec::new();
        };
        values
            .iter()
            .filter_map(|value| {
                if nested {
                    value.get("id").and_then(scalar_text)
                } else {
                    scalar_text(value)
                }
            })
            .collect()
    }
}

/// Display name sources.
pub const DISPLAY_NAME: &[Rule] = &[
    Rule::Path(&["displayName"]),
    Rule::Path(&["display_name"]),
    Rule::Path(&["name"]),
    Rule::StripPrefix(&["devName"]),
];

/// Item type sources; `type` is the older field name.
pub const MAIN_TYPE: &[Rule] = &[
    Rule::Path(&["mainType"]),
    Rule::Path(&["mainType", "value"]),
    Rule::Path(&["mainType", "name"]),
    Rule::Path(&["type"]),
    Rule::Path(&["type", "value"]),
    Rule::Path(&["type", "name"]),
];

/// Price sources, discounted price first.
pub const PRICE: &[Rule] = &[
    Rule::Path(&["price", "finalPrice"]),
    Rule::Path(&["price", "regularPrice"]),
    Rule::Path(&["vbucks"]),
    Rule::Path(&["finalPrice"]),
    Rule::Path(&["regularPrice"]),
];

/// Rarity sources.
pub const RARITY: &[Rule] = &[
    Rule::Path(&["rarity"]),
    Rule::Path(&["rarity", "name"]),
    Rule::Path(&["rarity", "id"]),
];

/// Shop section sources.
pub const SECTION: &[Rule] = &[
    Rule::Path(&["section", "name"]),
    Rule::Path(&["section", "displayName"]),
    Rule::Path(&["section"]),
];

/// Granted-item id sources.
pub const GRANTED_IDS: &[IdRule] = &[
    IdRule::Ids("grantedIds"),
    IdRule::ObjectIds("granted"),
    IdRule::ObjectIds("grants"),
];

/// Keys read from the first display asset, most reliable first.
pub const DISPLAY_ASSET_KEYS: &[&str] = &["url", "full_background", "background", "icon"];

/// Keys read from the `images` / `displayImage` object.
pub const IMAGE_KEYS: &[&str] = &["icon", "featured", "full_background", "background"];

/// Image keys stored directly on the record.
pub const TOP_LEVEL_IMAGE_KEYS: &[&str] = &["full_background", "icon"];

static DEV_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*:\s*").expect("invalid dev name regex"));

/// First non-empty value produced by `rules`.
pub fn first_match(raw: &Value, rules: &[Rule]) -> Option<String> {
    rules.iter().find_map(|rule| rule.apply(raw))
}

/// First non-empty value produced by `rules`, or an empty string.
pub fn extract(raw: &Value, rules: &[Rule]) -> String {
    first_match(raw, rules).unwrap_or_default()
}

/// First non-empty id list produced by `rules`.
pub fn extract_ids(raw: &Value, rules: &[IdRule]) -> Vec<String> {
    rules
        .iter()
        .map(|rule| rule.apply(raw))
        .find(|ids| !ids.is_empty())
        .unwrap_or_default()
}

fn lookup<'a>(raw: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(raw, |value, key| value.get(*key))
}

/// Text form of a string or number; other JSON kinds and empty strings yield `None`.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(match (number.as_i64(), number.as_f64()) {
            (Some(int), _) => int.to_string(),
            (None, Some(float)) if float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{float:.0}")
            }
            _ => number.to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_rule_ignores_objects_and_empty_strings() {
        let raw = json!({ "rarity": { "name": "" , "id": "Epic" } });
        assert_eq!(Rule::Path(&["rarity"]).apply(&raw), None);
        assert_eq!(Rule::Path(&["rarity", "name"]).apply(&raw), None);
        assert_eq!(first_match(&raw, RARITY).as_deref(), Some("Epic"));
    }

    #[test]
    fn strip_prefix_keeps_text_after_last_colon() {
        let raw = json!({ "devName": "[VIRTUAL]1 x Renegade Raider for 1200 MtxCurrency: Renegade Raider" });
        assert_eq!(
            Rule::StripPrefix(&["devName"]).apply(&raw).as_deref(),
            Some("Renegade Raider")
        );
        let raw = json!({ "devName": "Prefix:" });
        assert_eq!(Rule::StripPrefix(&["devName"]).apply(&raw), None);
    }

    #[test]
    fn numbers_render_without_fraction() {
        assert_eq!(scalar_text(&json!(1500)).as_deref(), Some("1500"));
        assert_eq!(scalar_text(&json!(800.0)).as_deref(), Some("800"));
        assert_eq!(scalar_text(&json!(0)).as_deref(), Some("0"));
        assert_eq!(scalar_text(&json!(true)), None);
        assert_eq!(scalar_text(&json!(null)), None);
    }

    #[test]
    fn price_prefers_nested_final_price() {
        let raw = json!({ "price": { "regularPrice": 2000, "finalPrice": 1600 }, "vbucks": 5 });
        assert_eq!(extract(&raw, PRICE), "1600");
        let raw = json!({ "vbucks": 0, "finalPrice": 900 });
        assert_eq!(extract(&raw, PRICE), "0");
    }

    #[test]
    fn id_rules_fall_through_empty_lists() {
        let raw = json!({
            "grantedIds": [],
            "granted": [{ "id": "CID_001" }, { "name": "no id" }, { "id": "EID_002" }],
            "grants": [{ "id": "ignored" }]
        });
        assert_eq!(extract_ids(&raw, GRANTED_IDS), vec!["CID_001", "EID_002"]);

        let raw = json!({ "grants": [{ "id": "Glider_1" }] });
        assert_eq!(extract_ids(&raw, GRANTED_IDS), vec!["Glider_1"]);
    }
}
