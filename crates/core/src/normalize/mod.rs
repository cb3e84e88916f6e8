//! Projection of raw upstream records onto the display model.
//!
//! Normalization never fails: missing or oddly shaped fields degrade to empty
//! strings (or the default section) so a single bad record cannot break the page.

pub mod rules;

use std::collections::HashSet;

use serde_json::Value;

use crate::models::{DisplayItem, ShopEntry};

/// Section used for records that do not name one.
pub const DEFAULT_SECTION: &str = "Misc";

/// Project one raw record onto its display fields.
pub fn display_item(raw: &Value) -> DisplayItem {
    DisplayItem {
        display_name: rules::extract(raw, rules::DISPLAY_NAME),
        main_type: rules::extract(raw, rules::MAIN_TYPE),
        price: rules::extract(raw, rules::PRICE),
        rarity: rules::extract(raw, rules::RARITY),
    }
}

/// Build the full storefront entry for one raw record.
pub fn shop_entry(raw: &Value) -> ShopEntry {
    let item = display_item(raw);
    ShopEntry {
        section: section_name(raw),
        rarity_class: rarity_class(&item.rarity).to_string(),
        posters: poster_candidates(raw),
        granted_ids: rules::extract_ids(raw, rules::GRANTED_IDS),
        item,
    }
}

/// Section the record is listed under.
pub fn section_name(raw: &Value) -> String {
    rules::first_match(raw, rules::SECTION).unwrap_or_else(|| DEFAULT_SECTION.to_string())
}

/// CSS class for a rarity label; unknown rarities render as common.
pub fn rarity_class(rarity: &str) -> &'static str {
    match rarity {
        "Uncommon" => "rarity-uncommon",
        "Rare" => "rarity-rare",
        "Epic" => "rarity-epic",
        "Legendary" => "rarity-legendary",
        "Marvel" => "rarity-marvel",
        "Icon" => "rarity-icon",
        "DC" => "rarity-dc",
        _ => "rarity-common",
    }
}

/// Ordered, de-duplicated image URLs for a record, preferred first.
pub fn poster_candidates(raw: &Value) -> Vec<String> {
    let mut candidates: Vec<&Value> = Vec::new();

    let display_asset = match raw.get("displayAssets") {
        Some(Value::Array(assets)) => assets.first(),
        Some(asset @ Value::Object(_)) => Some(asset),
        _ => None,
    };
    if let Some(asset) = display_asset {
        candidates.extend(collect_keys(asset, rules::DISPLAY_ASSET_KEYS));
    }

    let images = ["images", "displayImage"]
        .iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| value.is_object());
    if let Some(images) = images {
        candidates.extend(collect_keys(images, rules::IMAGE_KEYS));
    }

    candidates.extend(collect_keys(raw, rules::TOP_LEVEL_IMAGE_KEYS));

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(Value::as_str)
        .filter(|url| !url.trim().is_empty())
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}

fn collect_keys<'a>(
    value: &'a Value,
    keys: &'static [&'static str],
) -> impl Iterator<Item = &'a Value> + 'a {
    keys.iter().filter_map(move |key| value.get(*key))
}

/// Normalize every record of a catalog snapshot.
pub fn normalize_all(raw_items: &[Value]) -> Vec<ShopEntry> {
    raw_items.iter().map(shop_entry).collect()
}
