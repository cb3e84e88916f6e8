//! Shared domain models.

use serde::{Deserialize, Serialize};

/// Normalized projection of one upstream shop record.
///
/// Every field is plain text; anything the upstream record did not provide is
/// an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Human-readable item name.
    pub display_name: String,
    /// Item type such as `outfit` or `bundle`.
    pub main_type: String,
    /// Price in V-Bucks, rendered as text.
    pub price: String,
    /// Rarity label such as `Epic`.
    pub rarity: String,
}

impl DisplayItem {
    /// Type label with underscores shown as spaces.
    pub fn type_label(&self) -> String {
        self.main_type.replace('_', " ")
    }
}

/// One storefront card: the display record plus everything needed to preview it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopEntry {
    /// Section the record belongs to.
    pub section: String,
    /// Normalized display fields.
    pub item: DisplayItem,
    /// CSS class derived from the rarity.
    pub rarity_class: String,
    /// Ordered, de-duplicated poster image candidates.
    pub posters: Vec<String>,
    /// Granted-item ids used for media lookups.
    pub granted_ids: Vec<String>,
}

impl ShopEntry {
    /// Preferred poster, or an empty string when there is none.
    pub fn primary_poster(&self) -> &str {
        self.posters.first().map(String::as_str).unwrap_or_default()
    }
}

/// Prebuilt preview assets for one granted-item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaIndexEntry {
    /// Video URL.
    #[serde(default)]
    pub video: Option<String>,
    /// Audio URL (music packs, emotes).
    #[serde(default)]
    pub audio: Option<String>,
    /// Poster override shown next to audio or before video.
    #[serde(default)]
    pub poster: Option<String>,
}

impl MediaIndexEntry {
    /// Whether the entry carries playable media.
    pub fn has_media(&self) -> bool {
        non_empty(&self.video).is_some() || non_empty(&self.audio).is_some()
    }

    /// Video URL or empty string.
    pub fn video(&self) -> &str {
        non_empty(&self.video).unwrap_or_default()
    }

    /// Audio URL or empty string.
    pub fn audio(&self) -> &str {
        non_empty(&self.audio).unwrap_or_default()
    }

    /// Poster override, if any.
    pub fn poster(&self) -> Option<&str> {
        non_empty(&self.poster)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Result of resolving preview media for a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPreview {
    /// Modal title.
    pub title: String,
    /// Video URL, empty when there is none.
    pub video: String,
    /// Audio URL, empty when there is none.
    pub audio: String,
    /// Poster image URL.
    pub poster: String,
}

impl MediaPreview {
    /// Poster-only preview used when no media was found.
    pub fn poster_only(title: impl Into<String>, poster: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            video: String::new(),
            audio: String::new(),
            poster: poster.into(),
        }
    }
}
