use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{models::ShopEntry, normalize::DEFAULT_SECTION};

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("invalid anchor regex"));

/// Deterministic anchor for a section name.
///
/// The name is lowercased and every run of characters outside `[a-z0-9]`
/// becomes a single `-`. An empty name maps to `misc`.
pub fn section_anchor(name: &str) -> String {
    let name = if name.is_empty() {
        DEFAULT_SECTION
    } else {
        name
    };
    NON_ALNUM_RE
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

/// One category of the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSection {
    /// Section name as shown on its chip and heading.
    pub name: String,
    /// Anchor derived from the name.
    pub anchor: String,
    /// Cards in listing order.
    pub entries: Vec<ShopEntry>,
}

impl CatalogSection {
    /// DOM id of the section element.
    pub fn dom_id(&self) -> String {
        format!("section-{}", self.anchor)
    }
}

/// Entries grouped by section, sections ordered case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCatalog {
    sections: Vec<CatalogSection>,
}

impl GroupedCatalog {
    /// Group entries by their section, keeping listing order inside each section.
    pub fn from_entries(entries: impl IntoIterator<Item = ShopEntry>) -> Self {
        let mut sections: Vec<CatalogSection> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for entry in entries {
            let name = if entry.section.is_empty() {
                DEFAULT_SECTION.to_string()
            } else {
                entry.section.clone()
            };
            let index = *positions.entry(name.clone()).or_insert_with(|| {
                sections.push(CatalogSection {
                    anchor: section_anchor(&name),
                    name,
                    entries: Vec::new(),
                });
                sections.len() - 1
            });
            sections[index].entries.push(entry);
        }

        sections.sort_by_key(|section| section.name.to_lowercase());
        Self { sections }
    }

    /// Sections in display order.
    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    /// Category names in chip order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|section| section.name.as_str())
    }

    /// Look up a section by exact name.
    pub fn section(&self, name: &str) -> Option<&CatalogSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Total number of cards.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|section| section.entries.len()).sum()
    }

    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
