//! Catalog loading and grouping.

/// Section grouping and anchor derivation.
pub mod grouped;
/// Live catalog fetch with offline fallback.
pub mod loader;

pub use grouped::{section_anchor, CatalogSection, GroupedCatalog};
pub use loader::{CatalogError, CatalogOrigin, CatalogSnapshot, ShopLoader};
