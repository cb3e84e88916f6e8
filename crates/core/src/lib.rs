#![warn(clippy::all, missing_docs)]

//! Core domain logic for the FortShop storefront.
//!
//! This crate hosts the configuration, the upstream API client, the
//! normalization of raw shop records, catalog loading and grouping, preview
//! media resolution and the HTML rendering used by the server.

pub mod catalog;
pub mod config;
pub mod countdown;
pub mod media;
pub mod models;
pub mod normalize;
pub mod render;
pub mod upstream;

pub use catalog::{CatalogOrigin, GroupedCatalog, ShopLoader};
pub use config::AppConfig;
pub use media::{MediaIndexStore, MediaRequest, MediaResolver};
pub use models::{DisplayItem, MediaIndexEntry, MediaPreview, ShopEntry};
pub use upstream::{Upstream, UpstreamClient, UpstreamError, UpstreamResponse};
