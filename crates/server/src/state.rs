use std::sync::Arc;

use fortshop_core::{AppConfig, MediaIndexStore, MediaResolver, ShopLoader, Upstream};

/// Shared, read-only handler context.
pub struct AppState {
    pub config: AppConfig,
    pub upstream: Arc<dyn Upstream>,
    pub loader: ShopLoader,
    pub resolver: MediaResolver,
}

impl AppState {
    pub fn new(config: AppConfig, upstream: Arc<dyn Upstream>) -> Self {
        let loader = ShopLoader::new(
            upstream.clone(),
            config.lang.clone(),
            config.fallback_shop_path(),
        );
        let index = Arc::new(MediaIndexStore::new(config.media_index_path()));
        let resolver = MediaResolver::standard(index, upstream.clone(), config.lang.clone());
        Self {
            config,
            upstream,
            loader,
            resolver,
        }
    }
}
