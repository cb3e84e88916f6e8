use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::Html,
    routing::get,
    Router,
};
use chrono::Utc;
use fortshop_core::{
    countdown::{format_countdown, time_until_reset},
    normalize,
    render::{render_load_failure, render_modal, render_storefront},
    GroupedCatalog, MediaRequest,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use crate::{proxy, state::AppState};

pub fn build_router(state: Arc<AppState>) -> Result<Router> {
    let cache_control = HeaderValue::from_str(&format!(
        "public, max-age={}",
        state.config.static_max_age_secs
    ))?;
    let assets = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            cache_control,
        ))
        .service(ServeDir::new(&state.config.public_dir).append_index_html_on_directories(true));

    Ok(Router::new()
        .route("/", get(storefront))
        .route("/preview", get(preview))
        .route("/api/shop", get(proxy::shop))
        .route("/api/item", get(proxy::item))
        .fallback_service(assets)
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

async fn storefront(State(state): State<Arc<AppState>>) -> Html<String> {
    let countdown = format_countdown(time_until_reset(Utc::now()));
    match state.loader.load().await {
        Ok(snapshot) => {
            let catalog = GroupedCatalog::from_entries(normalize::normalize_all(&snapshot.items));
            info!(
                origin = %snapshot.origin,
                sections = catalog.sections().len(),
                items = catalog.entry_count(),
                "rendering storefront"
            );
            Html(render_storefront(&catalog, &countdown))
        }
        Err(err) => {
            error!("failed to load shop: {err}");
            Html(render_load_failure(&countdown))
        }
    }
}

/// `ids` carries the granted ids as a JSON array of strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PreviewQuery {
    title: String,
    ids: String,
    poster: String,
}

impl PreviewQuery {
    fn into_request(self) -> MediaRequest {
        let ids: Vec<String> = if self.ids.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&self.ids).unwrap_or_else(|err| {
                debug!("ignoring malformed preview ids {:?}: {err}", self.ids);
                Vec::new()
            })
        };
        MediaRequest {
            title: self.title,
            ids: ids
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
            poster: self.poster,
        }
    }
}

async fn preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Html<String> {
    let request = query.into_request();
    let preview = state.resolver.resolve(&request).await;
    Html(render_modal(&preview))
}
