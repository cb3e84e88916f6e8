//! Pass-through routes to the upstream catalog API.
//!
//! The credential never leaves the server: clients call these routes and the
//! upstream status and body are returned unchanged.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use fortshop_core::{UpstreamError, UpstreamResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShopQuery {
    lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemQuery {
    id: Option<String>,
    lang: Option<String>,
}

pub async fn shop(State(state): State<Arc<AppState>>, Query(query): Query<ShopQuery>) -> Response {
    let lang = lang_or_default(query.lang, &state);
    forward(state.upstream.shop(&lang).await)
}

pub async fn item(State(state): State<Arc<AppState>>, Query(query): Query<ItemQuery>) -> Response {
    let Some(id) = query.id.filter(|id| !id.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing id" })),
        )
            .into_response();
    };
    let lang = lang_or_default(query.lang, &state);
    forward(state.upstream.item(&id, &lang).await)
}

fn lang_or_default(lang: Option<String>, state: &AppState) -> String {
    lang.filter(|lang| !lang.is_empty())
        .unwrap_or_else(|| state.config.lang.clone())
}

fn forward(result: Result<UpstreamResponse, UpstreamError>) -> Response {
    match result {
        Ok(upstream) => {
            let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                upstream.body,
            )
                .into_response()
        }
        Err(err) => {
            warn!("proxy request failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Proxy failed", "details": err.to_string() })),
            )
                .into_response()
        }
    }
}
