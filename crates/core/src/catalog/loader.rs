use std::{fmt, path::PathBuf, sync::Arc};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::upstream::{Upstream, UpstreamError};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The live request failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    /// The live payload parsed but carried neither `shop` nor `items`.
    #[error("unexpected catalog format")]
    UnexpectedFormat,
    /// The offline snapshot could not be read.
    #[error("failed to read fallback catalog {path}: {source}")]
    ReadFallback {
        /// Snapshot location.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The offline snapshot is not valid JSON.
    #[error("failed to parse fallback catalog {path}: {source}")]
    ParseFallback {
        /// Snapshot location.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Where a catalog snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Fetched from the upstream API.
    Live,
    /// Read from the offline snapshot.
    Fallback,
}

impl fmt::Display for CatalogOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogOrigin::Live => f.write_str("live"),
            CatalogOrigin::Fallback => f.write_str("fallback"),
        }
    }
}

/// Raw records of one catalog load.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    /// Source of the records.
    pub origin: CatalogOrigin,
    /// Raw upstream records in listing order.
    pub items: Vec<Value>,
}

impl CatalogSnapshot {
    /// Pull the record list out of a payload, preferring `shop` over `items`.
    pub fn from_payload(origin: CatalogOrigin, payload: Value) -> Self {
        let items = match payload {
            Value::Object(mut map) => ["shop", "items"]
                .iter()
                .find_map(|key| match map.remove(*key) {
                    Some(Value::Array(items)) => Some(items),
                    _ => None,
                })
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        Self { origin, items }
    }
}

/// Whether a payload has the shape of a shop listing.
pub fn is_catalog_payload(payload: &Value) -> bool {
    ["shop", "items"]
        .iter()
        .any(|key| payload.get(*key).map(Value::is_array).unwrap_or(false))
}

/// Loads the live catalog, falling back to the offline snapshot.
#[derive(Clone)]
pub struct ShopLoader {
    upstream: Arc<dyn Upstream>,
    lang: String,
    fallback_path: PathBuf,
}

impl ShopLoader {
    /// Create a loader reading live data through `upstream`.
    pub fn new(
        upstream: Arc<dyn Upstream>,
        lang: impl Into<String>,
        fallback_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            upstream,
            lang: lang.into(),
            fallback_path: fallback_path.into(),
        }
    }

    /// Load the catalog, preferring live data.
    pub async fn load(&self) -> Result<CatalogSnapshot, CatalogError> {
        match self.load_live().await {
            Ok(snapshot) => {
                info!(items = snapshot.items.len(), "loaded live catalog");
                Ok(snapshot)
            }
            Err(err) => {
                warn!("live catalog unavailable, using offline snapshot: {err}");
                let snapshot = self.load_fallback().await?;
                info!(items = snapshot.items.len(), "loaded fallback catalog");
                Ok(snapshot)
            }
        }
    }

    /// Fetch and validate the live catalog.
    pub async fn load_live(&self) -> Result<CatalogSnapshot, CatalogError> {
        let payload = self.upstream.shop(&self.lang).await?.json()?;
        if !is_catalog_payload(&payload) {
            return Err(CatalogError::UnexpectedFormat);
        }
        Ok(CatalogSnapshot::from_payload(CatalogOrigin::Live, payload))
    }

    /// Read the offline snapshot.
    pub async fn load_fallback(&self) -> Result<CatalogSnapshot, CatalogError> {
        let path = &self.fallback_path;
        let contents = tokio::fs::read_to_string(path).await.map_err(|source| {
            CatalogError::ReadFallback {
                path: path.clone(),
                source,
            }
        })?;
        let payload =
            serde_json::from_str(&contents).map_err(|source| CatalogError::ParseFallback {
                path: path.clone(),
                source,
            })?;
        Ok(CatalogSnapshot::from_payload(
            CatalogOrigin::Fallback,
            payload,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::UpstreamResponse;
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    struct FixedShop(Option<UpstreamResponse>);

    #[async_trait]
    impl Upstream for FixedShop {
        async fn shop(&self, _lang: &str) -> Result<UpstreamResponse, UpstreamError> {
            self.0.clone().ok_or(UpstreamError::Status(502))
        }

        async fn item(&self, _id: &str, _lang: &str) -> Result<UpstreamResponse, UpstreamError> {
            Err(UpstreamError::Status(404))
        }
    }

    fn loader(response: Option<UpstreamResponse>, fallback: PathBuf) -> ShopLoader {
        ShopLoader::new(Arc::new(FixedShop(response)), "en", fallback)
    }

    fn ok(body: serde_json::Value) -> Option<UpstreamResponse> {
        Some(UpstreamResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    #[tokio::test]
    async fn prefers_live_catalog() -> Result<()> {
        let dir = tempdir()?;
        let loader = loader(
            ok(json!({ "result": true, "shop": [{ "displayName": "A" }] })),
            dir.path().join("missing.json"),
        );
        let snapshot = loader.load().await?;
        assert_eq!(snapshot.origin, CatalogOrigin::Live);
        assert_eq!(snapshot.items.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn falls_back_on_failure_or_bad_shape() -> Result<()> {
        let dir = tempdir()?;
        let fallback = dir.path().join("fallback-shop.json");
        fs::write(&fallback, r#"{ "items": [{ "name": "X" }, { "name": "Y" }] }"#)?;

        let cases = [
            None,
            ok(json!({ "result": false, "error": "bad key" })),
            ok(json!({ "shop": "not a list" })),
            Some(UpstreamResponse {
                status: 200,
                body: "not json".to_string(),
            }),
            Some(UpstreamResponse {
                status: 401,
                body: r#"{ "shop": [] }"#.to_string(),
            }),
        ];
        for response in cases {
            let snapshot = loader(response, fallback.clone()).load().await?;
            assert_eq!(snapshot.origin, CatalogOrigin::Fallback);
            assert_eq!(snapshot.items.len(), 2);
        }
        Ok(())
    }

    #[tokio::test]
    async fn missing_fallback_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let err = loader(None, dir.path().join("none.json"))
            .load()
            .await
            .expect_err("both sources are unavailable");
        assert!(matches!(err, CatalogError::ReadFallback { .. }));
        Ok(())
    }

    #[test]
    fn payload_without_list_yields_no_items() {
        let snapshot = CatalogSnapshot::from_payload(CatalogOrigin::Fallback, json!({ "shop": {} }));
        assert!(snapshot.items.is_empty());
        let snapshot = CatalogSnapshot::from_payload(
            CatalogOrigin::Live,
            json!({ "shop": null, "items": [1] }),
        );
        assert_eq!(snapshot.items.len(), 1);
    }
}
