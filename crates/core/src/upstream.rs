//! HTTP access to the upstream catalog API.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

/// Errors raised while talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request could not be sent or its body could not be read.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The upstream answered with a non-success status.
    #[error("upstream returned HTTP {0}")]
    Status(u16),
    /// The body was not valid JSON.
    #[error("upstream returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw upstream answer, forwarded verbatim by the proxy routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl UpstreamResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse a successful body as JSON.
    pub fn json(&self) -> Result<Value, UpstreamError> {
        if !self.is_success() {
            return Err(UpstreamError::Status(self.status));
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Read endpoints of the catalog API.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetch the current shop in the given language.
    async fn shop(&self, lang: &str) -> Result<UpstreamResponse, UpstreamError>;

    /// Fetch the detail record of a single item.
    async fn item(&self, id: &str, lang: &str) -> Result<UpstreamResponse, UpstreamError>;
}

/// `reqwest` client injecting the server-held credential.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base: String,
    api_key: String,
}

impl UpstreamClient {
    /// Build a client for `base` authenticating with `api_key`.
    pub fn new(base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.upstream_base.clone(), config.api_key.clone())
    }

    /// URL of the shop endpoint.
    pub fn shop_url(&self) -> String {
        format!("{}/v2/shop", self.base)
    }

    /// URL of the item detail endpoint.
    pub fn item_url(&self) -> String {
        format!("{}/v2/items/get", self.base)
    }

    async fn get(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<UpstreamResponse, UpstreamError> {
        debug!(%url, ?query, "upstream request");
        let response = self
            .http
            .get(&url)
            .query(query)
            .header(reqwest::header::AUTHORIZATION, self.api_key.as_str())
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(UpstreamResponse { status, body })
    }
}

#[async_trait]
impl Upstream for UpstreamClient {
    async fn shop(&self, lang: &str) -> Result<UpstreamResponse, UpstreamError> {
        self.get(self.shop_url(), &[("lang", lang)]).await
    }

    async fn item(&self, id: &str, lang: &str) -> Result<UpstreamResponse, UpstreamError> {
        self.get(self.item_url(), &[("id", id), ("lang", lang)]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_ignore_trailing_slash() {
        let client = UpstreamClient::new("https://fortniteapi.io/", "key");
        assert_eq!(client.shop_url(), "https://fortniteapi.io/v2/shop");
        assert_eq!(client.item_url(), "https://fortniteapi.io/v2/items/get");
    }

    #[test]
    fn json_rejects_error_status() {
        let response = UpstreamResponse {
            status: 503,
            body: "{}".to_string(),
        };
        assert!(matches!(response.json(), Err(UpstreamError::Status(503))));

        let response = UpstreamResponse {
            status: 200,
            body: "<html>".to_string(),
        };
        assert!(matches!(response.json(), Err(UpstreamError::Json(_))));
    }
}
