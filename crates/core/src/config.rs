//! Application configuration.
//!
//! Values are layered with the `config` crate: built-in defaults, an optional
//! `config.toml` in the platform config directory, `FORTSHOP_*` environment
//! variables and finally the plain `PORT` / `FORTNITE_API_KEY` variables.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::info;

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "fortshop";

const DEFAULT_CONFIG: &str = r#"# FortShop configuration.
# Every key is optional; environment variables prefixed with FORTSHOP_ override
# these values, and PORT / FORTNITE_API_KEY override those.

# port = 3000
# upstream_base = "https://fortniteapi.io"
# lang = "en"
# api_key = ""
# public_dir = "public"
# fallback_shop = "data/fallback-shop.json"
# media_index = "data/item-media.min.json"
# static_max_age_secs = 3600
"#;

/// Runtime configuration shared by the server and the core pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Base URL of the upstream catalog API.
    pub upstream_base: String,
    /// Language requested from the upstream API when none is given.
    pub lang: String,
    /// Credential forwarded in the `Authorization` header.
    #[serde(default)]
    pub api_key: String,
    /// Directory served as static assets.
    pub public_dir: PathBuf,
    /// Offline catalog snapshot, relative to `public_dir` unless absolute.
    pub fallback_shop: PathBuf,
    /// Prebuilt media index, relative to `public_dir` unless absolute.
    pub media_index: PathBuf,
    /// `max-age` sent with static assets.
    pub static_max_age_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            upstream_base: "https://fortniteapi.io".to_string(),
            lang: "en".to_string(),
            api_key: String::new(),
            public_dir: PathBuf::from("public"),
            fallback_shop: PathBuf::from("data/fallback-shop.json"),
            media_index: PathBuf::from("data/item-media.min.json"),
            static_max_age_secs: 3600,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location and the environment.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(config_path())?;
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from `path` (if it exists) plus `FORTSHOP_*` variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("port", i64::from(defaults.port))?
            .set_default("upstream_base", defaults.upstream_base)?
            .set_default("lang", defaults.lang)?
            .set_default("api_key", defaults.api_key)?
            .set_default("public_dir", defaults.public_dir.to_string_lossy().to_string())?
            .set_default(
                "fallback_shop",
                defaults.fallback_shop.to_string_lossy().to_string(),
            )?
            .set_default(
                "media_index",
                defaults.media_index.to_string_lossy().to_string(),
            )?
            .set_default("static_max_age_secs", defaults.static_max_age_secs)?
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("FORTSHOP"))
            .build()
            .with_context(|| format!("failed to read configuration {}", path.display()))?;

        settings
            .try_deserialize()
            .context("failed to deserialize configuration")
    }

    /// Apply the unprefixed `PORT` and `FORTNITE_API_KEY` variables.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = lookup("PORT").filter(|value| !value.trim().is_empty()) {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value {port:?}"))?;
        }
        if let Some(key) = lookup("FORTNITE_API_KEY") {
            self.api_key = key;
        }
        Ok(())
    }

    /// Full path of the offline catalog snapshot.
    pub fn fallback_shop_path(&self) -> PathBuf {
        self.public_dir.join(&self.fallback_shop)
    }

    /// Full path of the prebuilt media index.
    pub fn media_index_path(&self) -> PathBuf {
        self.public_dir.join(&self.media_index)
    }
}

/// Location of the user configuration file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write a commented default configuration file when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_path();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "port = 8080\nlang = \"de\"\npublic_dir = \"/srv/shop\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.port, 8080);
        assert_eq!(config.lang, "de");
        assert_eq!(config.upstream_base, "https://fortniteapi.io");
        assert_eq!(
            config.fallback_shop_path(),
            PathBuf::from("/srv/shop/data/fallback-shop.json")
        );
        Ok(())
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.static_max_age_secs, 3600);
        assert_eq!(config.media_index, PathBuf::from("data/item-media.min.json"));
        Ok(())
    }

    #[test]
    fn legacy_variables_take_precedence() -> Result<()> {
        let vars: HashMap<&str, &str> =
            HashMap::from([("PORT", "4100"), ("FORTNITE_API_KEY", "secret")]);
        let mut config = AppConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()))?;
        assert_eq!(config.port, 4100);
        assert_eq!(config.api_key, "secret");

        let mut config = AppConfig::default();
        assert!(config
            .apply_overrides(|key| (key == "PORT").then(|| "not-a-port".to_string()))
            .is_err());
        Ok(())
    }
}
