//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SEAWALL_*)
//! 2. TOML config file (if SEAWALL_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SEAWALL_*)
/// 2. TOML config file (if SEAWALL_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Base URL of the application origin. Population tasks resolve their
    /// origin-relative cache keys against it.
    ///
    /// Set via SEAWALL_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// URL path prefixes classified as static assets.
    ///
    /// Set via SEAWALL_STATIC_ASSET_PREFIXES environment variable.
    #[serde(default = "default_static_asset_prefixes")]
    pub static_asset_prefixes: Vec<String>,

    /// Path to the SQLite cache database.
    ///
    /// Set via SEAWALL_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for population and passthrough fetches.
    ///
    /// Set via SEAWALL_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via SEAWALL_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Path to a route-manifest JSON payload for the cache warmer.
    ///
    /// Set via SEAWALL_MANIFEST_PATH environment variable.
    /// Required only when the `seawall` binary runs without an argument.
    #[serde(default)]
    pub manifest_path: Option<PathBuf>,
}

fn default_origin() -> String {
    "http://localhost:3000".into()
}

fn default_static_asset_prefixes() -> Vec<String> {
    vec!["/build/".into(), "/icons/".into()]
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./seawall-cache.sqlite")
}

fn default_user_agent() -> String {
    "seawall/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            static_asset_prefixes: default_static_asset_prefixes(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            manifest_path: None,
        }
    }
}

impl WorkerConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The application origin parsed as a URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `origin` does not parse or is not
    /// http/https.
    pub fn origin_url(&self) -> Result<url::Url, ConfigError> {
        let parsed = url::Url::parse(&self.origin)
            .map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            scheme => Err(ConfigError::Invalid {
                field: "origin".into(),
                reason: format!("unsupported scheme: {scheme}"),
            }),
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SEAWALL_`
    /// 2. TOML file from `SEAWALL_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SEAWALL_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SEAWALL_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check that a manifest path is configured (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no manifest path is set.
    pub fn require_manifest_path(&self) -> Result<&Path, ConfigError> {
        self.manifest_path.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "manifest_path".into(),
            hint: "Set SEAWALL_MANIFEST_PATH or pass a manifest file argument".into(),
        })
    }
}
