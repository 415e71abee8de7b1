//! Agent configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (PANTRY_*)
//! 2. TOML config file (if PANTRY_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The defaults describe the recipes PWA shell this agent ships with; hosts
//! embedding the agent for another app override the generation, origin and
//! manifest explicitly.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Agent configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (PANTRY_*)
/// 2. TOML config file (if PANTRY_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the current cache generation. Exactly one generation is
    /// current at a time; every other store is deleted at activation.
    ///
    /// Set via PANTRY_CURRENT_GENERATION environment variable.
    #[serde(default = "default_current_generation")]
    pub current_generation: String,

    /// App-shell paths cached at install, resolved against `origin`.
    /// Install is all-or-nothing over this list.
    ///
    /// Set via PANTRY_ASSET_MANIFEST environment variable.
    #[serde(default = "default_asset_manifest")]
    pub asset_manifest: Vec<String>,

    /// Origin the app is served from; manifest paths and relative request
    /// URLs resolve against it, and it defines the same-origin test for
    /// opportunistic caching.
    ///
    /// Set via PANTRY_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Path served in place of a failed navigation while offline.
    ///
    /// Set via PANTRY_OFFLINE_FALLBACK environment variable.
    #[serde(default = "default_offline_fallback")]
    pub offline_fallback: String,

    /// Path to the SQLite cache database.
    ///
    /// Set via PANTRY_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via PANTRY_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional HTTP request timeout in milliseconds. Unset by default: the
    /// host transport owns timeouts, and an unresponsive fetch stays pending
    /// until it gives up.
    ///
    /// Set via PANTRY_TIMEOUT_MS environment variable.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Maximum number of redirects to follow per fetch.
    ///
    /// Set via PANTRY_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_current_generation() -> String {
    "filipino-recipes-v3.0.0".into()
}

fn default_asset_manifest() -> Vec<String> {
    vec![
        "./".into(),
        "./index.html".into(),
        "./styles.css".into(),
        "./script.js".into(),
        "./manifest.json".into(),
        "./icons/icon-192x192.png".into(),
        "./icons/icon-512x512.png".into(),
    ]
}

fn default_origin() -> String {
    "http://localhost:8080".into()
}

fn default_offline_fallback() -> String {
    "./index.html".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./pantry-cache.sqlite")
}

fn default_user_agent() -> String {
    "pantry/0.1".into()
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            current_generation: default_current_generation(),
            asset_manifest: default_asset_manifest(),
            origin: default_origin(),
            offline_fallback: default_offline_fallback(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: None,
            max_redirects: default_max_redirects(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `PANTRY_`
    /// 2. TOML file from `PANTRY_CONFIG_FILE` (if set)
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

        if let Ok(config_path) = std::env::var("PANTRY_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("PANTRY_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.current_generation, "filipino-recipes-v3.0.0");
        assert_eq!(config.asset_manifest.len(), 7);
        assert_eq!(config.asset_manifest[0], "./");
        assert_eq!(config.origin, "http://localhost:8080");
        assert_eq!(config.offline_fallback, "./index.html");
        assert_eq!(config.db_path, PathBuf::from("./pantry-cache.sqlite"));
        assert_eq!(config.user_agent, "pantry/0.1");
        assert!(config.timeout_ms.is_none());
        assert_eq!(config.max_redirects, 5);
    }

    #[test]
    fn test_default_manifest_contains_fallback() {
        let config = AppConfig::default();
        assert!(config.asset_manifest.contains(&config.offline_fallback));
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig { timeout_ms: Some(20_000), ..Default::default() };
        assert_eq!(config.timeout(), Some(Duration::from_millis(20_000)));
        assert_eq!(AppConfig::default().timeout(), None);
    }
}
