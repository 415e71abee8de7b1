//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `current_generation` is empty
    /// - `asset_manifest` is empty or contains an empty path
    /// - `origin` is not a valid http(s) URL
    /// - `offline_fallback` or `user_agent` is empty
    /// - `timeout_ms` is set below 100ms or above 5 minutes
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.current_generation.is_empty() {
            return Err(ConfigError::Missing {
                field: "current_generation".into(),
                hint: "set PANTRY_CURRENT_GENERATION to the versioned cache name".into(),
            });
        }

        if self.asset_manifest.is_empty() {
            return Err(ConfigError::Invalid { field: "asset_manifest".into(), reason: "must not be empty".into() });
        }
        if self.asset_manifest.iter().any(|path| path.is_empty()) {
            return Err(ConfigError::Invalid {
                field: "asset_manifest".into(),
                reason: "must not contain empty paths".into(),
            });
        }

        match url::Url::parse(&self.origin) {
            Ok(origin) if origin.scheme() == "http" || origin.scheme() == "https" => {}
            Ok(origin) => {
                return Err(ConfigError::Invalid {
                    field: "origin".into(),
                    reason: format!("unsupported scheme: {}", origin.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "origin".into(), reason: e.to_string() });
            }
        }

        if self.offline_fallback.is_empty() {
            return Err(ConfigError::Invalid { field: "offline_fallback".into(), reason: "must not be empty".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if let Some(timeout_ms) = self.timeout_ms {
            if timeout_ms < 100 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must be at least 100ms".into(),
                });
            }
            if timeout_ms > 300_000 {
                return Err(ConfigError::Invalid {
                    field: "timeout_ms".into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if !self.asset_manifest.contains(&self.offline_fallback) {
            tracing::warn!(
                offline_fallback = %self.offline_fallback,
                "offline_fallback is not part of asset_manifest; \
                 navigations will have no offline document until it is cached"
            );
        }

        Ok(())
    }
}
