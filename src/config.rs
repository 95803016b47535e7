//! Application configuration.
//!
//! Loaded from a TOML file (default `~/.config/careview/config.toml`) with
//! environment variable overrides applied on top, so deployments can keep
//! secrets out of the file:
//!
//! - `CAREVIEW_DATABASE_URL`
//! - `CAREVIEW_TOKEN_SECRET`
//! - `CAREVIEW_TOKEN_ALGORITHM`
//! - `CAREVIEW_TOKEN_TTL_MINUTES`
//! - `CAREVIEW_LOG_LEVEL`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub logging: LoggingSettings,
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SeaORM connection URL. SQLite by default, PostgreSQL works unchanged.
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./careview.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Secret used to sign access tokens.
    pub token_secret: String,
    /// JWT signing algorithm name (HS256, HS384, HS512).
    pub token_algorithm: String,
    /// Token lifetime in minutes, fixed at issuance.
    pub token_ttl_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_secret: "change-me-in-production".to_string(),
            token_algorithm: "HS256".to_string(),
            token_ttl_minutes: 480,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error).
    pub level: String,
    /// Output format: "text" or "json".
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

/// Seed identity created by `careview-setup` when no admin exists yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            email: "admin@carehome.com".to_string(),
            name: "System Administrator".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// A missing file is not an error: defaults are used so a fresh
    /// deployment can run on environment variables alone.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("CAREVIEW_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("CAREVIEW_TOKEN_SECRET") {
            self.auth.token_secret = secret;
        }
        if let Ok(alg) = std::env::var("CAREVIEW_TOKEN_ALGORITHM") {
            self.auth.token_algorithm = alg;
        }
        if let Ok(ttl) = std::env::var("CAREVIEW_TOKEN_TTL_MINUTES") {
            if let Ok(minutes) = ttl.parse() {
                self.auth.token_ttl_minutes = minutes;
            }
        }
        if let Ok(level) = std::env::var("CAREVIEW_LOG_LEVEL") {
            self.logging.level = level;
        }
    }
}

/// Default config file location: `~/.config/careview/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("careview")
        .join("config.toml")
}
