//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing::Level;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_APP_ENV: &str = "development";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Free-form deployment name. Only "development" and "production" change behavior.
    pub app_env: String,
    pub session_secret: Option<String>,
    pub database_url: Option<String>,
    pub log_level: Level,
    pub static_dir: PathBuf,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Unset and empty are treated the same.
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        // --- Server Settings ---
        let port = match var("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?,
            None => DEFAULT_PORT,
        };
        let bind_address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let app_env = var("APP_ENV").unwrap_or_else(|| DEFAULT_APP_ENV.to_string());

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let static_dir = var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./frontend/dist"));

        let cors_allowed_origin = var("CORS_ALLOWED_ORIGIN");

        // --- Secrets and Storage ---
        let session_secret = var("SESSION_SECRET");

        let database_url = var("DATABASE_URL");
        if database_url.is_none() && app_env == "production" {
            return Err(ConfigError::MissingVar("DATABASE_URL".to_string()));
        }

        Ok(Self {
            bind_address,
            app_env,
            session_secret,
            database_url,
            log_level,
            static_dir,
            cors_allowed_origin,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// The query explorer is served only here.
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}
