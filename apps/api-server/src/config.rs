//! Application configuration loaded from environment variables.

use std::env;

use circle_infra::{DatabaseConfig, JwtConfig, MediaConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs against the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            media: MediaConfig::from_env(),
        }
    }
}
