//! Configuration module for the interests backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Optional JSON file of topics loaded with insert-or-ignore at startup
    pub seed_path: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_psk = env::var("INTERESTS_API_PSK").ok();

        let db_path = env::var("INTERESTS_DB_PATH")
            .unwrap_or_else(|_| "./data/interests.sqlite".to_string())
            .into();

        let seed_path = env::var("INTERESTS_SEED_PATH").ok().map(PathBuf::from);

        let bind_addr_raw =
            env::var("INTERESTS_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let bind_addr = bind_addr_raw.parse().map_err(|_| {
            AppError::Validation(format!(
                "Invalid INTERESTS_BIND_ADDR format: {}",
                bind_addr_raw
            ))
        })?;

        let log_level = env::var("INTERESTS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_psk,
            db_path,
            seed_path,
            bind_addr,
            log_level,
        })
    }
}
