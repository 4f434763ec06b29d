//! Configuration module for the Pulsync backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Lifetime of issued session tokens, in minutes
    pub session_ttl_minutes: i64,
    /// Capacity of the in-memory request log ring buffer
    pub request_log_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let db_path = env::var("PULSYNC_DB_PATH")
            .unwrap_or_else(|_| "./data/pulsync.sqlite".to_string())
            .into();

        let bind_addr = env::var("PULSYNC_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid PULSYNC_BIND_ADDR format");

        let log_level = env::var("PULSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_ttl_minutes = env::var("PULSYNC_SESSION_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60 * 24);

        let request_log_capacity = env::var("PULSYNC_REQUEST_LOG_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        Self {
            db_path,
            bind_addr,
            log_level,
            session_ttl_minutes,
            request_log_capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        env::remove_var("PULSYNC_DB_PATH");
        env::remove_var("PULSYNC_BIND_ADDR");
        env::remove_var("PULSYNC_LOG_LEVEL");
        env::remove_var("PULSYNC_SESSION_TTL_MINUTES");
        env::remove_var("PULSYNC_REQUEST_LOG_CAPACITY");

        let config = Config::from_env();

        assert_eq!(config.db_path, PathBuf::from("./data/pulsync.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.session_ttl_minutes, 1440);
        assert_eq!(config.request_log_capacity, 1000);
    }
}
