/// Configuration management for the blog service
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// JWT validation settings
    pub auth: AuthConfig,
    /// Suggestion engine policy
    pub suggestions: SuggestionsConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Min connections in pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// JWT validation settings. Tokens are issued by the upstream identity
/// provider; this service only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub jwt_secret: String,
}

/// Suggestion engine policy knobs. These encode heuristics, not correctness
/// requirements, so they are tunable per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    /// How many recent likes / bookmarks to scan per relation
    #[serde(default = "default_scan_limit")]
    pub scan_limit: i64,
    /// Maximum number of suggested users returned
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Maximum number of reading-list entries returned
    #[serde(default = "default_reading_list_limit")]
    pub reading_list_limit: i64,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_scan_limit() -> i64 {
    10
}

fn default_max_results() -> usize {
    4
}

fn default_reading_list_limit() -> i64 {
    4
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT").unwrap_or(8080),
        };

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .context("DATABASE_URL environment variable not set")?,
            max_connections: env_parse("DB_MAX_CONNECTIONS")
                .unwrap_or_else(default_max_connections),
            min_connections: env_parse("DB_MIN_CONNECTIONS")
                .unwrap_or_else(default_min_connections),
        };

        let auth = AuthConfig {
            jwt_secret: std::env::var("JWT_SECRET")
                .context("JWT_SECRET environment variable not set")?,
        };

        let suggestions = SuggestionsConfig {
            scan_limit: env_parse("SUGGESTION_SCAN_LIMIT").unwrap_or_else(default_scan_limit),
            max_results: env_parse("SUGGESTION_MAX_RESULTS").unwrap_or_else(default_max_results),
            reading_list_limit: env_parse("READING_LIST_LIMIT")
                .unwrap_or_else(default_reading_list_limit),
        };

        Ok(Config {
            app,
            database,
            auth,
            suggestions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Defaults and overrides share process-global env vars, so both phases
    // live in one test to keep them ordered.
    #[test]
    fn test_default_values_and_overrides() {
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("JWT_SECRET", "test-secret");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 8080);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.min_connections, 5);
        assert_eq!(config.suggestions.scan_limit, 10);
        assert_eq!(config.suggestions.max_results, 4);
        assert_eq!(config.suggestions.reading_list_limit, 4);

        std::env::set_var("SUGGESTION_SCAN_LIMIT", "25");
        std::env::set_var("SUGGESTION_MAX_RESULTS", "8");
        std::env::set_var("READING_LIST_LIMIT", "6");

        let config = Config::from_env().unwrap();

        assert_eq!(config.suggestions.scan_limit, 25);
        assert_eq!(config.suggestions.max_results, 8);
        assert_eq!(config.suggestions.reading_list_limit, 6);

        std::env::remove_var("SUGGESTION_SCAN_LIMIT");
        std::env::remove_var("SUGGESTION_MAX_RESULTS");
        std::env::remove_var("READING_LIST_LIMIT");
    }
}
