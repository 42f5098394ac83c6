use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub database_url: Option<String>,

    /// Optional TOML file layered under the `WALKSHED_*` variables
    pub config_file: Option<PathBuf>,

    /// How often expired cache entries are swept
    pub purge_interval: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            database_url: None,
            config_file: None,
            purge_interval: Duration::from_secs(15 * 60),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("WALKSHED_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origin = env::var("WALKSHED_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        let config_file = env::var("WALKSHED_CONFIG").ok().map(PathBuf::from);

        let purge_interval = env::var("WALKSHED_PURGE_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.purge_interval);

        Self {
            port,
            cors_origin,
            database_url,
            config_file,
            purge_interval,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if PostgreSQL storage is configured
    pub fn uses_postgres(&self) -> bool {
        self.database_url.is_some()
    }
}
