use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL
    ///
    /// When unset the server runs against the seeded in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Base URL of the ML scoring service (`/health` and `/predict` live under it)
    #[serde(default = "default_scoring_service_url")]
    pub scoring_service_url: String,

    /// Timeout applied to every outbound scoring request, in milliseconds
    #[serde(default = "default_scoring_timeout_ms")]
    pub scoring_timeout_ms: u64,

    /// Location of the feature vocabulary mapping resource
    #[serde(default = "default_feature_mappings_path")]
    pub feature_mappings_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_scoring_service_url() -> String {
    "http://localhost:5001".to_string()
}

fn default_scoring_timeout_ms() -> u64 {
    5000
}

fn default_feature_mappings_path() -> String {
    "resources/feature_mappings.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: default_db_max_connections(),
            scoring_service_url: default_scoring_service_url(),
            scoring_timeout_ms: default_scoring_timeout_ms(),
            feature_mappings_path: default_feature_mappings_path(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_millis(self.scoring_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.scoring_service_url, "http://localhost:5001");
        assert_eq!(config.scoring_timeout(), Duration::from_secs(5));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars = vec![
            ("SCORING_SERVICE_URL".to_string(), "http://ml:8000".to_string()),
            ("SCORING_TIMEOUT_MS".to_string(), "250".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.scoring_service_url, "http://ml:8000");
        assert_eq!(config.scoring_timeout(), Duration::from_millis(250));
        assert_eq!(config.port, 8080);
    }
}
