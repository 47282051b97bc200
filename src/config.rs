use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Upper bound on pooled connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of films returned by the popular listing when no count is given
    #[serde(default = "default_popular_count")]
    pub popular_default_count: i64,
}

fn default_database_url() -> String {
    "sqlite://film_catalog.db?mode=rwc".to_string()
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_popular_count() -> i64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_env_is_empty() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.database_url, "sqlite://film_catalog.db?mode=rwc");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.popular_default_count, 10);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let vars = vec![
            ("DATABASE_URL".to_string(), "sqlite::memory:".to_string()),
            ("PORT".to_string(), "3000".to_string()),
            ("POPULAR_DEFAULT_COUNT".to_string(), "3".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.port, 3000);
        assert_eq!(config.popular_default_count, 3);
    }
}
