use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Business knobs for the matchmaking core.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    /// How many interests a free account may send in its current period.
    #[serde(default = "default_free_interest_cap")]
    pub free_interest_cap: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_connections() -> u32 {
    10
}

fn default_free_interest_cap() -> u32 {
    2
}

impl Config {
    /// Environment-driven configuration: `SERVER__PORT`, `DATABASE__URL`,
    /// `MATCHING__FREE_INTEREST_CAP` and friends, with development defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.url", "postgres://localhost/samta")?
            .set_default("database.max_connections", 10)?
            .set_default("matching.free_interest_cap", 2)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    #[cfg(test)]
    pub fn test_defaults() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/samta_test".to_string(),
                max_connections: 2,
            },
            matching: MatchingConfig {
                free_interest_cap: 2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::test_defaults();
        assert_eq!(config.matching.free_interest_cap, 2);
        assert_eq!(config.database.max_connections, 2);
    }
}
