use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    pub filter: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::build(std::env::var("PORT").ok(), std::env::var("DATABASE_URL").ok())
    }

    fn build(port: Option<String>, database_url: Option<String>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            // 默认配置
            .set_default("server.port", 5000)?
            .set_default("server.static_dir", "static")?
            .set_default("database.url", "postgres://localhost/task_tracker")?
            .set_default("database.max_connections", 10)?
            .set_default("log.filter", "info")?
            // 从环境变量加载，例如 TASK_TRACKER_SERVER__PORT
            .add_source(
                Environment::with_prefix("TASK_TRACKER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // 约定俗成的 PORT / DATABASE_URL 优先级最高
            .set_override_option("server.port", port)?
            .set_override_option("database.url", database_url)?
            .build()?;

        config.try_deserialize()
    }

    pub fn server_address(&self) -> String {
        format!("0.0.0.0:{}", self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::build(None, None).unwrap();
        assert_eq!(config.server.static_dir, "static");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_conventional_variables_override() {
        let config =
            AppConfig::build(Some("8081".into()), Some("memory://".into())).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.url, "memory://");
        assert_eq!(config.server_address(), "0.0.0.0:8081");
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        assert!(AppConfig::build(Some("not-a-port".into()), None).is_err());
    }
}
