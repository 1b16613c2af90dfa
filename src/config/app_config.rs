use serde::Deserialize;

use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub environment: Environment,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageType,
    /// Connection URL, `DATABASE_URL` is used when unset
    pub url: Option<String>,
    pub max_connections: u32,
}

/// Deployment mode. Development exposes internal error detail to clients.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageType::default(),
            url: None,
            max_connections: 10,
        }
    }
}

impl StorageSettings {
    /// Resolve the backend settings, reading `DATABASE_URL` for PostgreSQL when no URL is configured
    pub fn resolve(&self) -> Result<StorageConfig, config::ConfigError> {
        match self.backend {
            StorageType::Memory => Ok(StorageConfig::in_memory()),
            StorageType::Postgres => {
                let url = self
                    .url
                    .clone()
                    .or_else(|| std::env::var("DATABASE_URL").ok())
                    .ok_or_else(|| {
                        config::ConfigError::Message(
                            "storage.url or DATABASE_URL is required for the postgres backend"
                                .to_string(),
                        )
                    })?;

                Ok(StorageConfig::postgres(
                    PostgresConfig::new(url).with_max_connections(self.max_connections),
                ))
            }
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Socket address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
