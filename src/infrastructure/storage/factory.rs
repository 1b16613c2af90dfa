//! Storage factory for runtime backend selection

use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::DomainError;
use crate::domain::storage::{Storage, StorageEntity};

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Supported storage backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    /// Process-local storage, lost on exit
    #[default]
    #[serde(alias = "in-memory", alias = "inmemory")]
    Memory,
    /// PostgreSQL JSONB documents
    #[serde(alias = "postgresql", alias = "pg")]
    Postgres,
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" => Ok(Self::Memory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(format!("Unknown storage backend '{}'", other)),
        }
    }
}

/// Resolved storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Memory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::Memory
    }

    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::Memory => StorageType::Memory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Builds storage instances for the configured backend
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage for `E`, preparing the table and indexes when backed by PostgreSQL
    pub async fn create<E>(
        config: &StorageConfig,
        table_name: &str,
    ) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match config {
            StorageConfig::Memory => {
                info!(table = table_name, "Using in-memory storage");
                Ok(Arc::new(InMemoryStorage::<E>::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                let storage = PostgresStorage::<E>::connect(pg_config, table_name).await?;
                storage.ensure_table().await?;
                info!(table = table_name, "Connected to PostgreSQL storage");
                Ok(Arc::new(storage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Person;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>(), Ok(StorageType::Memory));
        assert_eq!("In-Memory".parse::<StorageType>(), Ok(StorageType::Memory));
        assert_eq!("postgres".parse::<StorageType>(), Ok(StorageType::Postgres));
        assert_eq!("pg".parse::<StorageType>(), Ok(StorageType::Postgres));
        assert!("mongo".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_type_deserialize() {
        let parsed: StorageType = serde_json::from_str("\"postgresql\"").unwrap();
        assert_eq!(parsed, StorageType::Postgres);
        assert_eq!(StorageType::default(), StorageType::Memory);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::Memory);

        let postgres = StorageConfig::postgres(PostgresConfig::new("postgres://localhost/test"));
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let storage = StorageFactory::create::<Person>(&StorageConfig::in_memory(), "persons")
            .await
            .unwrap();

        assert_eq!(storage.count().await.unwrap(), 0);
    }
}
