//! Phonebook
//!
//! Contact records (name and phone number) behind an HTTP API, with:
//! - Validation and uniqueness rules in a person service
//! - In-memory or PostgreSQL document storage
//! - A typed HTTP client and a UI state controller for front ends

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use api::state::AppState;
use domain::Person;
use infrastructure::storage::StorageFactory;
use tracing::info;

/// Table (or collection) holding person documents
pub const PERSONS_TABLE: &str = "persons";

/// Create the application state with in-memory storage and default settings
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = config.storage.resolve()?;

    info!("Storage backend: {:?}", storage_config.storage_type());

    let storage = StorageFactory::create::<Person>(&storage_config, PERSONS_TABLE)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    Ok(AppState::from_storage(storage, config.environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_app_state_defaults_to_memory() {
        let state = create_app_state().await.unwrap();

        assert_eq!(state.person_service.count().await.unwrap(), 0);
        assert!(!state.environment.is_development());
    }
}
