//! In-memory document storage

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;
use crate::domain::storage::{DocumentFilter, Storage, StorageEntity, StorageKey};

/// Thread-safe in-memory storage implementation
///
/// Entities are kept next to their serialized document so filters run
/// against the same JSON shape a database backend would see.
/// Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    entities: RwLock<HashMap<String, (E, Value)>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }

    /// Creates storage pre-populated with entities
    pub fn with_entities(entities: Vec<E>) -> Result<Self, DomainError> {
        let storage = Self::new();
        {
            let mut map = storage.entities.write().map_err(lock_error)?;

            for entity in entities {
                let document = to_document(&entity)?;
                map.insert(entity.key().as_str().to_string(), (entity, document));
            }
        }
        Ok(storage)
    }
}

fn to_document<E: StorageEntity>(entity: &E) -> Result<Value, DomainError> {
    serde_json::to_value(entity)
        .map_err(|e| DomainError::storage(format!("Failed to serialize entity: {}", e)))
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> DomainError {
    DomainError::storage(format!("Failed to acquire storage lock: {}", e))
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let entities = self.entities.read().map_err(lock_error)?;

        Ok(entities.get(key.as_str()).map(|(entity, _)| entity.clone()))
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let entities = self.entities.read().map_err(lock_error)?;

        Ok(entities.values().map(|(entity, _)| entity.clone()).collect())
    }

    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<E>, DomainError> {
        let entities = self.entities.read().map_err(lock_error)?;

        Ok(entities
            .values()
            .filter(|(_, document)| filter.matches(document))
            .map(|(entity, _)| entity.clone())
            .collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let document = to_document(&entity)?;
        let mut entities = self.entities.write().map_err(lock_error)?;

        if entities.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        entities.insert(key, (entity.clone(), document));
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let document = to_document(&entity)?;
        let mut entities = self.entities.write().map_err(lock_error)?;

        match entities.get_mut(&key) {
            Some(slot) => {
                *slot = (entity.clone(), document);
                Ok(entity)
            }
            None => Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            ))),
        }
    }

    async fn delete(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut entities = self.entities.write().map_err(lock_error)?;

        Ok(entities.remove(key.as_str()).is_some())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut entities = self.entities.write().map_err(lock_error)?;

        entities.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let entities = self.entities.read().map_err(lock_error)?;

        Ok(entities.len())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let entities = self.entities.read().map_err(lock_error)?;

        Ok(entities.contains_key(key.as_str()))
    }
}
