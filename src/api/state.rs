//! Application state for shared services

use std::sync::Arc;

use crate::config::Environment;
use crate::domain::Person;
use crate::domain::storage::Storage;
use crate::infrastructure::person::{PersonService, PersonServiceTrait, StoragePersonRepository};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub person_service: Arc<dyn PersonServiceTrait>,
    pub environment: Environment,
}

impl AppState {
    pub fn new(person_service: Arc<dyn PersonServiceTrait>, environment: Environment) -> Self {
        Self {
            person_service,
            environment,
        }
    }

    /// Wire the person service on top of a storage backend
    pub fn from_storage(storage: Arc<dyn Storage<Person>>, environment: Environment) -> Self {
        let repository = Arc::new(StoragePersonRepository::new(storage));

        Self::new(Arc::new(PersonService::new(repository)), environment)
    }
}
