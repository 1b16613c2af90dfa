//! Domain layer - Core business logic and entities

pub mod error;
pub mod person;
pub mod storage;

pub use error::DomainError;
pub use person::{
    NewPerson, Person, PersonFields, PersonId, PersonPatch, PersonRepository,
    PersonValidationError,
};
pub use storage::{DocumentFilter, Storage, StorageEntity, StorageKey};
