//! Person repository trait

use async_trait::async_trait;

use super::entity::{NewPerson, Person, PersonFields, PersonId, PersonPatch};
use crate::domain::DomainError;

/// Persistence adapter for contacts.
///
/// Absence is reported as `None` / `false`, never as an error.
#[async_trait]
pub trait PersonRepository: Send + Sync + std::fmt::Debug {
    /// All persons, newest first
    async fn find_all(&self) -> Result<Vec<Person>, DomainError>;

    /// Get a person by ID
    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, DomainError>;

    /// Store a new person, assigning its ID and timestamps
    async fn insert(&self, person: NewPerson) -> Result<Person, DomainError>;

    /// Replace every mutable field of an existing person
    async fn replace(&self, id: &PersonId, fields: PersonFields)
        -> Result<Option<Person>, DomainError>;

    /// Merge the provided fields into an existing person
    async fn patch(&self, id: &PersonId, patch: PersonPatch)
        -> Result<Option<Person>, DomainError>;

    /// Delete a person by ID
    async fn remove(&self, id: &PersonId) -> Result<bool, DomainError>;

    /// Number of stored persons
    async fn count(&self) -> Result<usize, DomainError>;

    /// Case-insensitive substring search on the name, alphabetical order
    async fn search_by_name(&self, term: &str) -> Result<Vec<Person>, DomainError>;

    /// Persons whose name or number equals one of the given values
    async fn find_by_name_or_number(
        &self,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Vec<Person>, DomainError>;

    /// Whether any person has this exact name or this exact number
    async fn exists_by_name_or_number(&self, name: &str, number: &str) -> Result<bool, DomainError> {
        Ok(!self
            .find_by_name_or_number(Some(name), Some(number))
            .await?
            .is_empty())
    }
}
