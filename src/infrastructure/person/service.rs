//! Person service: contact orchestration and uniqueness checks

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::domain::{DomainError, NewPerson, Person, PersonFields, PersonId, PersonPatch, PersonRepository};

const DUPLICATE_MESSAGE: &str = "A person with this name or number already exists";

/// Request for creating a person. Fields are optional so absence can be reported.
#[derive(Debug, Clone, Default)]
pub struct CreatePersonRequest {
    pub name: Option<String>,
    pub number: Option<String>,
}

/// Request for replacing every field of a person
#[derive(Debug, Clone, Default)]
pub struct UpdatePersonRequest {
    pub name: Option<String>,
    pub number: Option<String>,
}

/// Trait for person service operations (dynamic dispatch in AppState)
#[async_trait]
pub trait PersonServiceTrait: Send + Sync + Debug {
    /// All persons, newest first
    async fn list(&self) -> Result<Vec<Person>, DomainError>;

    /// Get a person by its textual ID
    async fn get(&self, id: &str) -> Result<Option<Person>, DomainError>;

    /// Create a person after the presence and uniqueness checks
    async fn create(&self, request: CreatePersonRequest) -> Result<Person, DomainError>;

    /// Replace every field; `None` when the person does not exist
    async fn replace(
        &self,
        id: &str,
        request: UpdatePersonRequest,
    ) -> Result<Option<Person>, DomainError>;

    /// Merge the provided fields; `None` when the person does not exist
    async fn patch(&self, id: &str, patch: PersonPatch) -> Result<Option<Person>, DomainError>;

    /// Delete a person, returns false when nothing was deleted
    async fn delete(&self, id: &str) -> Result<bool, DomainError>;

    /// Case-insensitive name search
    async fn search(&self, term: Option<&str>) -> Result<Vec<Person>, DomainError>;

    /// Number of stored persons
    async fn count(&self) -> Result<usize, DomainError>;
}

/// Person service implementation
#[derive(Debug)]
pub struct PersonService<R: PersonRepository> {
    repository: Arc<R>,
}

impl<R: PersonRepository> PersonService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    fn parse_id(&self, id: &str) -> Result<PersonId, DomainError> {
        PersonId::parse(id).map_err(DomainError::from)
    }

    /// Fails with a conflict when another person already holds the name or number
    async fn ensure_unique(
        &self,
        exclude: Option<&PersonId>,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<(), DomainError> {
        let taken = self
            .repository
            .find_by_name_or_number(name, number)
            .await?
            .iter()
            .any(|p| Some(p.id()) != exclude);

        if taken {
            warn!(name = ?name, number = ?number, "Duplicate person rejected");
            return Err(DomainError::conflict(DUPLICATE_MESSAGE));
        }

        Ok(())
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl<R: PersonRepository> PersonServiceTrait for PersonService<R> {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Person>, DomainError> {
        self.repository.find_all().await
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Option<Person>, DomainError> {
        let person_id = self.parse_id(id)?;
        self.repository.find_by_id(&person_id).await
    }

    #[instrument(skip(self, request))]
    async fn create(&self, request: CreatePersonRequest) -> Result<Person, DomainError> {
        let (Some(name), Some(number)) = (present(request.name), present(request.number)) else {
            return Err(DomainError::bad_request("Name and number are required"));
        };

        if self.repository.exists_by_name_or_number(name.trim(), &number).await? {
            warn!(name = %name, "Duplicate person rejected");
            return Err(DomainError::conflict(DUPLICATE_MESSAGE));
        }

        let person = self.repository.insert(NewPerson::new(name, number)).await?;
        info!(id = %person.id(), name = %person.name(), "Created person");

        Ok(person)
    }

    #[instrument(skip(self, request))]
    async fn replace(
        &self,
        id: &str,
        request: UpdatePersonRequest,
    ) -> Result<Option<Person>, DomainError> {
        let person_id = self.parse_id(id)?;

        let (Some(name), Some(number)) = (present(request.name), present(request.number)) else {
            return Err(DomainError::bad_request(
                "PUT requires all fields. Both 'name' and 'number' must be provided",
            ));
        };

        if self.repository.find_by_id(&person_id).await?.is_none() {
            debug!(id = %person_id, "Person to replace not found");
            return Ok(None);
        }

        self.ensure_unique(Some(&person_id), Some(&name), Some(&number))
            .await?;

        let replaced = self
            .repository
            .replace(&person_id, PersonFields::new(name, number))
            .await?;

        match &replaced {
            Some(person) => info!(id = %person.id(), "Replaced person"),
            None => debug!(id = %person_id, "Person to replace not found"),
        }

        Ok(replaced)
    }

    #[instrument(skip(self, patch))]
    async fn patch(&self, id: &str, patch: PersonPatch) -> Result<Option<Person>, DomainError> {
        let person_id = self.parse_id(id)?;

        if patch.is_empty() {
            return Err(DomainError::bad_request("No updates provided"));
        }

        if self.repository.find_by_id(&person_id).await?.is_none() {
            debug!(id = %person_id, "Person to patch not found");
            return Ok(None);
        }

        self.ensure_unique(
            Some(&person_id),
            patch.name.as_deref(),
            patch.number.as_deref(),
        )
        .await?;

        let patched = self.repository.patch(&person_id, patch).await?;

        match &patched {
            Some(person) => info!(id = %person.id(), "Patched person"),
            None => debug!(id = %person_id, "Person to patch not found"),
        }

        Ok(patched)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let person_id = self.parse_id(id)?;
        let deleted = self.repository.remove(&person_id).await?;

        if deleted {
            info!(id = %person_id, "Deleted person");
        }

        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn search(&self, term: Option<&str>) -> Result<Vec<Person>, DomainError> {
        let term = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| DomainError::bad_request("Name query parameter is required"))?;

        self.repository.search_by_name(term).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}
