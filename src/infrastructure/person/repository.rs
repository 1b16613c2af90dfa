//! Storage-backed person repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::{DocumentFilter, Storage};
use crate::domain::{DomainError, NewPerson, Person, PersonFields, PersonId, PersonPatch, PersonRepository};

/// Storage-backed implementation of PersonRepository
#[derive(Debug)]
pub struct StoragePersonRepository {
    storage: Arc<dyn Storage<Person>>,
}

impl StoragePersonRepository {
    pub fn new(storage: Arc<dyn Storage<Person>>) -> Self {
        Self { storage }
    }
}

/// A person removed between read and write is absent, not an error
fn absent_as_none(result: Result<Person, DomainError>) -> Result<Option<Person>, DomainError> {
    match result {
        Ok(person) => Ok(Some(person)),
        Err(DomainError::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl PersonRepository for StoragePersonRepository {
    async fn find_all(&self) -> Result<Vec<Person>, DomainError> {
        let mut persons = self.storage.list().await?;

        // Newest first
        persons.sort_by(|a, b| b.created_at().cmp(&a.created_at()));

        Ok(persons)
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, DomainError> {
        self.storage.get(id).await
    }

    async fn insert(&self, person: NewPerson) -> Result<Person, DomainError> {
        let person = Person::new(PersonId::generate(), person.name, person.number)?;

        self.storage.create(person).await
    }

    async fn replace(
        &self,
        id: &PersonId,
        fields: PersonFields,
    ) -> Result<Option<Person>, DomainError> {
        let Some(mut person) = self.storage.get(id).await? else {
            return Ok(None);
        };

        person.replace(fields)?;

        absent_as_none(self.storage.update(person).await)
    }

    async fn patch(
        &self,
        id: &PersonId,
        patch: PersonPatch,
    ) -> Result<Option<Person>, DomainError> {
        let Some(mut person) = self.storage.get(id).await? else {
            return Ok(None);
        };

        person.apply_patch(patch)?;

        absent_as_none(self.storage.update(person).await)
    }

    async fn remove(&self, id: &PersonId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Person>, DomainError> {
        let mut persons = self
            .storage
            .find(&DocumentFilter::contains_ignore_case("name", term))
            .await?;

        persons.sort_by_cached_key(|p| p.name().to_lowercase());

        Ok(persons)
    }

    async fn find_by_name_or_number(
        &self,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Vec<Person>, DomainError> {
        let mut filters = Vec::new();

        if let Some(name) = name {
            filters.push(DocumentFilter::eq("name", name.trim()));
        }

        if let Some(number) = number {
            filters.push(DocumentFilter::eq("number", number));
        }

        if filters.is_empty() {
            return Ok(Vec::new());
        }

        self.storage.find(&DocumentFilter::or(filters)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockStorage;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_repo() -> StoragePersonRepository {
        StoragePersonRepository::new(Arc::new(InMemoryStorage::<Person>::new()))
    }

    async fn seed(repo: &StoragePersonRepository, name: &str, number: &str) -> Person {
        repo.insert(NewPerson::new(name, number)).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let repo = create_repo();

        let created = seed(&repo, "Arto Hellas", "313-555-4567").await;
        let found = repo.find_by_id(created.id()).await.unwrap().unwrap();

        assert_eq!(found.name(), "Arto Hellas");
        assert_eq!(found.number(), "313-555-4567");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_insert_invalid_is_validation_error() {
        let repo = create_repo();

        let result = repo.insert(NewPerson::new(" Al ", "212-555-0192")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let result = repo.insert(NewPerson::new("Arto Hellas", "1234567890123")).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_all_newest_first() {
        let repo = create_repo();
        seed(&repo, "First Person", "212-555-0101").await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        seed(&repo, "Second Person", "212-555-0102").await;

        let names: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();

        assert_eq!(names, vec!["Second Person", "First Person"]);
    }

    #[tokio::test]
    async fn test_replace_is_idempotent() {
        let repo = create_repo();
        let created = seed(&repo, "Arto Hellas", "313-555-4567").await;
        let fields = PersonFields::new("Ada Lovelace", "212-555-0192");

        let first = repo.replace(created.id(), fields.clone()).await.unwrap().unwrap();
        let second = repo.replace(created.id(), fields).await.unwrap().unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(first.name(), second.name());
        assert_eq!(first.number(), second.number());
        assert_eq!(first.created_at(), second.created_at());
    }

    #[tokio::test]
    async fn test_replace_missing_is_none() {
        let repo = create_repo();

        let result = repo
            .replace(&PersonId::generate(), PersonFields::new("Ada Lovelace", "212-555-0192"))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    /// Loses each person right after handing it out, like a concurrent delete
    #[derive(Debug, Default)]
    struct VanishingStorage {
        inner: InMemoryStorage<Person>,
    }

    #[async_trait]
    impl Storage<Person> for VanishingStorage {
        async fn get(&self, key: &PersonId) -> Result<Option<Person>, DomainError> {
            let found = self.inner.get(key).await?;
            self.inner.delete(key).await?;
            Ok(found)
        }

        async fn list(&self) -> Result<Vec<Person>, DomainError> {
            self.inner.list().await
        }

        async fn create(&self, entity: Person) -> Result<Person, DomainError> {
            self.inner.create(entity).await
        }

        async fn update(&self, entity: Person) -> Result<Person, DomainError> {
            self.inner.update(entity).await
        }

        async fn delete(&self, key: &PersonId) -> Result<bool, DomainError> {
            self.inner.delete(key).await
        }

        async fn clear(&self) -> Result<(), DomainError> {
            self.inner.clear().await
        }
    }

    #[tokio::test]
    async fn test_update_after_concurrent_delete_is_none() {
        let repo = StoragePersonRepository::new(Arc::new(VanishingStorage::default()));
        let created = seed(&repo, "Arto Hellas", "313-555-4567").await;

        let replaced = repo
            .replace(created.id(), PersonFields::new("Ada Lovelace", "212-555-0192"))
            .await
            .unwrap();
        assert!(replaced.is_none());

        let created = seed(&repo, "Grace Hopper", "313-555-0100").await;
        let patched = repo
            .patch(created.id(), PersonPatch::new().with_number("212-555-0101"))
            .await
            .unwrap();
        assert!(patched.is_none());
    }

    #[tokio::test]
    async fn test_patch_merges_fields() {
        let repo = create_repo();
        let created = seed(&repo, "Arto Hellas", "313-555-4567").await;

        let patched = repo
            .patch(created.id(), PersonPatch::new().with_number("212-555-0192"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(patched.name(), "Arto Hellas");
        assert_eq!(patched.number(), "212-555-0192");
    }

    #[tokio::test]
    async fn test_patch_invalid_keeps_stored_record() {
        let repo = create_repo();
        let created = seed(&repo, "Arto Hellas", "313-555-4567").await;

        let result = repo
            .patch(created.id(), PersonPatch::new().with_name("Al"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
        let stored = repo.find_by_id(created.id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "Arto Hellas");
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = create_repo();
        let created = seed(&repo, "Arto Hellas", "313-555-4567").await;

        assert!(repo.remove(created.id()).await.unwrap());
        assert!(!repo.remove(created.id()).await.unwrap());
        assert!(repo.find_by_id(created.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let repo = create_repo();
        seed(&repo, "Hannah", "212-555-0101").await;
        seed(&repo, "Bob", "212-555-0102").await;
        seed(&repo, "Ann Smith", "212-555-0103").await;

        let names: Vec<String> = repo
            .search_by_name("ann")
            .await
            .unwrap()
            .iter()
            .map(|p| p.name().to_string())
            .collect();

        assert_eq!(names, vec!["Ann Smith", "Hannah"]);
    }

    #[tokio::test]
    async fn test_exists_by_name_or_number() {
        let repo = create_repo();
        seed(&repo, "Arto Hellas", "313-555-4567").await;

        assert!(repo.exists_by_name_or_number("Arto Hellas", "212-555-0192").await.unwrap());
        assert!(repo.exists_by_name_or_number("Ada Lovelace", "313-555-4567").await.unwrap());
        assert!(!repo.exists_by_name_or_number("Ada Lovelace", "212-555-0192").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_name_or_number_without_criteria() {
        let repo = create_repo();
        seed(&repo, "Arto Hellas", "313-555-4567").await;

        assert!(repo.find_by_name_or_number(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let storage = Arc::new(MockStorage::<Person>::new().with_error("connection reset"));
        let repo = StoragePersonRepository::new(storage);

        let result = repo.find_all().await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
