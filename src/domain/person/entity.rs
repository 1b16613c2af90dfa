//! Person entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{PersonValidationError, validate_person_name, validate_person_number};
use crate::domain::storage::{StorageEntity, StorageKey};

/// Person identifier - a UUID generated by the persistence layer, kept in hyphenated form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonId(String);

impl PersonId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Parse an identifier received from outside (URL path, stored document)
    pub fn parse(id: &str) -> Result<Self, PersonValidationError> {
        Uuid::parse_str(id)
            .map(Self::from_uuid)
            .map_err(|_| PersonValidationError::InvalidId)
    }

    fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PersonId {
    type Error = PersonValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PersonId> for String {
    fn from(id: PersonId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for PersonId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fields supplied when inserting a person
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub name: String,
    pub number: String,
}

impl NewPerson {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }
}

/// All mutable fields, used for full replacement
pub type PersonFields = NewPerson;

/// A partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub number: Option<String>,
}

impl PersonPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.number.is_none()
    }
}

/// A phonebook contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    name: String,
    number: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Person {
    /// Create a new person. The name is stored trimmed.
    pub fn new(
        id: PersonId,
        name: impl Into<String>,
        number: impl Into<String>,
    ) -> Result<Self, PersonValidationError> {
        let name = name.into();
        let number = number.into();
        validate_person_name(&name)?;
        validate_person_number(&number)?;
        let now = Utc::now();

        Ok(Self {
            id,
            name: name.trim().to_string(),
            number,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Replace every mutable field. Nothing changes if either field is invalid.
    pub fn replace(&mut self, fields: PersonFields) -> Result<(), PersonValidationError> {
        validate_person_name(&fields.name)?;
        validate_person_number(&fields.number)?;
        self.name = fields.name.trim().to_string();
        self.number = fields.number;
        self.touch();
        Ok(())
    }

    /// Apply the provided fields only. Nothing changes if any of them is invalid.
    pub fn apply_patch(&mut self, patch: PersonPatch) -> Result<(), PersonValidationError> {
        if let Some(ref name) = patch.name {
            validate_person_name(name)?;
        }

        if let Some(ref number) = patch.number {
            validate_person_number(number)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }

        if let Some(number) = patch.number {
            self.number = number;
        }

        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Person {
    type Key = PersonId;

    const INDEXED_FIELDS: &'static [&'static str] = &["name", "number"];

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
