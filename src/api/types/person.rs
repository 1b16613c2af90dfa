//! Person wire types shared by the HTTP API and its client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Person, PersonPatch};
use crate::infrastructure::person::{CreatePersonRequest, UpdatePersonRequest};

/// Person as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: String,
    pub name: String,
    pub number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Person> for PersonResponse {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id().to_string(),
            name: person.name().to_string(),
            number: person.number().to_string(),
            created_at: person.created_at(),
            updated_at: person.updated_at(),
        }
    }
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self::from(&person)
    }
}

/// Request body for POST, PUT and PATCH. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl PersonBody {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            number: Some(number.into()),
        }
    }
}

impl From<PersonBody> for CreatePersonRequest {
    fn from(body: PersonBody) -> Self {
        Self {
            name: body.name,
            number: body.number,
        }
    }
}

impl From<PersonBody> for UpdatePersonRequest {
    fn from(body: PersonBody) -> Self {
        Self {
            name: body.name,
            number: body.number,
        }
    }
}

impl From<PersonBody> for PersonPatch {
    fn from(body: PersonBody) -> Self {
        Self {
            name: body.name,
            number: body.number,
        }
    }
}

/// Query string of the search endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PersonId;

    #[test]
    fn test_response_uses_camel_case() {
        let person = Person::new(PersonId::generate(), "Ada Lovelace", "212-555-0192").unwrap();
        let json = serde_json::to_value(PersonResponse::from(&person)).unwrap();

        assert_eq!(json["id"], person.id().as_str());
        assert_eq!(json["name"], "Ada Lovelace");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn test_body_ignores_unknown_fields() {
        let body: PersonBody = serde_json::from_str(r#"{"nickname":"Ada"}"#).unwrap();

        assert_eq!(body, PersonBody::default());
        assert!(PersonPatch::from(body).is_empty());
    }

    #[test]
    fn test_body_serializes_only_present_fields() {
        let body = PersonBody {
            name: None,
            number: Some("212-555-0192".to_string()),
        };

        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"number":"212-555-0192"}"#
        );
    }
}
