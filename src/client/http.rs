//! Typed HTTP client for the persons API

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::abort::AbortSignal;
use crate::api::types::{ApiErrorBody, PersonBody, PersonResponse};

/// Errors returned by the phonebook client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request aborted")]
    Aborted,
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The calls the UI controller needs
#[async_trait]
pub trait PersonsApi: Send + Sync + Debug {
    async fn get_all(&self, abort: Option<AbortSignal>) -> Result<Vec<PersonResponse>, ClientError>;

    async fn create(&self, person: &PersonBody) -> Result<PersonResponse, ClientError>;

    async fn update(&self, id: &str, person: &PersonBody) -> Result<PersonResponse, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

/// Client for a running phonebook API. No retries.
#[derive(Debug, Clone)]
pub struct PhonebookClient {
    client: Client,
    base_url: String,
}

impl PhonebookClient {
    /// `api_url` is the server root, e.g. `http://localhost:3001`
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_url)
    }

    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        let root = api_url.into();

        Self {
            client,
            base_url: format!("{}/api/persons", root.trim_end_matches('/')),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{}", self.base_url, suffix)
    }

    /// Get a single person
    pub async fn get_one(&self, id: &str) -> Result<PersonResponse, ClientError> {
        let response = self.client.get(self.url(&format!("/{}", id))).send().await?;
        parse_json(response).await
    }

    /// Case-insensitive name search
    pub async fn search(&self, name: &str) -> Result<Vec<PersonResponse>, ClientError> {
        let response = self
            .client
            .get(self.url("/search"))
            .query(&[("name", name)])
            .send()
            .await?;
        parse_json(response).await
    }

    /// Partially update a person
    pub async fn patch(&self, id: &str, fields: &PersonBody) -> Result<PersonResponse, ClientError> {
        let response = self
            .client
            .patch(self.url(&format!("/{}", id)))
            .json(fields)
            .send()
            .await?;
        parse_json(response).await
    }

    /// The HTML info page
    pub async fn info(&self) -> Result<String, ClientError> {
        let response = self.client.get(self.url("/info")).send().await?;
        Ok(check_status(response).await?.text().await?)
    }
}

#[async_trait]
impl PersonsApi for PhonebookClient {
    async fn get_all(&self, abort: Option<AbortSignal>) -> Result<Vec<PersonResponse>, ClientError> {
        let fetch = async {
            let response = self.client.get(self.url("")).send().await?;
            parse_json::<Vec<PersonResponse>>(response).await
        };

        match abort {
            Some(signal) if signal.is_aborted() => Err(ClientError::Aborted),
            Some(signal) => {
                tokio::select! {
                    biased;
                    _ = signal.aborted() => {
                        debug!("Person list request aborted");
                        Err(ClientError::Aborted)
                    }
                    result = fetch => result,
                }
            }
            None => fetch.await,
        }
    }

    async fn create(&self, person: &PersonBody) -> Result<PersonResponse, ClientError> {
        let response = self.client.post(self.url("")).json(person).send().await?;
        parse_json(response).await
    }

    async fn update(&self, id: &str, person: &PersonBody) -> Result<PersonResponse, ClientError> {
        let response = self
            .client
            .put(self.url(&format!("/{}", id)))
            .json(person)
            .send()
            .await?;
        parse_json(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self.client.delete(self.url(&format!("/{}", id))).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check_status(response).await?.json().await?)
}

/// Turn non-2xx responses into `ClientError::Api`, using the server's error body
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(ApiErrorBody {
            error,
            message: Some(detail),
        }) => format!("{}: {}", error, detail),
        Ok(ApiErrorBody { error, .. }) => error,
        Err(_) if text.is_empty() => status.to_string(),
        Err(_) => text,
    };

    warn!(status = %status.as_u16(), message = %message, "API request failed");

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::Utc;
    use uuid::Uuid;

    /// In-process stand-in for the API
    #[derive(Debug, Default)]
    pub struct MockPersonsApi {
        persons: Mutex<Vec<PersonResponse>>,
        fail: Mutex<bool>,
        list_delay: Mutex<Option<Duration>>,
        calls: AtomicUsize,
    }

    impl MockPersonsApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_person(self, name: &str, number: &str) -> Self {
            self.persons.lock().unwrap().push(person(name, number));
            self
        }

        pub fn failing(self) -> Self {
            *self.fail.lock().unwrap() = true;
            self
        }

        pub fn with_list_delay(self, delay: Duration) -> Self {
            *self.list_delay.lock().unwrap() = Some(delay);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn persons(&self) -> Vec<PersonResponse> {
            self.persons.lock().unwrap().clone()
        }

        fn enter(&self) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if *self.fail.lock().unwrap() {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Internal server error: Something went wrong".to_string(),
                });
            }
            Ok(())
        }
    }

    pub fn person(name: &str, number: &str) -> PersonResponse {
        let now = Utc::now();

        PersonResponse {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            number: number.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl PersonsApi for MockPersonsApi {
        async fn get_all(
            &self,
            abort: Option<AbortSignal>,
        ) -> Result<Vec<PersonResponse>, ClientError> {
            self.enter()?;
            let delay = *self.list_delay.lock().unwrap();

            if let Some(delay) = delay {
                match abort {
                    Some(signal) => {
                        tokio::select! {
                            _ = signal.aborted() => return Err(ClientError::Aborted),
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                    None => tokio::time::sleep(delay).await,
                }
            }

            Ok(self.persons())
        }

        async fn create(&self, body: &PersonBody) -> Result<PersonResponse, ClientError> {
            self.enter()?;
            let created = person(
                body.name.as_deref().unwrap_or_default(),
                body.number.as_deref().unwrap_or_default(),
            );
            self.persons.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: &str, body: &PersonBody) -> Result<PersonResponse, ClientError> {
            self.enter()?;
            let mut persons = self.persons.lock().unwrap();
            let existing = persons
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(ClientError::Api {
                    status: 404,
                    message: "Person not found".to_string(),
                })?;

            if let Some(name) = &body.name {
                existing.name = name.clone();
            }
            if let Some(number) = &body.number {
                existing.number = number.clone();
            }
            existing.updated_at = Utc::now();

            Ok(existing.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ClientError> {
            self.enter()?;
            let mut persons = self.persons.lock().unwrap();
            let before = persons.len();
            persons.retain(|p| p.id != id);

            if persons.len() == before {
                return Err(ClientError::Api {
                    status: 404,
                    message: "Person not found".to_string(),
                });
            }
            Ok(())
        }
    }
}
