//! Person endpoints

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use chrono::Utc;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PersonBody, PersonResponse, SearchParams};

const PERSON_NOT_FOUND: &str = "Person not found";

/// Person routes, relative to the mount point
pub fn create_persons_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_persons).post(create_person))
        .route("/info", get(info))
        .route("/search", get(search_persons))
        .route(
            "/{id}",
            get(get_person)
                .put(replace_person)
                .patch(patch_person)
                .delete(delete_person),
        )
}

fn to_responses(persons: Vec<crate::domain::Person>) -> Vec<PersonResponse> {
    persons.iter().map(PersonResponse::from).collect()
}

/// GET /persons
pub async fn list_persons(
    State(state): State<AppState>,
) -> Result<Json<Vec<PersonResponse>>, ApiError> {
    debug!("Listing persons");

    let persons = state.person_service.list().await?;

    Ok(Json(to_responses(persons)))
}

/// GET /persons/search?name=
pub async fn search_persons(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PersonResponse>>, ApiError> {
    debug!(term = ?params.name, "Searching persons");

    let persons = state.person_service.search(params.name.as_deref()).await?;

    Ok(Json(to_responses(persons)))
}

/// GET /persons/{id}
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PersonResponse>, ApiError> {
    debug!(id = %id, "Getting person");

    state
        .person_service
        .get(&id)
        .await?
        .map(|person| Json(PersonResponse::from(person)))
        .ok_or_else(|| ApiError::not_found(PERSON_NOT_FOUND))
}

/// POST /persons
pub async fn create_person(
    State(state): State<AppState>,
    Json(body): Json<PersonBody>,
) -> Result<(StatusCode, Json<PersonResponse>), ApiError> {
    let person = state.person_service.create(body.into()).await?;

    Ok((StatusCode::CREATED, Json(PersonResponse::from(person))))
}

/// PUT /persons/{id}
pub async fn replace_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PersonBody>,
) -> Result<Json<PersonResponse>, ApiError> {
    state
        .person_service
        .replace(&id, body.into())
        .await?
        .map(|person| Json(PersonResponse::from(person)))
        .ok_or_else(|| ApiError::not_found(PERSON_NOT_FOUND))
}

/// PATCH /persons/{id}
pub async fn patch_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PersonBody>,
) -> Result<Json<PersonResponse>, ApiError> {
    state
        .person_service
        .patch(&id, body.into())
        .await?
        .map(|person| Json(PersonResponse::from(person)))
        .ok_or_else(|| ApiError::not_found(PERSON_NOT_FOUND))
}

/// DELETE /persons/{id}
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.person_service.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(PERSON_NOT_FOUND))
    }
}

/// GET /persons/info
pub async fn info(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let count = state.person_service.count().await?;

    Ok(Html(render_info(count, &Utc::now().to_rfc2822())))
}

fn render_info(count: usize, timestamp: &str) -> String {
    format!(
        r#"<h1>Phonebook API</h1>
<p>Phonebook has info for {count} people</p>
<p>{timestamp}</p>
<h2>Available Endpoints:</h2>
<ul>
    <li>GET /api/persons - Get all persons</li>
    <li>GET /api/persons/{{id}} - Get a person by ID</li>
    <li>GET /api/persons/search?name=searchTerm - Search persons by name</li>
    <li>GET /api/persons/info - This info page</li>
    <li>POST /api/persons - Create a new person</li>
    <li>PUT /api/persons/{{id}} - Update a person (complete replacement)</li>
    <li>PATCH /api/persons/{{id}} - Partially update a person</li>
    <li>DELETE /api/persons/{{id}} - Delete a person</li>
</ul>"#
    )
}
