//! Pet catalogue
//!
//! Reads are public. Writes are admin-only and accept multipart or JSON
//! bodies through [`FormPayload`]; a picture stored for a request that then
//! fails is removed again.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use super::parse_id;
use crate::{
    error::{ApiError, ApiResult},
    middleware::{admin_middleware, auth_middleware},
    models::{NewPet, Pet, PetChanges},
    state::AppState,
    upload::FormPayload,
};

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", post(create_pet))
        .route("/:id", put(update_pet).delete(delete_pet))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/", get(get_pets))
        .route("/:id", get(get_pet))
        .merge(admin)
}

/// Get all pets, newest first
pub async fn get_pets(State(state): State<AppState>) -> ApiResult<Json<Vec<Pet>>> {
    Ok(Json(state.pet_repository.get_all().await?))
}

/// Get a pet by ID
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Pet>> {
    let id = parse_id(&id)?;
    let pet = state
        .pet_repository
        .find_by_id(id)
        .await?
        .ok_or_else(pet_not_found)?;

    Ok(Json(pet))
}

/// Create a pet
pub async fn create_pet(
    State(state): State<AppState>,
    payload: FormPayload,
) -> ApiResult<impl IntoResponse> {
    match insert_pet(&state, &payload).await {
        Ok(pet) => Ok((StatusCode::CREATED, Json(pet))),
        Err(e) => {
            payload.discard(&state.uploads).await;
            Err(e)
        }
    }
}

async fn insert_pet(state: &AppState, payload: &FormPayload) -> ApiResult<Pet> {
    let new_pet = NewPet::from_fields(&payload.fields, payload.picture_path())?;
    Ok(state.pet_repository.create(&new_pet).await?)
}

/// Update a pet; only the supplied fields change
pub async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: FormPayload,
) -> ApiResult<Json<Pet>> {
    match apply_pet_changes(&state, &id, &payload).await {
        Ok(pet) => Ok(Json(pet)),
        Err(e) => {
            payload.discard(&state.uploads).await;
            Err(e)
        }
    }
}

async fn apply_pet_changes(state: &AppState, id: &str, payload: &FormPayload) -> ApiResult<Pet> {
    let id = parse_id(id)?;
    let changes = PetChanges::from_fields(&payload.fields, payload.picture_path())?;
    state
        .pet_repository
        .update(id, &changes)
        .await?
        .ok_or_else(pet_not_found)
}

/// Delete a pet
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    if state.pet_repository.delete(id).await? {
        Ok(Json(json!({ "message": "Pet deleted" })))
    } else {
        Err(pet_not_found())
    }
}

fn pet_not_found() -> ApiError {
    ApiError::NotFound("Pet not found".to_string())
}
