//! Adoption applications
//!
//! Submitting requires a login; the owner is always taken from the token.
//! Listing everything and reviewing (status changes) is admin-only.

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tracing::info;

use super::{JsonBody, parse_id};
use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, admin_middleware, auth_middleware},
    models::{AdoptionForm, AdoptionFormChanges, AdoptionFormDetails, NewAdoptionForm},
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/", post(create_form))
        .route("/me", get(get_my_forms))
        .route("/:id", get(get_form))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/", get(get_forms))
        .route("/:id", put(update_form).delete(delete_form))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    authenticated.merge(admin)
}

/// Submit an application for the caller
pub async fn create_form(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(payload): JsonBody<NewAdoptionForm>,
) -> ApiResult<impl IntoResponse> {
    let pet_id = payload.validate()?;

    if !state.pet_repository.exists(pet_id).await? {
        return Err(ApiError::NotFound("Pet not found".to_string()));
    }
    if state.user_repository.find_by_id(auth.id).await?.is_none() {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let form = state
        .adoption_form_repository
        .create(auth.id, pet_id, &payload)
        .await?;
    info!("Adoption form {} submitted by {}", form.id, auth.id);

    Ok((StatusCode::CREATED, Json(form)))
}

/// All applications with their pet
pub async fn get_forms(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<AdoptionFormDetails>>> {
    Ok(Json(state.adoption_form_repository.list_details().await?))
}

/// The caller's own applications
pub async fn get_my_forms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<AdoptionFormDetails>>> {
    Ok(Json(
        state
            .adoption_form_repository
            .list_details_for_user(auth.id)
            .await?,
    ))
}

/// One application; owner or admin
pub async fn get_form(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<AdoptionFormDetails>> {
    let id = parse_id(&id)?;
    let form = state
        .adoption_form_repository
        .find_details(id)
        .await?
        .ok_or_else(form_not_found)?;

    auth.ensure_can_access(form.user)?;

    Ok(Json(form))
}

/// Edit an application or move it to another status
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<AdoptionFormChanges>,
) -> ApiResult<Json<AdoptionForm>> {
    let id = parse_id(&id)?;
    let status = changes.validate()?;

    let form = state
        .adoption_form_repository
        .update(id, &changes, status)
        .await?
        .ok_or_else(form_not_found)?;

    if let Some(status) = status {
        info!("Adoption form {} is now {}", form.id, status);
    }

    Ok(Json(form))
}

/// Delete an application
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    if state.adoption_form_repository.delete(id).await? {
        Ok(Json(json!({ "message": "Adoption form deleted" })))
    } else {
        Err(form_not_found())
    }
}

fn form_not_found() -> ApiError {
    ApiError::NotFound("Adoption form not found".to_string())
}
