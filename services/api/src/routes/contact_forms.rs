//! Contact enquiries
//!
//! Anyone may submit; everything else is admin-only. Review state lives in
//! `[READ]` / `[CONTACTED]` tokens on the subject line.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;

use super::{JsonBody, parse_id};
use crate::{
    error::{ApiError, ApiResult},
    middleware::{admin_middleware, auth_middleware},
    models::{ContactForm, ContactFormChanges, FlagChanges, NewContactForm},
    state::AppState,
};

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/", get(get_forms))
        .route(
            "/:id",
            get(get_form).put(update_form).delete(delete_form),
        )
        .route("/:id/flags", patch(update_flags))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().route("/", post(create_form)).merge(admin)
}

/// Submit an enquiry
pub async fn create_form(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<NewContactForm>,
) -> ApiResult<impl IntoResponse> {
    payload.validate()?;

    let form = state.contact_form_repository.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(form)))
}

/// All enquiries, newest first
pub async fn get_forms(State(state): State<AppState>) -> ApiResult<Json<Vec<ContactForm>>> {
    Ok(Json(state.contact_form_repository.get_all().await?))
}

/// Get an enquiry by ID
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ContactForm>> {
    let id = parse_id(&id)?;
    let form = state
        .contact_form_repository
        .find_by_id(id)
        .await?
        .ok_or_else(form_not_found)?;

    Ok(Json(form))
}

/// Edit an enquiry
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<ContactFormChanges>,
) -> ApiResult<Json<ContactForm>> {
    let id = parse_id(&id)?;
    changes.validate()?;

    let form = state
        .contact_form_repository
        .update(id, &changes)
        .await?
        .ok_or_else(form_not_found)?;

    Ok(Json(form))
}

/// Set or clear the review flags carried in the subject
pub async fn update_flags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(changes): JsonBody<FlagChanges>,
) -> ApiResult<Json<ContactForm>> {
    let id = parse_id(&id)?;
    let form = state
        .contact_form_repository
        .update_flags(id, changes)
        .await?
        .ok_or_else(form_not_found)?;

    Ok(Json(form))
}

/// Delete an enquiry
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    if state.contact_form_repository.delete(id).await? {
        Ok(Json(json!({ "message": "Contact form deleted" })))
    } else {
        Err(form_not_found())
    }
}

fn form_not_found() -> ApiError {
    ApiError::NotFound("Contact form not found".to_string())
}
