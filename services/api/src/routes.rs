//! API service routes
//!
//! Each resource lives in its own module exposing a `router`. Guarded routes
//! are grouped so `route_layer` can wrap them with the auth middleware and,
//! where needed, the admin check.

use axum::{
    Json, Router,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
    upload::PUBLIC_PREFIX,
};

pub mod adoption_forms;
pub mod contact_forms;
pub mod pets;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/users", users::router(state.clone()))
        .nest("/api/pets", pets::router(state.clone()))
        .nest("/api/adoption-forms", adoption_forms::router(state.clone()))
        .nest("/api/contact-forms", contact_forms::router(state.clone()))
        .nest_service(PUBLIC_PREFIX, uploads)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    let status = if database {
        StatusCode::OK
    } else {
        error!("Health check failed: database unreachable");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database { "ok" } else { "degraded" },
            "service": "hope-sanctuary-api",
            "database": database
        })),
    )
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// JSON body whose rejections use the API error shape
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::rejected(rejection.status(), rejection.body_text())
            })?;
        Ok(JsonBody(value))
    }
}

/// Parse an `:id` path segment
pub(crate) fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("Invalid id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_bad_requests() {
        assert!(matches!(parse_id("42"), Err(ApiError::BadRequest(msg)) if msg == "Invalid id"));
        assert!(matches!(
            parse_id("65f1c0de5b1e4a0012345678"),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn uuid_ids_parse() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}
