//! Authentication and role-check middleware

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::warn;
use uuid::Uuid;

use crate::{error::ApiError, jwt::JwtService, models::Role, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins may access everything; users only what they own
    pub fn ensure_can_access(&self, owner_id: Uuid) -> Result<(), ApiError> {
        if self.is_admin() || self.id == owner_id {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Decode the bearer token, if any.
///
/// Returns `Ok(None)` when no `Authorization` header is present and
/// `Err(Unauthorized)` when one is present but unusable.
pub fn auth_user_from_headers(
    jwt_service: &JwtService,
    headers: &HeaderMap,
) -> Result<Option<AuthUser>, ApiError> {
    if !headers.contains_key(axum::http::header::AUTHORIZATION) {
        return Ok(None);
    }

    let Authorization(bearer) = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized)?;

    let claims = jwt_service.validate(bearer.token()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized
    })?;

    Ok(Some(AuthUser {
        id: claims.sub,
        role: claims.role,
    }))
}

/// Authentication middleware
///
/// Rejects requests without a valid bearer token and stores the decoded
/// [`AuthUser`] in the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = auth_user_from_headers(&state.jwt_service, req.headers())?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Role-check middleware; must run after [`auth_middleware`]
pub async fn admin_middleware(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .copied()
        .ok_or(ApiError::Unauthorized)?;

    if !user.is_admin() {
        warn!("User {} denied access to {}", user.id, req.uri().path());
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}
