//! User accounts: signup, login and profile management

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::{JsonBody, parse_id};
use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, admin_middleware, auth_middleware, auth_user_from_headers},
    models::{LoginRequest, Role, SignupRequest, UpdateUserRequest, User, user::normalize_email},
    repositories::user::hash_password,
    state::AppState,
};

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

pub fn router(state: AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/me", get(get_me))
        .route("/:id", get(get_user).put(update_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin = Router::new()
        .route("/", get(get_users))
        .route("/:id", delete(delete_user))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .merge(authenticated)
        .merge(admin)
}

/// Register a new account. Creating an admin requires an admin token.
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let new_user = payload.validate()?;

    if new_user.role == Role::Admin {
        let caller = auth_user_from_headers(&state.jwt_service, &headers)?
            .ok_or(ApiError::Forbidden)?;
        if !caller.is_admin() {
            warn!("User {} tried to create an admin account", caller.id);
            return Err(ApiError::Forbidden);
        }
    }

    let password_hash = hash(&new_user.password)?;
    let user = state.user_repository.create(&new_user, &password_hash).await?;
    info!("User signed up: {} ({})", user.email, user.role);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created", "user": user })),
    ))
}

/// Exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let email = normalize_email(&payload.email);
    info!("Login attempt for user: {}", email);

    let user = state
        .user_repository
        .find_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = state
        .user_repository
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password for {}: {}", user.id, e);
            ApiError::InternalServerError
        })?;
    if !valid {
        warn!("Failed login for user: {}", email);
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt_service.issue(&user).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(LoginResponse { token, user }))
}

/// Get all users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.user_repository.get_all().await?))
}

/// The account behind the bearer token
pub async fn get_me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<User>> {
    let user = state
        .user_repository
        .find_by_id(auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Get a user by ID; self or admin
pub async fn get_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id)?;
    auth.ensure_can_access(id)?;

    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Update a user; self or admin, and only admins may change roles
pub async fn update_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let id = parse_id(&id)?;
    auth.ensure_can_access(id)?;

    let changes = payload.validate()?;
    if changes.role.is_some() && !auth.is_admin() {
        warn!("User {} tried to change a role", auth.id);
        return Err(ApiError::Forbidden);
    }

    let password_hash = changes.password.as_deref().map(hash).transpose()?;

    let user = state
        .user_repository
        .update(id, &changes, password_hash.as_deref())
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    if state.user_repository.delete(id).await? {
        Ok(Json(json!({ "message": "User deleted" })))
    } else {
        Err(ApiError::NotFound("User not found".to_string()))
    }
}

fn hash(password: &str) -> ApiResult<String> {
    hash_password(password).map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::InternalServerError
    })
}
