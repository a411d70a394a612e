/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user, returns a token
/// - `POST /auth/login` - Exchange credentials for a token
/// - `GET /auth/me` - Current user (authenticated)
///
/// Register and login both answer `{ "token": "...", "user": {...} }`.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use todo_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, User},
};
use tracing::{info, warn};
use validator::Validate;

/// Message for every failed login, so callers can't probe for accounts
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also checked for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token plus the user it identifies
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests
    pub token: String,

    /// Account details
    pub user: User,
}

/// Lowercases and trims an email address
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue(state: &AppState, user: User) -> ApiResult<AuthResponse> {
    let token = jwt::issue_token(user.id, state.jwt_secret(), state.config.jwt.expiration_hours)?;
    Ok(AuthResponse { token, user })
}

/// Register a new user
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or weak password
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(mut req) = payload?;

    req.email = normalize_email(&req.email);
    req.name = req
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::field("password", message))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .store
        .create_user(CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
        })
        .await?;

    info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(issue(&state, user)?)))
}

/// Login endpoint
///
/// Unknown emails and wrong passwords get the same 401 response.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(mut req) = payload?;
    req.email = normalize_email(&req.email);
    req.validate()?;

    let Some(user) = state.store.find_user_by_email(&req.email).await? else {
        warn!("Login attempt for unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    info!(user_id = %user.id, "User logged in");

    Ok(Json(issue(&state, user)?))
}

/// Returns the authenticated user
///
/// A valid token for a user that no longer exists gets 404.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
