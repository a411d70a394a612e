/// Bearer credential handling for the authentication gate
///
/// The API's JWT layer calls [`authenticate`] on every protected request and
/// inserts the resulting [`AuthContext`] into the request extensions.
/// Handlers extract it and pass it explicitly into service operations; the
/// user id is never read from ambient state.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use todo_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Identity of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,
}

impl AuthContext {
    /// Creates auth context for a user
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for the authentication gate
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header present but not a Bearer token
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidFormat("Empty Bearer token".to_string()));
    }

    Ok(token)
}

/// Resolves the caller's identity from request headers
///
/// # Errors
///
/// - `MissingCredentials` if there is no Authorization header
/// - `InvalidFormat` if the header is not a Bearer token
/// - `InvalidToken` if the token fails validation or has expired
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = extract_bearer_token(headers)?;

    let claims = validate_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    Ok(AuthContext::new(claims.sub))
}
