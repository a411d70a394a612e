/// JWT access token generation and validation
///
/// Tokens are signed with HS256 and identify the user in the `sub` claim.
/// They are the credential the API's authentication gate accepts.
///
/// # Example
///
/// ```
/// use todo_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// let validated = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer written into and required from every token
pub const ISSUER: &str = "todo-api";

/// Default token lifetime in hours
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

/// Longest accepted token lifetime in hours (one year)
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token was not issued by this service
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// JWT claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always [`ISSUER`])
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims with the default 24 hour lifetime
    pub fn new(user_id: Uuid) -> Self {
        Self::with_expiration(user_id, Duration::hours(DEFAULT_EXPIRATION_HOURS))
    }

    /// Creates claims with a custom lifetime
    ///
    /// # Example
    ///
    /// ```
    /// use todo_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::with_expiration(Uuid::new_v4(), Duration::hours(1));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn with_expiration(user_id: Uuid, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Signs claims into a token string
///
/// The secret should be at least 32 bytes; the API config enforces this.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, expiration, not-before time and issuer.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: ISSUER.to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Issues a token for a user with the given lifetime in hours
///
/// Lifetimes outside `1..=MAX_EXPIRATION_HOURS` are rejected with
/// `JwtError::CreateError`.
pub fn issue_token(user_id: Uuid, secret: &str, expiration_hours: i64) -> Result<String, JwtError> {
    let lifetime = Some(expiration_hours)
        .filter(|hours| (1..=MAX_EXPIRATION_HOURS).contains(hours))
        .and_then(Duration::try_hours)
        .ok_or_else(|| {
            JwtError::CreateError(format!(
                "Token lifetime of {} hours is out of range",
                expiration_hours
            ))
        })?;

    create_token(&Claims::with_expiration(user_id, lifetime), secret)
}
