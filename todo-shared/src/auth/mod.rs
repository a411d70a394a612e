/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and strength checks
/// - [`jwt`]: JWT access token generation and validation
/// - [`middleware`]: Bearer credential extraction and the `AuthContext` value
/// - [`authorization`]: Resource ownership checks
///
/// # Example
///
/// ```no_run
/// use todo_shared::auth::password::{hash_password, verify_password};
/// use todo_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password1")?;
/// assert!(verify_password("user_password1", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4());
/// let token = create_token(&claims, "secret-key")?;
/// let validated = validate_token(&token, "secret-key")?;
/// assert_eq!(validated.sub, claims.sub);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
