/// Password hashing using Argon2id
///
/// Hashes are produced with the argon2 crate's default Argon2id parameters
/// (19 MiB memory, 2 passes, 1 lane) and stored as PHC strings, so the
/// parameters travel with each hash and can be raised later without
/// invalidating existing accounts.
///
/// # Example
///
/// ```
/// use todo_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum accepted password length in characters
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Returns `Ok(false)` for a wrong password; errors are reserved for
/// malformed hashes.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Validates password strength
///
/// A password must be at least [`MIN_PASSWORD_LENGTH`] characters and
/// contain at least one letter and one digit.
///
/// # Example
///
/// ```
/// use todo_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("groceries42").is_ok());
/// assert!(validate_password_strength("short1").is_err());
/// assert!(validate_password_strength("nodigitshere").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err("Password must contain at least one letter".to_string());
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain at least one digit".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("Hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct_and_incorrect() {
        let hash = hash_password("correct_password").expect("Hash should succeed");

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        // parses as a PHC string but carries no hash to match
        assert!(matches!(
            verify_password("password", "$argon2id$invalid"),
            Ok(false)
        ));
    }

    #[test]
    fn test_unicode_password_roundtrip() {
        let hash = hash_password("unicode-密码-パスワード").unwrap();
        assert!(verify_password("unicode-密码-パスワード", &hash).unwrap());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("groceries42").is_ok());
        assert!(validate_password_strength("Str0ng!Pass").is_ok());

        let err = validate_password_strength("abc12").unwrap_err();
        assert!(err.contains("at least 8 characters"));

        let err = validate_password_strength("12345678").unwrap_err();
        assert!(err.contains("letter"));

        let err = validate_password_strength("password").unwrap_err();
        assert!(err.contains("digit"));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 7 characters, more than 8 bytes
        assert!(validate_password_strength("ключ1аб").is_err());
    }
}
