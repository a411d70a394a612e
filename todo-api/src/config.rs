/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS when `true` (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (optional; in-memory store when unset)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 characters)
/// - `JWT_EXPIRATION_HOURS`: Token lifetime, 1 to 8760 (default: 24)
/// - `RUST_LOG`: Log filter (default: todo_api=debug,todo_shared=debug,tower_http=debug)
/// - `LOG_FORMAT`: `json` for JSON log lines
///
/// # Example
///
/// ```no_run
/// use todo_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;

use todo_shared::auth::jwt::{DEFAULT_EXPIRATION_HOURS, MAX_EXPIRATION_HOURS};

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration; None runs the in-memory store
    pub database: Option<DatabaseConfig>,

    /// JWT configuration
    pub jwt: JwtConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Token lifetime in hours
    pub expiration_hours: i64,
}

/// Reads an optional variable and parses it, falling back to `default`
fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value {:?}: {}", name, value, e)),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated origin list, dropping empty entries
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_expiration_hours(hours: i64) -> anyhow::Result<()> {
    if !(1..=MAX_EXPIRATION_HOURS).contains(&hours) {
        anyhow::bail!(
            "JWT_EXPIRATION_HOURS must be between 1 and {}, got {}",
            MAX_EXPIRATION_HOURS,
            hours
        );
    }
    Ok(())
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or shorter than 32 characters
    /// - A numeric or boolean variable has an invalid value
    /// - `JWT_EXPIRATION_HOURS` is outside `1..=MAX_EXPIRATION_HOURS`
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = parse_var::<u16>("API_PORT", 8080)?;
        let cors_origins = parse_origins(&env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()));
        let production = parse_var::<bool>("PRODUCTION", false)?;

        let database = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Some(DatabaseConfig {
                url,
                max_connections: parse_var::<u32>("DATABASE_MAX_CONNECTIONS", 10)?,
            }),
            _ => None,
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let expiration_hours = parse_var::<i64>("JWT_EXPIRATION_HOURS", DEFAULT_EXPIRATION_HOURS)?;
        check_expiration_hours(expiration_hours)?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database,
            jwt: JwtConfig {
                secret: jwt_secret,
                expiration_hours,
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// True when any origin is allowed
    pub fn cors_allows_any(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
