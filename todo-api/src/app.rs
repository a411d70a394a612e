/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use todo_api::{app::{build_router, AppState}, config::Config};
/// use todo_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::{sync::Arc, time::Duration};
use todo_shared::{auth::middleware::authenticate, store::Store};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Both fields are `Arc`s, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Persistence handle (PostgreSQL or in-memory)
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health            # Health check (public)
/// ├── /auth/
/// │   ├── POST /register        # public
/// │   ├── POST /login           # public
/// │   └── GET  /me              # authenticated
/// └── /todos                    # authenticated
///     ├── GET    /
///     ├── POST   /
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost last):
/// 1. Authentication (protected routes only)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login));

    // route_layer so unknown paths stay 404 instead of 401
    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/todos",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .route(
            "/todos/:id",
            put(routes::todos::update_todo).delete(routes::todos::delete_todo),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// CORS policy: permissive for `*`, otherwise the listed origins only
fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allows_any() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Validates the Bearer token and inserts the caller's `AuthContext` into
/// request extensions. Rejected requests never reach a handler.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret()).map_err(|e| {
        debug!(error = %e, path = %req.uri().path(), "Rejected unauthenticated request");
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
