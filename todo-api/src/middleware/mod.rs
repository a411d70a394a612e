/// Middleware modules for the API server
///
/// Authentication lives in `app::jwt_auth_layer`, since it needs the
/// application state.

pub mod security;
