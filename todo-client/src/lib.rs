//! # Todo Client
//!
//! HTTP client for the todo API plus a list model that applies the same
//! reconciliation rules as the web view.
//!
//! ## Modules
//!
//! - `client`: `TodoClient`, one method per endpoint
//! - `state`: `TodoListState`, local list kept in step with the server
//! - `types`: Wire types
//! - `error`: `ClientError`

pub mod client;
pub mod error;
pub mod state;
pub mod types;

pub use client::TodoClient;
pub use error::ClientError;
pub use state::TodoListState;
