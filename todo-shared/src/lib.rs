//! # Todo Shared Library
//!
//! Types, persistence and business rules shared by the todo API server and
//! its tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `store`: Persistence handles (PostgreSQL and in-memory)
//! - `service`: Todo resource operations with ownership enforcement
//! - `auth`: Authentication and authorization utilities
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod service;
pub mod store;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
