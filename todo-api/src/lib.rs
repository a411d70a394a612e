//! # Todo API Server Library
//!
//! HTTP surface for the todo service: authentication endpoints and the
//! owner-scoped `/todos` resource.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Response middleware
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
