//! REST API client module for the NUA file storage backend.
//!
//! This module provides the `ApiClient` for talking to the backend's
//! auth, files, sharing and audit routes. Authenticated routes carry a
//! JWT bearer token; the token is read from a shared credential cell at
//! dispatch time so every request observes the current session.

pub mod client;
pub mod error;

pub use client::{ApiClient, TokenCell};
pub use error::ApiError;
