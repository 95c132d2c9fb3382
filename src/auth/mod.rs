//! Authentication module: session lifecycle and token persistence.
//!
//! This module provides:
//! - `SessionStore`: single source of truth for the authenticated
//!   identity, with restore/login/signup/logout operations
//! - `TokenStore`: durable persistence of the bearer token, backed by
//!   the OS keychain in production
//!
//! Token validity is only ever established by a successful profile
//! fetch; a persisted token that fails validation is cleared silently.

pub mod session;
pub mod store;

pub use session::{AuthApi, AuthError, SessionSnapshot, SessionStatus, SessionStore};
pub use store::{KeyringTokenStore, TokenStore};
