//! HTTP surface for the beliefs log.
//!
//! # Responsibility
//! - Expose the belief store over JSON HTTP routes.
//! - Gate writes behind the session authenticator.
//! - Load runtime configuration.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use auth::{
    authenticator_for, DenyAllAuthenticator, SessionAuthenticator, TokenSessionAuthenticator,
    SESSION_COOKIE,
};
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, Operation};
pub use server::{build_router, run, AppState};
