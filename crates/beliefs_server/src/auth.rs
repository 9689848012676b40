//! Session authentication collaborator.
//!
//! # Responsibility
//! - Answer one question per request: does the caller hold an admin session?
//! - Accept a session token from `Authorization: Bearer` or the session cookie.
//!
//! # Invariants
//! - Configured tokens are kept only as SHA-256 digests.
//! - Token values are never logged.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Cookie carrying the admin session token.
pub const SESSION_COOKIE: &str = "beliefs_session";

/// Boolean session check consumed by write handlers.
pub trait SessionAuthenticator: Send + Sync {
    fn is_authenticated(&self, headers: &HeaderMap) -> bool;
}

/// Accepts requests presenting one of the configured admin tokens.
pub struct TokenSessionAuthenticator {
    digests: Vec<[u8; 32]>,
}

impl TokenSessionAuthenticator {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            digests: tokens
                .into_iter()
                .map(|token| digest(token.as_ref()))
                .collect(),
        }
    }

    fn accepts(&self, token: &str) -> bool {
        let presented = digest(token);
        self.digests.iter().any(|known| *known == presented)
    }
}

impl SessionAuthenticator for TokenSessionAuthenticator {
    fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        bearer_token(headers)
            .into_iter()
            .chain(session_cookies(headers))
            .any(|token| self.accepts(token))
    }
}

/// Rejects every request. Used when no admin token is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllAuthenticator;

impl SessionAuthenticator for DenyAllAuthenticator {
    fn is_authenticated(&self, _headers: &HeaderMap) -> bool {
        false
    }
}

/// Picks the authenticator matching the configured tokens.
pub fn authenticator_for(tokens: &[String]) -> Arc<dyn SessionAuthenticator> {
    if tokens.is_empty() {
        Arc::new(DenyAllAuthenticator)
    } else {
        Arc::new(TokenSessionAuthenticator::new(tokens))
    }
}

fn digest(token: &str) -> [u8; 32] {
    Sha256::digest(token.as_bytes()).into()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn session_cookies(headers: &HeaderMap) -> impl Iterator<Item = &str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, token)| *name == SESSION_COOKIE && !token.is_empty())
        .map(|(_, token)| token)
}
