//! HTTP server wiring.
//!
//! # Responsibility
//! - Own the shared SQLite connection, clock and session authenticator.
//! - Run store calls off the async reactor.
//! - Bind, serve and shut down gracefully.
//!
//! # Invariants
//! - The connection is the only state shared between requests.
//! - Store calls never run on a reactor thread.
//! - A panic while holding the connection does not take storage down;
//!   each statement is atomic, so the connection stays consistent.

use crate::auth::{authenticator_for, SessionAuthenticator};
use crate::config::ServerConfig;
use crate::routes;
use anyhow::{Context, Result};
use axum::http::HeaderMap;
use axum::Router;
use beliefs_core::db::open_db;
use beliefs_core::{
    BeliefService, BeliefServiceError, Clock, RepoError, ServiceResult, SqliteBeliefRepository,
    SystemClock,
};
use log::{error, info, warn};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
    authenticator: Arc<dyn SessionAuthenticator>,
}

impl AppState {
    /// `conn` must already be migrated (see `beliefs_core::db::open_db`).
    pub fn new(
        conn: Connection,
        clock: Arc<dyn Clock>,
        authenticator: Arc<dyn SessionAuthenticator>,
    ) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            clock,
            authenticator,
        }
    }

    /// Shared handle to the underlying connection.
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }

    pub fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        self.authenticator.is_authenticated(headers)
    }

    /// Runs `op` against a freshly built service on the blocking pool.
    pub async fn with_service<T, F>(&self, op: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&BeliefService<SqliteBeliefRepository<'c>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let clock = Arc::clone(&self.clock);

        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(|poisoned| {
                error!("event=db_lock module=server status=recovered reason=poisoned");
                conn.clear_poison();
                poisoned.into_inner()
            });
            let repo = SqliteBeliefRepository::try_new(&guard)?;
            let service = BeliefService::new(repo, clock);
            op(&service)
        })
        .await
        .map_err(|err| {
            BeliefServiceError::Storage(RepoError::Unavailable(format!(
                "storage worker failed: {err}"
            )))
        })?
    }
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::belief_routes())
        .merge(routes::health_routes())
        .with_state(state)
}

/// Opens storage and serves HTTP until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<()> {
    let conn = open_db(&config.database_path).with_context(|| {
        format!(
            "failed to open database `{}`",
            config.database_path.display()
        )
    })?;

    if config.admin_tokens.is_empty() {
        warn!("event=auth_config module=server status=degraded reason=no_admin_tokens writes=disabled");
    }
    let state = AppState::new(
        conn,
        Arc::new(SystemClock),
        authenticator_for(&config.admin_tokens),
    );
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind `{}`", config.bind_addr))?;
    info!(
        "event=server_start module=server status=ok addr={} database={}",
        listener.local_addr()?,
        config.database_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
