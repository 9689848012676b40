//! Core domain logic for the beliefs log.
//! This crate is the single source of truth for belief invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::belief::{
    Belief, BeliefDraft, BeliefId, BeliefInput, BeliefType, BeliefValidationError, PublicBelief,
};
pub use repo::belief_repo::{BeliefRepository, RepoError, RepoResult, SqliteBeliefRepository};
pub use service::belief_service::{BeliefService, BeliefServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
