//! Domain model for the beliefs log.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Separate the persisted record from its public projection.
//!
//! # Invariants
//! - Every belief is identified by a stable `BeliefId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod belief;
