//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract for beliefs.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Input validation happens above this layer; the store persists what it
//!   is given.

pub mod belief_repo;
