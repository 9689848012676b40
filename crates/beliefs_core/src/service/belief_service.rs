//! Belief use-case service.
//!
//! # Responsibility
//! - Validate wire input and identifiers before touching storage.
//! - Stamp `date` / `created_at` from the injected clock.
//! - Collapse repository outcomes into the service error taxonomy.
//!
//! # Invariants
//! - Nothing reaches the repository unless it passed validation.
//! - `update_belief` always rewrites `message`, `type` and `date`.
//! - Reads always go to the repository; nothing is cached here.

use crate::clock::Clock;
use crate::model::belief::{Belief, BeliefId, BeliefInput, BeliefValidationError};
use crate::repo::belief_repo::{BeliefRepository, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type ServiceResult<T> = Result<T, BeliefServiceError>;

/// Service error for belief use-cases.
#[derive(Debug)]
pub enum BeliefServiceError {
    /// Body or identifier failed validation.
    InvalidInput(BeliefValidationError),
    /// Well-formed id with no matching record.
    NotFound(BeliefId),
    /// Persistence-layer failure.
    Storage(RepoError),
}

impl Display for BeliefServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(err) => write!(f, "invalid input: {err}"),
            Self::NotFound(id) => write!(f, "belief not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for BeliefServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<BeliefValidationError> for BeliefServiceError {
    fn from(value: BeliefValidationError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for BeliefServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

/// Belief service facade over repository implementations.
pub struct BeliefService<R: BeliefRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
}

impl<R: BeliefRepository> BeliefService<R> {
    /// Creates a service over `repo` that reads time from `clock`.
    pub fn new(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Lists all beliefs, newest first.
    pub fn list_beliefs(&self) -> ServiceResult<Vec<Belief>> {
        Ok(self.repo.list_beliefs()?)
    }

    /// Loads one belief by its textual id.
    pub fn get_belief(&self, id: &str) -> ServiceResult<Belief> {
        let id = id.parse::<BeliefId>()?;
        Ok(self.repo.find_belief(id)?)
    }

    /// Validates `input` and persists it as a new belief dated today.
    pub fn create_belief(&self, input: BeliefInput) -> ServiceResult<Belief> {
        let draft = input.validate()?;
        let belief = Belief::create(draft, self.clock.now());
        self.repo.insert_belief(&belief)?;
        Ok(belief)
    }

    /// Replaces message and type of an existing belief and resets its date.
    ///
    /// The id is checked before the body.
    pub fn update_belief(&self, id: &str, input: BeliefInput) -> ServiceResult<Belief> {
        let id = id.parse::<BeliefId>()?;
        let draft = input.validate()?;
        let today = self.clock.now().date_naive();
        Ok(self.repo.update_belief(id, &draft, today)?)
    }

    /// Deletes a belief by its textual id.
    pub fn delete_belief(&self, id: &str) -> ServiceResult<BeliefId> {
        let id = id.parse::<BeliefId>()?;
        self.repo.delete_belief(id)?;
        Ok(id)
    }
}
