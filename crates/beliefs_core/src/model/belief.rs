//! Belief domain model.
//!
//! # Responsibility
//! - Define the persisted `Belief` record and its public projection.
//! - Turn loosely-shaped wire input into a validated `BeliefDraft`.
//!
//! # Invariants
//! - `id` is stable and never reused for another belief.
//! - `kind` is always one of `principle|discovery`.
//! - `date` is the last written calendar day; `created_at` never changes.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier assigned to every belief at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeliefId(Uuid);

impl BeliefId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for BeliefId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for BeliefId {
    type Err = BeliefValidationError;

    /// Parses the canonical hyphenated form only.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(value)
            .ok()
            .filter(|uuid| uuid.as_hyphenated().to_string() == value.to_ascii_lowercase())
            .map(Self)
            .ok_or_else(|| BeliefValidationError::MalformedId(value.to_string()))
    }
}

/// Category tag for a belief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeliefType {
    /// A rule held on purpose.
    Principle,
    /// Something learned along the way.
    Discovery,
}

impl BeliefType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Principle => "principle",
            Self::Discovery => "discovery",
        }
    }
}

impl FromStr for BeliefType {
    type Err = BeliefValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "principle" => Ok(Self::Principle),
            "discovery" => Ok(Self::Discovery),
            other => Err(BeliefValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Validation failures raised before anything touches storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeliefValidationError {
    MissingMessage,
    MissingType,
    UnknownType(String),
    MalformedId(String),
}

impl Display for BeliefValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingMessage => write!(f, "message is required and must not be empty"),
            Self::MissingType => write!(f, "type is required"),
            Self::UnknownType(value) => {
                write!(f, "unknown belief type `{value}`; expected principle|discovery")
            }
            Self::MalformedId(value) => write!(f, "malformed belief id `{value}`"),
        }
    }
}

impl Error for BeliefValidationError {}

/// Canonical persisted belief record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Belief {
    pub id: BeliefId,
    pub message: String,
    pub kind: BeliefType,
    /// Calendar day of the last write (create or update).
    pub date: NaiveDate,
    /// Creation instant, used only for ordering.
    pub created_at: DateTime<Utc>,
}

impl Belief {
    /// Creates a new belief from a validated draft with a generated ID.
    ///
    /// `date` is derived from `now` in UTC. `created_at` is truncated to
    /// millisecond precision, the resolution it is stored with.
    pub fn create(draft: BeliefDraft, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(3);
        Self {
            id: BeliefId::generate(),
            message: draft.message,
            kind: draft.kind,
            date: now.date_naive(),
            created_at: now,
        }
    }

    /// Returns the externally visible shape of this belief.
    pub fn to_public(&self) -> PublicBelief {
        PublicBelief {
            id: self.id.to_string(),
            date: self.date,
            message: self.message.clone(),
            kind: self.kind,
        }
    }
}

/// Raw create/update body as received on the wire.
///
/// Fields stay optional so that missing values surface as validation
/// errors instead of decode failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BeliefInput {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl BeliefInput {
    /// Validates wire input into a draft ready for persistence.
    ///
    /// `message` is kept verbatim; only emptiness is rejected.
    pub fn validate(self) -> Result<BeliefDraft, BeliefValidationError> {
        let message = match self.message {
            Some(message) if !message.is_empty() => message,
            _ => return Err(BeliefValidationError::MissingMessage),
        };
        let kind = match self.kind.as_deref() {
            None | Some("") => return Err(BeliefValidationError::MissingType),
            Some(value) => value.parse::<BeliefType>()?,
        };

        Ok(BeliefDraft { message, kind })
    }
}

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeliefDraft {
    pub message: String,
    pub kind: BeliefType,
}

impl BeliefDraft {
    pub fn new(message: impl Into<String>, kind: BeliefType) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

/// Public belief shape. Never carries `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicBelief {
    pub id: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: BeliefType,
}
