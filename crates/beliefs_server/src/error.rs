//! API error taxonomy and HTTP mapping.
//!
//! # Invariants
//! - Storage failures are logged here with full detail and leave the
//!   process as a fixed per-operation message.
//! - Every error body has the shape `{"error": "<message>"}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use beliefs_core::{BeliefServiceError, BeliefValidationError};
use log::{error, warn};
use serde::Serialize;

const MSG_UNAUTHORIZED: &str = "Unauthorized";
const MSG_NOT_FOUND: &str = "Belief not found";
const MSG_INVALID_ID: &str = "Invalid belief ID";
const MSG_REQUIRED_FIELDS: &str = "Message and type are required";
const MSG_INVALID_TYPE: &str = "Type must be either \"principle\" or \"discovery\"";
const MSG_INVALID_BODY: &str = "Invalid request body";

/// Belief API operations, used for failure messages and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn event(self) -> &'static str {
        match self {
            Self::List => "belief_list",
            Self::Get => "belief_get",
            Self::Create => "belief_create",
            Self::Update => "belief_update",
            Self::Delete => "belief_delete",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch beliefs",
            Self::Get => "Failed to fetch belief",
            Self::Create => "Failed to create belief",
            Self::Update => "Failed to update belief",
            Self::Delete => "Failed to delete belief",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Unauthorized,
    InvalidInput(&'static str),
    NotFound,
    StorageFailure(&'static str),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl ApiError {
    /// Maps a service outcome, logging storage failures for `op`.
    pub fn from_service(err: BeliefServiceError, op: Operation) -> Self {
        match err {
            BeliefServiceError::InvalidInput(validation) => {
                Self::InvalidInput(validation_message(&validation))
            }
            BeliefServiceError::NotFound(_) => Self::NotFound,
            BeliefServiceError::Storage(source) => {
                error!(
                    "event={} module=api status=error error_code=storage_failure error={}",
                    op.event(),
                    source
                );
                Self::StorageFailure(op.failure_message())
            }
        }
    }

    pub fn from_json_rejection(rejection: JsonRejection, op: Operation) -> Self {
        warn!(
            "event={} module=api status=rejected error_code=invalid_body status_code={}",
            op.event(),
            rejection.status().as_u16()
        );
        Self::InvalidInput(MSG_INVALID_BODY)
    }

    pub fn from_path_rejection(_rejection: PathRejection) -> Self {
        Self::InvalidInput(MSG_INVALID_ID)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::StorageFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Unauthorized => MSG_UNAUTHORIZED,
            Self::InvalidInput(message) | Self::StorageFailure(message) => *message,
            Self::NotFound => MSG_NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorBody {
                error: self.message(),
            }),
        )
            .into_response()
    }
}

fn validation_message(err: &BeliefValidationError) -> &'static str {
    match err {
        BeliefValidationError::MissingMessage | BeliefValidationError::MissingType => {
            MSG_REQUIRED_FIELDS
        }
        BeliefValidationError::UnknownType(_) => MSG_INVALID_TYPE,
        BeliefValidationError::MalformedId(_) => MSG_INVALID_ID,
    }
}
