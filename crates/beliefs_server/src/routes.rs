//! API routes for the beliefs service.
//!
//! Reads are public. Writes check the session before looking at the path
//! or body, so an unauthenticated caller always gets 401.

use crate::error::{ApiError, Operation};
use crate::server::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use beliefs_core::{core_version, BeliefId, BeliefInput, PublicBelief};
use log::{debug, info, warn};
use serde::Serialize;

const DELETE_ACK_MESSAGE: &str = "Belief deleted successfully";

type BodyResult = Result<Json<BeliefInput>, JsonRejection>;
type IdResult = Result<Path<String>, PathRejection>;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ============================================================================
// Belief Routes
// ============================================================================

pub fn belief_routes() -> Router<AppState> {
    Router::new()
        .route("/beliefs", get(list_beliefs).post(create_belief))
        .route(
            "/beliefs/:id",
            get(get_belief).put(update_belief).delete(delete_belief),
        )
        // Messages have no maximum length.
        .layer(DefaultBodyLimit::disable())
}

async fn list_beliefs(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicBelief>>, ApiError> {
    let beliefs = state
        .with_service(|service| service.list_beliefs())
        .await
        .map_err(|err| ApiError::from_service(err, Operation::List))?;

    debug!(
        "event={} module=api status=ok count={}",
        Operation::List.event(),
        beliefs.len()
    );
    Ok(Json(beliefs.iter().map(|belief| belief.to_public()).collect()))
}

async fn get_belief(
    State(state): State<AppState>,
    id: IdResult,
) -> Result<Json<PublicBelief>, ApiError> {
    let Path(id) = id.map_err(ApiError::from_path_rejection)?;

    let belief = state
        .with_service(move |service| service.get_belief(&id))
        .await
        .map_err(|err| ApiError::from_service(err, Operation::Get))?;

    Ok(Json(belief.to_public()))
}

async fn create_belief(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: BodyResult,
) -> Result<(StatusCode, Json<PublicBelief>), ApiError> {
    require_session(&state, &headers, Operation::Create)?;
    let Json(input) =
        body.map_err(|rejection| ApiError::from_json_rejection(rejection, Operation::Create))?;

    let belief = state
        .with_service(move |service| service.create_belief(input))
        .await
        .map_err(|err| ApiError::from_service(err, Operation::Create))?;

    info!(
        "event={} module=api status=ok id={} type={}",
        Operation::Create.event(),
        belief.id,
        belief.kind.as_str()
    );
    Ok((StatusCode::CREATED, Json(belief.to_public())))
}

async fn update_belief(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdResult,
    body: BodyResult,
) -> Result<Json<PublicBelief>, ApiError> {
    require_session(&state, &headers, Operation::Update)?;
    let Path(id) = id.map_err(ApiError::from_path_rejection)?;
    if let Err(err) = id.parse::<BeliefId>() {
        return Err(ApiError::from_service(err.into(), Operation::Update));
    }
    let Json(input) =
        body.map_err(|rejection| ApiError::from_json_rejection(rejection, Operation::Update))?;

    let belief = state
        .with_service(move |service| service.update_belief(&id, input))
        .await
        .map_err(|err| ApiError::from_service(err, Operation::Update))?;

    info!(
        "event={} module=api status=ok id={} type={}",
        Operation::Update.event(),
        belief.id,
        belief.kind.as_str()
    );
    Ok(Json(belief.to_public()))
}

async fn delete_belief(
    State(state): State<AppState>,
    headers: HeaderMap,
    id: IdResult,
) -> Result<Json<DeleteResponse>, ApiError> {
    require_session(&state, &headers, Operation::Delete)?;
    let Path(id) = id.map_err(ApiError::from_path_rejection)?;

    let deleted = state
        .with_service(move |service| service.delete_belief(&id))
        .await
        .map_err(|err| ApiError::from_service(err, Operation::Delete))?;

    info!(
        "event={} module=api status=ok id={}",
        Operation::Delete.event(),
        deleted
    );
    Ok(Json(DeleteResponse {
        success: true,
        message: DELETE_ACK_MESSAGE,
    }))
}

fn require_session(state: &AppState, headers: &HeaderMap, op: Operation) -> Result<(), ApiError> {
    if state.is_authenticated(headers) {
        return Ok(());
    }
    warn!(
        "event={} module=api status=rejected error_code=unauthorized",
        op.event()
    );
    Err(ApiError::Unauthorized)
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: core_version(),
    })
}
