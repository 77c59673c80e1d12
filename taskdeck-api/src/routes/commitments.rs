/// Commitment endpoints
///
/// # Endpoints
///
/// - `GET    /v1/commitments?projectId=&status=&priority=&date=` - List in
///   agenda order; `date` (YYYY-MM-DD) matches the whole UTC day
/// - `POST   /v1/commitments` - Create (with initial participants)
/// - `GET    /v1/commitments/:id` - Get with project and participants
/// - `PATCH  /v1/commitments/:id` - Partial update
/// - `DELETE /v1/commitments/:id` - Delete (participants cascade)
/// - `POST   /v1/commitments/:id/participants` - Add participant
/// - `DELETE /v1/commitments/:id/participants/:user_id` - Remove participant

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use taskdeck_shared::models::commitment::{
    Commitment, CommitmentDetail, CommitmentFilter, CreateCommitment, UpdateCommitment,
};
use taskdeck_shared::models::commitment_participant::CommitmentParticipant;
use taskdeck_shared::StoreError;

/// Query parameters for commitment listings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentListQuery {
    /// Only commitments of this project
    pub project_id: Option<i64>,

    /// Only commitments with this status
    pub status: Option<String>,

    /// Only commitments with this priority
    pub priority: Option<String>,

    /// Only commitments scheduled on this calendar day (YYYY-MM-DD, UTC)
    pub date: Option<NaiveDate>,
}

/// Body for adding a participant
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddParticipantRequest {
    /// User to add
    pub user_id: i64,
}

/// Lists commitments in agenda order
pub async fn list_commitments(
    State(state): State<AppState>,
    Query(query): Query<CommitmentListQuery>,
) -> ApiResult<Json<Vec<CommitmentDetail>>> {
    let filter = CommitmentFilter {
        project_id: query.project_id,
        status: query.status,
        priority: query.priority,
        date: query.date,
    };
    let commitments = Commitment::find_all(&state.db, &filter).await?;
    Ok(Json(commitments))
}

/// Creates a commitment, optionally with initial participants
pub async fn create_commitment(
    State(state): State<AppState>,
    Json(req): Json<CreateCommitment>,
) -> ApiResult<(StatusCode, Json<CommitmentDetail>)> {
    let commitment = Commitment::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(commitment)))
}

/// Gets a commitment by id with project and participants
pub async fn get_commitment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CommitmentDetail>> {
    let commitment = Commitment::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("Commitment"))?;
    Ok(Json(commitment))
}

/// Partially updates a commitment
pub async fn update_commitment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCommitment>,
) -> ApiResult<Json<Commitment>> {
    let commitment = Commitment::update(&state.db, id, req).await?;
    Ok(Json(commitment))
}

/// Deletes a commitment and its participants
pub async fn delete_commitment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    Commitment::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adds a participant to a commitment
///
/// # Errors
///
/// `409 Conflict` if the user already participates.
pub async fn add_participant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AddParticipantRequest>,
) -> ApiResult<(StatusCode, Json<CommitmentParticipant>)> {
    let participant = CommitmentParticipant::add(&state.db, id, req.user_id).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

/// Removes a participant from a commitment
pub async fn remove_participant(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    CommitmentParticipant::remove(&state.db, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
