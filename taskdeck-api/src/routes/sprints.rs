/// Sprint endpoints
///
/// # Endpoints
///
/// - `GET    /v1/sprints?projectId=&status=` - List, most recent start first
/// - `POST   /v1/sprints` - Create (with initial members)
/// - `GET    /v1/sprints/:id` - Get with project, members, tasks
/// - `PATCH  /v1/sprints/:id` - Partial update
/// - `DELETE /v1/sprints/:id` - Delete (members cascade, tasks unlinked)
/// - `POST   /v1/sprints/:id/members` - Add member
/// - `DELETE /v1/sprints/:id/members/:user_id` - Remove member

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdeck_shared::models::sprint::{
    CreateSprint, Sprint, SprintDetail, SprintFilter, UpdateSprint,
};
use taskdeck_shared::models::sprint_member::SprintMember;
use taskdeck_shared::StoreError;

/// Query parameters for sprint listings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintListQuery {
    /// Only sprints of this project
    pub project_id: Option<i64>,

    /// Only sprints with this status
    pub status: Option<String>,
}

/// Body for adding a member
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: i64,
}

/// Lists sprints, most recent start date first
pub async fn list_sprints(
    State(state): State<AppState>,
    Query(query): Query<SprintListQuery>,
) -> ApiResult<Json<Vec<SprintDetail>>> {
    let filter = SprintFilter {
        project_id: query.project_id,
        status: query.status,
    };
    let sprints = Sprint::find_all(&state.db, &filter).await?;
    Ok(Json(sprints))
}

/// Creates a sprint, optionally with initial members
pub async fn create_sprint(
    State(state): State<AppState>,
    Json(req): Json<CreateSprint>,
) -> ApiResult<(StatusCode, Json<SprintDetail>)> {
    let sprint = Sprint::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(sprint)))
}

/// Gets a sprint by id with project, members, and tasks
pub async fn get_sprint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SprintDetail>> {
    let sprint = Sprint::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("Sprint"))?;
    Ok(Json(sprint))
}

/// Partially updates a sprint
pub async fn update_sprint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSprint>,
) -> ApiResult<Json<Sprint>> {
    let sprint = Sprint::update(&state.db, id, req).await?;
    Ok(Json(sprint))
}

/// Deletes a sprint
pub async fn delete_sprint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    Sprint::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adds a member to a sprint
///
/// # Errors
///
/// `409 Conflict` if the user is already a member.
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<SprintMember>)> {
    let member = SprintMember::add(&state.db, id, req.user_id).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Removes a member from a sprint
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    SprintMember::remove(&state.db, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
