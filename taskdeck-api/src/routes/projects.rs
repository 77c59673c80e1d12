/// Project endpoints
///
/// # Endpoints
///
/// - `GET    /v1/projects?tag=name` - List projects, optionally by tag
/// - `POST   /v1/projects` - Create (with initial members)
/// - `GET    /v1/projects/:id` - Get with members, tags, tasks, sprints
/// - `PATCH  /v1/projects/:id` - Partial update
/// - `DELETE /v1/projects/:id` - Delete, applying the referential protocol
/// - `POST   /v1/projects/:id/members` - Add member
/// - `DELETE /v1/projects/:id/members/:user_id` - Remove member
/// - `POST   /v1/projects/:id/tags` - Add tag
/// - `DELETE /v1/projects/:id/tags/:tag_id` - Remove tag

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdeck_shared::models::project::{
    CreateProject, Project, ProjectDetail, ProjectFilter, UpdateProject,
};
use taskdeck_shared::models::project_member::ProjectMember;
use taskdeck_shared::models::project_tag::{CreateProjectTag, ProjectTag};
use taskdeck_shared::StoreError;

/// Query parameters for project listings
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    /// Only projects carrying a tag with this name
    pub tag: Option<String>,
}

/// Body for adding a member
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    /// User to add
    pub user_id: i64,
}

/// Lists projects with their detail shapes
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> ApiResult<Json<Vec<ProjectDetail>>> {
    let projects = Project::find_all(&state.db, &ProjectFilter { tag: query.tag }).await?;
    Ok(Json(projects))
}

/// Creates a project, optionally with initial members
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<ProjectDetail>)> {
    let project = Project::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Gets a project by id with its full detail shape
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectDetail>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("Project"))?;
    Ok(Json(project))
}

/// Partially updates a project
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProject>,
) -> ApiResult<Json<Project>> {
    let project = Project::update(&state.db, id, req).await?;
    Ok(Json(project))
}

/// Deletes a project
///
/// Members, tags, and sprints go with it; tasks and commitments survive
/// with their links cleared.
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    Project::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adds a member to a project
///
/// # Errors
///
/// `409 Conflict` if the user is already a member.
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<ProjectMember>)> {
    let member = ProjectMember::add(&state.db, id, req.user_id).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// Removes a member from a project
///
/// # Errors
///
/// `404 Not Found` ("Member not found") if no matching membership exists.
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    ProjectMember::remove(&state.db, id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adds a tag to a project
pub async fn add_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateProjectTag>,
) -> ApiResult<(StatusCode, Json<ProjectTag>)> {
    let tag = ProjectTag::create(&state.db, id, req).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Removes a tag from a project
pub async fn remove_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    ProjectTag::delete(&state.db, id, tag_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
