/// Task endpoints with nested comments
///
/// # Endpoints
///
/// - `GET    /v1/tasks?projectId=&assigneeId=&status=&priority=` - List
/// - `POST   /v1/tasks` - Create
/// - `GET    /v1/tasks/:id` - Get with project, assignee, sprint
/// - `PATCH  /v1/tasks/:id` - Partial update
/// - `DELETE /v1/tasks/:id` - Delete (comments cascade)
/// - `GET    /v1/tasks/:id/comments` - List comments, newest first
/// - `POST   /v1/tasks/:id/comments` - Add comment (counter moves)
/// - `PATCH  /v1/tasks/:id/comments/:comment_id` - Edit content
/// - `DELETE /v1/tasks/:id/comments/:comment_id` - Delete (counter moves)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdeck_shared::models::task::{CreateTask, Task, TaskDetail, TaskFilter, UpdateTask};
use taskdeck_shared::models::task_comment::{
    CommentDetail, CreateTaskComment, TaskComment, UpdateTaskComment,
};
use taskdeck_shared::StoreError;

/// Query parameters for task listings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    /// Only tasks of this project
    pub project_id: Option<i64>,

    /// Only tasks assigned to this user
    pub assignee_id: Option<i64>,

    /// Only tasks with this status
    pub status: Option<String>,

    /// Only tasks with this priority
    pub priority: Option<String>,
}

/// Lists tasks, most recently created first
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<TaskDetail>>> {
    let filter = TaskFilter {
        project_id: query.project_id,
        assignee_id: query.assignee_id,
        status: query.status,
        priority: query.priority,
    };
    let tasks = Task::find_all(&state.db, &filter).await?;
    Ok(Json(tasks))
}

/// Creates a task
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = Task::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Gets a task by id with project, assignee, and sprint
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDetail>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("Task"))?;
    Ok(Json(task))
}

/// Partially updates a task
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let task = Task::update(&state.db, id, req).await?;
    Ok(Json(task))
}

/// Deletes a task and its comments
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    Task::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists a task's comments with author profiles
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<CommentDetail>>> {
    let comments = TaskComment::find_by_task(&state.db, id).await?;
    Ok(Json(comments))
}

/// Adds a comment to a task
///
/// # Errors
///
/// - `404 Not Found` ("Task not found") if the task does not exist
/// - `400 Bad Request` if the content is empty
pub async fn create_comment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CreateTaskComment>,
) -> ApiResult<(StatusCode, Json<TaskComment>)> {
    let comment = TaskComment::create(&state.db, id, req).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Edits a comment's content
pub async fn update_comment(
    State(state): State<AppState>,
    Path((_task_id, comment_id)): Path<(i64, i64)>,
    Json(req): Json<UpdateTaskComment>,
) -> ApiResult<Json<TaskComment>> {
    let comment = TaskComment::update(&state.db, comment_id, req).await?;
    Ok(Json(comment))
}

/// Deletes a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((_task_id, comment_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    TaskComment::delete(&state.db, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
