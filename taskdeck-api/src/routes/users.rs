/// User endpoints
///
/// # Endpoints
///
/// - `GET    /v1/users` - List users (without credentials)
/// - `POST   /v1/users` - Create user
/// - `GET    /v1/users/:id` - Get user
/// - `PATCH  /v1/users/:id` - Partial update
/// - `DELETE /v1/users/:id` - Delete (blocked while owning projects)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use taskdeck_shared::models::user::{CreateUser, UpdateUser, User, UserSummary};
use taskdeck_shared::StoreError;

/// Lists all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = User::find_all(&state.db).await?;
    Ok(Json(users))
}

/// Creates a user
///
/// # Errors
///
/// - `400 Bad Request`: missing required field
/// - `409 Conflict`: email already exists (case-insensitive)
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = User::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Gets a user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| StoreError::not_found("User"))?;
    Ok(Json(user))
}

/// Partially updates a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUser>,
) -> ApiResult<Json<User>> {
    let user = User::update(&state.db, id, req).await?;
    Ok(Json(user))
}

/// Deletes a user
///
/// # Errors
///
/// - `404 Not Found`: no such user
/// - `409 Conflict`: the user still owns projects
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    User::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
