/// Project membership join rows
///
/// Many-to-many relation between projects and users. The (project_id,
/// user_id) pair is unique: adding the same member twice yields `Conflict`,
/// with the UNIQUE index deciding the winner when two adds race.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE project_members (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     project_id INTEGER NOT NULL,
///     user_id INTEGER NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// CREATE UNIQUE INDEX idx_project_members_pair ON project_members (project_id, user_id);
/// ```

use crate::error::{StoreError, StoreResult};
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Project membership join row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    /// Join row ID
    pub id: i64,

    /// Project the user belongs to
    pub project_id: i64,

    /// Member user
    pub user_id: i64,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Membership row together with the member's public profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMemberWithUser {
    /// The join row
    #[serde(flatten)]
    pub member: ProjectMember,

    /// The member's profile, if the user still exists
    pub user: Option<UserSummary>,
}

impl ProjectMember {
    /// Adds a user to a project
    ///
    /// # Errors
    ///
    /// `Conflict` if the user is already a member of the project.
    pub async fn add(pool: &SqlitePool, project_id: i64, user_id: i64) -> StoreResult<Self> {
        let existing = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM project_members WHERE project_id = ? AND user_id = ?",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if existing.is_some() {
            return Err(StoreError::Conflict(
                "User is already a member of this project".to_string(),
            ));
        }

        let member = sqlx::query_as::<_, ProjectMember>(
            r#"
            INSERT INTO project_members (project_id, user_id, created_at)
            VALUES (?, ?, ?)
            RETURNING id, project_id, user_id, created_at
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Removes a user from a project
    ///
    /// # Errors
    ///
    /// `NotFound` if no matching membership exists.
    pub async fn remove(pool: &SqlitePool, project_id: i64, user_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM project_members WHERE project_id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Member"));
        }

        Ok(())
    }

    /// Lists memberships for a project
    pub async fn find_by_project(pool: &SqlitePool, project_id: i64) -> StoreResult<Vec<Self>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            r#"
            SELECT id, project_id, user_id, created_at
            FROM project_members
            WHERE project_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }
}
