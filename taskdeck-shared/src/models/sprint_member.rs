/// Sprint membership join rows, unique per (sprint_id, user_id)

use crate::error::{StoreError, StoreResult};
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Sprint membership join row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SprintMember {
    /// Join row ID
    pub id: i64,

    /// Sprint the user belongs to
    pub sprint_id: i64,

    /// Member user
    pub user_id: i64,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Membership row together with the member's public profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintMemberWithUser {
    /// The join row
    #[serde(flatten)]
    pub member: SprintMember,

    /// The member's profile, if the user still exists
    pub user: Option<UserSummary>,
}

impl SprintMember {
    /// Adds a user to a sprint
    ///
    /// # Errors
    ///
    /// `Conflict` if the user is already a member of the sprint.
    pub async fn add(pool: &SqlitePool, sprint_id: i64, user_id: i64) -> StoreResult<Self> {
        let existing = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM sprint_members WHERE sprint_id = ? AND user_id = ?",
        )
        .bind(sprint_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if existing.is_some() {
            return Err(StoreError::Conflict(
                "User is already a member of this sprint".to_string(),
            ));
        }

        let member = sqlx::query_as::<_, SprintMember>(
            r#"
            INSERT INTO sprint_members (sprint_id, user_id, created_at)
            VALUES (?, ?, ?)
            RETURNING id, sprint_id, user_id, created_at
            "#,
        )
        .bind(sprint_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(member)
    }

    /// Removes a user from a sprint
    ///
    /// # Errors
    ///
    /// `NotFound` if no matching membership exists.
    pub async fn remove(pool: &SqlitePool, sprint_id: i64, user_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM sprint_members WHERE sprint_id = ? AND user_id = ?")
            .bind(sprint_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Member"));
        }

        Ok(())
    }
}
