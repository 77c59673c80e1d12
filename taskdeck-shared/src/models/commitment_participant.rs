/// Commitment participation join rows, unique per (commitment_id, user_id)

use crate::error::{StoreError, StoreResult};
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Commitment participation join row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentParticipant {
    /// Join row ID
    pub id: i64,

    /// Commitment the user participates in
    pub commitment_id: i64,

    /// Participating user
    pub user_id: i64,

    /// When the participation was created
    pub created_at: DateTime<Utc>,
}

/// Participation row together with the participant's public profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantWithUser {
    /// The join row
    #[serde(flatten)]
    pub participant: CommitmentParticipant,

    /// The participant's profile, if the user still exists
    pub user: Option<UserSummary>,
}

impl CommitmentParticipant {
    /// Adds a user to a commitment
    ///
    /// # Errors
    ///
    /// `Conflict` if the user already participates in the commitment.
    pub async fn add(pool: &SqlitePool, commitment_id: i64, user_id: i64) -> StoreResult<Self> {
        let existing = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM commitment_participants WHERE commitment_id = ? AND user_id = ?",
        )
        .bind(commitment_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if existing.is_some() {
            return Err(StoreError::Conflict(
                "User is already a participant of this commitment".to_string(),
            ));
        }

        let participant = sqlx::query_as::<_, CommitmentParticipant>(
            r#"
            INSERT INTO commitment_participants (commitment_id, user_id, created_at)
            VALUES (?, ?, ?)
            RETURNING id, commitment_id, user_id, created_at
            "#,
        )
        .bind(commitment_id)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(participant)
    }

    /// Removes a user from a commitment
    ///
    /// # Errors
    ///
    /// `NotFound` if no matching participation exists.
    pub async fn remove(pool: &SqlitePool, commitment_id: i64, user_id: i64) -> StoreResult<()> {
        let result =
            sqlx::query("DELETE FROM commitment_participants WHERE commitment_id = ? AND user_id = ?")
                .bind(commitment_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Participant"));
        }

        Ok(())
    }
}
