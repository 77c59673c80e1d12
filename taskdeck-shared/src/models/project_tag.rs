/// Project tags
///
/// Labels attached to exactly one project. Tags are removed with their
/// project, and a project listing can be filtered by tag name.

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Tag attached to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTag {
    /// Tag ID
    pub id: i64,

    /// Tag label
    pub name: String,

    /// Display color
    pub color: String,

    /// Owning project
    pub project_id: i64,

    /// When the tag was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a tag on a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectTag {
    /// Tag label
    pub name: String,

    /// Display color (defaults to the project palette blue)
    pub color: Option<String>,
}

impl ProjectTag {
    /// Creates a tag on a project
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the name is empty.
    pub async fn create(
        pool: &SqlitePool,
        project_id: i64,
        data: CreateProjectTag,
    ) -> StoreResult<Self> {
        if data.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("Name is required".to_string()));
        }

        let tag = sqlx::query_as::<_, ProjectTag>(
            r#"
            INSERT INTO project_tags (name, color, project_id, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, color, project_id, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.color.unwrap_or_else(|| "#3B82F6".to_string()))
        .bind(project_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }

    /// Deletes a tag from a project
    ///
    /// # Errors
    ///
    /// `NotFound` if the tag does not exist on that project.
    pub async fn delete(pool: &SqlitePool, project_id: i64, tag_id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM project_tags WHERE id = ? AND project_id = ?")
            .bind(tag_id)
            .bind(project_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Tag"));
        }

        Ok(())
    }

    /// Lists tags of a project
    pub async fn find_by_project(pool: &SqlitePool, project_id: i64) -> StoreResult<Vec<Self>> {
        let tags = sqlx::query_as::<_, ProjectTag>(
            r#"
            SELECT id, name, color, project_id, created_at
            FROM project_tags
            WHERE project_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
