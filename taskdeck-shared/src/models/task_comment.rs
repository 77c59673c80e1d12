/// Task comment model and database operations
///
/// Comments drive the `tasks.comments` counter: every mutation here runs in
/// a transaction that also recomputes the counter from the live rows, so
/// the two can never drift.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_comments (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     content TEXT NOT NULL,
///     task_id INTEGER NOT NULL,
///     author_id INTEGER NOT NULL,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```

use crate::error::{StoreError, StoreResult};
use crate::models::in_placeholders;
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashMap;

/// Task comment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    /// Unique comment ID
    pub id: i64,

    /// Comment body
    pub content: String,

    /// Task the comment belongs to
    pub task_id: i64,

    /// Authoring user
    pub author_id: i64,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Comment together with the author's public profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDetail {
    /// The comment row
    #[serde(flatten)]
    pub comment: TaskComment,

    /// Author profile, if the user still exists
    pub author: Option<UserSummary>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskComment {
    /// Comment body
    pub content: String,

    /// Authoring user
    pub author_id: i64,
}

/// Input for updating a comment (content only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskComment {
    /// New comment body
    pub content: Option<String>,
}

const COMMENT_COLUMNS: &str = "id, content, task_id, author_id, created_at, updated_at";

impl TaskComment {
    /// Adds a comment to a task and bumps the task's counter, atomically
    ///
    /// # Errors
    ///
    /// - `NotFound` if the task does not exist
    /// - `InvalidInput` if the content is empty
    pub async fn create(
        pool: &SqlitePool,
        task_id: i64,
        data: CreateTaskComment,
    ) -> StoreResult<Self> {
        if data.content.trim().is_empty() {
            return Err(StoreError::InvalidInput("Content is required".to_string()));
        }

        let mut tx = pool.begin().await?;

        let task = sqlx::query_as::<_, (i64,)>("SELECT id FROM tasks WHERE id = ?")
            .bind(task_id)
            .fetch_optional(&mut *tx)
            .await?;
        if task.is_none() {
            return Err(StoreError::not_found("Task"));
        }

        let now = Utc::now();
        let comment = sqlx::query_as::<_, TaskComment>(&format!(
            r#"
            INSERT INTO task_comments (content, task_id, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(data.content)
        .bind(task_id)
        .bind(data.author_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        recount_task_comments(&mut tx, task_id).await?;

        tx.commit().await?;

        Ok(comment)
    }

    /// Lists a task's comments with author profiles, newest first
    pub async fn find_by_task(pool: &SqlitePool, task_id: i64) -> StoreResult<Vec<CommentDetail>> {
        let comments = sqlx::query_as::<_, TaskComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM task_comments WHERE task_id = ? \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<i64> = Vec::new();
        for comment in &comments {
            if !author_ids.contains(&comment.author_id) {
                author_ids.push(comment.author_id);
            }
        }

        let query = format!(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE id IN ({})",
            in_placeholders(author_ids.len())
        );
        let mut q = sqlx::query_as::<_, UserSummary>(&query);
        for id in &author_ids {
            q = q.bind(id);
        }
        let authors: HashMap<i64, UserSummary> =
            q.fetch_all(pool).await?.into_iter().map(|u| (u.id, u)).collect();

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.author_id).cloned();
                CommentDetail { comment, author }
            })
            .collect())
    }

    /// Updates a comment's content
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn update(pool: &SqlitePool, id: i64, data: UpdateTaskComment) -> StoreResult<Self> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM task_comments WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Comment"));
        }

        let content = data.content.filter(|v| !v.is_empty());

        let mut query = String::from("UPDATE task_comments SET updated_at = ?");
        if content.is_some() {
            query.push_str(", content = ?");
        }
        query.push_str(&format!(" WHERE id = ? RETURNING {COMMENT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, TaskComment>(&query).bind(Utc::now());
        if let Some(content) = content {
            q = q.bind(content);
        }

        let comment = q.bind(id).fetch_one(pool).await?;

        Ok(comment)
    }

    /// Deletes a comment and drops the task's counter, atomically
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn delete(pool: &SqlitePool, id: i64) -> StoreResult<()> {
        let comment = sqlx::query_as::<_, (i64,)>("SELECT task_id FROM task_comments WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        let Some((task_id,)) = comment else {
            return Err(StoreError::not_found("Comment"));
        };

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM task_comments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        recount_task_comments(&mut tx, task_id).await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Rewrites `tasks.comments` from the live comment rows
pub(crate) async fn recount_task_comments(
    tx: &mut Transaction<'_, Sqlite>,
    task_id: i64,
) -> StoreResult<()> {
    sqlx::query(
        "UPDATE tasks SET comments = (SELECT COUNT(*) FROM task_comments WHERE task_id = ?) \
         WHERE id = ?",
    )
    .bind(task_id)
    .bind(task_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_comment_default() {
        let data = UpdateTaskComment::default();
        assert!(data.content.is_none());
    }
}
