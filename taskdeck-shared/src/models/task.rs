/// Task model and database operations
///
/// Tasks are the unit of work everything else hangs off of: they may belong
/// to a project and a sprint, carry an assignee, and accumulate comments.
/// The report engine aggregates over the task set.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     description TEXT,
///     status TEXT NOT NULL DEFAULT 'todo',
///     priority TEXT NOT NULL DEFAULT 'medium',
///     due_date TEXT,
///     comments INTEGER NOT NULL DEFAULT 0,
///     attachments INTEGER NOT NULL DEFAULT 0,
///     project_id INTEGER,
///     assignee_id INTEGER,
///     sprint_id INTEGER,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// The `comments` column is a materialized counter: it is recomputed by the
/// comment operations (and never accepted from callers), so it always equals
/// the live number of comment rows for the task.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::task::{Task, CreateTask, TaskFilter};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     name: "Revisar layout".to_string(),
///     project_id: Some(1),
///     assignee_id: Some(2),
///     ..Default::default()
/// }).await?;
///
/// let open = Task::find_all(&pool, &TaskFilter {
///     status: Some("todo".to_string()),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use crate::models::in_placeholders;
use crate::models::project::Project;
use crate::models::sprint::Sprint;
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Task name
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Workflow status (e.g., "todo", "in_progress", "done")
    pub status: String,

    /// Priority (e.g., "low", "medium", "high")
    pub priority: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Comment count, recomputed by the store on every comment mutation
    pub comments: i64,

    /// Attachment count
    pub attachments: i64,

    /// Project the task belongs to (nullable, survives project deletion)
    pub project_id: Option<i64>,

    /// Assigned user (nullable, survives user deletion)
    pub assignee_id: Option<i64>,

    /// Sprint the task is scheduled in (nullable, survives sprint deletion)
    pub sprint_id: Option<i64>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Task together with the rows typical consumers need eagerly
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    /// The task row
    #[serde(flatten)]
    pub task: Task,

    /// Owning project, if linked
    pub project: Option<Project>,

    /// Assigned user, if any
    pub assignee: Option<UserSummary>,

    /// Sprint, if scheduled
    pub sprint: Option<Sprint>,
}

/// Input for creating a new task
///
/// Only the name is required; the `comments` counter is store-maintained
/// and deliberately absent here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    /// Task name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Status (defaults to "todo")
    pub status: Option<String>,

    /// Priority (defaults to "medium")
    pub priority: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Optional project link
    pub project_id: Option<i64>,

    /// Optional assignee
    pub assignee_id: Option<i64>,

    /// Optional sprint link
    pub sprint_id: Option<i64>,

    /// Attachment count (defaults to 0)
    pub attachments: Option<i64>,
}

/// Input for updating a task
///
/// Absent fields keep their current values; the nullable links use
/// `Some(None)` to clear.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    /// New name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<String>,

    /// New priority
    pub priority: Option<String>,

    /// New due date (use Some(None) to clear)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New project link (use Some(None) to unlink)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub project_id: Option<Option<i64>>,

    /// New assignee (use Some(None) to unassign)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub assignee_id: Option<Option<i64>>,

    /// New sprint link (use Some(None) to unlink)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub sprint_id: Option<Option<i64>>,

    /// New attachment count
    pub attachments: Option<i64>,
}

/// Equality filters for task listings, combined with AND semantics
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only tasks of this project
    pub project_id: Option<i64>,

    /// Only tasks assigned to this user
    pub assignee_id: Option<i64>,

    /// Only tasks with this status
    pub status: Option<String>,

    /// Only tasks with this priority
    pub priority: Option<String>,
}

const TASK_COLUMNS: &str = "id, name, description, status, priority, due_date, comments, \
                            attachments, project_id, assignee_id, sprint_id, created_at, updated_at";

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the name is empty.
    pub async fn create(pool: &SqlitePool, data: CreateTask) -> StoreResult<Self> {
        if data.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("Name is required".to_string()));
        }

        let now = Utc::now();
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (name, description, status, priority, due_date, attachments,
                               project_id, assignee_id, sprint_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description)
        .bind(data.status.unwrap_or_else(|| "todo".to_string()))
        .bind(data.priority.unwrap_or_else(|| "medium".to_string()))
        .bind(data.due_date)
        .bind(data.attachments.unwrap_or(0))
        .bind(data.project_id)
        .bind(data.assignee_id)
        .bind(data.sprint_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID together with its project, assignee, and sprint
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> StoreResult<Option<TaskDetail>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match task {
            Some(task) => {
                let mut details = load_details(pool, vec![task]).await?;
                Ok(details.pop())
            }
            None => Ok(None),
        }
    }

    /// Lists tasks matching the filter, most recently created first
    pub async fn find_all(pool: &SqlitePool, filter: &TaskFilter) -> StoreResult<Vec<TaskDetail>> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1 = 1");

        if filter.project_id.is_some() {
            query.push_str(" AND project_id = ?");
        }
        if filter.assignee_id.is_some() {
            query.push_str(" AND assignee_id = ?");
        }
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        if filter.priority.is_some() {
            query.push_str(" AND priority = ?");
        }
        query.push_str(" ORDER BY created_at DESC, id DESC");

        let mut q = sqlx::query_as::<_, Task>(&query);
        if let Some(project_id) = filter.project_id {
            q = q.bind(project_id);
        }
        if let Some(assignee_id) = filter.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status);
        }
        if let Some(priority) = &filter.priority {
            q = q.bind(priority);
        }

        let tasks = q.fetch_all(pool).await?;
        load_details(pool, tasks).await
    }

    /// Applies a partial update to a task
    ///
    /// The `comments` counter cannot be set this way; it only moves through
    /// comment create/delete.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn update(pool: &SqlitePool, id: i64, data: UpdateTask) -> StoreResult<Self> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Task"));
        }

        let mut query = String::from("UPDATE tasks SET updated_at = ?");

        let name = data.name.filter(|v| !v.is_empty());
        let status = data.status.filter(|v| !v.is_empty());
        let priority = data.priority.filter(|v| !v.is_empty());

        if name.is_some() {
            query.push_str(", name = ?");
        }
        if data.description.is_some() {
            query.push_str(", description = ?");
        }
        if status.is_some() {
            query.push_str(", status = ?");
        }
        if priority.is_some() {
            query.push_str(", priority = ?");
        }
        if data.due_date.is_some() {
            query.push_str(", due_date = ?");
        }
        if data.project_id.is_some() {
            query.push_str(", project_id = ?");
        }
        if data.assignee_id.is_some() {
            query.push_str(", assignee_id = ?");
        }
        if data.sprint_id.is_some() {
            query.push_str(", sprint_id = ?");
        }
        if data.attachments.is_some() {
            query.push_str(", attachments = ?");
        }

        query.push_str(&format!(" WHERE id = ? RETURNING {TASK_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Task>(&query).bind(Utc::now());
        if let Some(name) = name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(priority) = priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(project_id) = data.project_id {
            q = q.bind(project_id);
        }
        if let Some(assignee_id) = data.assignee_id {
            q = q.bind(assignee_id);
        }
        if let Some(sprint_id) = data.sprint_id {
            q = q.bind(sprint_id);
        }
        if let Some(attachments) = data.attachments {
            q = q.bind(attachments);
        }

        let task = q.bind(id).fetch_one(pool).await?;

        Ok(task)
    }

    /// Deletes a task and its comments in one transaction
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn delete(pool: &SqlitePool, id: i64) -> StoreResult<()> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Task"));
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM task_comments WHERE task_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Resolves project/assignee/sprint rows for a batch of tasks
///
/// One lookup per related table instead of one per task.
async fn load_details(pool: &SqlitePool, tasks: Vec<Task>) -> StoreResult<Vec<TaskDetail>> {
    let project_ids: Vec<i64> = distinct(tasks.iter().filter_map(|t| t.project_id));
    let assignee_ids: Vec<i64> = distinct(tasks.iter().filter_map(|t| t.assignee_id));
    let sprint_ids: Vec<i64> = distinct(tasks.iter().filter_map(|t| t.sprint_id));

    let projects = fetch_projects(pool, &project_ids).await?;
    let users = fetch_users(pool, &assignee_ids).await?;
    let sprints = fetch_sprints(pool, &sprint_ids).await?;

    Ok(tasks
        .into_iter()
        .map(|task| {
            let project = task.project_id.and_then(|id| projects.get(&id).cloned());
            let assignee = task.assignee_id.and_then(|id| users.get(&id).cloned());
            let sprint = task.sprint_id.and_then(|id| sprints.get(&id).cloned());
            TaskDetail {
                task,
                project,
                assignee,
                sprint,
            }
        })
        .collect())
}

fn distinct(ids: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut seen: Vec<i64> = Vec::new();
    for id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

async fn fetch_projects(pool: &SqlitePool, ids: &[i64]) -> StoreResult<HashMap<i64, Project>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let query = format!(
        "SELECT id, name, description, status, color, due_date, owner_id, created_at, updated_at \
         FROM projects WHERE id IN ({})",
        in_placeholders(ids.len())
    );
    let mut q = sqlx::query_as::<_, Project>(&query);
    for id in ids {
        q = q.bind(id);
    }

    let rows = q.fetch_all(pool).await?;
    Ok(rows.into_iter().map(|p| (p.id, p)).collect())
}

async fn fetch_users(pool: &SqlitePool, ids: &[i64]) -> StoreResult<HashMap<i64, UserSummary>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let query = format!(
        "SELECT id, name, email, created_at, updated_at FROM users WHERE id IN ({})",
        in_placeholders(ids.len())
    );
    let mut q = sqlx::query_as::<_, UserSummary>(&query);
    for id in ids {
        q = q.bind(id);
    }

    let rows = q.fetch_all(pool).await?;
    Ok(rows.into_iter().map(|u| (u.id, u)).collect())
}

async fn fetch_sprints(pool: &SqlitePool, ids: &[i64]) -> StoreResult<HashMap<i64, Sprint>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let query = format!(
        "SELECT id, name, status, start_date, end_date, project_id, created_at, updated_at \
         FROM sprints WHERE id IN ({})",
        in_placeholders(ids.len())
    );
    let mut q = sqlx::query_as::<_, Sprint>(&query);
    for id in ids {
        q = q.bind(id);
    }

    let rows = q.fetch_all(pool).await?;
    Ok(rows.into_iter().map(|s| (s.id, s)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_task_defaults() {
        let data = CreateTask {
            name: "x".to_string(),
            ..Default::default()
        };
        assert!(data.status.is_none());
        assert!(data.priority.is_none());
        assert!(data.attachments.is_none());
    }

    #[test]
    fn test_update_task_distinguishes_null_from_absent() {
        let update: UpdateTask = serde_json::from_str(r#"{"assigneeId": null}"#).unwrap();
        assert_eq!(update.assignee_id, Some(None));
        assert!(update.project_id.is_none());

        let update: UpdateTask = serde_json::from_str(r#"{"projectId": 7}"#).unwrap();
        assert_eq!(update.project_id, Some(Some(7)));
    }

    #[test]
    fn test_distinct_preserves_order() {
        let ids = distinct([3i64, 1, 3, 2, 1].into_iter());
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
