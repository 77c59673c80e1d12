/// Sprint model and database operations
///
/// Sprints are time-boxed iterations inside a project, with their own member
/// list and scheduled tasks. Start/end dates are stored as given: the store
/// does not require `start_date < end_date`, matching observed product
/// behavior.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sprints (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     status TEXT NOT NULL DEFAULT 'active',
///     start_date TEXT NOT NULL,
///     end_date TEXT NOT NULL,
///     project_id INTEGER NOT NULL,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::sprint::{Sprint, CreateSprint};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::Utc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let sprint = Sprint::create(&pool, CreateSprint {
///     name: "Sprint 12".to_string(),
///     status: None,
///     start_date: Utc::now(),
///     end_date: Utc::now(),
///     project_id: 1,
///     members: vec![2, 3],
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use crate::models::in_placeholders;
use crate::models::project::Project;
use crate::models::sprint_member::{SprintMember, SprintMemberWithUser};
use crate::models::task::Task;
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Sprint model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    /// Unique sprint ID
    pub id: i64,

    /// Sprint name
    pub name: String,

    /// Workflow status (e.g., "active", "completed")
    pub status: String,

    /// Iteration start
    pub start_date: DateTime<Utc>,

    /// Iteration end (not validated against start)
    pub end_date: DateTime<Utc>,

    /// Owning project
    pub project_id: i64,

    /// When the sprint was created
    pub created_at: DateTime<Utc>,

    /// When the sprint was last updated
    pub updated_at: DateTime<Utc>,
}

/// Sprint together with its project, members, and tasks
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintDetail {
    /// The sprint row
    #[serde(flatten)]
    pub sprint: Sprint,

    /// Owning project, if it still exists
    pub project: Option<Project>,

    /// Member rows with profiles
    pub members: Vec<SprintMemberWithUser>,

    /// Tasks scheduled in this sprint
    pub tasks: Vec<Task>,
}

/// Input for creating a sprint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSprint {
    /// Sprint name
    pub name: String,

    /// Status (defaults to "active")
    pub status: Option<String>,

    /// Iteration start
    pub start_date: DateTime<Utc>,

    /// Iteration end
    pub end_date: DateTime<Utc>,

    /// Owning project
    pub project_id: i64,

    /// Initial member user ids, inserted with the sprint in one transaction
    #[serde(default)]
    pub members: Vec<i64>,
}

/// Input for updating a sprint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSprint {
    /// New name
    pub name: Option<String>,

    /// New status
    pub status: Option<String>,

    /// New iteration start
    pub start_date: Option<DateTime<Utc>>,

    /// New iteration end
    pub end_date: Option<DateTime<Utc>>,
}

/// Equality filters for sprint listings
#[derive(Debug, Clone, Default)]
pub struct SprintFilter {
    /// Only sprints of this project
    pub project_id: Option<i64>,

    /// Only sprints with this status
    pub status: Option<String>,
}

const SPRINT_COLUMNS: &str =
    "id, name, status, start_date, end_date, project_id, created_at, updated_at";

impl Sprint {
    /// Creates a sprint, inserting any initial members in the same transaction
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the name is empty
    /// - `Conflict` if the initial member list contains a duplicate pair
    pub async fn create(pool: &SqlitePool, data: CreateSprint) -> StoreResult<SprintDetail> {
        if data.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("Name is required".to_string()));
        }

        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let sprint = sqlx::query_as::<_, Sprint>(&format!(
            r#"
            INSERT INTO sprints (name, status, start_date, end_date, project_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {SPRINT_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.status.unwrap_or_else(|| "active".to_string()))
        .bind(data.start_date)
        .bind(data.end_date)
        .bind(data.project_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.members {
            sqlx::query("INSERT INTO sprint_members (sprint_id, user_id, created_at) VALUES (?, ?, ?)")
                .bind(sprint.id)
                .bind(user_id)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let detail = Self::find_by_id(pool, sprint.id).await?;
        detail.ok_or_else(|| StoreError::not_found("Sprint"))
    }

    /// Finds a sprint by ID with project, members, and tasks
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> StoreResult<Option<SprintDetail>> {
        let sprint = sqlx::query_as::<_, Sprint>(&format!(
            "SELECT {SPRINT_COLUMNS} FROM sprints WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match sprint {
            Some(sprint) => {
                let mut details = load_details(pool, vec![sprint]).await?;
                Ok(details.pop())
            }
            None => Ok(None),
        }
    }

    /// Lists sprints matching the filter, most recent start date first
    pub async fn find_all(
        pool: &SqlitePool,
        filter: &SprintFilter,
    ) -> StoreResult<Vec<SprintDetail>> {
        let mut query = format!("SELECT {SPRINT_COLUMNS} FROM sprints WHERE 1 = 1");

        if filter.project_id.is_some() {
            query.push_str(" AND project_id = ?");
        }
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        query.push_str(" ORDER BY start_date DESC, id DESC");

        let mut q = sqlx::query_as::<_, Sprint>(&query);
        if let Some(project_id) = filter.project_id {
            q = q.bind(project_id);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status);
        }

        let sprints = q.fetch_all(pool).await?;
        load_details(pool, sprints).await
    }

    /// Applies a partial update to a sprint
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn update(pool: &SqlitePool, id: i64, data: UpdateSprint) -> StoreResult<Self> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM sprints WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Sprint"));
        }

        let mut query = String::from("UPDATE sprints SET updated_at = ?");

        let name = data.name.filter(|v| !v.is_empty());
        let status = data.status.filter(|v| !v.is_empty());

        if name.is_some() {
            query.push_str(", name = ?");
        }
        if status.is_some() {
            query.push_str(", status = ?");
        }
        if data.start_date.is_some() {
            query.push_str(", start_date = ?");
        }
        if data.end_date.is_some() {
            query.push_str(", end_date = ?");
        }

        query.push_str(&format!(" WHERE id = ? RETURNING {SPRINT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Sprint>(&query).bind(Utc::now());
        if let Some(name) = name {
            q = q.bind(name);
        }
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(start_date) = data.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = data.end_date {
            q = q.bind(end_date);
        }

        let sprint = q.bind(id).fetch_one(pool).await?;

        Ok(sprint)
    }

    /// Deletes a sprint: members cascade, scheduled tasks are unlinked
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn delete(pool: &SqlitePool, id: i64) -> StoreResult<()> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM sprints WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Sprint"));
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM sprint_members WHERE sprint_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE tasks SET sprint_id = NULL WHERE sprint_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sprints WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Resolves projects, members (with profiles), and tasks for a batch of sprints
async fn load_details(pool: &SqlitePool, sprints: Vec<Sprint>) -> StoreResult<Vec<SprintDetail>> {
    if sprints.is_empty() {
        return Ok(Vec::new());
    }

    let sprint_ids: Vec<i64> = sprints.iter().map(|s| s.id).collect();
    let placeholders = in_placeholders(sprint_ids.len());

    // Member rows for all sprints in one query
    let query = format!(
        "SELECT id, sprint_id, user_id, created_at FROM sprint_members \
         WHERE sprint_id IN ({placeholders}) ORDER BY id ASC"
    );
    let mut q = sqlx::query_as::<_, SprintMember>(&query);
    for id in &sprint_ids {
        q = q.bind(id);
    }
    let member_rows = q.fetch_all(pool).await?;

    // Profiles for every member
    let user_ids: Vec<i64> = {
        let mut seen = Vec::new();
        for m in &member_rows {
            if !seen.contains(&m.user_id) {
                seen.push(m.user_id);
            }
        }
        seen
    };
    let mut users: HashMap<i64, UserSummary> = HashMap::new();
    if !user_ids.is_empty() {
        let query = format!(
            "SELECT id, name, email, created_at, updated_at FROM users WHERE id IN ({})",
            in_placeholders(user_ids.len())
        );
        let mut q = sqlx::query_as::<_, UserSummary>(&query);
        for id in &user_ids {
            q = q.bind(id);
        }
        for user in q.fetch_all(pool).await? {
            users.insert(user.id, user);
        }
    }

    // Tasks scheduled in these sprints
    let query = format!(
        "SELECT id, name, description, status, priority, due_date, comments, attachments, \
         project_id, assignee_id, sprint_id, created_at, updated_at \
         FROM tasks WHERE sprint_id IN ({placeholders}) ORDER BY created_at DESC, id DESC"
    );
    let mut q = sqlx::query_as::<_, Task>(&query);
    for id in &sprint_ids {
        q = q.bind(id);
    }
    let task_rows = q.fetch_all(pool).await?;

    // Owning projects
    let project_ids: Vec<i64> = {
        let mut seen = Vec::new();
        for s in &sprints {
            if !seen.contains(&s.project_id) {
                seen.push(s.project_id);
            }
        }
        seen
    };
    let mut projects: HashMap<i64, Project> = HashMap::new();
    if !project_ids.is_empty() {
        let query = format!(
            "SELECT id, name, description, status, color, due_date, owner_id, created_at, updated_at \
             FROM projects WHERE id IN ({})",
            in_placeholders(project_ids.len())
        );
        let mut q = sqlx::query_as::<_, Project>(&query);
        for id in &project_ids {
            q = q.bind(id);
        }
        for project in q.fetch_all(pool).await? {
            projects.insert(project.id, project);
        }
    }

    let mut members_by_sprint: HashMap<i64, Vec<SprintMemberWithUser>> = HashMap::new();
    for member in member_rows {
        let user = users.get(&member.user_id).cloned();
        members_by_sprint
            .entry(member.sprint_id)
            .or_default()
            .push(SprintMemberWithUser { member, user });
    }

    let mut tasks_by_sprint: HashMap<i64, Vec<Task>> = HashMap::new();
    for task in task_rows {
        if let Some(sprint_id) = task.sprint_id {
            tasks_by_sprint.entry(sprint_id).or_default().push(task);
        }
    }

    Ok(sprints
        .into_iter()
        .map(|sprint| {
            let project = projects.get(&sprint.project_id).cloned();
            let members = members_by_sprint.remove(&sprint.id).unwrap_or_default();
            let tasks = tasks_by_sprint.remove(&sprint.id).unwrap_or_default();
            SprintDetail {
                sprint,
                project,
                members,
                tasks,
            }
        })
        .collect())
}
