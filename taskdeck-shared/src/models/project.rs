/// Project model and database operations
///
/// Projects are the top-level containers: they have an owner, a member
/// list, tags, sprints, tasks, and commitments. Deleting a project runs an
/// explicit referential protocol in one transaction — membership rows,
/// tags, and sprints (with their own members) go away; tasks and
/// commitments survive with their links nulled out.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status TEXT NOT NULL DEFAULT 'starting',
///     color TEXT NOT NULL DEFAULT '#3B82F6',
///     due_date TEXT,
///     owner_id INTEGER NOT NULL,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::project::{Project, CreateProject, ProjectFilter};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, CreateProject {
///     name: "Website Redesign".to_string(),
///     owner_id: 1,
///     members: vec![2, 3],
///     ..Default::default()
/// }).await?;
///
/// let tagged = Project::find_all(&pool, &ProjectFilter {
///     tag: Some("frontend".to_string()),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use crate::models::commitment::Commitment;
use crate::models::in_placeholders;
use crate::models::project_member::{ProjectMember, ProjectMemberWithUser};
use crate::models::project_tag::ProjectTag;
use crate::models::sprint::Sprint;
use crate::models::task::Task;
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name
    pub name: String,

    /// Free-form description (empty string when unset)
    pub description: String,

    /// Workflow status (e.g., "starting", "active", "done")
    pub status: String,

    /// Display color
    pub color: String,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Owning user (required reference)
    pub owner_id: i64,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Project together with the rows typical consumers need eagerly
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    /// The project row
    #[serde(flatten)]
    pub project: Project,

    /// Owner profile, if the user row is readable
    pub owner: Option<UserSummary>,

    /// Member rows with profiles
    pub members: Vec<ProjectMemberWithUser>,

    /// Attached tags
    pub tags: Vec<ProjectTag>,

    /// Tasks linked to the project
    pub tasks: Vec<Task>,

    /// Sprints of the project
    pub sprints: Vec<Sprint>,

    /// Commitments linked to the project
    pub commitments: Vec<Commitment>,
}

/// Input for creating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Description (defaults to empty)
    pub description: Option<String>,

    /// Status (defaults to "starting")
    pub status: Option<String>,

    /// Display color (defaults to "#3B82F6")
    pub color: Option<String>,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Owning user
    pub owner_id: i64,

    /// Initial member user ids, inserted with the project in one transaction
    #[serde(default)]
    pub members: Vec<i64>,
}

/// Input for updating a project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description (may be set to empty)
    pub description: Option<String>,

    /// New status
    pub status: Option<String>,

    /// New color
    pub color: Option<String>,

    /// New due date (use Some(None) to clear)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// Filters for project listings
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Only projects carrying a tag with this name
    pub tag: Option<String>,
}

const PROJECT_COLUMNS: &str =
    "id, name, description, status, color, due_date, owner_id, created_at, updated_at";

impl Project {
    /// Creates a project, inserting any initial members in the same transaction
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the name is empty
    /// - `Conflict` if the initial member list contains a duplicate pair
    pub async fn create(pool: &SqlitePool, data: CreateProject) -> StoreResult<ProjectDetail> {
        if data.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("Name is required".to_string()));
        }

        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects (name, description, status, color, due_date, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(data.name)
        .bind(data.description.unwrap_or_default())
        .bind(data.status.unwrap_or_else(|| "starting".to_string()))
        .bind(data.color.unwrap_or_else(|| "#3B82F6".to_string()))
        .bind(data.due_date)
        .bind(data.owner_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.members {
            sqlx::query("INSERT INTO project_members (project_id, user_id, created_at) VALUES (?, ?, ?)")
                .bind(project.id)
                .bind(user_id)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let detail = Self::find_by_id(pool, project.id).await?;
        detail.ok_or_else(|| StoreError::not_found("Project"))
    }

    /// Finds a project by ID with owner, members, tags, tasks, sprints, and
    /// commitments
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> StoreResult<Option<ProjectDetail>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match project {
            Some(project) => {
                let mut details = load_details(pool, vec![project]).await?;
                Ok(details.pop())
            }
            None => Ok(None),
        }
    }

    /// Lists projects, optionally narrowed to those carrying a tag name
    pub async fn find_all(
        pool: &SqlitePool,
        filter: &ProjectFilter,
    ) -> StoreResult<Vec<ProjectDetail>> {
        let mut query = format!("SELECT {PROJECT_COLUMNS} FROM projects");
        if filter.tag.is_some() {
            query.push_str(" WHERE id IN (SELECT project_id FROM project_tags WHERE name = ?)");
        }
        query.push_str(" ORDER BY id ASC");

        let mut q = sqlx::query_as::<_, Project>(&query);
        if let Some(tag) = &filter.tag {
            q = q.bind(tag);
        }

        let projects = q.fetch_all(pool).await?;
        load_details(pool, projects).await
    }

    /// Applies a partial update to a project
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn update(pool: &SqlitePool, id: i64, data: UpdateProject) -> StoreResult<Self> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Project"));
        }

        let mut query = String::from("UPDATE projects SET updated_at = ?");

        let name = data.name.filter(|v| !v.is_empty());
        let status = data.status.filter(|v| !v.is_empty());
        let color = data.color.filter(|v| !v.is_empty());

        if name.is_some() {
            query.push_str(", name = ?");
        }
        if data.description.is_some() {
            query.push_str(", description = ?");
        }
        if status.is_some() {
            query.push_str(", status = ?");
        }
        if color.is_some() {
            query.push_str(", color = ?");
        }
        if data.due_date.is_some() {
            query.push_str(", due_date = ?");
        }

        query.push_str(&format!(" WHERE id = ? RETURNING {PROJECT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Project>(&query).bind(Utc::now());
        if let Some(name) = name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(color) = color {
            q = q.bind(color);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let project = q.bind(id).fetch_one(pool).await?;

        Ok(project)
    }

    /// Deletes a project, applying the referential protocol in one transaction
    ///
    /// Members, tags, and sprints (with their member rows) are removed.
    /// Tasks lose both their project and sprint links; commitments lose
    /// their project link. Both survive as rows.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn delete(pool: &SqlitePool, id: i64) -> StoreResult<()> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Project"));
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM project_members WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM project_tags WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Sprint members and task links must go before the sprints do
        sqlx::query(
            "DELETE FROM sprint_members WHERE sprint_id IN (SELECT id FROM sprints WHERE project_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "UPDATE tasks SET sprint_id = NULL WHERE sprint_id IN (SELECT id FROM sprints WHERE project_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM sprints WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE tasks SET project_id = NULL WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE commitments SET project_id = NULL WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Resolves owners, members, tags, tasks, sprints, and commitments for a
/// batch of projects
async fn load_details(
    pool: &SqlitePool,
    projects: Vec<Project>,
) -> StoreResult<Vec<ProjectDetail>> {
    if projects.is_empty() {
        return Ok(Vec::new());
    }

    let project_ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
    let placeholders = in_placeholders(project_ids.len());

    let query = format!(
        "SELECT id, project_id, user_id, created_at FROM project_members \
         WHERE project_id IN ({placeholders}) ORDER BY id ASC"
    );
    let mut q = sqlx::query_as::<_, ProjectMember>(&query);
    for id in &project_ids {
        q = q.bind(id);
    }
    let member_rows = q.fetch_all(pool).await?;

    let query = format!(
        "SELECT id, name, color, project_id, created_at FROM project_tags \
         WHERE project_id IN ({placeholders}) ORDER BY id ASC"
    );
    let mut q = sqlx::query_as::<_, ProjectTag>(&query);
    for id in &project_ids {
        q = q.bind(id);
    }
    let tag_rows = q.fetch_all(pool).await?;

    let query = format!(
        "SELECT id, name, description, status, priority, due_date, comments, attachments, \
         project_id, assignee_id, sprint_id, created_at, updated_at \
         FROM tasks WHERE project_id IN ({placeholders}) ORDER BY created_at DESC, id DESC"
    );
    let mut q = sqlx::query_as::<_, Task>(&query);
    for id in &project_ids {
        q = q.bind(id);
    }
    let task_rows = q.fetch_all(pool).await?;

    let query = format!(
        "SELECT id, name, status, start_date, end_date, project_id, created_at, updated_at \
         FROM sprints WHERE project_id IN ({placeholders}) ORDER BY start_date DESC, id DESC"
    );
    let mut q = sqlx::query_as::<_, Sprint>(&query);
    for id in &project_ids {
        q = q.bind(id);
    }
    let sprint_rows = q.fetch_all(pool).await?;

    let query = format!(
        "SELECT id, title, description, date, start_time, end_time, location, status, priority, \
         reminder, project_id, created_at, updated_at \
         FROM commitments WHERE project_id IN ({placeholders}) ORDER BY date ASC, start_time ASC, id ASC"
    );
    let mut q = sqlx::query_as::<_, Commitment>(&query);
    for id in &project_ids {
        q = q.bind(id);
    }
    let commitment_rows = q.fetch_all(pool).await?;

    // Profiles for owners and members in one lookup
    let mut user_ids: Vec<i64> = Vec::new();
    for p in &projects {
        if !user_ids.contains(&p.owner_id) {
            user_ids.push(p.owner_id);
        }
    }
    for m in &member_rows {
        if !user_ids.contains(&m.user_id) {
            user_ids.push(m.user_id);
        }
    }
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

    let mut members_by_project: HashMap<i64, Vec<ProjectMemberWithUser>> = HashMap::new();
    for member in member_rows {
        let user = users.get(&member.user_id).cloned();
        members_by_project
            .entry(member.project_id)
            .or_default()
            .push(ProjectMemberWithUser { member, user });
    }

    let mut tags_by_project: HashMap<i64, Vec<ProjectTag>> = HashMap::new();
    for tag in tag_rows {
        tags_by_project.entry(tag.project_id).or_default().push(tag);
    }

    let mut tasks_by_project: HashMap<i64, Vec<Task>> = HashMap::new();
    for task in task_rows {
        if let Some(project_id) = task.project_id {
            tasks_by_project.entry(project_id).or_default().push(task);
        }
    }

    let mut sprints_by_project: HashMap<i64, Vec<Sprint>> = HashMap::new();
    for sprint in sprint_rows {
        sprints_by_project
            .entry(sprint.project_id)
            .or_default()
            .push(sprint);
    }

    let mut commitments_by_project: HashMap<i64, Vec<Commitment>> = HashMap::new();
    for commitment in commitment_rows {
        if let Some(project_id) = commitment.project_id {
            commitments_by_project
                .entry(project_id)
                .or_default()
                .push(commitment);
        }
    }

    Ok(projects
        .into_iter()
        .map(|project| {
            let owner = users.get(&project.owner_id).cloned();
            let members = members_by_project.remove(&project.id).unwrap_or_default();
            let tags = tags_by_project.remove(&project.id).unwrap_or_default();
            let tasks = tasks_by_project.remove(&project.id).unwrap_or_default();
            let sprints = sprints_by_project.remove(&project.id).unwrap_or_default();
            let commitments = commitments_by_project
                .remove(&project.id)
                .unwrap_or_default();
            ProjectDetail {
                project,
                owner,
                members,
                tags,
                tasks,
                sprints,
                commitments,
            }
        })
        .collect())
}
