/// Commitment model and database operations
///
/// Commitments are scheduled agenda entries: a date plus wall-clock start
/// and end times, optionally linked to a project, with a participant list.
/// Listings are in agenda order (date, then start time).
///
/// # Schema
///
/// ```sql
/// CREATE TABLE commitments (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     description TEXT,
///     date TEXT NOT NULL,
///     start_time TEXT NOT NULL,
///     end_time TEXT NOT NULL,
///     location TEXT,
///     status TEXT NOT NULL DEFAULT 'scheduled',
///     priority TEXT NOT NULL DEFAULT 'medium',
///     reminder TEXT,
///     project_id INTEGER,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::commitment::{Commitment, CreateCommitment, CommitmentFilter};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
/// use chrono::Utc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let meeting = Commitment::create(&pool, CreateCommitment {
///     title: "Sprint review".to_string(),
///     date: Utc::now(),
///     start_time: "14:00".to_string(),
///     end_time: "15:00".to_string(),
///     participants: vec![1, 2],
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use crate::models::commitment_participant::{CommitmentParticipant, ParticipantWithUser};
use crate::models::in_placeholders;
use crate::models::project::Project;
use crate::models::user::UserSummary;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Commitment model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    /// Unique commitment ID
    pub id: i64,

    /// Commitment title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// The day the commitment is scheduled on
    pub date: DateTime<Utc>,

    /// Wall-clock start time, e.g. "14:00"
    pub start_time: String,

    /// Wall-clock end time, e.g. "15:00"
    pub end_time: String,

    /// Optional location
    pub location: Option<String>,

    /// Workflow status (e.g., "scheduled", "done", "cancelled")
    pub status: String,

    /// Priority (e.g., "low", "medium", "high")
    pub priority: String,

    /// Optional reminder setting
    pub reminder: Option<String>,

    /// Project the commitment belongs to (nullable, survives project deletion)
    pub project_id: Option<i64>,

    /// When the commitment was created
    pub created_at: DateTime<Utc>,

    /// When the commitment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Commitment together with its project and participant list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentDetail {
    /// The commitment row
    #[serde(flatten)]
    pub commitment: Commitment,

    /// Owning project, if linked
    pub project: Option<Project>,

    /// Participant rows with profiles
    pub participants: Vec<ParticipantWithUser>,
}

/// Input for creating a commitment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommitment {
    /// Commitment title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// The day the commitment is scheduled on
    pub date: DateTime<Utc>,

    /// Wall-clock start time
    pub start_time: String,

    /// Wall-clock end time
    pub end_time: String,

    /// Optional location
    pub location: Option<String>,

    /// Status (defaults to "scheduled")
    pub status: Option<String>,

    /// Priority (defaults to "medium")
    pub priority: Option<String>,

    /// Optional reminder setting
    pub reminder: Option<String>,

    /// Optional project link
    pub project_id: Option<i64>,

    /// Initial participant user ids, inserted in the same transaction
    #[serde(default)]
    pub participants: Vec<i64>,
}

/// Input for updating a commitment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommitment {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub description: Option<Option<String>>,

    /// New date
    pub date: Option<DateTime<Utc>>,

    /// New start time
    pub start_time: Option<String>,

    /// New end time
    pub end_time: Option<String>,

    /// New location (use Some(None) to clear)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub location: Option<Option<String>>,

    /// New status
    pub status: Option<String>,

    /// New priority
    pub priority: Option<String>,

    /// New reminder (use Some(None) to clear)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub reminder: Option<Option<String>>,

    /// New project link (use Some(None) to unlink)
    #[serde(default, deserialize_with = "crate::models::clearable")]
    pub project_id: Option<Option<i64>>,
}

/// Filters for commitment listings, combined with AND semantics
#[derive(Debug, Clone, Default)]
pub struct CommitmentFilter {
    /// Only commitments of this project
    pub project_id: Option<i64>,

    /// Only commitments with this status
    pub status: Option<String>,

    /// Only commitments with this priority
    pub priority: Option<String>,

    /// Only commitments scheduled on this calendar day (UTC)
    pub date: Option<NaiveDate>,
}

const COMMITMENT_COLUMNS: &str = "id, title, description, date, start_time, end_time, location, \
                                  status, priority, reminder, project_id, created_at, updated_at";

impl Commitment {
    /// Creates a commitment, inserting initial participants in the same
    /// transaction
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the title is empty
    /// - `Conflict` if the participant list contains a duplicate pair
    pub async fn create(pool: &SqlitePool, data: CreateCommitment) -> StoreResult<CommitmentDetail> {
        if data.title.trim().is_empty() {
            return Err(StoreError::InvalidInput("Title is required".to_string()));
        }

        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let commitment = sqlx::query_as::<_, Commitment>(&format!(
            r#"
            INSERT INTO commitments (title, description, date, start_time, end_time, location,
                                     status, priority, reminder, project_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {COMMITMENT_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(data.location)
        .bind(data.status.unwrap_or_else(|| "scheduled".to_string()))
        .bind(data.priority.unwrap_or_else(|| "medium".to_string()))
        .bind(data.reminder)
        .bind(data.project_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for user_id in &data.participants {
            sqlx::query(
                "INSERT INTO commitment_participants (commitment_id, user_id, created_at) VALUES (?, ?, ?)",
            )
            .bind(commitment.id)
            .bind(user_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let detail = Self::find_by_id(pool, commitment.id).await?;
        detail.ok_or_else(|| StoreError::not_found("Commitment"))
    }

    /// Finds a commitment by ID with its project and participants
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> StoreResult<Option<CommitmentDetail>> {
        let commitment = sqlx::query_as::<_, Commitment>(&format!(
            "SELECT {COMMITMENT_COLUMNS} FROM commitments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match commitment {
            Some(commitment) => {
                let mut details = load_details(pool, vec![commitment]).await?;
                Ok(details.pop())
            }
            None => Ok(None),
        }
    }

    /// Lists commitments matching the filter, in agenda order
    ///
    /// The date filter matches the whole UTC calendar day as a half-open
    /// interval, so stored timestamps at any time of day qualify.
    pub async fn find_all(
        pool: &SqlitePool,
        filter: &CommitmentFilter,
    ) -> StoreResult<Vec<CommitmentDetail>> {
        let mut query = format!("SELECT {COMMITMENT_COLUMNS} FROM commitments WHERE 1 = 1");

        if filter.project_id.is_some() {
            query.push_str(" AND project_id = ?");
        }
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }
        if filter.priority.is_some() {
            query.push_str(" AND priority = ?");
        }
        let day_bounds = filter.date.map(day_bounds);
        if day_bounds.is_some() {
            query.push_str(" AND date >= ? AND date < ?");
        }
        query.push_str(" ORDER BY date ASC, start_time ASC, id ASC");

        let mut q = sqlx::query_as::<_, Commitment>(&query);
        if let Some(project_id) = filter.project_id {
            q = q.bind(project_id);
        }
        if let Some(status) = &filter.status {
            q = q.bind(status);
        }
        if let Some(priority) = &filter.priority {
            q = q.bind(priority);
        }
        if let Some((start, end)) = day_bounds {
            q = q.bind(start).bind(end);
        }

        let commitments = q.fetch_all(pool).await?;
        load_details(pool, commitments).await
    }

    /// Applies a partial update to a commitment
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn update(pool: &SqlitePool, id: i64, data: UpdateCommitment) -> StoreResult<Self> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM commitments WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Commitment"));
        }

        let mut query = String::from("UPDATE commitments SET updated_at = ?");

        let title = data.title.filter(|v| !v.is_empty());
        let start_time = data.start_time.filter(|v| !v.is_empty());
        let end_time = data.end_time.filter(|v| !v.is_empty());
        let status = data.status.filter(|v| !v.is_empty());
        let priority = data.priority.filter(|v| !v.is_empty());

        if title.is_some() {
            query.push_str(", title = ?");
        }
        if data.description.is_some() {
            query.push_str(", description = ?");
        }
        if data.date.is_some() {
            query.push_str(", date = ?");
        }
        if start_time.is_some() {
            query.push_str(", start_time = ?");
        }
        if end_time.is_some() {
            query.push_str(", end_time = ?");
        }
        if data.location.is_some() {
            query.push_str(", location = ?");
        }
        if status.is_some() {
            query.push_str(", status = ?");
        }
        if priority.is_some() {
            query.push_str(", priority = ?");
        }
        if data.reminder.is_some() {
            query.push_str(", reminder = ?");
        }
        if data.project_id.is_some() {
            query.push_str(", project_id = ?");
        }

        query.push_str(&format!(" WHERE id = ? RETURNING {COMMITMENT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Commitment>(&query).bind(Utc::now());
        if let Some(title) = title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(date) = data.date {
            q = q.bind(date);
        }
        if let Some(start_time) = start_time {
            q = q.bind(start_time);
        }
        if let Some(end_time) = end_time {
            q = q.bind(end_time);
        }
        if let Some(location) = data.location {
            q = q.bind(location);
        }
        if let Some(status) = status {
            q = q.bind(status);
        }
        if let Some(priority) = priority {
            q = q.bind(priority);
        }
        if let Some(reminder) = data.reminder {
            q = q.bind(reminder);
        }
        if let Some(project_id) = data.project_id {
            q = q.bind(project_id);
        }

        let commitment = q.bind(id).fetch_one(pool).await?;

        Ok(commitment)
    }

    /// Deletes a commitment and its participant rows in one transaction
    ///
    /// # Errors
    ///
    /// `NotFound` if the id does not resolve.
    pub async fn delete(pool: &SqlitePool, id: i64) -> StoreResult<()> {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT id FROM commitments WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found("Commitment"));
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM commitment_participants WHERE commitment_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM commitments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// UTC half-open bounds [midnight, next midnight) for a calendar day
fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Resolves projects and participants for a batch of commitments
async fn load_details(
    pool: &SqlitePool,
    commitments: Vec<Commitment>,
) -> StoreResult<Vec<CommitmentDetail>> {
    if commitments.is_empty() {
        return Ok(Vec::new());
    }

    let commitment_ids: Vec<i64> = commitments.iter().map(|c| c.id).collect();

    let query = format!(
        "SELECT id, commitment_id, user_id, created_at FROM commitment_participants \
         WHERE commitment_id IN ({}) ORDER BY id ASC",
        in_placeholders(commitment_ids.len())
    );
    let mut q = sqlx::query_as::<_, CommitmentParticipant>(&query);
    for id in &commitment_ids {
        q = q.bind(id);
    }
    let participant_rows = q.fetch_all(pool).await?;

    let mut project_ids: Vec<i64> = Vec::new();
    for c in &commitments {
        if let Some(project_id) = c.project_id {
            if !project_ids.contains(&project_id) {
                project_ids.push(project_id);
            }
        }
    }
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

    let mut user_ids: Vec<i64> = Vec::new();
    for p in &participant_rows {
        if !user_ids.contains(&p.user_id) {
            user_ids.push(p.user_id);
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

    let mut participants_by_commitment: HashMap<i64, Vec<ParticipantWithUser>> = HashMap::new();
    for participant in participant_rows {
        let user = users.get(&participant.user_id).cloned();
        participants_by_commitment
            .entry(participant.commitment_id)
            .or_default()
            .push(ParticipantWithUser { participant, user });
    }

    Ok(commitments
        .into_iter()
        .map(|commitment| {
            let project = commitment
                .project_id
                .and_then(|id| projects.get(&id).cloned());
            let participants = participants_by_commitment
                .remove(&commitment.id)
                .unwrap_or_default();
            CommitmentDetail {
                commitment,
                project,
                participants,
            }
        })
        .collect())
}
