/// User model and database operations
///
/// Users own projects, get assigned tasks, and join projects, sprints, and
/// commitments through membership rows.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     email TEXT NOT NULL,
///     name TEXT NOT NULL,
///     password TEXT NOT NULL,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// CREATE UNIQUE INDEX idx_users_email ON users (LOWER(email));
/// ```
///
/// Email uniqueness is case-insensitive: `Ana@x.com` and `ana@x.com` are
/// the same address. The password is an opaque string here; it is never
/// serialized into responses.
///
/// # Example
///
/// ```no_run
/// use taskdeck_shared::models::user::{User, CreateUser};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Ana Souza".to_string(),
///     email: "ana@example.com".to_string(),
///     password: "secret".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ANA@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use crate::error::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID (store-assigned, increasing)
    pub id: i64,

    /// Email address, unique case-insensitively
    pub email: String,

    /// Display name
    pub name: String,

    /// Opaque credential string, never serialized
    #[serde(skip_serializing)]
    pub password: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Public read shape for a user, embedded in relations and listings
///
/// Carries everything except the credential.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Opaque credential string
    pub password: String,
}

/// Input for updating an existing user
///
/// All fields are optional; only supplied, non-empty values are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    /// New display name
    pub name: Option<String>,

    /// New email address (checked against the uniqueness invariant)
    pub email: Option<String>,

    /// New credential string
    pub password: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if name, email, or password is empty
    /// - `Conflict` ("Email already exists") if another user already holds
    ///   the email, compared case-insensitively
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> StoreResult<Self> {
        if data.name.trim().is_empty() {
            return Err(StoreError::InvalidInput("Name is required".to_string()));
        }
        if data.email.trim().is_empty() {
            return Err(StoreError::InvalidInput("Email is required".to_string()));
        }
        if data.password.is_empty() {
            return Err(StoreError::InvalidInput("Password is required".to_string()));
        }

        if Self::find_by_email(pool, &data.email).await?.is_some() {
            return Err(StoreError::Conflict("Email already exists".to_string()));
        }

        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, email, name, password, created_at, updated_at
            "#,
        )
        .bind(data.email)
        .bind(data.name)
        .bind(data.password)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> StoreResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address, case-insensitively
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> StoreResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, password, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER(?)
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users without their credentials
    pub async fn find_all(pool: &SqlitePool) -> StoreResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Applies a partial update to a user
    ///
    /// Fields left out of `data` keep their current values.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id does not resolve
    /// - `Conflict` ("Email already exists") if the new email belongs to a
    ///   different user
    pub async fn update(pool: &SqlitePool, id: i64, data: UpdateUser) -> StoreResult<Self> {
        let current = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| StoreError::not_found("User"))?;

        if let Some(email) = data.email.as_deref() {
            if !email.is_empty() && !email.eq_ignore_ascii_case(&current.email) {
                let taken = sqlx::query_as::<_, (i64,)>(
                    "SELECT id FROM users WHERE LOWER(email) = LOWER(?) AND id != ?",
                )
                .bind(email)
                .bind(id)
                .fetch_optional(pool)
                .await?;

                if taken.is_some() {
                    return Err(StoreError::Conflict("Email already exists".to_string()));
                }
            }
        }

        let mut query = String::from("UPDATE users SET updated_at = ?");

        let name = data.name.filter(|v| !v.is_empty());
        let email = data.email.filter(|v| !v.is_empty());
        let password = data.password.filter(|v| !v.is_empty());

        if name.is_some() {
            query.push_str(", name = ?");
        }
        if email.is_some() {
            query.push_str(", email = ?");
        }
        if password.is_some() {
            query.push_str(", password = ?");
        }

        query.push_str(
            " WHERE id = ? RETURNING id, email, name, password, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(Utc::now());
        if let Some(name) = name {
            q = q.bind(name);
        }
        if let Some(email) = email {
            q = q.bind(email);
        }
        if let Some(password) = password {
            q = q.bind(password);
        }

        let user = q.bind(id).fetch_one(pool).await?;

        Ok(user)
    }

    /// Deletes a user and applies the referential protocol
    ///
    /// In one transaction: the user's project, sprint, and commitment
    /// membership rows are removed; comments they authored are removed with
    /// an exact recount of each affected task's `comments` counter; their
    /// task assignments are nulled out; finally the user row goes away.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the id does not resolve
    /// - `Conflict` if the user still owns projects — ownership must be
    ///   reassigned (or the projects deleted) first
    pub async fn delete(pool: &SqlitePool, id: i64) -> StoreResult<()> {
        if Self::find_by_id(pool, id).await?.is_none() {
            return Err(StoreError::not_found("User"));
        }

        let (owned,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects WHERE owner_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
        if owned > 0 {
            return Err(StoreError::Conflict(
                "Cannot delete a user who still owns projects".to_string(),
            ));
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM project_members WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM sprint_members WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM commitment_participants WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // Capture the tasks whose counters must be recounted before the
        // authored comments disappear.
        let commented_tasks: Vec<(i64,)> =
            sqlx::query_as("SELECT DISTINCT task_id FROM task_comments WHERE author_id = ?")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM task_comments WHERE author_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (task_id,) in commented_tasks {
            sqlx::query(
                r#"
                UPDATE tasks
                SET comments = (SELECT COUNT(*) FROM task_comments WHERE task_id = ?)
                WHERE id = ?
                "#,
            )
            .bind(task_id)
            .bind(task_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE tasks SET assignee_id = NULL WHERE assignee_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_password_is_not_serialized() {
        let user = User {
            id: 1,
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            password: "secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ana@example.com");
    }

    #[test]
    fn test_update_user_default_is_empty() {
        let update = UpdateUser::default();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
        assert!(update.password.is_none());
    }
}
