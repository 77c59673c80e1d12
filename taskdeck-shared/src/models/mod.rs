/// Database models for TaskDeck
///
/// This module contains all entity models and their CRUD operations. Each
/// model owns its integrity rules: required-field validation on create,
/// partial-field merges on update, and the explicit cascade / set-null
/// protocol executed transactionally on delete.
///
/// # Models
///
/// - `user`: accounts, unique email, owner of projects
/// - `project`: top-level container with members, tags, sprints, tasks
/// - `project_member` / `sprint_member` / `commitment_participant`:
///   many-to-many join rows, unique per (parent, user)
/// - `project_tag`: labels attached to a project
/// - `sprint`: time-boxed iteration inside a project
/// - `task`: the unit of work the report engine aggregates over
/// - `task_comment`: discussion rows that drive the task comment counter
/// - `commitment`: scheduled agenda entries
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
/// # Ok(())
/// # }
/// ```

pub mod commitment;
pub mod commitment_participant;
pub mod project;
pub mod project_member;
pub mod project_tag;
pub mod sprint;
pub mod sprint_member;
pub mod task;
pub mod task_comment;
pub mod user;

/// Builds a `?, ?, …` placeholder list for dynamic `IN (…)` clauses
pub(crate) fn in_placeholders(len: usize) -> String {
    vec!["?"; len].join(", ")
}

/// Deserializer for clearable fields on update inputs
///
/// A plain `Option<Option<T>>` collapses an explicit JSON `null` into the
/// outer `None`, making "clear this field" indistinguishable from "leave it
/// alone". Paired with `#[serde(default)]`, this keeps the distinction:
/// absent stays `None`, `null` becomes `Some(None)`.
pub(crate) fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    <Option<T> as serde::Deserialize>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_placeholders() {
        assert_eq!(in_placeholders(1), "?");
        assert_eq!(in_placeholders(3), "?, ?, ?");
    }
}
