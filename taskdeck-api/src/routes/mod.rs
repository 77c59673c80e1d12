/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login)
/// - `users`: User CRUD
/// - `projects`: Project CRUD, members, tags
/// - `tasks`: Task CRUD and nested comments
/// - `sprints`: Sprint CRUD and members
/// - `commitments`: Commitment CRUD and participants
/// - `reports`: Aggregated dashboard statistics

pub mod auth;
pub mod commitments;
pub mod health;
pub mod projects;
pub mod reports;
pub mod sprints;
pub mod tasks;
pub mod users;
