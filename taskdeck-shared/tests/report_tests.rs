/// Integration tests for the report engine against a real database
///
/// The pure computation has its own unit tests; these verify the loading
/// wrapper sees stored rows the way the dashboard expects.
///
/// Run with: cargo test --test report_tests

use sqlx::SqlitePool;
use taskdeck_shared::db::migrations::run_migrations;
use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
use taskdeck_shared::models::task::{CreateTask, Task};
use taskdeck_shared::models::user::{CreateUser, User};
use taskdeck_shared::report::generate_report_stats;

async fn setup() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to migrate");
    pool
}

async fn seed_task(pool: &SqlitePool, status: &str, priority: &str, assignee_id: Option<i64>) {
    Task::create(
        pool,
        CreateTask {
            name: format!("{status} task"),
            status: Some(status.to_string()),
            priority: Some(priority.to_string()),
            assignee_id,
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create task");
}

#[tokio::test]
async fn test_report_over_empty_database() {
    let pool = setup().await;

    let stats = generate_report_stats(&pool, 30).await.unwrap();

    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.productivity, 0);
    assert_eq!(stats.bug_rate, 0.0);
    assert_eq!(stats.average_time, "0h");
    assert_eq!(stats.monthly_data.len(), 5);
    assert_eq!(stats.status_data.len(), 3);
    assert!(stats.team_performance.is_empty());
}

#[tokio::test]
async fn test_report_counts_stored_tasks() {
    let pool = setup().await;

    seed_task(&pool, "done", "medium", None).await;
    seed_task(&pool, "done", "medium", None).await;
    seed_task(&pool, "in_progress", "medium", None).await;
    seed_task(&pool, "todo", "high", None).await;

    let stats = generate_report_stats(&pool, 30).await.unwrap();

    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.completed_tasks, 2);
    assert_eq!(stats.in_progress_tasks, 1);
    assert_eq!(stats.todo_tasks, 1);
    assert_eq!(stats.productivity, 50);
    assert_eq!(stats.bug_rate, 25.0);

    // Freshly created tasks all land in the current month bucket
    assert_eq!(stats.monthly_data[4].tasks, 4);
    let earlier: i64 = stats.monthly_data[..4].iter().map(|m| m.tasks).sum();
    assert_eq!(earlier, 0);

    assert_eq!(stats.status_data[0].value, 2);
    assert_eq!(stats.status_data[1].value, 1);
    assert_eq!(stats.status_data[2].value, 1);
}

#[tokio::test]
async fn test_report_team_performance_from_stored_assignments() {
    let pool = setup().await;

    let ana = User::create(
        &pool,
        CreateUser {
            name: "Ana Souza".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret".to_string(),
        },
    )
    .await
    .unwrap();
    let idle = User::create(
        &pool,
        CreateUser {
            name: "Bruno Lima".to_string(),
            email: "bruno@example.com".to_string(),
            password: "secret".to_string(),
        },
    )
    .await
    .unwrap();

    seed_task(&pool, "done", "medium", Some(ana.id)).await;
    seed_task(&pool, "todo", "medium", Some(ana.id)).await;

    let stats = generate_report_stats(&pool, 30).await.unwrap();

    // Only members with assigned tasks show up
    assert_eq!(stats.team_performance.len(), 1);
    let ana_perf = &stats.team_performance[0];
    assert_eq!(ana_perf.name, "Ana Souza");
    assert_eq!(ana_perf.avatar, "AS");
    assert_eq!(ana_perf.tasks, 2);
    assert_eq!(ana_perf.completion, 50);

    assert!(!stats
        .team_performance
        .iter()
        .any(|m| m.name == idle.name));
}

#[tokio::test]
async fn test_report_window_excludes_old_tasks() {
    let pool = setup().await;

    seed_task(&pool, "todo", "medium", None).await;

    // Backdate the row beyond the window
    sqlx::query("UPDATE tasks SET created_at = datetime(created_at, '-60 days')")
        .execute(&pool)
        .await
        .unwrap();

    let stats = generate_report_stats(&pool, 30).await.unwrap();
    assert_eq!(stats.total_tasks, 0);
}
