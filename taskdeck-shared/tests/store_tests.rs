/// Integration tests for the model layer
///
/// Each test runs against its own in-memory SQLite database with the full
/// schema applied, so tests are hermetic and can run in parallel.
///
/// Run with: cargo test --test store_tests

use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;
use taskdeck_shared::db::migrations::run_migrations;
use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
use taskdeck_shared::models::commitment::{Commitment, CommitmentFilter, CreateCommitment};
use taskdeck_shared::models::commitment_participant::CommitmentParticipant;
use taskdeck_shared::models::project::{CreateProject, Project, ProjectFilter, UpdateProject};
use taskdeck_shared::models::project_member::ProjectMember;
use taskdeck_shared::models::project_tag::{CreateProjectTag, ProjectTag};
use taskdeck_shared::models::sprint::{CreateSprint, Sprint, SprintFilter};
use taskdeck_shared::models::sprint_member::SprintMember;
use taskdeck_shared::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use taskdeck_shared::models::task_comment::{CreateTaskComment, TaskComment, UpdateTaskComment};
use taskdeck_shared::models::user::{CreateUser, UpdateUser, User};
use taskdeck_shared::StoreError;

/// Fresh in-memory database with the schema applied
async fn setup() -> SqlitePool {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to migrate");
    pool
}

async fn seed_user(pool: &SqlitePool, name: &str, email: &str) -> User {
    User::create(
        pool,
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        },
    )
    .await
    .expect("Failed to create user")
}

async fn seed_project(pool: &SqlitePool, owner_id: i64) -> Project {
    Project::create(
        pool,
        CreateProject {
            name: "Test Project".to_string(),
            owner_id,
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create project")
    .project
}

async fn seed_task(pool: &SqlitePool, project_id: Option<i64>) -> Task {
    Task::create(
        pool,
        CreateTask {
            name: "Test Task".to_string(),
            project_id,
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create task")
}

// --- users ---

#[tokio::test]
async fn test_user_create_assigns_fresh_increasing_ids() {
    let pool = setup().await;

    let a = seed_user(&pool, "Ana", "ana@example.com").await;
    let b = seed_user(&pool, "Bruno", "bruno@example.com").await;
    assert!(b.id > a.id);

    // Deleting the latest user does not recycle its id
    User::delete(&pool, b.id).await.unwrap();
    let c = seed_user(&pool, "Clara", "clara@example.com").await;
    assert!(c.id > b.id);
}

#[tokio::test]
async fn test_user_email_conflict_is_case_insensitive() {
    let pool = setup().await;
    seed_user(&pool, "Ana", "ana@example.com").await;

    let result = User::create(
        &pool,
        CreateUser {
            name: "Other".to_string(),
            email: "ANA@Example.com".to_string(),
            password: "secret".to_string(),
        },
    )
    .await;

    match result {
        Err(StoreError::Conflict(msg)) => assert_eq!(msg, "Email already exists"),
        other => panic!("Expected conflict, got {:?}", other.map(|u| u.id)),
    }
}

#[tokio::test]
async fn test_user_update_rejects_taken_email() {
    let pool = setup().await;
    seed_user(&pool, "Ana", "ana@example.com").await;
    let bruno = seed_user(&pool, "Bruno", "bruno@example.com").await;

    let result = User::update(
        &pool,
        bruno.id,
        UpdateUser {
            email: Some("Ana@example.com".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));

    // Re-submitting your own email in a different case is not a conflict
    let updated = User::update(
        &pool,
        bruno.id,
        UpdateUser {
            email: Some("BRUNO@example.com".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.email, "BRUNO@example.com");
}

#[tokio::test]
async fn test_user_update_ignores_empty_strings() {
    let pool = setup().await;
    let user = seed_user(&pool, "Ana", "ana@example.com").await;

    let updated = User::update(
        &pool,
        user.id,
        UpdateUser {
            name: Some(String::new()),
            email: None,
            password: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.name, "Ana");
}

#[tokio::test]
async fn test_user_delete_blocked_while_owning_projects() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    seed_project(&pool, owner.id).await;

    let result = User::delete(&pool, owner.id).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
    assert!(User::find_by_id(&pool, owner.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_user_delete_cascades_memberships_and_unassigns_tasks() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    ProjectMember::add(&pool, project.id, member.id).await.unwrap();
    let task = Task::create(
        &pool,
        CreateTask {
            name: "Assigned".to_string(),
            project_id: Some(project.id),
            assignee_id: Some(member.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    // Member authors a comment, then disappears
    TaskComment::create(
        &pool,
        task.id,
        CreateTaskComment {
            content: "hello".to_string(),
            author_id: member.id,
        },
    )
    .await
    .unwrap();
    TaskComment::create(
        &pool,
        task.id,
        CreateTaskComment {
            content: "still here".to_string(),
            author_id: owner.id,
        },
    )
    .await
    .unwrap();

    User::delete(&pool, member.id).await.unwrap();

    let members = ProjectMember::find_by_project(&pool, project.id).await.unwrap();
    assert!(members.is_empty());

    // Task survives, unassigned, with only the surviving comment counted
    let detail = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(detail.task.assignee_id, None);
    assert_eq!(detail.task.comments, 1);

    let comments = TaskComment::find_by_task(&pool, task.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].comment.author_id, owner.id);
}

// --- project members ---

#[tokio::test]
async fn test_duplicate_project_member_conflicts() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    ProjectMember::add(&pool, project.id, member.id).await.unwrap();
    let result = ProjectMember::add(&pool, project.id, member.id).await;

    match result {
        Err(StoreError::Conflict(msg)) => {
            assert_eq!(msg, "User is already a member of this project");
        }
        other => panic!("Expected conflict, got {:?}", other.map(|m| m.id)),
    }
}

#[tokio::test]
async fn test_remove_missing_project_member_not_found() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    let result = ProjectMember::remove(&pool, project.id, 999).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_member_can_rejoin_after_removal() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    ProjectMember::add(&pool, project.id, member.id).await.unwrap();
    ProjectMember::remove(&pool, project.id, member.id).await.unwrap();
    ProjectMember::add(&pool, project.id, member.id).await.unwrap();

    let members = ProjectMember::find_by_project(&pool, project.id).await.unwrap();
    assert_eq!(members.len(), 1);
}

// --- projects ---

#[tokio::test]
async fn test_project_create_with_members_and_defaults() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;

    let detail = Project::create(
        &pool,
        CreateProject {
            name: "Launch".to_string(),
            owner_id: owner.id,
            members: vec![member.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(detail.project.status, "starting");
    assert_eq!(detail.project.color, "#3B82F6");
    assert_eq!(detail.project.description, "");
    assert_eq!(detail.members.len(), 1);
    assert_eq!(detail.members[0].member.user_id, member.id);
    assert_eq!(detail.owner.as_ref().unwrap().id, owner.id);
}

#[tokio::test]
async fn test_project_filter_by_tag_name() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let tagged = seed_project(&pool, owner.id).await;
    let _plain = seed_project(&pool, owner.id).await;

    ProjectTag::create(
        &pool,
        tagged.id,
        CreateProjectTag {
            name: "frontend".to_string(),
            color: None,
        },
    )
    .await
    .unwrap();

    let found = Project::find_all(
        &pool,
        &ProjectFilter {
            tag: Some("frontend".to_string()),
        },
    )
    .await
    .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].project.id, tagged.id);
    assert_eq!(found[0].tags[0].name, "frontend");
    assert_eq!(found[0].tags[0].color, "#3B82F6");
}

#[tokio::test]
async fn test_project_update_clears_due_date() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let project = Project::create(
        &pool,
        CreateProject {
            name: "Dated".to_string(),
            owner_id: owner.id,
            due_date: Some(Utc::now() + Duration::days(7)),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .project;
    assert!(project.due_date.is_some());

    let updated = Project::update(
        &pool,
        project.id,
        UpdateProject {
            due_date: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(updated.due_date.is_none());
}

#[tokio::test]
async fn test_project_delete_protocol() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    ProjectMember::add(&pool, project.id, member.id).await.unwrap();
    ProjectTag::create(
        &pool,
        project.id,
        CreateProjectTag {
            name: "backend".to_string(),
            color: None,
        },
    )
    .await
    .unwrap();

    let sprint = Sprint::create(
        &pool,
        CreateSprint {
            name: "Sprint 1".to_string(),
            status: None,
            start_date: Utc::now(),
            end_date: Utc::now() + Duration::days(14),
            project_id: project.id,
            members: vec![member.id],
        },
    )
    .await
    .unwrap()
    .sprint;

    let task = Task::create(
        &pool,
        CreateTask {
            name: "In sprint".to_string(),
            project_id: Some(project.id),
            sprint_id: Some(sprint.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let commitment = Commitment::create(
        &pool,
        CreateCommitment {
            title: "Kickoff".to_string(),
            date: Utc::now(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            project_id: Some(project.id),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .commitment;

    Project::delete(&pool, project.id).await.unwrap();

    assert!(Project::find_by_id(&pool, project.id).await.unwrap().is_none());
    assert!(Sprint::find_by_id(&pool, sprint.id).await.unwrap().is_none());

    // Task and commitment survive with their links nulled
    let task = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(task.task.project_id, None);
    assert_eq!(task.task.sprint_id, None);

    let commitment = Commitment::find_by_id(&pool, commitment.id).await.unwrap().unwrap();
    assert_eq!(commitment.commitment.project_id, None);

    // Join rows are gone
    let (members,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_members")
        .fetch_one(&pool)
        .await
        .unwrap();
    let (tags,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_tags")
        .fetch_one(&pool)
        .await
        .unwrap();
    let (sprint_members,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sprint_members")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!((members, tags, sprint_members), (0, 0, 0));
}

// --- sprints ---

#[tokio::test]
async fn test_sprint_create_with_members_and_listing_order() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    let older = Sprint::create(
        &pool,
        CreateSprint {
            name: "Sprint 1".to_string(),
            status: None,
            start_date: Utc::now() - Duration::days(28),
            end_date: Utc::now() - Duration::days(14),
            project_id: project.id,
            members: vec![member.id],
        },
    )
    .await
    .unwrap();
    assert_eq!(older.sprint.status, "active");
    assert_eq!(older.members.len(), 1);

    let newer = Sprint::create(
        &pool,
        CreateSprint {
            name: "Sprint 2".to_string(),
            status: None,
            start_date: Utc::now(),
            end_date: Utc::now() + Duration::days(14),
            project_id: project.id,
            members: vec![],
        },
    )
    .await
    .unwrap();

    let sprints = Sprint::find_all(
        &pool,
        &SprintFilter {
            project_id: Some(project.id),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(sprints.len(), 2);
    assert_eq!(sprints[0].sprint.id, newer.sprint.id);
    assert_eq!(sprints[1].sprint.id, older.sprint.id);
}

#[tokio::test]
async fn test_sprint_delete_unlinks_tasks() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    let sprint = Sprint::create(
        &pool,
        CreateSprint {
            name: "Sprint".to_string(),
            status: None,
            start_date: Utc::now(),
            end_date: Utc::now() + Duration::days(14),
            project_id: project.id,
            members: vec![member.id],
        },
    )
    .await
    .unwrap()
    .sprint;

    let task = Task::create(
        &pool,
        CreateTask {
            name: "Scheduled".to_string(),
            sprint_id: Some(sprint.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    Sprint::delete(&pool, sprint.id).await.unwrap();

    let task = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(task.task.sprint_id, None);

    let result = SprintMember::remove(&pool, sprint.id, member.id).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_sprint_member_conflicts() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let member = seed_user(&pool, "Bruno", "bruno@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    let sprint = Sprint::create(
        &pool,
        CreateSprint {
            name: "Sprint".to_string(),
            status: None,
            start_date: Utc::now(),
            end_date: Utc::now(),
            project_id: project.id,
            members: vec![member.id],
        },
    )
    .await
    .unwrap()
    .sprint;

    let result = SprintMember::add(&pool, sprint.id, member.id).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
}

// --- tasks ---

#[tokio::test]
async fn test_task_create_defaults_and_validation() {
    let pool = setup().await;

    let task = seed_task(&pool, None).await;
    assert_eq!(task.status, "todo");
    assert_eq!(task.priority, "medium");
    assert_eq!(task.comments, 0);
    assert_eq!(task.attachments, 0);

    let result = Task::create(
        &pool,
        CreateTask {
            name: "   ".to_string(),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(StoreError::InvalidInput(_))));
}

#[tokio::test]
async fn test_task_filters_combine_with_and() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let project = seed_project(&pool, owner.id).await;

    Task::create(
        &pool,
        CreateTask {
            name: "Match".to_string(),
            project_id: Some(project.id),
            status: Some("in_progress".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    Task::create(
        &pool,
        CreateTask {
            name: "Wrong status".to_string(),
            project_id: Some(project.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    Task::create(
        &pool,
        CreateTask {
            name: "Wrong project".to_string(),
            status: Some("in_progress".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let found = Task::find_all(
        &pool,
        &TaskFilter {
            project_id: Some(project.id),
            status: Some("in_progress".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].task.name, "Match");
}

#[tokio::test]
async fn test_task_update_clears_nullable_links() {
    let pool = setup().await;
    let owner = seed_user(&pool, "Ana", "ana@example.com").await;
    let project = seed_project(&pool, owner.id).await;
    let task = Task::create(
        &pool,
        CreateTask {
            name: "Linked".to_string(),
            project_id: Some(project.id),
            assignee_id: Some(owner.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let updated = Task::update(
        &pool,
        task.id,
        UpdateTask {
            assignee_id: Some(None),
            status: Some("done".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.assignee_id, None);
    assert_eq!(updated.project_id, Some(project.id));
    assert_eq!(updated.status, "done");
}

#[tokio::test]
async fn test_task_not_found_errors() {
    let pool = setup().await;

    assert!(Task::find_by_id(&pool, 999).await.unwrap().is_none());
    assert!(matches!(
        Task::update(&pool, 999, UpdateTask::default()).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        Task::delete(&pool, 999).await,
        Err(StoreError::NotFound(_))
    ));
}

// --- comments ---

#[tokio::test]
async fn test_comment_counter_tracks_rows() {
    let pool = setup().await;
    let author = seed_user(&pool, "Ana", "ana@example.com").await;
    let task = seed_task(&pool, None).await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let comment = TaskComment::create(
            &pool,
            task.id,
            CreateTaskComment {
                content: format!("comment {i}"),
                author_id: author.id,
            },
        )
        .await
        .unwrap();
        ids.push(comment.id);
    }

    let detail = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(detail.task.comments, 3);

    TaskComment::delete(&pool, ids[1]).await.unwrap();

    let detail = Task::find_by_id(&pool, task.id).await.unwrap().unwrap();
    assert_eq!(detail.task.comments, 2);

    let comments = TaskComment::find_by_task(&pool, task.id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].author.as_ref().unwrap().name, "Ana");
}

#[tokio::test]
async fn test_comment_on_missing_task_not_found() {
    let pool = setup().await;
    let author = seed_user(&pool, "Ana", "ana@example.com").await;

    let result = TaskComment::create(
        &pool,
        999,
        CreateTaskComment {
            content: "lost".to_string(),
            author_id: author.id,
        },
    )
    .await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_comment_empty_content_rejected() {
    let pool = setup().await;
    let author = seed_user(&pool, "Ana", "ana@example.com").await;
    let task = seed_task(&pool, None).await;

    let result = TaskComment::create(
        &pool,
        task.id,
        CreateTaskComment {
            content: "  ".to_string(),
            author_id: author.id,
        },
    )
    .await;
    assert!(matches!(result, Err(StoreError::InvalidInput(_))));
}

#[tokio::test]
async fn test_comment_update_content() {
    let pool = setup().await;
    let author = seed_user(&pool, "Ana", "ana@example.com").await;
    let task = seed_task(&pool, None).await;

    let comment = TaskComment::create(
        &pool,
        task.id,
        CreateTaskComment {
            content: "draft".to_string(),
            author_id: author.id,
        },
    )
    .await
    .unwrap();

    let updated = TaskComment::update(
        &pool,
        comment.id,
        UpdateTaskComment {
            content: Some("final".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.content, "final");
}

#[tokio::test]
async fn test_task_delete_removes_comments() {
    let pool = setup().await;
    let author = seed_user(&pool, "Ana", "ana@example.com").await;
    let task = seed_task(&pool, None).await;

    TaskComment::create(
        &pool,
        task.id,
        CreateTaskComment {
            content: "doomed".to_string(),
            author_id: author.id,
        },
    )
    .await
    .unwrap();

    Task::delete(&pool, task.id).await.unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_comments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

// --- commitments ---

#[tokio::test]
async fn test_commitment_create_with_participants() {
    let pool = setup().await;
    let a = seed_user(&pool, "Ana", "ana@example.com").await;
    let b = seed_user(&pool, "Bruno", "bruno@example.com").await;

    let detail = Commitment::create(
        &pool,
        CreateCommitment {
            title: "Planning".to_string(),
            date: Utc::now(),
            start_time: "10:00".to_string(),
            end_time: "11:00".to_string(),
            participants: vec![a.id, b.id],
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(detail.commitment.status, "scheduled");
    assert_eq!(detail.commitment.priority, "medium");
    assert_eq!(detail.participants.len(), 2);
}

#[tokio::test]
async fn test_commitment_date_filter_matches_whole_day() {
    let pool = setup().await;

    let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let on_day = day.and_hms_opt(15, 30, 0).unwrap().and_utc();
    let next_day = day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();

    Commitment::create(
        &pool,
        CreateCommitment {
            title: "On the day".to_string(),
            date: on_day,
            start_time: "15:30".to_string(),
            end_time: "16:00".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    Commitment::create(
        &pool,
        CreateCommitment {
            title: "Midnight after".to_string(),
            date: next_day,
            start_time: "00:00".to_string(),
            end_time: "01:00".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let found = Commitment::find_all(
        &pool,
        &CommitmentFilter {
            date: Some(day),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].commitment.title, "On the day");
}

#[tokio::test]
async fn test_commitments_listed_in_agenda_order() {
    let pool = setup().await;

    let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let date = day.and_hms_opt(0, 0, 0).unwrap().and_utc();

    Commitment::create(
        &pool,
        CreateCommitment {
            title: "Afternoon".to_string(),
            date,
            start_time: "14:00".to_string(),
            end_time: "15:00".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    Commitment::create(
        &pool,
        CreateCommitment {
            title: "Morning".to_string(),
            date,
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let found = Commitment::find_all(&pool, &CommitmentFilter::default()).await.unwrap();
    assert_eq!(found[0].commitment.title, "Morning");
    assert_eq!(found[1].commitment.title, "Afternoon");
}

#[tokio::test]
async fn test_commitment_delete_cascades_participants() {
    let pool = setup().await;
    let user = seed_user(&pool, "Ana", "ana@example.com").await;

    let commitment = Commitment::create(
        &pool,
        CreateCommitment {
            title: "Standup".to_string(),
            date: Utc::now(),
            start_time: "09:00".to_string(),
            end_time: "09:15".to_string(),
            participants: vec![user.id],
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .commitment;

    Commitment::delete(&pool, commitment.id).await.unwrap();

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM commitment_participants")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_duplicate_commitment_participant_conflicts() {
    let pool = setup().await;
    let user = seed_user(&pool, "Ana", "ana@example.com").await;

    let commitment = Commitment::create(
        &pool,
        CreateCommitment {
            title: "Review".to_string(),
            date: Utc::now(),
            start_time: "11:00".to_string(),
            end_time: "12:00".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .commitment;

    CommitmentParticipant::add(&pool, commitment.id, user.id).await.unwrap();
    let result = CommitmentParticipant::add(&pool, commitment.id, user.id).await;
    assert!(matches!(result, Err(StoreError::Conflict(_))));
}
