/// Report aggregation engine
///
/// Builds dashboard statistics over the task set for a trailing window of
/// `days` days: status counts, productivity and bug percentages, average
/// completion time, a five-month creation histogram, and per-member
/// performance. The computation is a pure function over in-memory rows so
/// it can be exercised without a database; `generate_report_stats` is the
/// loading wrapper.

use crate::error::StoreResult;
use crate::models::task::Task;
use crate::models::user::UserSummary;
use chrono::{DateTime, Datelike, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Month labels used in the histogram
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// How many trailing months the histogram covers
const HISTOGRAM_MONTHS: i32 = 5;

/// Aggregated dashboard statistics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    /// Tasks created inside the window
    pub total_tasks: i64,

    /// Tasks with a completed status
    pub completed_tasks: i64,

    /// Tasks currently in progress
    pub in_progress_tasks: i64,

    /// Tasks not yet started
    pub todo_tasks: i64,

    /// Completed share of the window, rounded percent
    pub productivity: i64,

    /// Average days from creation to completion, "4.2d", or "0h" when no
    /// completed task qualifies
    pub average_time: String,

    /// Share of unfinished high-priority tasks, percent with one decimal
    pub bug_rate: f64,

    /// Task creation histogram over the trailing months
    pub monthly_data: Vec<MonthlyTasks>,

    /// Status breakdown for the pie chart
    pub status_data: Vec<StatusSlice>,

    /// Top members by task volume inside the window
    pub team_performance: Vec<MemberPerformance>,
}

/// One histogram bucket
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTasks {
    /// Month label
    pub month: String,

    /// Tasks created in that month
    pub tasks: i64,
}

/// One pie-chart slice
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSlice {
    /// Slice label
    pub name: String,

    /// Task count
    pub value: i64,

    /// Display color
    pub color: String,
}

/// One team member's window performance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPerformance {
    /// Member name
    pub name: String,

    /// Two-letter initials for the avatar
    pub avatar: String,

    /// Tasks assigned inside the window
    pub tasks: i64,

    /// Completed share of those tasks, rounded percent
    pub completion: i64,
}

/// Loads tasks and users and computes the report for a trailing window
pub async fn generate_report_stats(pool: &SqlitePool, days: i64) -> StoreResult<ReportStats> {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, name, description, status, priority, due_date, comments, attachments, \
         project_id, assignee_id, sprint_id, created_at, updated_at \
         FROM tasks ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    let users = sqlx::query_as::<_, UserSummary>(
        "SELECT id, name, email, created_at, updated_at FROM users ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(compute_report_stats(&tasks, &users, days, Utc::now()))
}

/// Computes the report over in-memory rows
///
/// Only tasks created at or after `now - days` participate; the histogram
/// additionally ignores tasks outside its trailing month buckets.
pub fn compute_report_stats(
    tasks: &[Task],
    users: &[UserSummary],
    days: i64,
    now: DateTime<Utc>,
) -> ReportStats {
    let window_start = now - Duration::days(days);
    let filtered: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.created_at >= window_start)
        .collect();

    let total_tasks = filtered.len() as i64;
    let completed_tasks = filtered.iter().filter(|t| is_completed(t)).count() as i64;
    let in_progress_tasks = filtered
        .iter()
        .filter(|t| t.status == "in_progress" || t.status == "progress")
        .count() as i64;
    let todo_tasks = filtered
        .iter()
        .filter(|t| t.status == "todo" || t.status == "pending")
        .count() as i64;

    let productivity = if total_tasks > 0 {
        ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as i64
    } else {
        0
    };

    // Average completion time only counts tasks finished as "done" with a
    // positive creation-to-update delta
    let mut total_days = 0.0;
    let mut counted = 0;
    for task in &filtered {
        if task.status == "done" {
            let delta = task.updated_at - task.created_at;
            let days = delta.num_milliseconds() as f64 / 86_400_000.0;
            if days > 0.0 {
                total_days += days;
                counted += 1;
            }
        }
    }
    let avg_days = if counted > 0 {
        total_days / counted as f64
    } else {
        0.0
    };
    let average_time = if avg_days > 0.0 {
        format!("{avg_days:.1}d")
    } else {
        "0h".to_string()
    };

    let bug_tasks = filtered
        .iter()
        .filter(|t| t.priority == "high" && !is_completed(t))
        .count() as i64;
    let bug_rate = if total_tasks > 0 {
        ((bug_tasks as f64 / total_tasks as f64) * 1000.0).round() / 10.0
    } else {
        0.0
    };

    let monthly_data = monthly_histogram(&filtered, now);

    let status_data = vec![
        StatusSlice {
            name: "Concluído".to_string(),
            value: completed_tasks,
            color: "#10B981".to_string(),
        },
        StatusSlice {
            name: "Em Progresso".to_string(),
            value: in_progress_tasks,
            color: "#F59E0B".to_string(),
        },
        StatusSlice {
            name: "A Fazer".to_string(),
            value: todo_tasks,
            color: "#6B7280".to_string(),
        },
    ];

    let team_performance = team_performance(&filtered, users);

    ReportStats {
        total_tasks,
        completed_tasks,
        in_progress_tasks,
        todo_tasks,
        productivity,
        average_time,
        bug_rate,
        monthly_data,
        status_data,
        team_performance,
    }
}

fn is_completed(task: &Task) -> bool {
    task.status == "done" || task.status == "completed"
}

/// Buckets task creation counts into the trailing months ending at `now`
fn monthly_histogram(tasks: &[&Task], now: DateTime<Utc>) -> Vec<MonthlyTasks> {
    // Buckets keyed by (year, zero-based month), oldest first
    let mut keys: Vec<(i32, u32)> = Vec::new();
    for back in (0..HISTOGRAM_MONTHS).rev() {
        keys.push(shift_months(now.year(), now.month0(), back));
    }

    let mut counts: HashMap<(i32, u32), i64> = keys.iter().map(|k| (*k, 0)).collect();
    for task in tasks {
        let key = (task.created_at.year(), task.created_at.month0());
        if let Some(count) = counts.get_mut(&key) {
            *count += 1;
        }
    }

    keys.into_iter()
        .map(|key| MonthlyTasks {
            month: MONTH_LABELS[key.1 as usize].to_string(),
            tasks: counts[&key],
        })
        .collect()
}

/// Moves a (year, zero-based month) pair back by `back` months
fn shift_months(year: i32, month0: u32, back: i32) -> (i32, u32) {
    let total = year * 12 + month0 as i32 - back;
    (total.div_euclid(12), total.rem_euclid(12) as u32)
}

/// Ranks members by assigned task volume, keeping the top four
fn team_performance(tasks: &[&Task], users: &[UserSummary]) -> Vec<MemberPerformance> {
    let mut stats: HashMap<i64, (i64, i64)> = HashMap::new();
    for task in tasks {
        if let Some(assignee_id) = task.assignee_id {
            let entry = stats.entry(assignee_id).or_insert((0, 0));
            entry.0 += 1;
            if is_completed(task) {
                entry.1 += 1;
            }
        }
    }

    let mut performance: Vec<MemberPerformance> = users
        .iter()
        .filter_map(|user| {
            let (total, completed) = stats.get(&user.id).copied()?;
            if total == 0 {
                return None;
            }
            Some(MemberPerformance {
                name: user.name.clone(),
                avatar: initials(&user.name),
                tasks: total,
                completion: ((completed as f64 / total as f64) * 100.0).round() as i64,
            })
        })
        .collect();

    // Stable sort keeps user order on ties
    performance.sort_by(|a, b| b.tasks.cmp(&a.tasks));
    performance.truncate(4);
    performance
}

/// First letters of the first two words, uppercased
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(|c| c.to_uppercase())
        .take(2)
        .collect()
}
