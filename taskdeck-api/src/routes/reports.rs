/// Report endpoints
///
/// # Endpoints
///
/// - `GET /v1/reports/stats?days=N` - Aggregated dashboard statistics over
///   a trailing window (default 30 days)
///
/// # Response
///
/// ```json
/// {
///   "totalTasks": 12,
///   "completedTasks": 5,
///   "inProgressTasks": 3,
///   "todoTasks": 4,
///   "productivity": 42,
///   "averageTime": "2.5d",
///   "bugRate": 8.3,
///   "monthlyData": [{ "month": "Jun", "tasks": 12 }],
///   "statusData": [{ "name": "Concluído", "value": 5, "color": "#10B981" }],
///   "teamPerformance": [{ "name": "Ana", "avatar": "AN", "tasks": 6, "completion": 50 }]
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use taskdeck_shared::report::{generate_report_stats, ReportStats};

/// Query parameters for report generation
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Trailing window in days (default 30)
    pub days: Option<i64>,
}

/// Computes dashboard statistics over the trailing window
pub async fn report_stats(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<ReportStats>> {
    let days = query.days.unwrap_or(30);
    let stats = generate_report_stats(&state.db, days).await?;
    Ok(Json(stats))
}
