/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::AppState, config::Config};
/// use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     max_connections: config.database.max_connections,
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = taskdeck_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /users/                      # CRUD
///     ├── /projects/                   # CRUD + filter ?tag=
///     │   ├── POST   /:id/members
///     │   ├── DELETE /:id/members/:user_id
///     │   ├── POST   /:id/tags
///     │   └── DELETE /:id/tags/:tag_id
///     ├── /tasks/                      # CRUD + filters
///     │   ├── GET    /:id/comments
///     │   ├── POST   /:id/comments
///     │   ├── PATCH  /:id/comments/:comment_id
///     │   └── DELETE /:id/comments/:comment_id
///     ├── /sprints/                    # CRUD + filters
///     │   ├── POST   /:id/members
///     │   └── DELETE /:id/members/:user_id
///     ├── /commitments/                # CRUD + filters
///     │   ├── POST   /:id/participants
///     │   └── DELETE /:id/participants/:user_id
///     └── /reports/
///         └── GET /stats?days=N
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/", post(routes::users::create_user))
        .route("/:id", get(routes::users::get_user))
        .route("/:id", patch(routes::users::update_user))
        .route("/:id", delete(routes::users::delete_user));

    let project_routes = Router::new()
        .route("/", get(routes::projects::list_projects))
        .route("/", post(routes::projects::create_project))
        .route("/:id", get(routes::projects::get_project))
        .route("/:id", patch(routes::projects::update_project))
        .route("/:id", delete(routes::projects::delete_project))
        .route("/:id/members", post(routes::projects::add_member))
        .route("/:id/members/:user_id", delete(routes::projects::remove_member))
        .route("/:id/tags", post(routes::projects::add_tag))
        .route("/:id/tags/:tag_id", delete(routes::projects::remove_tag));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/", post(routes::tasks::create_task))
        .route("/:id", get(routes::tasks::get_task))
        .route("/:id", patch(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .route("/:id/comments", get(routes::tasks::list_comments))
        .route("/:id/comments", post(routes::tasks::create_comment))
        .route("/:id/comments/:comment_id", patch(routes::tasks::update_comment))
        .route("/:id/comments/:comment_id", delete(routes::tasks::delete_comment));

    let sprint_routes = Router::new()
        .route("/", get(routes::sprints::list_sprints))
        .route("/", post(routes::sprints::create_sprint))
        .route("/:id", get(routes::sprints::get_sprint))
        .route("/:id", patch(routes::sprints::update_sprint))
        .route("/:id", delete(routes::sprints::delete_sprint))
        .route("/:id/members", post(routes::sprints::add_member))
        .route("/:id/members/:user_id", delete(routes::sprints::remove_member));

    let commitment_routes = Router::new()
        .route("/", get(routes::commitments::list_commitments))
        .route("/", post(routes::commitments::create_commitment))
        .route("/:id", get(routes::commitments::get_commitment))
        .route("/:id", patch(routes::commitments::update_commitment))
        .route("/:id", delete(routes::commitments::delete_commitment))
        .route("/:id/participants", post(routes::commitments::add_participant))
        .route(
            "/:id/participants/:user_id",
            delete(routes::commitments::remove_participant),
        );

    let report_routes = Router::new().route("/stats", get(routes::reports::report_stats));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/projects", project_routes)
        .nest("/tasks", task_routes)
        .nest("/sprints", sprint_routes)
        .nest("/commitments", commitment_routes)
        .nest("/reports", report_routes);

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
