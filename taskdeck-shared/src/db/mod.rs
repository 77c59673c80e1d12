/// Database access layer
///
/// - `pool`: SQLite connection pool creation and health checks
/// - `migrations`: embedded migration runner

pub mod migrations;
pub mod pool;

pub use migrations::run_migrations;
pub use pool::{create_pool, health_check, DatabaseConfig};
