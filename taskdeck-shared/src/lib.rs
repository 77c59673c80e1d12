//! # TaskDeck Shared Library
//!
//! This crate contains the data layer shared by the TaskDeck API server:
//! entity models with their integrity rules, the query/filter layer, and
//! the report aggregation engine.
//!
//! ## Module Organization
//!
//! - `models`: entity models, CRUD operations, and deletion protocols
//! - `report`: windowed statistics over the task set
//! - `db`: connection pool and migration runner
//! - `error`: the domain error type raised by the data layer

pub mod db;
pub mod error;
pub mod models;
pub mod report;

pub use error::StoreError;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
