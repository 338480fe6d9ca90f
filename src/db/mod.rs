//! Database layer
//!
//! Connection pool abstraction, code-based migrations, and repositories.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DatabasePool, DynDatabasePool};
