//! Database layer
//!
//! SQLite persistence for MentorBridge. The pool is created once at startup
//! with an explicit connect step, migrations run before any request is
//! served, and repositories wrap all SQL.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, ping};
