//! The database context.
//!
//! A [`Database`] owns the catalog, buffer pool and log file of one running
//! database and is passed by reference to the components that need them.
//! Binaries open it with [`Database::open_or_exit`]; tests use
//! [`Database::for_testing`], which keeps its files in a temporary directory.

mod api;

pub use api::{Database, DatabaseConfig, DatabaseError, DatabaseResult, TestDatabase};
