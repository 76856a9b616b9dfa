//! Business rules for keeper lists and tasks.
//!
//! This crate holds the only real decision logic in the system: ownership
//! enforcement, input normalization, the list-membership check for tasks,
//! and translation of storage-level constraint violations into typed
//! errors. Everything else is either a thin query (keeper-db) or thin HTTP
//! glue (keeper-cli).

pub mod error;
pub mod lists;
pub mod tasks;
pub mod validate;

pub use error::{ServiceError, ServiceResult};
