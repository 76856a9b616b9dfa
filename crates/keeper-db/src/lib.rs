//! Persistence layer for keeper.
//!
//! PostgreSQL connection pooling, embedded migrations, and query functions
//! for the `todo_lists` and `tasks` tables. All row lookups are owner-scoped:
//! the query predicate requires both the row id and the caller's owner id,
//! so one user can never observe or mutate another user's rows.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
