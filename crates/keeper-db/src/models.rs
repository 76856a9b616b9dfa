use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A todo list -- a named container for tasks, owned by one user.
///
/// `(owner_id, name)` is unique: a user cannot have two lists with the
/// same name, but different users may reuse a name freely.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TodoList {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

/// A task -- a unit of work belonging to exactly one list.
///
/// `owner_id` always matches the owning list's owner; the service layer
/// enforces this by resolving the list through an owner-scoped lookup
/// whenever a task is created or re-pointed. `(list_id, name)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Wall-clock due date with no timezone attached.
    pub due_date: Option<NaiveDateTime>,
    pub completed: bool,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}
