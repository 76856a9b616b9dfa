//! Database query functions for the `tasks` table.
//!
//! Lookups are owner-scoped like the list queries. The list-membership
//! check (does the target list exist and belong to the caller) is the
//! service layer's job; these functions only touch the `tasks` table.

use chrono::NaiveDateTime;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::Task;

/// Insert a new task row. Returns the inserted task with server-generated
/// defaults (id, created_at).
///
/// A duplicate `(list_id, name)` pair surfaces as a unique-violation
/// database error; a dangling `list_id` as a foreign-key violation.
pub async fn insert_task<'e>(
    ex: impl PgExecutor<'e>,
    list_id: Uuid,
    name: &str,
    description: Option<&str>,
    due_date: Option<NaiveDateTime>,
    completed: bool,
    owner_id: &str,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "INSERT INTO tasks (list_id, name, description, due_date, completed, owner_id) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING *",
    )
    .bind(list_id)
    .bind(name)
    .bind(description)
    .bind(due_date)
    .bind(completed)
    .bind(owner_id)
    .fetch_one(ex)
    .await
}

/// Fetch a single task by id, visible only to its owner.
pub async fn get_task<'e>(
    ex: impl PgExecutor<'e>,
    id: Uuid,
    owner_id: &str,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .fetch_optional(ex)
        .await
}

/// List all tasks belonging to an owner, ordered by creation time.
pub async fn list_tasks_for_owner<'e>(
    ex: impl PgExecutor<'e>,
    owner_id: &str,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE owner_id = $1 ORDER BY created_at ASC")
        .bind(owner_id)
        .fetch_all(ex)
        .await
}

/// List the caller's tasks in a given list, ordered by creation time.
///
/// Filters by task ownership only; the list itself is not consulted. A
/// list id the caller does not own therefore yields no rows rather than
/// an error.
pub async fn list_tasks_for_list<'e>(
    ex: impl PgExecutor<'e>,
    list_id: Uuid,
    owner_id: &str,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "SELECT * FROM tasks WHERE list_id = $1 AND owner_id = $2 ORDER BY created_at ASC",
    )
    .bind(list_id)
    .bind(owner_id)
    .fetch_all(ex)
    .await
}

/// Apply a partial update to a task.
///
/// `COALESCE` keeps any column whose parameter is NULL. `owner_id` is
/// re-stamped to the caller on every update; combined with the owner
/// predicate in the WHERE clause this can never transfer ownership.
/// Returns the updated row, or `None` when the id does not exist or
/// belongs to another owner.
#[allow(clippy::too_many_arguments)]
pub async fn update_task<'e>(
    ex: impl PgExecutor<'e>,
    id: Uuid,
    owner_id: &str,
    name: Option<&str>,
    description: Option<&str>,
    due_date: Option<NaiveDateTime>,
    completed: Option<bool>,
    list_id: Option<Uuid>,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(
        "UPDATE tasks \
         SET name = COALESCE($3, name), \
             description = COALESCE($4, description), \
             due_date = COALESCE($5, due_date), \
             completed = COALESCE($6, completed), \
             list_id = COALESCE($7, list_id), \
             owner_id = $2 \
         WHERE id = $1 AND owner_id = $2 \
         RETURNING *",
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .bind(due_date)
    .bind(completed)
    .bind(list_id)
    .fetch_optional(ex)
    .await
}

/// Delete a task. Returns the number of rows affected (0 when the id does
/// not exist or belongs to another owner).
pub async fn delete_task<'e>(
    ex: impl PgExecutor<'e>,
    id: Uuid,
    owner_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(ex)
        .await?;

    Ok(result.rows_affected())
}
