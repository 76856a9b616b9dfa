//! Database query functions for the `todo_lists` table.
//!
//! Every lookup takes the caller's owner id alongside the row id. The
//! owner predicate lives in the SQL itself, never in a post-fetch filter.
//!
//! Functions return plain [`sqlx::Error`] so the service layer can inspect
//! constraint-violation signals (unique-name conflicts) and translate them
//! into typed domain errors.

use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::TodoList;

/// Insert a new list row. Returns the inserted list with server-generated
/// defaults (id, created_at).
///
/// A duplicate `(owner_id, name)` pair surfaces as a unique-violation
/// database error; callers decide how to report it.
pub async fn insert_list<'e>(
    ex: impl PgExecutor<'e>,
    name: &str,
    description: Option<&str>,
    owner_id: &str,
) -> Result<TodoList, sqlx::Error> {
    sqlx::query_as::<_, TodoList>(
        "INSERT INTO todo_lists (name, description, owner_id) \
         VALUES ($1, $2, $3) \
         RETURNING *",
    )
    .bind(name)
    .bind(description)
    .bind(owner_id)
    .fetch_one(ex)
    .await
}

/// Fetch a single list by id, visible only to its owner.
pub async fn get_list<'e>(
    ex: impl PgExecutor<'e>,
    id: Uuid,
    owner_id: &str,
) -> Result<Option<TodoList>, sqlx::Error> {
    sqlx::query_as::<_, TodoList>("SELECT * FROM todo_lists WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .fetch_optional(ex)
        .await
}

/// List all lists belonging to an owner, ordered by creation time.
pub async fn list_lists_for_owner<'e>(
    ex: impl PgExecutor<'e>,
    owner_id: &str,
) -> Result<Vec<TodoList>, sqlx::Error> {
    sqlx::query_as::<_, TodoList>(
        "SELECT * FROM todo_lists WHERE owner_id = $1 ORDER BY created_at ASC",
    )
    .bind(owner_id)
    .fetch_all(ex)
    .await
}

/// Apply a partial update to a list.
///
/// `COALESCE` keeps any column whose parameter is NULL, so absent fields
/// are left unchanged while an explicit empty string is applied. Returns
/// the updated row, or `None` when the id does not exist or belongs to
/// another owner.
pub async fn update_list<'e>(
    ex: impl PgExecutor<'e>,
    id: Uuid,
    owner_id: &str,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<TodoList>, sqlx::Error> {
    sqlx::query_as::<_, TodoList>(
        "UPDATE todo_lists \
         SET name = COALESCE($3, name), \
             description = COALESCE($4, description) \
         WHERE id = $1 AND owner_id = $2 \
         RETURNING *",
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(description)
    .fetch_optional(ex)
    .await
}

/// Delete a list. Returns the number of rows affected (0 when the id does
/// not exist or belongs to another owner). Tasks in the list are removed
/// by the `ON DELETE CASCADE` foreign key.
pub async fn delete_list<'e>(
    ex: impl PgExecutor<'e>,
    id: Uuid,
    owner_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todo_lists WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(ex)
        .await?;

    Ok(result.rows_affected())
}
