//! Task service: owner-scoped CRUD over tasks.
//!
//! Tasks always belong to exactly one list owned by the same user. The
//! membership invariant is enforced here: creating a task, or re-pointing
//! one at a different list, resolves the target list through an
//! owner-scoped lookup inside the same transaction as the write.

use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use keeper_db::models::Task;
use keeper_db::queries::{lists as list_queries, tasks as task_queries};

use crate::error::{ServiceError, ServiceResult};

/// Partial update for a task.
///
/// `None` fields are left unchanged. Supplying `list_id` moves the task;
/// the target list must be visible to the caller or the whole update
/// fails with `NotFound`, leaving the task untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub completed: Option<bool>,
    pub list_id: Option<Uuid>,
}

/// All tasks belonging to `owner`, across lists.
pub async fn get_all(pool: &PgPool, owner: &str) -> ServiceResult<Vec<Task>> {
    Ok(task_queries::list_tasks_for_owner(pool, owner).await?)
}

/// A single task, visible only to its owner.
pub async fn get_by_id(pool: &PgPool, id: Uuid, owner: &str) -> ServiceResult<Task> {
    task_queries::get_task(pool, id, owner)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("task {id} not found")))
}

/// The caller's tasks in a given list.
///
/// Filters by task ownership only; the list itself is not re-checked. A
/// list id the caller does not own yields an empty vec rather than
/// `NotFound` -- only the caller's own rows can ever appear.
pub async fn get_by_list_id(pool: &PgPool, list_id: Uuid, owner: &str) -> ServiceResult<Vec<Task>> {
    Ok(task_queries::list_tasks_for_list(pool, list_id, owner).await?)
}

/// Create a task in a list owned by `owner`.
///
/// The target list is resolved through an owner-scoped lookup in the same
/// transaction as the insert; a missing or foreign list fails with
/// `NotFound`. A duplicate name within the list fails with `Conflict`.
pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    due_date: Option<NaiveDateTime>,
    completed: bool,
    list_id: Uuid,
    owner: &str,
) -> ServiceResult<Task> {
    let mut tx = pool.begin().await?;

    let list = list_queries::get_list(&mut *tx, list_id, owner)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("list {list_id} not found")))?;

    let task = task_queries::insert_task(
        &mut *tx,
        list.id,
        name.trim(),
        description.map(str::trim),
        due_date,
        completed,
        owner,
    )
    .await
    .map_err(|e| ServiceError::on_unique_violation(e, "task already exists"))?;

    tx.commit().await?;

    tracing::debug!(id = %task.id, list = %task.list_id, "task created");
    Ok(task)
}

/// Apply a partial update to a task.
///
/// Owner-scoped lookup first (`NotFound` for a missing or foreign id).
/// When `list_id` is supplied the new list is re-resolved owner-scoped;
/// failure rolls the transaction back, so the task keeps its current
/// list. `owner_id` is re-stamped to the caller on every update. A name
/// collision within the (possibly new) list fails with `Conflict`.
pub async fn update(pool: &PgPool, id: Uuid, patch: &TaskPatch, owner: &str) -> ServiceResult<Task> {
    let mut tx = pool.begin().await?;

    task_queries::get_task(&mut *tx, id, owner)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("task {id} not found")))?;

    if let Some(new_list_id) = patch.list_id {
        list_queries::get_list(&mut *tx, new_list_id, owner)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("list {new_list_id} not found")))?;
    }

    let task = task_queries::update_task(
        &mut *tx,
        id,
        owner,
        patch.name.as_deref().map(str::trim),
        patch.description.as_deref(),
        patch.due_date,
        patch.completed,
        patch.list_id,
    )
    .await
    .map_err(|e| ServiceError::on_unique_violation(e, "task already exists"))?
    .ok_or_else(|| ServiceError::not_found(format!("task {id} not found")))?;

    tx.commit().await?;
    Ok(task)
}

/// Delete a task.
pub async fn delete(pool: &PgPool, id: Uuid, owner: &str) -> ServiceResult<()> {
    let affected = task_queries::delete_task(pool, id, owner).await?;
    if affected == 0 {
        return Err(ServiceError::not_found(format!("task {id} not found")));
    }

    tracing::debug!(%id, "task deleted");
    Ok(())
}
