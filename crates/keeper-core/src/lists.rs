//! List service: owner-scoped CRUD over todo lists.

use sqlx::PgPool;
use uuid::Uuid;

use keeper_db::models::TodoList;
use keeper_db::queries::lists as list_queries;

use crate::error::{ServiceError, ServiceResult};

/// Partial update for a list.
///
/// `None` fields are left unchanged; an explicit empty string is applied
/// as-is. A supplied name is trimmed before persisting.
#[derive(Debug, Clone, Default)]
pub struct ListPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// All lists belonging to `owner`.
pub async fn get_all(pool: &PgPool, owner: &str) -> ServiceResult<Vec<TodoList>> {
    Ok(list_queries::list_lists_for_owner(pool, owner).await?)
}

/// A single list, visible only to its owner.
pub async fn get_by_id(pool: &PgPool, id: Uuid, owner: &str) -> ServiceResult<TodoList> {
    list_queries::get_list(pool, id, owner)
        .await?
        .ok_or_else(|| ServiceError::not_found(format!("list {id} not found")))
}

/// Create a list owned by `owner`.
///
/// Name and description are trimmed. A duplicate name for the same owner
/// fails with `Conflict`; other owners may reuse the name.
pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
    owner: &str,
) -> ServiceResult<TodoList> {
    let list = list_queries::insert_list(pool, name.trim(), description.map(str::trim), owner)
        .await
        .map_err(|e| ServiceError::on_unique_violation(e, "list already exists"))?;

    tracing::debug!(id = %list.id, "list created");
    Ok(list)
}

/// Apply a partial update to a list.
///
/// Owner-scoped: a missing or foreign id fails with `NotFound`. Re-saving
/// under a name the owner already uses fails with `Conflict`.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    patch: &ListPatch,
    owner: &str,
) -> ServiceResult<TodoList> {
    let name = patch.name.as_deref().map(str::trim);

    list_queries::update_list(pool, id, owner, name, patch.description.as_deref())
        .await
        .map_err(|e| ServiceError::on_unique_violation(e, "list already exists"))?
        .ok_or_else(|| ServiceError::not_found(format!("list {id} not found")))
}

/// Delete a list and, through the foreign-key cascade, every task in it.
pub async fn delete(pool: &PgPool, id: Uuid, owner: &str) -> ServiceResult<()> {
    let affected = list_queries::delete_list(pool, id, owner).await?;
    if affected == 0 {
        return Err(ServiceError::not_found(format!("list {id} not found")));
    }

    tracing::debug!(%id, "list deleted");
    Ok(())
}
