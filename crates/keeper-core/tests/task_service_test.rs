//! Integration tests for the task service: the list-membership check,
//! partial updates, list re-pointing, and conflict translation.

use chrono::NaiveDate;
use keeper_core::error::ServiceError;
use keeper_core::lists;
use keeper_core::tasks::{self, TaskPatch};
use keeper_test_utils::{create_test_db, drop_test_db};
use uuid::Uuid;

fn due(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn create_requires_an_owner_visible_list() {
    let (pool, db_name) = create_test_db().await;

    let list = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();

    // Another owner cannot attach tasks to the list.
    let err = tasks::create(&pool, "Milk", None, None, false, list.id, "bob")
        .await
        .expect_err("foreign list should fail");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    // Nor can anyone attach to a list that does not exist.
    let err = tasks::create(&pool, "Milk", None, None, false, Uuid::new_v4(), "alice")
        .await
        .expect_err("unknown list should fail");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    // The owner can.
    let task = tasks::create(&pool, "  Milk  ", Some(" 2 litres "), None, false, list.id, "alice")
        .await
        .expect("create should succeed");
    assert_eq!(task.name, "Milk", "name should be trimmed");
    assert_eq!(task.description.as_deref(), Some("2 litres"));
    assert_eq!(task.owner_id, "alice");
    assert_eq!(task.list_id, list.id);
    assert!(!task.completed);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn duplicate_name_conflicts_only_within_a_list() {
    let (pool, db_name) = create_test_db().await;

    let list_a = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    let list_b = lists::create(&pool, "Chores", None, "alice").await.unwrap();

    tasks::create(&pool, "Milk", None, None, false, list_a.id, "alice")
        .await
        .unwrap();

    let err = tasks::create(&pool, "Milk", None, None, false, list_a.id, "alice")
        .await
        .expect_err("duplicate name in the same list should fail");
    assert!(matches!(err, ServiceError::Conflict(_)), "got: {err:?}");

    tasks::create(&pool, "Milk", None, None, false, list_b.id, "alice")
        .await
        .expect("same name in another list should succeed");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn tasks_are_invisible_across_owners() {
    let (pool, db_name) = create_test_db().await;

    let list = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    let task = tasks::create(&pool, "Milk", None, None, false, list.id, "alice")
        .await
        .unwrap();

    let err = tasks::get_by_id(&pool, task.id, "bob")
        .await
        .expect_err("foreign get_by_id should fail");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    assert!(tasks::get_all(&pool, "bob").await.unwrap().is_empty());
    assert_eq!(tasks::get_all(&pool, "alice").await.unwrap().len(), 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn get_by_list_id_is_fail_open_for_foreign_lists() {
    let (pool, db_name) = create_test_db().await;

    let list = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    tasks::create(&pool, "Milk", None, None, false, list.id, "alice")
        .await
        .unwrap();

    // A list id the caller does not own yields an empty vec, not NotFound.
    // Only the caller's own rows can ever appear, so nothing leaks.
    let foreign = tasks::get_by_list_id(&pool, list.id, "bob").await.unwrap();
    assert!(foreign.is_empty());

    let mine = tasks::get_by_list_id(&pool, list.id, "alice").await.unwrap();
    assert_eq!(mine.len(), 1);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn update_applies_only_supplied_fields() {
    let (pool, db_name) = create_test_db().await;

    let list = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    let task = tasks::create(
        &pool,
        "Milk",
        Some("2 litres"),
        Some(due(2026, 2, 1)),
        false,
        list.id,
        "alice",
    )
    .await
    .unwrap();

    let patch = TaskPatch {
        description: Some("semi-skimmed".to_string()),
        ..TaskPatch::default()
    };
    let updated = tasks::update(&pool, task.id, &patch, "alice").await.unwrap();

    assert_eq!(updated.description.as_deref(), Some("semi-skimmed"));
    assert_eq!(updated.name, "Milk", "name must be unchanged");
    assert_eq!(updated.due_date, Some(due(2026, 2, 1)));
    assert!(!updated.completed, "completed must be unchanged");
    assert_eq!(updated.list_id, list.id, "list must be unchanged");
    assert_eq!(updated.owner_id, "alice");

    // Toggling completion leaves everything else alone.
    let patch = TaskPatch {
        completed: Some(true),
        ..TaskPatch::default()
    };
    let updated = tasks::update(&pool, task.id, &patch, "alice").await.unwrap();
    assert!(updated.completed);
    assert_eq!(updated.name, "Milk");
    assert_eq!(updated.description.as_deref(), Some("semi-skimmed"));

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn moving_a_task_re_validates_the_target_list() {
    let (pool, db_name) = create_test_db().await;

    let alice_a = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    let alice_b = lists::create(&pool, "Chores", None, "alice").await.unwrap();
    let bob_list = lists::create(&pool, "Reading", None, "bob").await.unwrap();

    let task = tasks::create(&pool, "Milk", None, None, false, alice_a.id, "alice")
        .await
        .unwrap();

    // Moving to another owner's list fails and leaves the task in place.
    let patch = TaskPatch {
        list_id: Some(bob_list.id),
        ..TaskPatch::default()
    };
    let err = tasks::update(&pool, task.id, &patch, "alice")
        .await
        .expect_err("foreign target list should fail");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    let unchanged = tasks::get_by_id(&pool, task.id, "alice").await.unwrap();
    assert_eq!(unchanged.list_id, alice_a.id, "list_id must not change");

    // Moving between the caller's own lists works.
    let patch = TaskPatch {
        list_id: Some(alice_b.id),
        ..TaskPatch::default()
    };
    let moved = tasks::update(&pool, task.id, &patch, "alice").await.unwrap();
    assert_eq!(moved.list_id, alice_b.id);

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn moving_onto_a_taken_name_conflicts() {
    let (pool, db_name) = create_test_db().await;

    let list_a = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    let list_b = lists::create(&pool, "Chores", None, "alice").await.unwrap();

    tasks::create(&pool, "Milk", None, None, false, list_b.id, "alice")
        .await
        .unwrap();
    let task = tasks::create(&pool, "Milk", None, None, false, list_a.id, "alice")
        .await
        .unwrap();

    // The destination list already has a task with this name.
    let patch = TaskPatch {
        list_id: Some(list_b.id),
        ..TaskPatch::default()
    };
    let err = tasks::update(&pool, task.id, &patch, "alice")
        .await
        .expect_err("name collision in the target list should fail");
    assert!(matches!(err, ServiceError::Conflict(_)), "got: {err:?}");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn update_missing_or_foreign_task_not_found() {
    let (pool, db_name) = create_test_db().await;

    let list = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    let task = tasks::create(&pool, "Milk", None, None, false, list.id, "alice")
        .await
        .unwrap();

    let patch = TaskPatch {
        completed: Some(true),
        ..TaskPatch::default()
    };

    let err = tasks::update(&pool, task.id, &patch, "bob")
        .await
        .expect_err("foreign update should fail");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    let err = tasks::update(&pool, Uuid::new_v4(), &patch, "alice")
        .await
        .expect_err("unknown id should fail");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    pool.close().await;
    drop_test_db(&db_name).await;
}

#[tokio::test]
async fn delete_then_get_not_found() {
    let (pool, db_name) = create_test_db().await;

    let list = lists::create(&pool, "Groceries", None, "alice")
        .await
        .unwrap();
    let task = tasks::create(&pool, "Milk", None, None, false, list.id, "alice")
        .await
        .unwrap();

    let err = tasks::delete(&pool, task.id, "bob")
        .await
        .expect_err("foreign delete should fail");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    tasks::delete(&pool, task.id, "alice")
        .await
        .expect("delete should succeed");

    let err = tasks::get_by_id(&pool, task.id, "alice")
        .await
        .expect_err("task should be gone");
    assert!(matches!(err, ServiceError::NotFound(_)), "got: {err:?}");

    pool.close().await;
    drop_test_db(&db_name).await;
}
