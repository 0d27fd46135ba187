use chrono::Duration;
use sea_orm::Database;
use uuid::Uuid;

use engine::{Begun, Engine, EngineError, OperationKind};
use migration::MigratorTrait;

mod common;
use common::engine_with_db;

/// Engine whose in-progress records are immediately reclaimable, as if left
/// behind by a crashed process.
async fn engine_with_zero_staleness() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .staleness(Duration::zero())
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn second_begin_while_in_progress_conflicts() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();

    let first = engine
        .begin_idempotent(tenant, OperationKind::ConfirmDeposit, "key-1")
        .await
        .unwrap();
    assert_eq!(first, Begun::Fresh);

    let err = engine
        .begin_idempotent(tenant, OperationKind::ConfirmDeposit, "key-1")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn completed_key_replays_the_stored_payload() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let entity = Uuid::new_v4();

    engine
        .begin_idempotent(tenant, OperationKind::ConfirmDeposit, "key-2")
        .await
        .unwrap();
    engine
        .complete_idempotent(
            tenant,
            OperationKind::ConfirmDeposit,
            "key-2",
            "{\"ok\":true}".to_string(),
            "cash_deposit",
            entity,
        )
        .await
        .unwrap();

    let outcome = engine
        .begin_idempotent(tenant, OperationKind::ConfirmDeposit, "key-2")
        .await
        .unwrap();
    assert_eq!(outcome, Begun::Replay("{\"ok\":true}".to_string()));
}

#[tokio::test]
async fn failed_key_is_released_for_retry() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();

    engine
        .begin_idempotent(tenant, OperationKind::CreateClosing, "key-3")
        .await
        .unwrap();
    engine
        .fail_idempotent(tenant, OperationKind::CreateClosing, "key-3")
        .await
        .unwrap();

    let retry = engine
        .begin_idempotent(tenant, OperationKind::CreateClosing, "key-3")
        .await
        .unwrap();
    assert_eq!(retry, Begun::Fresh);
}

#[tokio::test]
async fn stale_in_progress_record_is_reclaimed() {
    let engine = engine_with_zero_staleness().await;
    let tenant = Uuid::new_v4();

    engine
        .begin_idempotent(tenant, OperationKind::ConfirmDeposit, "key-4")
        .await
        .unwrap();

    // With a zero staleness threshold the crashed holder's claim has
    // already expired; the retry takes over instead of deadlocking.
    let retry = engine
        .begin_idempotent(tenant, OperationKind::ConfirmDeposit, "key-4")
        .await
        .unwrap();
    assert_eq!(retry, Begun::Fresh);
}

#[tokio::test]
async fn keys_are_scoped_per_tenant_and_operation() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();

    engine
        .begin_idempotent(tenant, OperationKind::ConfirmDeposit, "key-5")
        .await
        .unwrap();

    // Same key, different operation: independent claim.
    let other_op = engine
        .begin_idempotent(tenant, OperationKind::RejectDeposit, "key-5")
        .await
        .unwrap();
    assert_eq!(other_op, Begun::Fresh);

    // Same key and operation, different tenant: independent claim.
    let other_tenant = engine
        .begin_idempotent(Uuid::new_v4(), OperationKind::ConfirmDeposit, "key-5")
        .await
        .unwrap();
    assert_eq!(other_tenant, Begun::Fresh);
}
