use uuid::Uuid;

use engine::{ClosingState, CreateClosingCmd, EngineError};

mod common;
use common::{date, engine_with_db, portfolio_cheque, seed_cash_movement};

#[tokio::test]
async fn balanced_closing_has_zero_discrepancy() {
    let (engine, db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cash_account = Uuid::new_v4();
    seed_cash_movement(&db, tenant, cash_account, 100_000, date(2026, 3, 5)).await;

    let receipt = engine
        .create_closing(CreateClosingCmd::new(
            tenant,
            cash_account,
            date(2026, 3, 10),
            100_000,
            0,
            "cashier",
        ))
        .await
        .unwrap();

    let closing = receipt.value;
    assert_eq!(closing.state, ClosingState::Balanced);
    assert_eq!(closing.discrepancy_minor, 0);
    assert_eq!(closing.system_cash_minor, 100_000);
    assert!(closing.summary().contains("balanced"));
}

#[tokio::test]
async fn short_count_yields_a_negative_discrepancy() {
    let (engine, db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cash_account = Uuid::new_v4();
    seed_cash_movement(&db, tenant, cash_account, 100_000, date(2026, 3, 5)).await;

    let closing = engine
        .create_closing(CreateClosingCmd::new(
            tenant,
            cash_account,
            date(2026, 3, 10),
            95_000,
            0,
            "cashier",
        ))
        .await
        .unwrap()
        .value;

    assert_eq!(closing.state, ClosingState::WithDifference);
    assert_eq!(closing.discrepancy_minor, -5_000);
    assert!(closing.summary().contains("-50.00"));
}

#[tokio::test]
async fn preview_counts_confirmed_cash_up_to_date_and_the_portfolio() {
    let (engine, db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cash_account = Uuid::new_v4();

    seed_cash_movement(&db, tenant, cash_account, 80_000, date(2026, 3, 1)).await;
    // After the as-of date: must not count.
    seed_cash_movement(&db, tenant, cash_account, 9_999, date(2026, 3, 20)).await;
    // Another account: must not count.
    seed_cash_movement(&db, tenant, Uuid::new_v4(), 7_777, date(2026, 3, 1)).await;
    portfolio_cheque(&engine, tenant, 30_000).await;

    let preview = engine
        .preview_closing(tenant, cash_account, date(2026, 3, 10))
        .await
        .unwrap();
    assert_eq!(preview.system_cash_minor, 80_000);
    assert_eq!(preview.system_cheques_minor, 30_000);
}

#[tokio::test]
async fn closing_round_trips_against_the_preview() {
    let (engine, db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cash_account = Uuid::new_v4();
    seed_cash_movement(&db, tenant, cash_account, 42_000, date(2026, 3, 2)).await;
    portfolio_cheque(&engine, tenant, 8_000).await;

    let closing = engine
        .create_closing(CreateClosingCmd::new(
            tenant,
            cash_account,
            date(2026, 3, 9),
            40_000,
            8_000,
            "cashier",
        ))
        .await
        .unwrap()
        .value;

    let preview = engine
        .preview_closing(tenant, cash_account, date(2026, 3, 9))
        .await
        .unwrap();
    let counted_total = closing.counted_cash_minor + closing.counted_cheques_minor;
    let system_total = preview.system_cash_minor + preview.system_cheques_minor;
    assert_eq!(closing.discrepancy_minor, counted_total - system_total);
}

#[tokio::test]
async fn second_closing_for_the_same_day_is_a_duplicate() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cash_account = Uuid::new_v4();

    let first = engine
        .create_closing(
            CreateClosingCmd::new(tenant, cash_account, date(2026, 3, 10), 0, 0, "cashier")
                .idempotency_key("closing-a"),
        )
        .await
        .unwrap()
        .value;

    let err = engine
        .create_closing(
            CreateClosingCmd::new(tenant, cash_account, date(2026, 3, 10), 1_000, 0, "cashier")
                .idempotency_key("closing-b"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateClosing(_)));

    // The first closing is untouched.
    let reloaded = engine.closing(tenant, first.id).await.unwrap();
    assert_eq!(reloaded.counted_cash_minor, first.counted_cash_minor);
    assert_eq!(reloaded.discrepancy_minor, first.discrepancy_minor);
    assert_eq!(reloaded.state, first.state);
}

#[tokio::test]
async fn identical_retry_replays_instead_of_duplicating() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cash_account = Uuid::new_v4();

    let first = engine
        .create_closing(CreateClosingCmd::new(
            tenant,
            cash_account,
            date(2026, 3, 11),
            0,
            0,
            "cashier",
        ))
        .await
        .unwrap();
    let second = engine
        .create_closing(CreateClosingCmd::new(
            tenant,
            cash_account,
            date(2026, 3, 11),
            0,
            0,
            "cashier",
        ))
        .await
        .unwrap();

    assert!(!first.replayed);
    assert!(second.replayed);
    assert_eq!(first.value, second.value);
}

#[tokio::test]
async fn negative_counts_are_rejected() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();

    let err = engine
        .create_closing(CreateClosingCmd::new(
            tenant,
            Uuid::new_v4(),
            date(2026, 3, 10),
            -1,
            0,
            "cashier",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}
