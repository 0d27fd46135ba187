use uuid::Uuid;

use engine::{
    ChequeKind, ChequeOrigin, ChequeState, CreateChequeCmd, CreateDepositCmd, DepositDecisionCmd,
    DocClass, EngineError, MovementRelation, MovementStatus, VoidChequeCmd,
};

mod common;
use common::{date, engine_with_db, portfolio_cheque};

fn electronic_cheque_cmd(tenant: Uuid, doc_class: DocClass) -> CreateChequeCmd {
    CreateChequeCmd::new(
        tenant,
        ChequeOrigin::Received,
        ChequeKind::Electronic,
        "00451234",
        "Banco Galicia",
        "Proveedor SRL",
        120_000,
        date(2026, 3, 1),
        date(2026, 5, 1),
    )
    .doc_class(doc_class)
}

#[tokio::test]
async fn electronic_cheque_must_be_deferred() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();

    let err = engine
        .create_cheque(electronic_cheque_cmd(tenant, DocClass::Common))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let cheque = engine
        .create_cheque(electronic_cheque_cmd(tenant, DocClass::Deferred))
        .await
        .unwrap();
    assert_eq!(cheque.state, ChequeState::InPortfolio);
}

#[tokio::test]
async fn due_date_cannot_precede_issue_date() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();

    let err = engine
        .create_cheque(CreateChequeCmd::new(
            tenant,
            ChequeOrigin::Received,
            ChequeKind::Physical,
            "00000001",
            "Banco Nación",
            "Cliente SA",
            10_000,
            date(2026, 3, 10),
            date(2026, 3, 1),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn void_requires_a_reason() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 10_000).await;

    let err = engine
        .void_cheque(VoidChequeCmd::new(tenant, cheque.id, "  "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let voided = engine
        .void_cheque(VoidChequeCmd::new(tenant, cheque.id, "duplicate entry"))
        .await
        .unwrap();
    assert_eq!(voided.state, ChequeState::Void);
    assert_eq!(voided.void_reason.as_deref(), Some("duplicate entry"));
}

#[tokio::test]
async fn cheque_held_by_an_open_deposit_cannot_be_voided() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 10_000).await;

    engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap();

    let err = engine
        .void_cheque(VoidChequeCmd::new(tenant, cheque.id, "mistake"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn clear_requires_a_deposited_cheque() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 10_000).await;

    let err = engine.clear_cheque(tenant, cheque.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap()
        .value;
    engine
        .confirm_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap();

    let cleared = engine.clear_cheque(tenant, cheque.id).await.unwrap();
    assert_eq!(cleared.state, ChequeState::Cleared);
}

#[tokio::test]
async fn bounce_after_confirmed_deposit_claws_funds_back() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 90_000).await;

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), bank_account, "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap()
        .value;
    engine
        .confirm_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap();

    let bounced = engine.bounce_cheque(tenant, cheque.id).await.unwrap();
    assert_eq!(bounced.state, ChequeState::Rejected);

    let reversals = engine
        .movements_for(tenant, MovementRelation::Cheque, cheque.id)
        .await
        .unwrap();
    assert_eq!(reversals.len(), 1);
    assert_eq!(reversals[0].amount_minor, -90_000);
    assert_eq!(reversals[0].status, MovementStatus::Confirmed);
    assert_eq!(reversals[0].account_id, bank_account);
}

#[tokio::test]
async fn bounce_in_portfolio_posts_no_movement() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 12_000).await;

    let bounced = engine.bounce_cheque(tenant, cheque.id).await.unwrap();
    assert_eq!(bounced.state, ChequeState::Rejected);

    let movements = engine
        .movements_for(tenant, MovementRelation::Cheque, cheque.id)
        .await
        .unwrap();
    assert!(movements.is_empty());

    // Terminal: a second bounce is refused.
    let err = engine.bounce_cheque(tenant, cheque.id).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn voiding_a_cleared_cheque_appends_a_compensating_movement() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 45_000).await;

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), bank_account, "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap()
        .value;
    engine
        .confirm_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap();
    engine.clear_cheque(tenant, cheque.id).await.unwrap();

    let voided = engine
        .void_cheque(VoidChequeCmd::new(tenant, cheque.id, "recorded in error"))
        .await
        .unwrap();
    assert_eq!(voided.state, ChequeState::Void);

    // The deposit movements stay untouched; the correction is a new
    // opposite-signed confirmed row.
    let compensations = engine
        .movements_for(tenant, MovementRelation::Cheque, cheque.id)
        .await
        .unwrap();
    assert_eq!(compensations.len(), 1);
    assert_eq!(compensations[0].amount_minor, -45_000);
    assert_eq!(compensations[0].status, MovementStatus::Confirmed);

    let outbound = engine
        .movement(tenant, deposit.outbound_movement_id)
        .await
        .unwrap();
    assert_eq!(outbound.status, MovementStatus::Confirmed);
}

#[tokio::test]
async fn cheques_are_isolated_per_tenant() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 10_000).await;

    let err = engine
        .cheque(Uuid::new_v4(), cheque.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let listed = engine
        .list_cheques(tenant, Some(ChequeState::InPortfolio))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, cheque.id);
}
