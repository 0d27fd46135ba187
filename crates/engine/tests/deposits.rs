use uuid::Uuid;

use engine::{
    ChequeState, CreateDepositCmd, DepositDecisionCmd, DepositState, EngineError, MovementStatus,
};

mod common;
use common::{engine_with_db, portfolio_cheque};

#[tokio::test]
async fn create_deposit_holds_cheques_and_pairs_movements() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cash_account = Uuid::new_v4();
    let bank_account = Uuid::new_v4();

    let first = portfolio_cheque(&engine, tenant, 30_000).await;
    let second = portfolio_cheque(&engine, tenant, 20_000).await;

    let receipt = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, cash_account, bank_account, "cashier")
                .cheque_ids(vec![first.id, second.id])
                .cash_amount_minor(10_000),
        )
        .await
        .unwrap();
    assert!(!receipt.replayed);
    let deposit = receipt.value;
    assert_eq!(deposit.state, DepositState::Pending);

    let outbound = engine
        .movement(tenant, deposit.outbound_movement_id)
        .await
        .unwrap();
    let inbound = engine
        .movement(tenant, deposit.inbound_movement_id)
        .await
        .unwrap();
    assert_eq!(outbound.amount_minor, -60_000);
    assert_eq!(inbound.amount_minor, 60_000);
    assert_eq!(outbound.amount_minor + inbound.amount_minor, 0);
    assert_eq!(outbound.status, MovementStatus::Pending);
    assert_eq!(inbound.status, MovementStatus::Pending);

    let held = engine.cheque(tenant, first.id).await.unwrap();
    assert_eq!(held.state, ChequeState::DepositPending);
    assert_eq!(held.deposited_account_id, Some(bank_account));
}

#[tokio::test]
async fn confirm_deposit_flips_deposit_movements_and_cheques() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 50_000).await;

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap()
        .value;

    let confirmed = engine
        .confirm_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap()
        .value;
    assert_eq!(confirmed.state, DepositState::Confirmed);
    assert_eq!(confirmed.confirmed_by.as_deref(), Some("treasurer"));

    let outbound = engine
        .movement(tenant, deposit.outbound_movement_id)
        .await
        .unwrap();
    let inbound = engine
        .movement(tenant, deposit.inbound_movement_id)
        .await
        .unwrap();
    assert_eq!(outbound.status, MovementStatus::Confirmed);
    assert_eq!(inbound.status, MovementStatus::Confirmed);
    assert_eq!(outbound.amount_minor + inbound.amount_minor, 0);

    let cheque = engine.cheque(tenant, cheque.id).await.unwrap();
    assert_eq!(cheque.state, ChequeState::Deposited);
}

#[tokio::test]
async fn retried_confirm_replays_the_original_result() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 40_000).await;

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap()
        .value;

    let first = engine
        .confirm_deposit(
            DepositDecisionCmd::new(tenant, deposit.id, "treasurer").idempotency_key("confirm-1"),
        )
        .await
        .unwrap();
    let second = engine
        .confirm_deposit(
            DepositDecisionCmd::new(tenant, deposit.id, "treasurer").idempotency_key("confirm-1"),
        )
        .await
        .unwrap();

    assert!(!first.replayed);
    assert!(second.replayed);
    assert_eq!(first.value, second.value);
}

#[tokio::test]
async fn retried_confirm_without_key_replays_via_content_hash() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 40_000).await;

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap()
        .value;

    let first = engine
        .confirm_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap();
    let second = engine
        .confirm_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap();

    assert!(!first.replayed);
    assert!(second.replayed);
    assert_eq!(first.value.state, DepositState::Confirmed);
}

#[tokio::test]
async fn reject_after_confirm_fails_and_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 25_000).await;

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

    let err = engine
        .reject_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    // Nothing moved after the first terminal transition.
    let reloaded = engine.deposit(tenant, deposit.id).await.unwrap();
    assert_eq!(reloaded.state, DepositState::Confirmed);
    let cheque = engine.cheque(tenant, cheque.id).await.unwrap();
    assert_eq!(cheque.state, ChequeState::Deposited);
    let outbound = engine
        .movement(tenant, deposit.outbound_movement_id)
        .await
        .unwrap();
    assert_eq!(outbound.status, MovementStatus::Confirmed);
}

#[tokio::test]
async fn reject_returns_cheques_to_portfolio_and_reverses_movements() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 75_000).await;

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id])
                .cash_amount_minor(5_000),
        )
        .await
        .unwrap()
        .value;

    let rejected = engine
        .reject_deposit(DepositDecisionCmd::new(tenant, deposit.id, "treasurer"))
        .await
        .unwrap()
        .value;
    assert_eq!(rejected.state, DepositState::Rejected);

    let cheque = engine.cheque(tenant, cheque.id).await.unwrap();
    assert_eq!(cheque.state, ChequeState::InPortfolio);
    assert_eq!(cheque.deposited_account_id, None);
    assert_eq!(cheque.deposit_date, None);

    for movement_id in [deposit.outbound_movement_id, deposit.inbound_movement_id] {
        let movement = engine.movement(tenant, movement_id).await.unwrap();
        assert_eq!(movement.status, MovementStatus::Reversed);
    }
}

#[tokio::test]
async fn cheque_held_by_an_open_deposit_cannot_be_redeposited() {
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
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn empty_deposit_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();

    let err = engine
        .create_deposit(CreateDepositCmd::new(
            tenant,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "cashier",
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn deposit_outside_the_tenant_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let cheque = portfolio_cheque(&engine, tenant, 15_000).await;

    let deposit = engine
        .create_deposit(
            CreateDepositCmd::new(tenant, Uuid::new_v4(), Uuid::new_v4(), "cashier")
                .cheque_ids(vec![cheque.id]),
        )
        .await
        .unwrap()
        .value;

    let other_tenant = Uuid::new_v4();
    let err = engine
        .confirm_deposit(DepositDecisionCmd::new(other_tenant, deposit.id, "intruder"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
