use uuid::Uuid;

use engine::{
    Confidence, ConfirmMatchCmd, EngineError, RecordBankMovementCmd, RecordPaymentCmd,
};

mod common;
use common::{date, engine_with_db};

#[tokio::test]
async fn exact_amount_close_date_and_name_rank_high() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();

    let payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            Uuid::new_v4(),
            "Juan Perez",
            500_000,
            date(2026, 3, 9),
        ))
        .await
        .unwrap();
    let movement = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 10),
            "PAGO JUAN PEREZ CBU 2850590940090418135201",
            500_000,
        ))
        .await
        .unwrap();

    let suggestions = engine
        .reconciliation_suggestions(tenant, Some(bank_account))
        .await
        .unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].movement.id, movement.id);

    let best = &suggestions[0].matches[0];
    assert_eq!(best.payment_id, payment.id);
    assert_eq!(best.confidence, Confidence::High);
}

#[tokio::test]
async fn movements_without_plausible_candidates_are_omitted() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();

    engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            Uuid::new_v4(),
            "Agropecuaria Del Sur",
            100_000,
            date(2026, 3, 1),
        ))
        .await
        .unwrap();
    // Wrong amount, unrelated text: no plausible candidate.
    engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 10),
            "DEBITO AUTOMATICO SERVICIO LUZ",
            -3_500,
        ))
        .await
        .unwrap();

    let suggestions = engine
        .reconciliation_suggestions(tenant, Some(bank_account))
        .await
        .unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn candidates_outside_the_date_window_are_not_paired() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();

    engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            Uuid::new_v4(),
            "Juan Perez",
            500_000,
            date(2025, 11, 1),
        ))
        .await
        .unwrap();
    engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 10),
            "PAGO JUAN PEREZ",
            500_000,
        ))
        .await
        .unwrap();

    let suggestions = engine
        .reconciliation_suggestions(tenant, Some(bank_account))
        .await
        .unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn confirm_marks_the_movement_and_is_not_repeatable() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();

    let payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            Uuid::new_v4(),
            "Juan Perez",
            500_000,
            date(2026, 3, 9),
        ))
        .await
        .unwrap();
    let movement = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 10),
            "PAGO JUAN PEREZ",
            500_000,
        ))
        .await
        .unwrap();

    let confirmed = engine
        .confirm_match(ConfirmMatchCmd::new(tenant, movement.id, payment.id))
        .await
        .unwrap();
    assert!(confirmed.reconciled);
    assert_eq!(confirmed.matched_payment_id, Some(payment.id));

    // Reconciled movements stop appearing as suggestions.
    let suggestions = engine
        .reconciliation_suggestions(tenant, Some(bank_account))
        .await
        .unwrap();
    assert!(suggestions.is_empty());

    let err = engine
        .confirm_match(ConfirmMatchCmd::new(tenant, movement.id, payment.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn a_payment_cannot_absorb_two_movements() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();

    let payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            Uuid::new_v4(),
            "Juan Perez",
            500_000,
            date(2026, 3, 9),
        ))
        .await
        .unwrap();
    let first = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 10),
            "PAGO JUAN PEREZ",
            500_000,
        ))
        .await
        .unwrap();
    let second = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 11),
            "PAGO JUAN PEREZ",
            500_000,
        ))
        .await
        .unwrap();

    engine
        .confirm_match(ConfirmMatchCmd::new(tenant, first.id, payment.id))
        .await
        .unwrap();
    let err = engine
        .confirm_match(ConfirmMatchCmd::new(tenant, second.id, payment.id))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn a_confirmed_match_teaches_the_matcher() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();
    let counterparty = Uuid::new_v4();

    // Statement text shares no token with the counterparty name, so the
    // text component contributes nothing and the tier stays medium.
    let opaque_description = "TRANSF RECIBIDA 94812 REF 00442";

    let first_payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            counterparty,
            "Distribuidora Andina SA",
            500_000,
            date(2026, 3, 1),
        ))
        .await
        .unwrap();
    let first_movement = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 11),
            opaque_description,
            500_000,
        ))
        .await
        .unwrap();

    let before = engine
        .reconciliation_suggestions(tenant, Some(bank_account))
        .await
        .unwrap();
    let unlearned = &before[0].matches[0];
    assert_eq!(unlearned.confidence, Confidence::Medium);
    let unlearned_score = unlearned.score;

    engine
        .confirm_match(ConfirmMatchCmd::new(
            tenant,
            first_movement.id,
            first_payment.id,
        ))
        .await
        .unwrap();

    // An identical description for a new movement from the same
    // counterparty now carries the learned association.
    let second_payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            counterparty,
            "Distribuidora Andina SA",
            500_000,
            date(2026, 4, 1),
        ))
        .await
        .unwrap();
    let second_movement = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 4, 11),
            opaque_description,
            500_000,
        ))
        .await
        .unwrap();

    let after = engine
        .reconciliation_suggestions(tenant, Some(bank_account))
        .await
        .unwrap();
    let suggestion = after
        .iter()
        .find(|s| s.movement.id == second_movement.id)
        .unwrap();
    let learned = suggestion
        .matches
        .iter()
        .find(|m| m.payment_id == second_payment.id)
        .unwrap();

    assert!(learned.score > unlearned_score);
    assert_eq!(learned.confidence, Confidence::High);
}

#[tokio::test]
async fn relearning_overwrites_only_the_conflicting_key() {
    let (engine, _db) = engine_with_db().await;
    let tenant = Uuid::new_v4();
    let bank_account = Uuid::new_v4();
    let old_counterparty = Uuid::new_v4();
    let new_counterparty = Uuid::new_v4();

    let description = "TRANSF RECIBIDA 55001";

    let old_payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            old_counterparty,
            "Mayorista Norte",
            200_000,
            date(2026, 3, 1),
        ))
        .await
        .unwrap();
    let first = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 2),
            description,
            200_000,
        ))
        .await
        .unwrap();
    engine
        .confirm_match(ConfirmMatchCmd::new(tenant, first.id, old_payment.id))
        .await
        .unwrap();

    // The same wording re-associated with a different counterparty.
    let new_payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            new_counterparty,
            "Logistica Cuyo",
            200_000,
            date(2026, 3, 20),
        ))
        .await
        .unwrap();
    let second = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 21),
            description,
            200_000,
        ))
        .await
        .unwrap();
    engine
        .confirm_match(ConfirmMatchCmd::new(tenant, second.id, new_payment.id))
        .await
        .unwrap();

    // A third movement with the same wording now boosts the new
    // counterparty, not the old one.
    engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            old_counterparty,
            "Mayorista Norte",
            200_000,
            date(2026, 3, 25),
        ))
        .await
        .unwrap();
    let boosted_payment = engine
        .record_payment(RecordPaymentCmd::new(
            tenant,
            bank_account,
            new_counterparty,
            "Logistica Cuyo",
            200_000,
            date(2026, 3, 25),
        ))
        .await
        .unwrap();
    let third = engine
        .record_bank_movement(RecordBankMovementCmd::new(
            tenant,
            bank_account,
            date(2026, 3, 26),
            description,
            200_000,
        ))
        .await
        .unwrap();

    let suggestions = engine
        .reconciliation_suggestions(tenant, Some(bank_account))
        .await
        .unwrap();
    let suggestion = suggestions
        .iter()
        .find(|s| s.movement.id == third.id)
        .unwrap();
    assert_eq!(suggestion.matches[0].payment_id, boosted_payment.id);
}
