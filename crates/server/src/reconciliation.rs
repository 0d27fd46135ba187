//! Reconciliation API endpoints

use api_types::reconciliation::{
    BankMovementNew, BankMovementView, Confidence as ApiConfidence, MatchView, PaymentNew,
    ReconciliationConfirm, SuggestionView, SuggestionsQuery,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{Principal, ServerState},
};

fn map_confidence(confidence: engine::Confidence) -> ApiConfidence {
    match confidence {
        engine::Confidence::High => ApiConfidence::High,
        engine::Confidence::Medium => ApiConfidence::Medium,
        engine::Confidence::Low => ApiConfidence::Low,
    }
}

fn movement_view(movement: engine::BankMovement) -> BankMovementView {
    BankMovementView {
        id: movement.id,
        bank_account_id: movement.bank_account_id,
        occurred_on: movement.occurred_on,
        description: movement.description,
        amount_minor: movement.amount_minor,
        reconciled: movement.reconciled,
        matched_payment_id: movement.matched_payment_id,
    }
}

#[derive(Serialize)]
pub struct PaymentCreated {
    pub id: Uuid,
}

pub async fn bank_movement_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<BankMovementNew>,
) -> Result<(StatusCode, Json<BankMovementView>), ServerError> {
    let movement = state
        .engine
        .record_bank_movement(engine::RecordBankMovementCmd::new(
            principal.tenant_id,
            payload.bank_account_id,
            payload.occurred_on,
            payload.description,
            payload.amount_minor,
        ))
        .await?;
    Ok((StatusCode::CREATED, Json(movement_view(movement))))
}

pub async fn payment_new(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<PaymentCreated>), ServerError> {
    let mut cmd = engine::RecordPaymentCmd::new(
        principal.tenant_id,
        payload.bank_account_id,
        payload.counterparty_id,
        payload.counterparty_name,
        payload.amount_minor,
        payload.paid_on,
    );
    if let Some(reference) = payload.reference {
        cmd = cmd.reference(reference);
    }

    let payment = state.engine.record_payment(cmd).await?;
    Ok((StatusCode::CREATED, Json(PaymentCreated { id: payment.id })))
}

pub async fn suggestions(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(payload): Query<SuggestionsQuery>,
) -> Result<Json<Vec<SuggestionView>>, ServerError> {
    let suggestions = state
        .engine
        .reconciliation_suggestions(principal.tenant_id, payload.bank_account_id)
        .await?;

    let views = suggestions
        .into_iter()
        .map(|suggestion| SuggestionView {
            movement: movement_view(suggestion.movement),
            matches: suggestion
                .matches
                .into_iter()
                .map(|candidate| MatchView {
                    payment_id: candidate.payment_id,
                    counterparty_id: candidate.counterparty_id,
                    score: candidate.score,
                    confidence: map_confidence(candidate.confidence),
                })
                .collect(),
        })
        .collect();
    Ok(Json(views))
}

pub async fn confirm(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<ReconciliationConfirm>,
) -> Result<Json<BankMovementView>, ServerError> {
    let movement = state
        .engine
        .confirm_match(engine::ConfirmMatchCmd::new(
            principal.tenant_id,
            payload.bank_movement_id,
            payload.payment_id,
        ))
        .await?;
    Ok(Json(movement_view(movement)))
}
