//! Cash deposit API endpoints

use api_types::deposit::{DepositNew, DepositState as ApiState, DepositView, DepositWriteResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{IdempotencyKey, Principal, ServerState, idempotency_key},
};

fn map_state(state: engine::DepositState) -> ApiState {
    match state {
        engine::DepositState::Pending => ApiState::Pending,
        engine::DepositState::Confirmed => ApiState::Confirmed,
        engine::DepositState::Rejected => ApiState::Rejected,
    }
}

fn view(deposit: engine::CashDeposit) -> DepositView {
    DepositView {
        id: deposit.id,
        cash_account_id: deposit.cash_account_id,
        bank_account_id: deposit.bank_account_id,
        cash_amount_minor: deposit.cash_amount_minor,
        state: map_state(deposit.state),
        cheque_ids: deposit.cheque_ids,
        outbound_movement_id: deposit.outbound_movement_id,
        inbound_movement_id: deposit.inbound_movement_id,
        confirmed_by: deposit.confirmed_by,
        confirmed_at: deposit.confirmed_at,
    }
}

fn write_response(receipt: engine::Receipt<engine::CashDeposit>) -> DepositWriteResponse {
    DepositWriteResponse {
        deposit: view(receipt.value),
        replayed: receipt.replayed,
    }
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    key: Option<TypedHeader<IdempotencyKey>>,
    Json(payload): Json<DepositNew>,
) -> Result<(StatusCode, Json<DepositWriteResponse>), ServerError> {
    let mut cmd = engine::CreateDepositCmd::new(
        principal.tenant_id,
        payload.cash_account_id,
        payload.bank_account_id,
        principal.user_id,
    )
    .cheque_ids(payload.cheque_ids)
    .cash_amount_minor(payload.cash_amount_minor);
    if let Some(key) = idempotency_key(key) {
        cmd = cmd.idempotency_key(key);
    }

    let receipt = state.engine.create_deposit(cmd).await?;
    Ok((StatusCode::CREATED, Json(write_response(receipt))))
}

pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DepositView>, ServerError> {
    let deposit = state.engine.deposit(principal.tenant_id, id).await?;
    Ok(Json(view(deposit)))
}

pub async fn confirm(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    key: Option<TypedHeader<IdempotencyKey>>,
) -> Result<Json<DepositWriteResponse>, ServerError> {
    let mut cmd = engine::DepositDecisionCmd::new(principal.tenant_id, id, principal.user_id);
    if let Some(key) = idempotency_key(key) {
        cmd = cmd.idempotency_key(key);
    }

    let receipt = state.engine.confirm_deposit(cmd).await?;
    Ok(Json(write_response(receipt)))
}

pub async fn reject(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    key: Option<TypedHeader<IdempotencyKey>>,
) -> Result<Json<DepositWriteResponse>, ServerError> {
    let mut cmd = engine::DepositDecisionCmd::new(principal.tenant_id, id, principal.user_id);
    if let Some(key) = idempotency_key(key) {
        cmd = cmd.idempotency_key(key);
    }

    let receipt = state.engine.reject_deposit(cmd).await?;
    Ok(Json(write_response(receipt)))
}
