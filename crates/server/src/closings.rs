//! Cash closing API endpoints

use api_types::closing::{
    ClosingNew, ClosingPreviewQuery, ClosingPreviewResponse, ClosingState as ApiState, ClosingView,
    ClosingWriteResponse,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;

use crate::{
    ServerError,
    server::{IdempotencyKey, Principal, ServerState, idempotency_key},
};

fn map_state(state: engine::ClosingState) -> ApiState {
    match state {
        engine::ClosingState::Balanced => ApiState::Balanced,
        engine::ClosingState::WithDifference => ApiState::WithDifference,
    }
}

fn view(closing: &engine::CashClosing) -> ClosingView {
    ClosingView {
        id: closing.id,
        cash_account_id: closing.cash_account_id,
        closing_date: closing.closing_date,
        counted_cash_minor: closing.counted_cash_minor,
        counted_cheques_minor: closing.counted_cheques_minor,
        system_cash_minor: closing.system_cash_minor,
        system_cheques_minor: closing.system_cheques_minor,
        discrepancy_minor: closing.discrepancy_minor,
        state: map_state(closing.state),
    }
}

pub async fn preview(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(payload): Query<ClosingPreviewQuery>,
) -> Result<Json<ClosingPreviewResponse>, ServerError> {
    let preview = state
        .engine
        .preview_closing(principal.tenant_id, payload.cash_account_id, payload.as_of)
        .await?;
    Ok(Json(ClosingPreviewResponse {
        system_cash_minor: preview.system_cash_minor,
        system_cheques_minor: preview.system_cheques_minor,
    }))
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    key: Option<TypedHeader<IdempotencyKey>>,
    Json(payload): Json<ClosingNew>,
) -> Result<(StatusCode, Json<ClosingWriteResponse>), ServerError> {
    let mut cmd = engine::CreateClosingCmd::new(
        principal.tenant_id,
        payload.cash_account_id,
        payload.closing_date,
        payload.counted_cash_minor,
        payload.counted_cheques_minor,
        principal.user_id,
    );
    if let Some(key) = idempotency_key(key) {
        cmd = cmd.idempotency_key(key);
    }

    let receipt = state.engine.create_closing(cmd).await?;
    let summary = receipt.value.summary();
    Ok((
        StatusCode::CREATED,
        Json(ClosingWriteResponse {
            closing: view(&receipt.value),
            summary,
            replayed: receipt.replayed,
        }),
    ))
}
