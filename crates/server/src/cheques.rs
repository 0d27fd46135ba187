//! Cheque API endpoints

use api_types::cheque::{
    ChequeKind as ApiKind, ChequeList, ChequeNew, ChequeOrigin as ApiOrigin,
    ChequeState as ApiState, ChequeView, ChequeVoid, DocClass as ApiDocClass,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{Principal, ServerState},
};

fn map_origin(origin: engine::ChequeOrigin) -> ApiOrigin {
    match origin {
        engine::ChequeOrigin::Received => ApiOrigin::Received,
        engine::ChequeOrigin::Issued => ApiOrigin::Issued,
    }
}

fn map_origin_in(origin: ApiOrigin) -> engine::ChequeOrigin {
    match origin {
        ApiOrigin::Received => engine::ChequeOrigin::Received,
        ApiOrigin::Issued => engine::ChequeOrigin::Issued,
    }
}

fn map_kind(kind: engine::ChequeKind) -> ApiKind {
    match kind {
        engine::ChequeKind::Physical => ApiKind::Physical,
        engine::ChequeKind::Electronic => ApiKind::Electronic,
    }
}

fn map_kind_in(kind: ApiKind) -> engine::ChequeKind {
    match kind {
        ApiKind::Physical => engine::ChequeKind::Physical,
        ApiKind::Electronic => engine::ChequeKind::Electronic,
    }
}

fn map_doc_class(doc_class: engine::DocClass) -> ApiDocClass {
    match doc_class {
        engine::DocClass::Common => ApiDocClass::Common,
        engine::DocClass::Deferred => ApiDocClass::Deferred,
    }
}

fn map_doc_class_in(doc_class: ApiDocClass) -> engine::DocClass {
    match doc_class {
        ApiDocClass::Common => engine::DocClass::Common,
        ApiDocClass::Deferred => engine::DocClass::Deferred,
    }
}

fn map_state(state: engine::ChequeState) -> ApiState {
    match state {
        engine::ChequeState::InPortfolio => ApiState::InPortfolio,
        engine::ChequeState::DepositPending => ApiState::DepositPending,
        engine::ChequeState::Deposited => ApiState::Deposited,
        engine::ChequeState::Cleared => ApiState::Cleared,
        engine::ChequeState::Rejected => ApiState::Rejected,
        engine::ChequeState::Void => ApiState::Void,
    }
}

fn map_state_in(state: ApiState) -> engine::ChequeState {
    match state {
        ApiState::InPortfolio => engine::ChequeState::InPortfolio,
        ApiState::DepositPending => engine::ChequeState::DepositPending,
        ApiState::Deposited => engine::ChequeState::Deposited,
        ApiState::Cleared => engine::ChequeState::Cleared,
        ApiState::Rejected => engine::ChequeState::Rejected,
        ApiState::Void => engine::ChequeState::Void,
    }
}

fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Ars => api_types::Currency::Ars,
        engine::Currency::Usd => api_types::Currency::Usd,
    }
}

fn map_currency_in(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Ars => engine::Currency::Ars,
        api_types::Currency::Usd => engine::Currency::Usd,
    }
}

pub(crate) fn view(cheque: engine::Cheque) -> ChequeView {
    ChequeView {
        id: cheque.id,
        origin: map_origin(cheque.origin),
        kind: map_kind(cheque.kind),
        doc_class: map_doc_class(cheque.doc_class),
        number: cheque.number,
        bank: cheque.bank,
        holder: cheque.holder,
        amount_minor: cheque.amount_minor,
        currency: map_currency(cheque.currency),
        issue_date: cheque.issue_date,
        due_date: cheque.due_date,
        state: map_state(cheque.state),
        void_reason: cheque.void_reason,
    }
}

pub async fn create(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Json(payload): Json<ChequeNew>,
) -> Result<(StatusCode, Json<ChequeView>), ServerError> {
    let mut cmd = engine::CreateChequeCmd::new(
        principal.tenant_id,
        map_origin_in(payload.origin),
        map_kind_in(payload.kind),
        payload.number,
        payload.bank,
        payload.holder,
        payload.amount_minor,
        payload.issue_date,
        payload.due_date,
    )
    .doc_class(map_doc_class_in(payload.doc_class));
    if let Some(currency) = payload.currency {
        cmd = cmd.currency(map_currency_in(currency));
    }
    if let Some(bank_account_id) = payload.bank_account_id {
        cmd = cmd.bank_account_id(bank_account_id);
    }

    let cheque = state.engine.create_cheque(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(cheque))))
}

pub async fn get(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChequeView>, ServerError> {
    let cheque = state.engine.cheque(principal.tenant_id, id).await?;
    Ok(Json(view(cheque)))
}

pub async fn list(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Query(payload): Query<ChequeList>,
) -> Result<Json<Vec<ChequeView>>, ServerError> {
    let cheques = state
        .engine
        .list_cheques(principal.tenant_id, payload.state.map(map_state_in))
        .await?;
    Ok(Json(cheques.into_iter().map(view).collect()))
}

pub async fn clear(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChequeView>, ServerError> {
    let cheque = state.engine.clear_cheque(principal.tenant_id, id).await?;
    Ok(Json(view(cheque)))
}

pub async fn bounce(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChequeView>, ServerError> {
    let cheque = state.engine.bounce_cheque(principal.tenant_id, id).await?;
    Ok(Json(view(cheque)))
}

pub async fn void(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChequeVoid>,
) -> Result<Json<ChequeView>, ServerError> {
    let cheque = state
        .engine
        .void_cheque(engine::VoidChequeCmd::new(
            principal.tenant_id,
            id,
            payload.reason,
        ))
        .await?;
    Ok(Json(view(cheque)))
}
