use axum::{
    Router,
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use uuid::Uuid;

use std::sync::Arc;

use crate::{cheques, closings, deposits, reconciliation};
use engine::Engine;

static TENANT_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-tenant-id");
static USER_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");
static IDEMPOTENCY_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("idempotency-key");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Authenticated caller, as resolved by the upstream gateway.
///
/// Authentication and permission checks are not this service's job: the
/// gateway terminates them and forwards the resolved identity in the
/// `x-user-id` / `x-tenant-id` headers. Requests missing either are refused.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: String,
    pub tenant_id: Uuid,
}

/// `TypedHeader` for the caller-supplied idempotency key.
#[derive(Debug)]
pub struct IdempotencyKey(pub String);

impl Header for IdempotencyKey {
    fn name() -> &'static axum::http::HeaderName {
        &IDEMPOTENCY_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        if value.trim().is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(IdempotencyKey(value.trim().to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode idempotency-key header"),
        }
    }
}

/// Extracts the idempotency key, if any, from the optional typed header.
pub(crate) fn idempotency_key(header: Option<TypedHeader<IdempotencyKey>>) -> Option<String> {
    header.map(|TypedHeader(IdempotencyKey(key))| key)
}

async fn principal(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let headers = request.headers();

    let user_id = headers
        .get(&USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    let tenant_id = headers
        .get(&TENANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(Principal { user_id, tenant_id });
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/cheques", post(cheques::create).get(cheques::list))
        .route("/cheques/{id}", get(cheques::get))
        .route("/cheques/{id}/clear", post(cheques::clear))
        .route("/cheques/{id}/bounce", post(cheques::bounce))
        .route("/cheques/{id}/void", post(cheques::void))
        .route("/deposits", post(deposits::create))
        .route("/deposits/{id}", get(deposits::get))
        .route("/deposits/{id}/confirm", post(deposits::confirm))
        .route("/deposits/{id}/reject", post(deposits::reject))
        .route("/closings/preview", get(closings::preview))
        .route("/closings", post(closings::create))
        .route("/bank-movements", post(reconciliation::bank_movement_new))
        .route("/payments", post(reconciliation::payment_new))
        .route(
            "/reconciliation/suggestions",
            get(reconciliation::suggestions),
        )
        .route("/reconciliation/confirm", post(reconciliation::confirm))
        .layer(middleware::from_fn(principal))
        .with_state(state)
}

/// Serves the API on an already-bound listener until the task is aborted.
pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let state = ServerState {
        engine: Arc::new(engine),
    };
    axum::serve(listener, router(state)).await
}

/// Spawns the server in a background task, returning its handle.
pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> tokio::task::JoinHandle<Result<(), std::io::Error>> {
    tokio::spawn(run_with_listener(engine, listener))
}
