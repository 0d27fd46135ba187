//! Idempotency record primitives.
//!
//! One row per `(tenant, operation, key)` tracks a write operation from
//! `in_progress` to `completed`/`failed`. Completed rows replay their stored
//! result; failed rows release the key for a clean retry. Rows are never
//! deleted by normal flow.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Write operations covered by the idempotency store.
///
/// Each variant also defines how a fallback key is derived when the caller
/// supplies none (a content hash of the canonical request, see
/// `Engine::effective_key`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreateDeposit,
    ConfirmDeposit,
    RejectDeposit,
    CreateClosing,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateDeposit => "create_deposit",
            Self::ConfirmDeposit => "confirm_deposit",
            Self::RejectDeposit => "reject_deposit",
            Self::CreateClosing => "create_closing",
        }
    }
}

impl TryFrom<&str> for OperationKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "create_deposit" => Ok(Self::CreateDeposit),
            "confirm_deposit" => Ok(Self::ConfirmDeposit),
            "reject_deposit" => Ok(Self::RejectDeposit),
            "create_closing" => Ok(Self::CreateClosing),
            other => Err(EngineError::Validation(format!(
                "invalid operation kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdempotencyStatus {
    InProgress,
    Completed,
    Failed,
}

impl IdempotencyStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for IdempotencyStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::Validation(format!(
                "invalid idempotency status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub operation: OperationKind,
    pub key: String,
    pub status: IdempotencyStatus,
    pub result_payload: Option<String>,
    pub entity_kind: Option<String>,
    pub entity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "idempotency_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub operation: String,
    pub key: String,
    pub status: String,
    pub result_payload: Option<String>,
    pub entity_kind: Option<String>,
    pub entity_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&IdempotencyRecord> for ActiveModel {
    fn from(record: &IdempotencyRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id),
            tenant_id: ActiveValue::Set(record.tenant_id),
            operation: ActiveValue::Set(record.operation.as_str().to_string()),
            key: ActiveValue::Set(record.key.clone()),
            status: ActiveValue::Set(record.status.as_str().to_string()),
            result_payload: ActiveValue::Set(record.result_payload.clone()),
            entity_kind: ActiveValue::Set(record.entity_kind.clone()),
            entity_id: ActiveValue::Set(record.entity_id),
            created_at: ActiveValue::Set(record.created_at),
            completed_at: ActiveValue::Set(record.completed_at),
        }
    }
}

impl TryFrom<Model> for IdempotencyRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tenant_id: model.tenant_id,
            operation: OperationKind::try_from(model.operation.as_str())?,
            key: model.key,
            status: IdempotencyStatus::try_from(model.status.as_str())?,
            result_payload: model.result_payload,
            entity_kind: model.entity_kind,
            entity_id: model.entity_id,
            created_at: model.created_at,
            completed_at: model.completed_at,
        })
    }
}
