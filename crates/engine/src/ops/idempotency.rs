//! The idempotency store.
//!
//! Callers wrap an entire business transaction between [`begin_idempotent`]
//! and [`complete_idempotent`]/[`fail_idempotent`]. A replayed begin must be
//! answered with the stored result verbatim, without re-executing side
//! effects; `with_idempotency` packages that contract for the write
//! operations of the engine.
//!
//! [`begin_idempotent`]: Engine::begin_idempotent
//! [`complete_idempotent`]: Engine::complete_idempotent
//! [`fail_idempotent`]: Engine::fail_idempotent

use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*};
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    idempotency::{self, IdempotencyRecord, IdempotencyStatus, OperationKind},
};

use super::{BoxTxFuture, Engine};

/// Result of an idempotent write with its replay indicator, so callers can
/// tell "already done" from "just did it" without treating either as an
/// error.
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt<T> {
    pub value: T,
    pub replayed: bool,
}

/// Outcome of claiming an idempotency key.
#[derive(Clone, Debug, PartialEq)]
pub enum Begun {
    /// The key is ours; execute the business transaction.
    Fresh,
    /// A completed execution already holds the key; its stored result must
    /// be returned verbatim.
    Replay(String),
}

impl Engine {
    /// Claims `(tenant, operation, key)`, racing concurrent duplicates on the
    /// store's unique index: the loser re-reads the record and observes
    /// replay or [`EngineError::Conflict`], never a second execution.
    ///
    /// A `failed` record is taken over in place; an `in_progress` record
    /// older than the staleness threshold is reclaimed so a crash does not
    /// block the client's retry forever.
    pub async fn begin_idempotent(
        &self,
        tenant_id: Uuid,
        operation: OperationKind,
        key: &str,
    ) -> ResultEngine<Begun> {
        let existing = idempotency::Entity::find()
            .filter(idempotency::Column::TenantId.eq(tenant_id))
            .filter(idempotency::Column::Operation.eq(operation.as_str()))
            .filter(idempotency::Column::Key.eq(key))
            .one(&self.database)
            .await?;

        if let Some(model) = existing {
            return self.claim_existing(IdempotencyRecord::try_from(model)?).await;
        }

        let record = IdempotencyRecord {
            id: Uuid::new_v4(),
            tenant_id,
            operation,
            key: key.to_string(),
            status: IdempotencyStatus::InProgress,
            result_payload: None,
            entity_kind: None,
            entity_id: None,
            created_at: Utc::now(),
            completed_at: None,
        };

        match idempotency::ActiveModel::from(&record).insert(&self.database).await {
            Ok(_) => Ok(Begun::Fresh),
            // Lost the insert race against a concurrent duplicate; the row
            // now exists, so decide from what the winner left behind.
            Err(err) => {
                let model = idempotency::Entity::find()
                    .filter(idempotency::Column::TenantId.eq(tenant_id))
                    .filter(idempotency::Column::Operation.eq(operation.as_str()))
                    .filter(idempotency::Column::Key.eq(key))
                    .one(&self.database)
                    .await?;
                match model {
                    Some(model) => {
                        self.claim_existing(IdempotencyRecord::try_from(model)?)
                            .await
                    }
                    None => Err(err.into()),
                }
            }
        }
    }

    async fn claim_existing(&self, record: IdempotencyRecord) -> ResultEngine<Begun> {
        match record.status {
            IdempotencyStatus::Completed => match record.result_payload {
                Some(payload) => Ok(Begun::Replay(payload)),
                None => Err(EngineError::Internal(format!(
                    "completed idempotency record {} has no payload",
                    record.id
                ))),
            },
            IdempotencyStatus::Failed => {
                self.retake(record.id).await?;
                Ok(Begun::Fresh)
            }
            IdempotencyStatus::InProgress => {
                let age = Utc::now() - record.created_at;
                if age > self.staleness {
                    self.retake(record.id).await?;
                    Ok(Begun::Fresh)
                } else {
                    Err(EngineError::Conflict(record.key))
                }
            }
        }
    }

    async fn retake(&self, record_id: Uuid) -> ResultEngine<()> {
        let record = idempotency::ActiveModel {
            id: ActiveValue::Set(record_id),
            status: ActiveValue::Set(IdempotencyStatus::InProgress.as_str().to_string()),
            result_payload: ActiveValue::Set(None),
            completed_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };
        record.update(&self.database).await?;
        Ok(())
    }

    /// Stores the serialized result and marks the record `completed`.
    pub async fn complete_idempotent(
        &self,
        tenant_id: Uuid,
        operation: OperationKind,
        key: &str,
        payload: String,
        entity_kind: &str,
        entity_id: Uuid,
    ) -> ResultEngine<()> {
        let model = self.require_record(tenant_id, operation, key).await?;
        let record = idempotency::ActiveModel {
            id: ActiveValue::Set(model.id),
            status: ActiveValue::Set(IdempotencyStatus::Completed.as_str().to_string()),
            result_payload: ActiveValue::Set(Some(payload)),
            entity_kind: ActiveValue::Set(Some(entity_kind.to_string())),
            entity_id: ActiveValue::Set(Some(entity_id)),
            completed_at: ActiveValue::Set(Some(Utc::now())),
            ..Default::default()
        };
        record.update(&self.database).await?;
        Ok(())
    }

    /// Marks the record `failed`, releasing the key for a legitimate retry.
    pub async fn fail_idempotent(
        &self,
        tenant_id: Uuid,
        operation: OperationKind,
        key: &str,
    ) -> ResultEngine<()> {
        let model = self.require_record(tenant_id, operation, key).await?;
        let record = idempotency::ActiveModel {
            id: ActiveValue::Set(model.id),
            status: ActiveValue::Set(IdempotencyStatus::Failed.as_str().to_string()),
            completed_at: ActiveValue::Set(Some(Utc::now())),
            ..Default::default()
        };
        record.update(&self.database).await?;
        Ok(())
    }

    async fn require_record(
        &self,
        tenant_id: Uuid,
        operation: OperationKind,
        key: &str,
    ) -> ResultEngine<idempotency::Model> {
        idempotency::Entity::find()
            .filter(idempotency::Column::TenantId.eq(tenant_id))
            .filter(idempotency::Column::Operation.eq(operation.as_str()))
            .filter(idempotency::Column::Key.eq(key))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("idempotency record".to_string()))
    }

    /// Runs `run` inside one durable transaction under idempotency cover:
    /// fresh keys execute and store the result, known keys replay it, and a
    /// failed execution releases the key before the error propagates.
    pub(crate) async fn with_idempotency<T, F>(
        &self,
        tenant_id: Uuid,
        operation: OperationKind,
        client_key: Option<&str>,
        content: &str,
        entity_kind: &'static str,
        entity_id: fn(&T) -> Uuid,
        run: F,
    ) -> ResultEngine<Receipt<T>>
    where
        T: Serialize + DeserializeOwned,
        F: for<'t> FnOnce(&'t Engine, &'t DatabaseTransaction) -> BoxTxFuture<'t, T>,
    {
        let key = effective_key(operation, client_key, content)?;
        match self.begin_idempotent(tenant_id, operation, &key).await? {
            Begun::Replay(payload) => {
                let value = serde_json::from_str(&payload).map_err(|err| {
                    EngineError::Internal(format!("stored idempotent result is unreadable: {err}"))
                })?;
                Ok(Receipt {
                    value,
                    replayed: true,
                })
            }
            Begun::Fresh => match self.with_tx(run).await {
                Ok(value) => {
                    let payload = serde_json::to_string(&value).map_err(|err| {
                        EngineError::Internal(format!("result is not serializable: {err}"))
                    })?;
                    self.complete_idempotent(
                        tenant_id,
                        operation,
                        &key,
                        payload,
                        entity_kind,
                        entity_id(&value),
                    )
                    .await?;
                    Ok(Receipt {
                        value,
                        replayed: false,
                    })
                }
                Err(err) => {
                    if let Err(mark_err) = self.fail_idempotent(tenant_id, operation, &key).await {
                        tracing::warn!(
                            "could not mark idempotency record failed for {}: {mark_err}",
                            operation.as_str()
                        );
                    }
                    Err(err)
                }
            },
        }
    }
}

/// Caller key when present, else a deterministic content hash so naive
/// retries stay safe even without client cooperation. Operations with no
/// safe derivation are rejected as non-idempotent-capable.
pub(crate) fn effective_key(
    operation: OperationKind,
    client_key: Option<&str>,
    content: &str,
) -> ResultEngine<String> {
    if let Some(key) = client_key.map(str::trim).filter(|key| !key.is_empty()) {
        return Ok(key.to_string());
    }
    if !operation.content_derivable() {
        return Err(EngineError::Validation(format!(
            "{} requires an idempotency key",
            operation.as_str()
        )));
    }

    let mut hasher = Sha256::new();
    hasher.update(operation.as_str().as_bytes());
    hasher.update(b"\n");
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

impl OperationKind {
    /// Whether a fallback key can be derived from the request content. Every
    /// current operation has a canonical representation; the check keeps the
    /// rejection path in place for operation types that will not.
    #[must_use]
    pub fn content_derivable(self) -> bool {
        matches!(
            self,
            Self::CreateDeposit | Self::ConfirmDeposit | Self::RejectDeposit | Self::CreateClosing
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_key_prefers_the_client_key() {
        let key = effective_key(OperationKind::ConfirmDeposit, Some(" abc-1 "), "x").unwrap();
        assert_eq!(key, "abc-1");
    }

    #[test]
    fn effective_key_hash_is_deterministic_and_operation_scoped() {
        let a = effective_key(OperationKind::ConfirmDeposit, None, "deposit-1").unwrap();
        let b = effective_key(OperationKind::ConfirmDeposit, None, "deposit-1").unwrap();
        let c = effective_key(OperationKind::RejectDeposit, None, "deposit-1").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn blank_client_key_falls_back_to_the_hash() {
        let blank = effective_key(OperationKind::CreateClosing, Some("  "), "acct|2026-03-01");
        let derived = effective_key(OperationKind::CreateClosing, None, "acct|2026-03-01");
        assert_eq!(blank.unwrap(), derived.unwrap());
    }
}
