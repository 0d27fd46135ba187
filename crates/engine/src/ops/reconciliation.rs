//! Bank reconciliation: suggestion assembly and match confirmation.
//!
//! Scoring itself is pure (see `scoring`); this module feeds it the
//! unreconciled movements, the windowed payment candidates and the learned
//! pattern map, and owns the one mutation of bank movements: the confirm
//! step. Pattern learning is advisory and must never fail a confirmation.

use std::collections::HashMap;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    BankMovement, ConfirmMatchCmd, EngineError, Payment, ReconciliationPattern,
    RecordBankMovementCmd, RecordPaymentCmd, ResultEngine, bank_movements, patterns, payments,
    scoring::{self, Confidence},
    text::normalize_text_key,
};

use super::{Engine, normalize_required_text};

/// One scored pairing proposed for a bank movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub payment_id: Uuid,
    pub counterparty_id: Uuid,
    pub score: f64,
    pub confidence: Confidence,
}

/// Suggestions for one unreconciled bank movement, best first. Movements
/// with no plausible candidate are omitted entirely, not zero-scored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSuggestion {
    pub movement: BankMovement,
    pub matches: Vec<MatchCandidate>,
}

impl Engine {
    /// Registers an externally reported bank movement.
    pub async fn record_bank_movement(
        &self,
        cmd: RecordBankMovementCmd,
    ) -> ResultEngine<BankMovement> {
        let description = normalize_required_text(&cmd.description, "movement description")?;
        if cmd.amount_minor == 0 {
            return Err(EngineError::Validation(
                "amount_minor must not be 0".to_string(),
            ));
        }

        let movement = BankMovement {
            id: Uuid::new_v4(),
            tenant_id: cmd.tenant_id,
            bank_account_id: cmd.bank_account_id,
            occurred_on: cmd.occurred_on,
            description,
            amount_minor: cmd.amount_minor,
            reconciled: false,
            matched_payment_id: None,
        };
        bank_movements::ActiveModel::from(&movement)
            .insert(self.database())
            .await?;
        Ok(movement)
    }

    /// Registers an internal payment candidate.
    pub async fn record_payment(&self, cmd: RecordPaymentCmd) -> ResultEngine<Payment> {
        let counterparty_name = normalize_required_text(&cmd.counterparty_name, "counterparty")?;
        if cmd.amount_minor == 0 {
            return Err(EngineError::Validation(
                "amount_minor must not be 0".to_string(),
            ));
        }

        let payment = Payment {
            id: Uuid::new_v4(),
            tenant_id: cmd.tenant_id,
            bank_account_id: cmd.bank_account_id,
            counterparty_id: cmd.counterparty_id,
            counterparty_name,
            amount_minor: cmd.amount_minor,
            paid_on: cmd.paid_on,
            reference: cmd.reference,
        };
        payments::ActiveModel::from(&payment)
            .insert(self.database())
            .await?;
        Ok(payment)
    }

    /// Scores every unreconciled bank movement of the tenant (optionally one
    /// account) against the payment candidates inside the date window.
    /// Read-only; consistent snapshot semantics are left to the store.
    pub async fn reconciliation_suggestions(
        &self,
        tenant_id: Uuid,
        bank_account_id: Option<Uuid>,
    ) -> ResultEngine<Vec<ReconciliationSuggestion>> {
        let cfg = *self.matcher();

        let mut movement_query = bank_movements::Entity::find()
            .filter(bank_movements::Column::TenantId.eq(tenant_id))
            .filter(bank_movements::Column::Reconciled.eq(false))
            .order_by_asc(bank_movements::Column::OccurredOn);
        if let Some(account_id) = bank_account_id {
            movement_query =
                movement_query.filter(bank_movements::Column::BankAccountId.eq(account_id));
        }
        let movements: Vec<BankMovement> = movement_query
            .all(self.database())
            .await?
            .into_iter()
            .map(BankMovement::from)
            .collect();

        // Payments already absorbed by a reconciled movement are out of the
        // candidate pool.
        let matched: std::collections::HashSet<Uuid> = bank_movements::Entity::find()
            .filter(bank_movements::Column::TenantId.eq(tenant_id))
            .filter(bank_movements::Column::MatchedPaymentId.is_not_null())
            .all(self.database())
            .await?
            .into_iter()
            .filter_map(|model| model.matched_payment_id)
            .collect();

        let payment_models = payments::Entity::find()
            .filter(payments::Column::TenantId.eq(tenant_id))
            .all(self.database())
            .await?;
        let candidates: Vec<Payment> = payment_models
            .into_iter()
            .map(Payment::try_from)
            .collect::<ResultEngine<Vec<_>>>()?
            .into_iter()
            .filter(|payment| !matched.contains(&payment.id))
            .collect();

        let learned = self.pattern_map(tenant_id).await?;

        let mut suggestions = Vec::new();
        for movement in movements {
            let Some(desc_norm) = normalize_text_key(&movement.description) else {
                continue;
            };
            let learned_counterparty = learned.get(&desc_norm);

            let mut matches: Vec<MatchCandidate> = Vec::new();
            for payment in &candidates {
                let gap = (movement.occurred_on - payment.paid_on).num_days().abs();
                if gap > cfg.date_window_days {
                    continue;
                }
                let counterparty_norm =
                    normalize_text_key(&payment.counterparty_name).unwrap_or_default();
                let is_learned = learned_counterparty == Some(&payment.counterparty_id);
                let score = scoring::score_candidate(
                    &cfg,
                    movement.amount_minor,
                    movement.occurred_on,
                    &desc_norm,
                    payment.amount_minor,
                    payment.paid_on,
                    &counterparty_norm,
                    is_learned,
                );
                if let Some(confidence) = scoring::confidence_for(&cfg, score) {
                    matches.push(MatchCandidate {
                        payment_id: payment.id,
                        counterparty_id: payment.counterparty_id,
                        score,
                        confidence,
                    });
                }
            }

            if matches.is_empty() {
                continue;
            }
            matches.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            suggestions.push(ReconciliationSuggestion { movement, matches });
        }

        Ok(suggestions)
    }

    /// Confirms one pairing: transactionally marks the movement reconciled,
    /// then updates the learned pattern map outside the transaction. The
    /// learning write is best-effort and never rolls the confirmation back.
    pub async fn confirm_match(&self, cmd: ConfirmMatchCmd) -> ResultEngine<BankMovement> {
        let (movement, counterparty_id) = self
            .with_tx(move |_engine, db_tx| {
                Box::pin(async move {
                    let model = bank_movements::Entity::find_by_id(cmd.bank_movement_id)
                        .filter(bank_movements::Column::TenantId.eq(cmd.tenant_id))
                        .one(db_tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::NotFound(format!(
                                "bank movement {}",
                                cmd.bank_movement_id
                            ))
                        })?;
                    let mut movement = BankMovement::from(model);
                    if movement.reconciled {
                        return Err(EngineError::state(
                            "bank_movement",
                            "reconciled",
                            "unreconciled",
                        ));
                    }

                    let payment_model = payments::Entity::find_by_id(cmd.payment_id)
                        .filter(payments::Column::TenantId.eq(cmd.tenant_id))
                        .one(db_tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::NotFound(format!("payment {}", cmd.payment_id))
                        })?;
                    let payment = Payment::try_from(payment_model)?;

                    let taken = bank_movements::Entity::find()
                        .filter(bank_movements::Column::TenantId.eq(cmd.tenant_id))
                        .filter(bank_movements::Column::MatchedPaymentId.eq(payment.id))
                        .one(db_tx)
                        .await?;
                    if taken.is_some() {
                        return Err(EngineError::Validation(format!(
                            "payment {} is already reconciled against another movement",
                            payment.id
                        )));
                    }

                    let update = bank_movements::ActiveModel {
                        id: ActiveValue::Set(movement.id),
                        reconciled: ActiveValue::Set(true),
                        matched_payment_id: ActiveValue::Set(Some(payment.id)),
                        ..Default::default()
                    };
                    update.update(db_tx).await?;

                    movement.reconciled = true;
                    movement.matched_payment_id = Some(payment.id);
                    Ok((movement, payment.counterparty_id))
                })
            })
            .await?;

        if let Some(text_key) = normalize_text_key(&movement.description)
            && let Err(err) = self
                .learn_pattern(movement.tenant_id, &text_key, counterparty_id)
                .await
        {
            tracing::warn!(
                "pattern learning failed for movement {}: {err}",
                movement.id
            );
        }

        Ok(movement)
    }

    /// Loads the tenant's learned `text key → counterparty` map.
    async fn pattern_map(&self, tenant_id: Uuid) -> ResultEngine<HashMap<String, Uuid>> {
        let models = patterns::Entity::find()
            .filter(patterns::Column::TenantId.eq(tenant_id))
            .all(self.database())
            .await?;
        Ok(models
            .into_iter()
            .map(|model| (model.text_key, model.counterparty_id))
            .collect())
    }

    /// Additive upsert: a key accumulates evidence toward one counterparty;
    /// a conflicting re-association overwrites only that key.
    async fn learn_pattern(
        &self,
        tenant_id: Uuid,
        text_key: &str,
        counterparty_id: Uuid,
    ) -> ResultEngine<()> {
        let existing = patterns::Entity::find()
            .filter(patterns::Column::TenantId.eq(tenant_id))
            .filter(patterns::Column::TextKey.eq(text_key))
            .one(self.database())
            .await?;

        match existing {
            None => {
                let pattern = ReconciliationPattern {
                    id: Uuid::new_v4(),
                    tenant_id,
                    text_key: text_key.to_string(),
                    counterparty_id,
                    hits: 1,
                };
                patterns::ActiveModel::from(&pattern)
                    .insert(self.database())
                    .await?;
            }
            Some(model) if model.counterparty_id == counterparty_id => {
                let pattern = patterns::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    hits: ActiveValue::Set(model.hits + 1),
                    updated_at: ActiveValue::Set(chrono::Utc::now()),
                    ..Default::default()
                };
                pattern.update(self.database()).await?;
            }
            Some(model) => {
                let pattern = patterns::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    counterparty_id: ActiveValue::Set(counterparty_id),
                    hits: ActiveValue::Set(1),
                    updated_at: ActiveValue::Set(chrono::Utc::now()),
                    ..Default::default()
                };
                pattern.update(self.database()).await?;
            }
        }
        Ok(())
    }
}
