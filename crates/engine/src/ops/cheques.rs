//! Cheque lifecycle management.
//!
//! Deposit-driven transitions (`in_portfolio ⇄ deposit_pending →
//! deposited`) live in the deposit orchestrator; this module owns creation
//! and the bank/administrative endings: clear, bounce, void.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Cheque, ChequeState, CreateChequeCmd, DepositState, EngineError, ResultEngine, VoidChequeCmd,
    cheques, deposit_cheques, deposits,
};

use super::{Engine, normalize_required_text};

impl Engine {
    /// Records a new cheque in the portfolio (received) or as issued paper.
    pub async fn create_cheque(&self, cmd: CreateChequeCmd) -> ResultEngine<Cheque> {
        Cheque::check_doc_class(cmd.kind, cmd.doc_class)?;
        let number = normalize_required_text(&cmd.number, "cheque number")?;
        let bank = normalize_required_text(&cmd.bank, "cheque bank")?;
        let holder = normalize_required_text(&cmd.holder, "cheque holder")?;
        if cmd.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if cmd.due_date < cmd.issue_date {
            return Err(EngineError::Validation(
                "due_date must not precede issue_date".to_string(),
            ));
        }

        let cheque = Cheque {
            id: Uuid::new_v4(),
            tenant_id: cmd.tenant_id,
            origin: cmd.origin,
            kind: cmd.kind,
            doc_class: cmd.doc_class,
            number,
            bank,
            holder,
            amount_minor: cmd.amount_minor,
            currency: cmd.currency,
            issue_date: cmd.issue_date,
            due_date: cmd.due_date,
            state: ChequeState::InPortfolio,
            bank_account_id: cmd.bank_account_id,
            deposited_account_id: None,
            deposit_date: None,
            void_reason: None,
        };
        cheques::ActiveModel::from(&cheque)
            .insert(self.database())
            .await?;
        Ok(cheque)
    }

    /// Returns one cheque of the tenant.
    pub async fn cheque(&self, tenant_id: Uuid, cheque_id: Uuid) -> ResultEngine<Cheque> {
        let model = cheques::Entity::find_by_id(cheque_id)
            .filter(cheques::Column::TenantId.eq(tenant_id))
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("cheque {cheque_id}")))?;
        Cheque::try_from(model)
    }

    /// Lists the tenant's cheques, optionally restricted to one state,
    /// ordered by due date.
    pub async fn list_cheques(
        &self,
        tenant_id: Uuid,
        state: Option<ChequeState>,
    ) -> ResultEngine<Vec<Cheque>> {
        let mut query = cheques::Entity::find()
            .filter(cheques::Column::TenantId.eq(tenant_id))
            .order_by_asc(cheques::Column::DueDate);
        if let Some(state) = state {
            query = query.filter(cheques::Column::State.eq(state.as_str()));
        }
        let models = query.all(self.database()).await?;
        models.into_iter().map(Cheque::try_from).collect()
    }

    /// Marks a deposited cheque as cleared by the bank. Requires the owning
    /// deposit to be confirmed.
    pub async fn clear_cheque(&self, tenant_id: Uuid, cheque_id: Uuid) -> ResultEngine<Cheque> {
        self.with_tx(move |_engine, db_tx| {
            Box::pin(async move {
                let mut cheque = require_cheque(db_tx, tenant_id, cheque_id).await?;
                if cheque.state != ChequeState::Deposited {
                    return Err(EngineError::state(
                        "cheque",
                        cheque.state.as_str(),
                        ChequeState::Deposited.as_str(),
                    ));
                }

                // A cheque may have passed through rejected deposits before;
                // the live hold is the one whose deposit is confirmed.
                let linked = deposit_cheques::Entity::find()
                    .filter(deposit_cheques::Column::ChequeId.eq(cheque_id))
                    .find_also_related(deposits::Entity)
                    .all(db_tx)
                    .await?;
                let confirmed = linked.iter().any(|(_, deposit)| {
                    deposit
                        .as_ref()
                        .is_some_and(|d| d.state == DepositState::Confirmed.as_str())
                });
                if !confirmed {
                    return Err(EngineError::Internal(format!(
                        "deposited cheque {cheque_id} has no confirmed deposit"
                    )));
                }

                let update = cheques::ActiveModel {
                    id: ActiveValue::Set(cheque_id),
                    state: ActiveValue::Set(ChequeState::Cleared.as_str().to_string()),
                    ..Default::default()
                };
                update.update(db_tx).await?;

                cheque.state = ChequeState::Cleared;
                Ok(cheque)
            })
        })
        .await
    }

    /// Registers a bank-reported bounce. Terminal. A cheque bounced after
    /// its deposit was confirmed claws the funds back out of the bank
    /// account with an appended confirmed movement.
    pub async fn bounce_cheque(&self, tenant_id: Uuid, cheque_id: Uuid) -> ResultEngine<Cheque> {
        self.with_tx(move |engine, db_tx| {
            Box::pin(async move {
                let mut cheque = require_cheque(db_tx, tenant_id, cheque_id).await?;
                match cheque.state {
                    ChequeState::InPortfolio | ChequeState::Deposited => {}
                    other => {
                        return Err(EngineError::state(
                            "cheque",
                            other.as_str(),
                            "in_portfolio or deposited",
                        ));
                    }
                }

                if cheque.state == ChequeState::Deposited {
                    engine
                        .append_cheque_reversal(
                            db_tx,
                            &cheque,
                            format!("bounce of cheque {}", cheque.number),
                        )
                        .await?;
                }

                let update = cheques::ActiveModel {
                    id: ActiveValue::Set(cheque_id),
                    state: ActiveValue::Set(ChequeState::Rejected.as_str().to_string()),
                    ..Default::default()
                };
                update.update(db_tx).await?;

                cheque.state = ChequeState::Rejected;
                Ok(cheque)
            })
        })
        .await
    }

    /// Administrative cancellation with a mandatory reason. A cheque whose
    /// amount already reached a bank account through a confirmed deposit is
    /// compensated by an appended reversal of equal and opposite amount;
    /// history is never edited in place.
    pub async fn void_cheque(&self, cmd: VoidChequeCmd) -> ResultEngine<Cheque> {
        let reason = normalize_required_text(&cmd.reason, "void reason")?;
        self.with_tx(move |engine, db_tx| {
            Box::pin(async move {
                let mut cheque = require_cheque(db_tx, cmd.tenant_id, cmd.cheque_id).await?;
                match cheque.state {
                    ChequeState::InPortfolio | ChequeState::Deposited | ChequeState::Cleared => {}
                    ChequeState::DepositPending => {
                        return Err(EngineError::InvalidState(
                            "cheque is held by an open deposit, reject the deposit first"
                                .to_string(),
                        ));
                    }
                    other => {
                        return Err(EngineError::state(
                            "cheque",
                            other.as_str(),
                            "a non-terminal state",
                        ));
                    }
                }

                if matches!(cheque.state, ChequeState::Deposited | ChequeState::Cleared) {
                    engine
                        .append_cheque_reversal(
                            db_tx,
                            &cheque,
                            format!("void of cheque {}", cheque.number),
                        )
                        .await?;
                }

                let update = cheques::ActiveModel {
                    id: ActiveValue::Set(cmd.cheque_id),
                    state: ActiveValue::Set(ChequeState::Void.as_str().to_string()),
                    void_reason: ActiveValue::Set(Some(reason.clone())),
                    ..Default::default()
                };
                update.update(db_tx).await?;

                cheque.state = ChequeState::Void;
                cheque.void_reason = Some(reason);
                Ok(cheque)
            })
        })
        .await
    }
}

async fn require_cheque(
    db_tx: &sea_orm::DatabaseTransaction,
    tenant_id: Uuid,
    cheque_id: Uuid,
) -> ResultEngine<Cheque> {
    let model = cheques::Entity::find_by_id(cheque_id)
        .filter(cheques::Column::TenantId.eq(tenant_id))
        .one(db_tx)
        .await?
        .ok_or_else(|| EngineError::NotFound(format!("cheque {cheque_id}")))?;
    Cheque::try_from(model)
}
