//! Cash deposit orchestration.
//!
//! A deposit groups portfolio cheques and/or cash into one cash→bank
//! handover. Create places the full hold (paired pending movements, cheque
//! holds, deposit row) in one transaction; confirm/reject resolve every held
//! entity atomically. All three are idempotent writes.

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, prelude::*,
};
use uuid::Uuid;

use crate::{
    CashDeposit, Cheque, ChequeOrigin, ChequeState, CreateDepositCmd, DepositDecisionCmd,
    DepositState, EngineError, ResultEngine, TreasuryMovement,
    cheques, deposit_cheques, deposits,
    idempotency::OperationKind,
    movements::{self, AccountKind, MovementRelation, MovementStatus},
};

use super::{Engine, idempotency::Receipt};

impl Engine {
    /// Creates a pending deposit: validates and holds every cheque, records
    /// the paired outbound/inbound pending movements and the deposit row,
    /// all inside one transaction.
    pub async fn create_deposit(&self, cmd: CreateDepositCmd) -> ResultEngine<Receipt<CashDeposit>> {
        let mut sorted_ids: Vec<Uuid> = cmd.cheque_ids.clone();
        sorted_ids.sort();
        if sorted_ids.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(EngineError::Validation(
                "duplicate cheque ids in deposit".to_string(),
            ));
        }
        let content = format!(
            "{}|{}|{}|{}",
            cmd.cash_account_id,
            cmd.bank_account_id,
            sorted_ids
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
                .join(","),
            cmd.cash_amount_minor
        );
        let client_key = cmd.meta.idempotency_key.clone();

        self.with_idempotency(
            cmd.tenant_id,
            OperationKind::CreateDeposit,
            client_key.as_deref(),
            &content,
            "cash_deposit",
            |deposit: &CashDeposit| deposit.id,
            move |engine, db_tx| Box::pin(async move { engine.create_deposit_tx(db_tx, &cmd).await }),
        )
        .await
    }

    async fn create_deposit_tx(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: &CreateDepositCmd,
    ) -> ResultEngine<CashDeposit> {
        if cmd.cash_amount_minor < 0 {
            return Err(EngineError::Validation(
                "cash_amount_minor must be >= 0".to_string(),
            ));
        }

        let mut cheque_total: i64 = 0;
        let mut held: Vec<Cheque> = Vec::with_capacity(cmd.cheque_ids.len());
        for cheque_id in &cmd.cheque_ids {
            let model = cheques::Entity::find_by_id(*cheque_id)
                .filter(cheques::Column::TenantId.eq(cmd.tenant_id))
                .one(db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("cheque {cheque_id}")))?;
            let cheque = Cheque::try_from(model)?;

            if cheque.origin != ChequeOrigin::Received {
                return Err(EngineError::Validation(format!(
                    "cheque {cheque_id} was issued by the tenant and cannot be deposited"
                )));
            }
            match cheque.state {
                ChequeState::InPortfolio => {}
                ChequeState::DepositPending => {
                    return Err(EngineError::Validation(format!(
                        "cheque {cheque_id} is already referenced by an open deposit"
                    )));
                }
                other => {
                    return Err(EngineError::Validation(format!(
                        "cheque {cheque_id} is {} and cannot be deposited",
                        other.as_str()
                    )));
                }
            }
            if let Some(first) = held.first()
                && first.currency != cheque.currency
            {
                return Err(EngineError::Validation(
                    "cheques of mixed currencies cannot share a deposit".to_string(),
                ));
            }

            cheque_total += cheque.amount_minor;
            held.push(cheque);
        }

        let total_minor = cheque_total + cmd.cash_amount_minor;
        if total_minor <= 0 {
            return Err(EngineError::Validation(
                "deposit must carry cheques or a positive cash amount".to_string(),
            ));
        }

        let now = Utc::now();
        let today = now.date_naive();
        let deposit_id = Uuid::new_v4();

        let outbound = TreasuryMovement::pending(
            cmd.tenant_id,
            AccountKind::Cash,
            cmd.cash_account_id,
            -total_minor,
            MovementRelation::CashDeposit,
            deposit_id,
            today,
            "cash deposit handover to bank".to_string(),
        );
        let inbound = TreasuryMovement::pending(
            cmd.tenant_id,
            AccountKind::Bank,
            cmd.bank_account_id,
            total_minor,
            MovementRelation::CashDeposit,
            deposit_id,
            today,
            "cash deposit credit from cash point".to_string(),
        );
        movements::ActiveModel::from(&outbound).insert(db_tx).await?;
        movements::ActiveModel::from(&inbound).insert(db_tx).await?;

        let deposit = CashDeposit {
            id: deposit_id,
            tenant_id: cmd.tenant_id,
            cash_account_id: cmd.cash_account_id,
            bank_account_id: cmd.bank_account_id,
            cash_amount_minor: cmd.cash_amount_minor,
            state: DepositState::Pending,
            cheque_ids: held.iter().map(|cheque| cheque.id).collect(),
            outbound_movement_id: outbound.id,
            inbound_movement_id: inbound.id,
            confirmed_by: None,
            confirmed_at: None,
            created_at: now,
        };
        deposits::ActiveModel::from(&deposit).insert(db_tx).await?;

        for cheque in &held {
            let link = deposit_cheques::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                deposit_id: ActiveValue::Set(deposit_id),
                cheque_id: ActiveValue::Set(cheque.id),
            };
            link.insert(db_tx).await?;

            let hold = cheques::ActiveModel {
                id: ActiveValue::Set(cheque.id),
                state: ActiveValue::Set(ChequeState::DepositPending.as_str().to_string()),
                deposited_account_id: ActiveValue::Set(Some(cmd.bank_account_id)),
                deposit_date: ActiveValue::Set(Some(now)),
                ..Default::default()
            };
            hold.update(db_tx).await?;
        }

        Ok(deposit)
    }

    /// Confirms a pending deposit: the deposit, both movements and every held
    /// cheque flip to their confirmed counterparts atomically. A retried
    /// confirm replays the prior result instead of re-running.
    pub async fn confirm_deposit(
        &self,
        cmd: DepositDecisionCmd,
    ) -> ResultEngine<Receipt<CashDeposit>> {
        let content = cmd.deposit_id.to_string();
        let client_key = cmd.meta.idempotency_key.clone();
        self.with_idempotency(
            cmd.tenant_id,
            OperationKind::ConfirmDeposit,
            client_key.as_deref(),
            &content,
            "cash_deposit",
            |deposit: &CashDeposit| deposit.id,
            move |engine, db_tx| {
                Box::pin(async move { engine.resolve_deposit_tx(db_tx, &cmd, true).await })
            },
        )
        .await
    }

    /// Rejects a pending deposit: movements are reversed and every held
    /// cheque returns to the portfolio, atomically.
    pub async fn reject_deposit(
        &self,
        cmd: DepositDecisionCmd,
    ) -> ResultEngine<Receipt<CashDeposit>> {
        let content = cmd.deposit_id.to_string();
        let client_key = cmd.meta.idempotency_key.clone();
        self.with_idempotency(
            cmd.tenant_id,
            OperationKind::RejectDeposit,
            client_key.as_deref(),
            &content,
            "cash_deposit",
            |deposit: &CashDeposit| deposit.id,
            move |engine, db_tx| {
                Box::pin(async move { engine.resolve_deposit_tx(db_tx, &cmd, false).await })
            },
        )
        .await
    }

    /// Shared confirm/reject transition. The `pending` guard is checked and
    /// written within the same transaction, so a concurrent second decision
    /// re-reads the flipped state and fails instead of re-applying.
    async fn resolve_deposit_tx(
        &self,
        db_tx: &DatabaseTransaction,
        cmd: &DepositDecisionCmd,
        confirm: bool,
    ) -> ResultEngine<CashDeposit> {
        let model = deposits::Entity::find_by_id(cmd.deposit_id)
            .filter(deposits::Column::TenantId.eq(cmd.tenant_id))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("deposit {}", cmd.deposit_id)))?;
        let mut deposit = CashDeposit::try_from(model)?;

        if deposit.state != DepositState::Pending {
            return Err(EngineError::state(
                "cash_deposit",
                deposit.state.as_str(),
                DepositState::Pending.as_str(),
            ));
        }

        deposit.cheque_ids = load_cheque_ids(db_tx, deposit.id).await?;

        let now = Utc::now();
        let (deposit_state, movement_status, cheque_state) = if confirm {
            (
                DepositState::Confirmed,
                MovementStatus::Confirmed,
                ChequeState::Deposited,
            )
        } else {
            (
                DepositState::Rejected,
                MovementStatus::Reversed,
                ChequeState::InPortfolio,
            )
        };

        let mut update = deposits::ActiveModel {
            id: ActiveValue::Set(deposit.id),
            state: ActiveValue::Set(deposit_state.as_str().to_string()),
            ..Default::default()
        };
        if confirm {
            update.confirmed_by = ActiveValue::Set(Some(cmd.meta.user_id.clone()));
            update.confirmed_at = ActiveValue::Set(Some(now));
        }
        update.update(db_tx).await?;

        set_movement_status(db_tx, deposit.outbound_movement_id, movement_status).await?;
        set_movement_status(db_tx, deposit.inbound_movement_id, movement_status).await?;

        for cheque_id in &deposit.cheque_ids {
            let mut hold = cheques::ActiveModel {
                id: ActiveValue::Set(*cheque_id),
                state: ActiveValue::Set(cheque_state.as_str().to_string()),
                ..Default::default()
            };
            if !confirm {
                hold.deposited_account_id = ActiveValue::Set(None);
                hold.deposit_date = ActiveValue::Set(None);
            }
            hold.update(db_tx).await?;
        }

        deposit.state = deposit_state;
        if confirm {
            deposit.confirmed_by = Some(cmd.meta.user_id.clone());
            deposit.confirmed_at = Some(now);
        }
        Ok(deposit)
    }

    /// Returns a deposit with its cheque ids.
    pub async fn deposit(&self, tenant_id: Uuid, deposit_id: Uuid) -> ResultEngine<CashDeposit> {
        let model = deposits::Entity::find_by_id(deposit_id)
            .filter(deposits::Column::TenantId.eq(tenant_id))
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("deposit {deposit_id}")))?;
        let mut deposit = CashDeposit::try_from(model)?;
        deposit.cheque_ids = load_cheque_ids(self.database(), deposit_id).await?;
        Ok(deposit)
    }
}

async fn load_cheque_ids<C: ConnectionTrait>(db: &C, deposit_id: Uuid) -> ResultEngine<Vec<Uuid>> {
    let links = deposit_cheques::Entity::find()
        .filter(deposit_cheques::Column::DepositId.eq(deposit_id))
        .order_by_asc(deposit_cheques::Column::Id)
        .all(db)
        .await?;
    Ok(links.into_iter().map(|link| link.cheque_id).collect())
}

async fn set_movement_status(
    db_tx: &DatabaseTransaction,
    movement_id: Uuid,
    status: MovementStatus,
) -> ResultEngine<()> {
    let movement = movements::ActiveModel {
        id: ActiveValue::Set(movement_id),
        status: ActiveValue::Set(status.as_str().to_string()),
        ..Default::default()
    };
    movement.update(db_tx).await?;
    Ok(())
}
