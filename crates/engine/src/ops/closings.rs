//! Cash closing calculation.
//!
//! The system-side expectation is derived from the ledger (confirmed cash
//! movements up to the closing date) plus the cheque portfolio; the closing
//! row freezes counted vs. expected and their discrepancy.

use chrono::{NaiveDate, Utc};
use sea_orm::{ConnectionTrait, QueryFilter, Statement, prelude::*};
use uuid::Uuid;

use crate::{
    CashClosing, ChequeOrigin, ChequeState, ClosingPreview, ClosingState, CreateClosingCmd,
    EngineError, ResultEngine, closings,
    idempotency::OperationKind,
    movements::{AccountKind, MovementStatus},
};

use super::{Engine, idempotency::Receipt};

impl Engine {
    /// Computes the system-expected balances for a cash account as of a
    /// date. Read-only, no side effects.
    pub async fn preview_closing(
        &self,
        tenant_id: Uuid,
        cash_account_id: Uuid,
        as_of: NaiveDate,
    ) -> ResultEngine<ClosingPreview> {
        system_totals(self.database(), tenant_id, cash_account_id, as_of).await
    }

    /// Records the closing for `(cash account, date)`. Fails with
    /// [`EngineError::DuplicateClosing`] when one already exists; the first
    /// closing is never overwritten.
    pub async fn create_closing(
        &self,
        cmd: CreateClosingCmd,
    ) -> ResultEngine<Receipt<CashClosing>> {
        let content = format!(
            "{}|{}|{}|{}",
            cmd.cash_account_id, cmd.closing_date, cmd.counted_cash_minor, cmd.counted_cheques_minor
        );
        let client_key = cmd.meta.idempotency_key.clone();
        self.with_idempotency(
            cmd.tenant_id,
            OperationKind::CreateClosing,
            client_key.as_deref(),
            &content,
            "cash_closing",
            |closing: &CashClosing| closing.id,
            move |engine, db_tx| Box::pin(async move { engine.create_closing_tx(db_tx, &cmd).await }),
        )
        .await
    }

    async fn create_closing_tx(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        cmd: &CreateClosingCmd,
    ) -> ResultEngine<CashClosing> {
        if cmd.counted_cash_minor < 0 || cmd.counted_cheques_minor < 0 {
            return Err(EngineError::Validation(
                "counted amounts must be >= 0".to_string(),
            ));
        }

        let existing = closings::Entity::find()
            .filter(closings::Column::TenantId.eq(cmd.tenant_id))
            .filter(closings::Column::CashAccountId.eq(cmd.cash_account_id))
            .filter(closings::Column::ClosingDate.eq(cmd.closing_date))
            .one(db_tx)
            .await?;
        if existing.is_some() {
            return Err(EngineError::DuplicateClosing(format!(
                "account {} on {}",
                cmd.cash_account_id, cmd.closing_date
            )));
        }

        let preview =
            system_totals(db_tx, cmd.tenant_id, cmd.cash_account_id, cmd.closing_date).await?;
        let counted_total = cmd.counted_cash_minor + cmd.counted_cheques_minor;
        let system_total = preview.system_cash_minor + preview.system_cheques_minor;
        let discrepancy_minor = counted_total - system_total;

        let closing = CashClosing {
            id: Uuid::new_v4(),
            tenant_id: cmd.tenant_id,
            cash_account_id: cmd.cash_account_id,
            closing_date: cmd.closing_date,
            counted_cash_minor: cmd.counted_cash_minor,
            counted_cheques_minor: cmd.counted_cheques_minor,
            system_cash_minor: preview.system_cash_minor,
            system_cheques_minor: preview.system_cheques_minor,
            discrepancy_minor,
            state: if discrepancy_minor == 0 {
                ClosingState::Balanced
            } else {
                ClosingState::WithDifference
            },
            created_by: cmd.meta.user_id.clone(),
            created_at: Utc::now(),
        };
        closings::ActiveModel::from(&closing).insert(db_tx).await?;
        Ok(closing)
    }

    /// Returns one closing of the tenant.
    pub async fn closing(&self, tenant_id: Uuid, closing_id: Uuid) -> ResultEngine<CashClosing> {
        let model = closings::Entity::find_by_id(closing_id)
            .filter(closings::Column::TenantId.eq(tenant_id))
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("closing {closing_id}")))?;
        CashClosing::try_from(model)
    }
}

/// Sums confirmed cash movements dated `<= as_of` for the account, plus the
/// tenant's received-cheque portfolio. The portfolio has no per-cash-point
/// split, so it is counted tenant-wide.
async fn system_totals<C: ConnectionTrait>(
    db: &C,
    tenant_id: Uuid,
    cash_account_id: Uuid,
    as_of: NaiveDate,
) -> ResultEngine<ClosingPreview> {
    let backend = db.get_database_backend();

    let system_cash_minor: i64 = {
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
             FROM treasury_movements \
             WHERE tenant_id = ? AND account_kind = ? AND account_id = ? \
               AND status = ? AND occurred_on <= ?",
            vec![
                tenant_id.into(),
                AccountKind::Cash.as_str().into(),
                cash_account_id.into(),
                MovementStatus::Confirmed.as_str().into(),
                as_of.into(),
            ],
        );
        let row = db.query_one(stmt).await?;
        row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
    };

    let system_cheques_minor: i64 = {
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
             FROM cheques \
             WHERE tenant_id = ? AND origin = ? AND state = ?",
            vec![
                tenant_id.into(),
                ChequeOrigin::Received.as_str().into(),
                ChequeState::InPortfolio.as_str().into(),
            ],
        );
        let row = db.query_one(stmt).await?;
        row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
    };

    Ok(ClosingPreview {
        system_cash_minor,
        system_cheques_minor,
    })
}
