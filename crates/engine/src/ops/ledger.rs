//! Treasury movement ledger reads and append-only reversal.
//!
//! Nothing here edits a historical row: corrections enter the ledger as new
//! opposite-signed confirmed movements so the audit trail stays intact.

use chrono::Utc;
use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Cheque, EngineError, ResultEngine, TreasuryMovement,
    movements::{self, AccountKind, MovementRelation, MovementStatus},
};

use super::Engine;

impl Engine {
    /// Returns one movement of the tenant's ledger.
    pub async fn movement(
        &self,
        tenant_id: Uuid,
        movement_id: Uuid,
    ) -> ResultEngine<TreasuryMovement> {
        let model = movements::Entity::find_by_id(movement_id)
            .filter(movements::Column::TenantId.eq(tenant_id))
            .one(self.database())
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("movement {movement_id}")))?;
        TreasuryMovement::try_from(model)
    }

    /// Lists the movements recorded for one related entity, oldest first.
    pub async fn movements_for(
        &self,
        tenant_id: Uuid,
        related_kind: MovementRelation,
        related_id: Uuid,
    ) -> ResultEngine<Vec<TreasuryMovement>> {
        let models = movements::Entity::find()
            .filter(movements::Column::TenantId.eq(tenant_id))
            .filter(movements::Column::RelatedKind.eq(related_kind.as_str()))
            .filter(movements::Column::RelatedId.eq(related_id))
            .order_by_asc(movements::Column::OccurredOn)
            .order_by_asc(movements::Column::Id)
            .all(self.database())
            .await?;
        models.into_iter().map(TreasuryMovement::try_from).collect()
    }

    /// Appends the confirmed movement that claws a deposited cheque's amount
    /// back out of its deposit bank account (bounce, administrative void).
    /// The original deposit movements stay untouched.
    pub(super) async fn append_cheque_reversal(
        &self,
        db_tx: &DatabaseTransaction,
        cheque: &Cheque,
        description: String,
    ) -> ResultEngine<TreasuryMovement> {
        let account_id = cheque.deposited_account_id.ok_or_else(|| {
            EngineError::Internal(format!("cheque {} has no deposit account", cheque.id))
        })?;

        let reversal = TreasuryMovement {
            id: Uuid::new_v4(),
            tenant_id: cheque.tenant_id,
            account_kind: AccountKind::Bank,
            account_id,
            amount_minor: -cheque.amount_minor,
            status: MovementStatus::Confirmed,
            related_kind: Some(MovementRelation::Cheque),
            related_id: Some(cheque.id),
            occurred_on: Utc::now().date_naive(),
            description,
        };
        movements::ActiveModel::from(&reversal).insert(db_tx).await?;
        Ok(reversal)
    }
}
