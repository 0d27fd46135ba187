//! Cash deposit primitives.
//!
//! A `CashDeposit` groups portfolio cheques and/or counted cash into one
//! handover from a cash point to a bank account. While pending it owns a
//! pair of pending movements and the `deposit_pending` hold on its cheques.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositState {
    Pending,
    Confirmed,
    Rejected,
}

impl DepositState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }
}

impl TryFrom<&str> for DepositState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            other => Err(EngineError::Validation(format!(
                "invalid deposit state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashDeposit {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cash_account_id: Uuid,
    pub bank_account_id: Uuid,
    pub cash_amount_minor: i64,
    pub state: DepositState,
    pub cheque_ids: Vec<Uuid>,
    pub outbound_movement_id: Uuid,
    pub inbound_movement_id: Uuid,
    pub confirmed_by: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_deposits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cash_account_id: Uuid,
    pub bank_account_id: Uuid,
    pub cash_amount_minor: i64,
    pub state: String,
    pub outbound_movement_id: Uuid,
    pub inbound_movement_id: Uuid,
    pub confirmed_by: Option<String>,
    pub confirmed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deposit_cheques::Entity")]
    DepositCheques,
}

impl Related<super::deposit_cheques::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DepositCheques.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CashDeposit> for ActiveModel {
    fn from(deposit: &CashDeposit) -> Self {
        Self {
            id: ActiveValue::Set(deposit.id),
            tenant_id: ActiveValue::Set(deposit.tenant_id),
            cash_account_id: ActiveValue::Set(deposit.cash_account_id),
            bank_account_id: ActiveValue::Set(deposit.bank_account_id),
            cash_amount_minor: ActiveValue::Set(deposit.cash_amount_minor),
            state: ActiveValue::Set(deposit.state.as_str().to_string()),
            outbound_movement_id: ActiveValue::Set(deposit.outbound_movement_id),
            inbound_movement_id: ActiveValue::Set(deposit.inbound_movement_id),
            confirmed_by: ActiveValue::Set(deposit.confirmed_by.clone()),
            confirmed_at: ActiveValue::Set(deposit.confirmed_at),
            created_at: ActiveValue::Set(deposit.created_at),
        }
    }
}

impl TryFrom<Model> for CashDeposit {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tenant_id: model.tenant_id,
            cash_account_id: model.cash_account_id,
            bank_account_id: model.bank_account_id,
            cash_amount_minor: model.cash_amount_minor,
            state: DepositState::try_from(model.state.as_str())?,
            cheque_ids: Vec::new(),
            outbound_movement_id: model.outbound_movement_id,
            inbound_movement_id: model.inbound_movement_id,
            confirmed_by: model.confirmed_by,
            confirmed_at: model.confirmed_at,
            created_at: model.created_at,
        })
    }
}
