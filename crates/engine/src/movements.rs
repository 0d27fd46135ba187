//! Treasury movement ledger primitives.
//!
//! A `TreasuryMovement` is one signed money movement on a cash or bank
//! account. The ledger is append-mostly: rows flip `pending → confirmed` or
//! `→ reversed`, and corrections are new opposite-signed rows, never edits.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Cash,
    Bank,
}

impl AccountKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Bank => "bank",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash" => Ok(Self::Cash),
            "bank" => Ok(Self::Bank),
            other => Err(EngineError::Validation(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementStatus {
    Pending,
    Confirmed,
    /// Terminal; a reversed movement never contributes to balances again.
    Reversed,
}

impl MovementStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Reversed => "reversed",
        }
    }
}

impl TryFrom<&str> for MovementStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "reversed" => Ok(Self::Reversed),
            other => Err(EngineError::Validation(format!(
                "invalid movement status: {other}"
            ))),
        }
    }
}

/// Entity a movement was recorded for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementRelation {
    CashDeposit,
    Cheque,
}

impl MovementRelation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CashDeposit => "cash_deposit",
            Self::Cheque => "cheque",
        }
    }
}

impl TryFrom<&str> for MovementRelation {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "cash_deposit" => Ok(Self::CashDeposit),
            "cheque" => Ok(Self::Cheque),
            other => Err(EngineError::Validation(format!(
                "invalid movement relation: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreasuryMovement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub account_kind: AccountKind,
    pub account_id: Uuid,
    /// Signed: positive credits the account, negative debits it.
    pub amount_minor: i64,
    pub status: MovementStatus,
    pub related_kind: Option<MovementRelation>,
    pub related_id: Option<Uuid>,
    pub occurred_on: NaiveDate,
    pub description: String,
}

impl TreasuryMovement {
    pub(crate) fn pending(
        tenant_id: Uuid,
        account_kind: AccountKind,
        account_id: Uuid,
        amount_minor: i64,
        related_kind: MovementRelation,
        related_id: Uuid,
        occurred_on: NaiveDate,
        description: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            account_kind,
            account_id,
            amount_minor,
            status: MovementStatus::Pending,
            related_kind: Some(related_kind),
            related_id: Some(related_id),
            occurred_on,
            description,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "treasury_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub account_kind: String,
    pub account_id: Uuid,
    pub amount_minor: i64,
    pub status: String,
    pub related_kind: Option<String>,
    pub related_id: Option<Uuid>,
    pub occurred_on: Date,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TreasuryMovement> for ActiveModel {
    fn from(movement: &TreasuryMovement) -> Self {
        Self {
            id: ActiveValue::Set(movement.id),
            tenant_id: ActiveValue::Set(movement.tenant_id),
            account_kind: ActiveValue::Set(movement.account_kind.as_str().to_string()),
            account_id: ActiveValue::Set(movement.account_id),
            amount_minor: ActiveValue::Set(movement.amount_minor),
            status: ActiveValue::Set(movement.status.as_str().to_string()),
            related_kind: ActiveValue::Set(
                movement.related_kind.map(|kind| kind.as_str().to_string()),
            ),
            related_id: ActiveValue::Set(movement.related_id),
            occurred_on: ActiveValue::Set(movement.occurred_on),
            description: ActiveValue::Set(movement.description.clone()),
        }
    }
}

impl TryFrom<Model> for TreasuryMovement {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tenant_id: model.tenant_id,
            account_kind: AccountKind::try_from(model.account_kind.as_str())?,
            account_id: model.account_id,
            amount_minor: model.amount_minor,
            status: MovementStatus::try_from(model.status.as_str())?,
            related_kind: model
                .related_kind
                .as_deref()
                .map(MovementRelation::try_from)
                .transpose()?,
            related_id: model.related_id,
            occurred_on: model.occurred_on,
            description: model.description,
        })
    }
}
