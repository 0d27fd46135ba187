//! Internal payment records, the candidate side of reconciliation.
//!
//! The surrounding application produces these from purchasing and sales;
//! the engine only reads them as matcher input and records them on behalf
//! of tests and imports.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub bank_account_id: Uuid,
    pub counterparty_id: Uuid,
    pub counterparty_name: String,
    pub amount_minor: i64,
    pub paid_on: NaiveDate,
    pub reference: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub bank_account_id: Uuid,
    pub counterparty_id: Uuid,
    pub counterparty_name: String,
    pub amount_minor: i64,
    pub paid_on: Date,
    pub reference: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Payment> for ActiveModel {
    fn from(payment: &Payment) -> Self {
        Self {
            id: ActiveValue::Set(payment.id),
            tenant_id: ActiveValue::Set(payment.tenant_id),
            bank_account_id: ActiveValue::Set(payment.bank_account_id),
            counterparty_id: ActiveValue::Set(payment.counterparty_id),
            counterparty_name: ActiveValue::Set(payment.counterparty_name.clone()),
            amount_minor: ActiveValue::Set(payment.amount_minor),
            paid_on: ActiveValue::Set(payment.paid_on),
            reference: ActiveValue::Set(payment.reference.clone()),
        }
    }
}

impl TryFrom<Model> for Payment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tenant_id: model.tenant_id,
            bank_account_id: model.bank_account_id,
            counterparty_id: model.counterparty_id,
            counterparty_name: model.counterparty_name,
            amount_minor: model.amount_minor,
            paid_on: model.paid_on,
            reference: model.reference,
        })
    }
}
