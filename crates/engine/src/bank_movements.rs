//! Externally reported bank statement movements.
//!
//! Rows arrive from statement imports and are only ever mutated by the
//! reconciliation confirm step, which sets `reconciled` and the matched
//! payment reference.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankMovement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub bank_account_id: Uuid,
    pub occurred_on: NaiveDate,
    pub description: String,
    /// Signed: credits positive, debits negative.
    pub amount_minor: i64,
    pub reconciled: bool,
    pub matched_payment_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub bank_account_id: Uuid,
    pub occurred_on: Date,
    pub description: String,
    pub amount_minor: i64,
    pub reconciled: bool,
    pub matched_payment_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BankMovement> for ActiveModel {
    fn from(movement: &BankMovement) -> Self {
        Self {
            id: ActiveValue::Set(movement.id),
            tenant_id: ActiveValue::Set(movement.tenant_id),
            bank_account_id: ActiveValue::Set(movement.bank_account_id),
            occurred_on: ActiveValue::Set(movement.occurred_on),
            description: ActiveValue::Set(movement.description.clone()),
            amount_minor: ActiveValue::Set(movement.amount_minor),
            reconciled: ActiveValue::Set(movement.reconciled),
            matched_payment_id: ActiveValue::Set(movement.matched_payment_id),
        }
    }
}

impl From<Model> for BankMovement {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            bank_account_id: model.bank_account_id,
            occurred_on: model.occurred_on,
            description: model.description,
            amount_minor: model.amount_minor,
            reconciled: model.reconciled,
            matched_payment_id: model.matched_payment_id,
        }
    }
}
