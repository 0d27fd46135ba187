//! Learned reconciliation patterns.
//!
//! One row per `(tenant, normalized description)` pointing at a
//! counterparty. `hits` accumulates evidence on repeat confirmations; a
//! conflicting re-association overwrites only its own key.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationPattern {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub text_key: String,
    pub counterparty_id: Uuid,
    pub hits: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reconciliation_patterns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub text_key: String,
    pub counterparty_id: Uuid,
    pub hits: i64,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ReconciliationPattern {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            text_key: model.text_key,
            counterparty_id: model.counterparty_id,
            hits: model.hits,
        }
    }
}

impl From<&ReconciliationPattern> for ActiveModel {
    fn from(pattern: &ReconciliationPattern) -> Self {
        Self {
            id: ActiveValue::Set(pattern.id),
            tenant_id: ActiveValue::Set(pattern.tenant_id),
            text_key: ActiveValue::Set(pattern.text_key.clone()),
            counterparty_id: ActiveValue::Set(pattern.counterparty_id),
            hits: ActiveValue::Set(pattern.hits),
            updated_at: ActiveValue::Set(chrono::Utc::now()),
        }
    }
}
