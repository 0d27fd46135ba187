//! Cash closing primitives.
//!
//! A `CashClosing` freezes the counted-vs-expected comparison of one cash
//! account for one date. At most one closing exists per account/date.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingState {
    Balanced,
    WithDifference,
}

impl ClosingState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::WithDifference => "with_difference",
        }
    }
}

impl TryFrom<&str> for ClosingState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "balanced" => Ok(Self::Balanced),
            "with_difference" => Ok(Self::WithDifference),
            other => Err(EngineError::Validation(format!(
                "invalid closing state: {other}"
            ))),
        }
    }
}

/// Read-only system-side totals for a closing preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingPreview {
    pub system_cash_minor: i64,
    pub system_cheques_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashClosing {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cash_account_id: Uuid,
    pub closing_date: NaiveDate,
    pub counted_cash_minor: i64,
    pub counted_cheques_minor: i64,
    pub system_cash_minor: i64,
    pub system_cheques_minor: i64,
    pub discrepancy_minor: i64,
    pub state: ClosingState,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl CashClosing {
    /// One-line operator summary of the closing outcome.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.state {
            ClosingState::Balanced => format!("closing for {} balanced", self.closing_date),
            ClosingState::WithDifference => format!(
                "closing for {} has a difference of {}",
                self.closing_date,
                format_minor(self.discrepancy_minor)
            ),
        }
    }
}

/// Formats minor units as a decimal amount, e.g. `-5000` → `-50.00`.
pub(crate) fn format_minor(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cash_closings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub cash_account_id: Uuid,
    pub closing_date: Date,
    pub counted_cash_minor: i64,
    pub counted_cheques_minor: i64,
    pub system_cash_minor: i64,
    pub system_cheques_minor: i64,
    pub discrepancy_minor: i64,
    pub state: String,
    pub created_by: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&CashClosing> for ActiveModel {
    fn from(closing: &CashClosing) -> Self {
        Self {
            id: ActiveValue::Set(closing.id),
            tenant_id: ActiveValue::Set(closing.tenant_id),
            cash_account_id: ActiveValue::Set(closing.cash_account_id),
            closing_date: ActiveValue::Set(closing.closing_date),
            counted_cash_minor: ActiveValue::Set(closing.counted_cash_minor),
            counted_cheques_minor: ActiveValue::Set(closing.counted_cheques_minor),
            system_cash_minor: ActiveValue::Set(closing.system_cash_minor),
            system_cheques_minor: ActiveValue::Set(closing.system_cheques_minor),
            discrepancy_minor: ActiveValue::Set(closing.discrepancy_minor),
            state: ActiveValue::Set(closing.state.as_str().to_string()),
            created_by: ActiveValue::Set(closing.created_by.clone()),
            created_at: ActiveValue::Set(closing.created_at),
        }
    }
}

impl TryFrom<Model> for CashClosing {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tenant_id: model.tenant_id,
            cash_account_id: model.cash_account_id,
            closing_date: model.closing_date,
            counted_cash_minor: model.counted_cash_minor,
            counted_cheques_minor: model.counted_cheques_minor,
            system_cash_minor: model.system_cash_minor,
            system_cheques_minor: model.system_cheques_minor,
            discrepancy_minor: model.discrepancy_minor,
            state: ClosingState::try_from(model.state.as_str())?,
            created_by: model.created_by,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::format_minor;

    #[test]
    fn format_minor_handles_signs_and_padding() {
        assert_eq!(format_minor(0), "0.00");
        assert_eq!(format_minor(-5000), "-50.00");
        assert_eq!(format_minor(100_005), "1000.05");
    }
}
