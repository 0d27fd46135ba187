//! Cheque primitives.
//!
//! A `Cheque` is a financial instrument: it is never physically deleted, only
//! moved through its state machine by the lifecycle manager or the deposit
//! orchestrator.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChequeOrigin {
    /// Received from a customer; sits in the portfolio until deposited.
    Received,
    /// Issued by the tenant to a supplier.
    Issued,
}

impl ChequeOrigin {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Issued => "issued",
        }
    }
}

impl TryFrom<&str> for ChequeOrigin {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "received" => Ok(Self::Received),
            "issued" => Ok(Self::Issued),
            other => Err(EngineError::Validation(format!(
                "invalid cheque origin: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChequeKind {
    Physical,
    Electronic,
}

impl ChequeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Electronic => "electronic",
        }
    }
}

impl TryFrom<&str> for ChequeKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "physical" => Ok(Self::Physical),
            "electronic" => Ok(Self::Electronic),
            other => Err(EngineError::Validation(format!(
                "invalid cheque kind: {other}"
            ))),
        }
    }
}

/// Document classification of the instrument.
///
/// Electronic cheques exist only as deferred-payment documents; `Common` is
/// reserved for physical instruments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocClass {
    Common,
    Deferred,
}

impl DocClass {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Deferred => "deferred",
        }
    }
}

impl TryFrom<&str> for DocClass {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "common" => Ok(Self::Common),
            "deferred" => Ok(Self::Deferred),
            other => Err(EngineError::Validation(format!(
                "invalid document class: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChequeState {
    /// In the tenant's portfolio, free to be deposited.
    InPortfolio,
    /// Referenced by a pending deposit; released on reject.
    DepositPending,
    /// Its deposit was confirmed.
    Deposited,
    Cleared,
    Rejected,
    Void,
}

impl ChequeState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InPortfolio => "in_portfolio",
            Self::DepositPending => "deposit_pending",
            Self::Deposited => "deposited",
            Self::Cleared => "cleared",
            Self::Rejected => "rejected",
            Self::Void => "void",
        }
    }

    /// Terminal states admit no further transition.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cleared | Self::Rejected | Self::Void)
    }
}

impl TryFrom<&str> for ChequeState {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "in_portfolio" => Ok(Self::InPortfolio),
            "deposit_pending" => Ok(Self::DepositPending),
            "deposited" => Ok(Self::Deposited),
            "cleared" => Ok(Self::Cleared),
            "rejected" => Ok(Self::Rejected),
            "void" => Ok(Self::Void),
            other => Err(EngineError::Validation(format!(
                "invalid cheque state: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cheque {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub origin: ChequeOrigin,
    pub kind: ChequeKind,
    pub doc_class: DocClass,
    pub number: String,
    pub bank: String,
    pub holder: String,
    pub amount_minor: i64,
    pub currency: Currency,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub state: ChequeState,
    pub bank_account_id: Option<Uuid>,
    pub deposited_account_id: Option<Uuid>,
    pub deposit_date: Option<DateTime<Utc>>,
    pub void_reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cheques")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub origin: String,
    pub kind: String,
    pub doc_class: String,
    pub number: String,
    pub bank: String,
    pub holder: String,
    pub amount_minor: i64,
    pub currency: String,
    pub issue_date: Date,
    pub due_date: Date,
    pub state: String,
    pub bank_account_id: Option<Uuid>,
    pub deposited_account_id: Option<Uuid>,
    pub deposit_date: Option<DateTimeUtc>,
    pub void_reason: Option<String>,
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

impl From<&Cheque> for ActiveModel {
    fn from(cheque: &Cheque) -> Self {
        Self {
            id: ActiveValue::Set(cheque.id),
            tenant_id: ActiveValue::Set(cheque.tenant_id),
            origin: ActiveValue::Set(cheque.origin.as_str().to_string()),
            kind: ActiveValue::Set(cheque.kind.as_str().to_string()),
            doc_class: ActiveValue::Set(cheque.doc_class.as_str().to_string()),
            number: ActiveValue::Set(cheque.number.clone()),
            bank: ActiveValue::Set(cheque.bank.clone()),
            holder: ActiveValue::Set(cheque.holder.clone()),
            amount_minor: ActiveValue::Set(cheque.amount_minor),
            currency: ActiveValue::Set(cheque.currency.code().to_string()),
            issue_date: ActiveValue::Set(cheque.issue_date),
            due_date: ActiveValue::Set(cheque.due_date),
            state: ActiveValue::Set(cheque.state.as_str().to_string()),
            bank_account_id: ActiveValue::Set(cheque.bank_account_id),
            deposited_account_id: ActiveValue::Set(cheque.deposited_account_id),
            deposit_date: ActiveValue::Set(cheque.deposit_date),
            void_reason: ActiveValue::Set(cheque.void_reason.clone()),
        }
    }
}

impl TryFrom<Model> for Cheque {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            tenant_id: model.tenant_id,
            origin: ChequeOrigin::try_from(model.origin.as_str())?,
            kind: ChequeKind::try_from(model.kind.as_str())?,
            doc_class: DocClass::try_from(model.doc_class.as_str())?,
            number: model.number,
            bank: model.bank,
            holder: model.holder,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str())?,
            issue_date: model.issue_date,
            due_date: model.due_date,
            state: ChequeState::try_from(model.state.as_str())?,
            bank_account_id: model.bank_account_id,
            deposited_account_id: model.deposited_account_id,
            deposit_date: model.deposit_date,
            void_reason: model.void_reason,
        })
    }
}

impl Cheque {
    /// Validates the document-class rule for new instruments.
    pub(crate) fn check_doc_class(kind: ChequeKind, doc_class: DocClass) -> ResultEngine<()> {
        if kind == ChequeKind::Electronic && doc_class == DocClass::Common {
            return Err(EngineError::Validation(
                "electronic cheques must use the deferred document class".to_string(),
            ));
        }
        Ok(())
    }
}
