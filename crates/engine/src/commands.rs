//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{ChequeKind, ChequeOrigin, Currency, DocClass};

/// Common metadata for idempotent write operations.
#[derive(Clone, Debug)]
pub struct OpMeta {
    /// Caller-supplied idempotency key; when absent a content hash of the
    /// request takes its place.
    pub idempotency_key: Option<String>,
    /// Acting operator, recorded on the entities that keep an audit field.
    pub user_id: String,
}

impl OpMeta {
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            idempotency_key: None,
            user_id: user_id.into(),
        }
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Record a new cheque.
#[derive(Clone, Debug)]
pub struct CreateChequeCmd {
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
    pub bank_account_id: Option<Uuid>,
}

impl CreateChequeCmd {
    #[must_use]
    pub fn new(
        tenant_id: Uuid,
        origin: ChequeOrigin,
        kind: ChequeKind,
        number: impl Into<String>,
        bank: impl Into<String>,
        holder: impl Into<String>,
        amount_minor: i64,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            tenant_id,
            origin,
            kind,
            doc_class: DocClass::Deferred,
            number: number.into(),
            bank: bank.into(),
            holder: holder.into(),
            amount_minor,
            currency: Currency::default(),
            issue_date,
            due_date,
            bank_account_id: None,
        }
    }

    #[must_use]
    pub fn doc_class(mut self, doc_class: DocClass) -> Self {
        self.doc_class = doc_class;
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn bank_account_id(mut self, bank_account_id: Uuid) -> Self {
        self.bank_account_id = Some(bank_account_id);
        self
    }
}

/// Administratively cancel a cheque.
#[derive(Clone, Debug)]
pub struct VoidChequeCmd {
    pub tenant_id: Uuid,
    pub cheque_id: Uuid,
    pub reason: String,
}

impl VoidChequeCmd {
    #[must_use]
    pub fn new(tenant_id: Uuid, cheque_id: Uuid, reason: impl Into<String>) -> Self {
        Self {
            tenant_id,
            cheque_id,
            reason: reason.into(),
        }
    }
}

/// Group cheques and/or cash into a new pending deposit.
#[derive(Clone, Debug)]
pub struct CreateDepositCmd {
    pub tenant_id: Uuid,
    pub cash_account_id: Uuid,
    pub bank_account_id: Uuid,
    pub cheque_ids: Vec<Uuid>,
    pub cash_amount_minor: i64,
    pub meta: OpMeta,
}

impl CreateDepositCmd {
    #[must_use]
    pub fn new(
        tenant_id: Uuid,
        cash_account_id: Uuid,
        bank_account_id: Uuid,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            cash_account_id,
            bank_account_id,
            cheque_ids: Vec::new(),
            cash_amount_minor: 0,
            meta: OpMeta::new(user_id),
        }
    }

    #[must_use]
    pub fn cheque_ids(mut self, cheque_ids: Vec<Uuid>) -> Self {
        self.cheque_ids = cheque_ids;
        self
    }

    #[must_use]
    pub fn cash_amount_minor(mut self, cash_amount_minor: i64) -> Self {
        self.cash_amount_minor = cash_amount_minor;
        self
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.meta.idempotency_key = Some(key.into());
        self
    }
}

/// Confirm or reject a pending deposit.
#[derive(Clone, Debug)]
pub struct DepositDecisionCmd {
    pub tenant_id: Uuid,
    pub deposit_id: Uuid,
    pub meta: OpMeta,
}

impl DepositDecisionCmd {
    #[must_use]
    pub fn new(tenant_id: Uuid, deposit_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            tenant_id,
            deposit_id,
            meta: OpMeta::new(user_id),
        }
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.meta.idempotency_key = Some(key.into());
        self
    }
}

/// Record a cash closing for an account/date.
#[derive(Clone, Debug)]
pub struct CreateClosingCmd {
    pub tenant_id: Uuid,
    pub cash_account_id: Uuid,
    pub closing_date: NaiveDate,
    pub counted_cash_minor: i64,
    pub counted_cheques_minor: i64,
    pub meta: OpMeta,
}

impl CreateClosingCmd {
    #[must_use]
    pub fn new(
        tenant_id: Uuid,
        cash_account_id: Uuid,
        closing_date: NaiveDate,
        counted_cash_minor: i64,
        counted_cheques_minor: i64,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            cash_account_id,
            closing_date,
            counted_cash_minor,
            counted_cheques_minor,
            meta: OpMeta::new(user_id),
        }
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.meta.idempotency_key = Some(key.into());
        self
    }
}

/// Register an externally reported bank movement.
#[derive(Clone, Debug)]
pub struct RecordBankMovementCmd {
    pub tenant_id: Uuid,
    pub bank_account_id: Uuid,
    pub occurred_on: NaiveDate,
    pub description: String,
    pub amount_minor: i64,
}

impl RecordBankMovementCmd {
    #[must_use]
    pub fn new(
        tenant_id: Uuid,
        bank_account_id: Uuid,
        occurred_on: NaiveDate,
        description: impl Into<String>,
        amount_minor: i64,
    ) -> Self {
        Self {
            tenant_id,
            bank_account_id,
            occurred_on,
            description: description.into(),
            amount_minor,
        }
    }
}

/// Register an internal payment candidate.
#[derive(Clone, Debug)]
pub struct RecordPaymentCmd {
    pub tenant_id: Uuid,
    pub bank_account_id: Uuid,
    pub counterparty_id: Uuid,
    pub counterparty_name: String,
    pub amount_minor: i64,
    pub paid_on: NaiveDate,
    pub reference: Option<String>,
}

impl RecordPaymentCmd {
    #[must_use]
    pub fn new(
        tenant_id: Uuid,
        bank_account_id: Uuid,
        counterparty_id: Uuid,
        counterparty_name: impl Into<String>,
        amount_minor: i64,
        paid_on: NaiveDate,
    ) -> Self {
        Self {
            tenant_id,
            bank_account_id,
            counterparty_id,
            counterparty_name: counterparty_name.into(),
            amount_minor,
            paid_on,
            reference: None,
        }
    }

    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// Confirm one bank movement / payment pairing.
#[derive(Clone, Debug)]
pub struct ConfirmMatchCmd {
    pub tenant_id: Uuid,
    pub bank_movement_id: Uuid,
    pub payment_id: Uuid,
}

impl ConfirmMatchCmd {
    #[must_use]
    pub fn new(tenant_id: Uuid, bank_movement_id: Uuid, payment_id: Uuid) -> Self {
        Self {
            tenant_id,
            bank_movement_id,
            payment_id,
        }
    }
}
