use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ars,
    Usd,
}

pub mod cheque {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ChequeOrigin {
        Received,
        Issued,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ChequeKind {
        Physical,
        Electronic,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DocClass {
        Common,
        Deferred,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ChequeState {
        InPortfolio,
        DepositPending,
        Deposited,
        Cleared,
        Rejected,
        Void,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChequeNew {
        pub origin: ChequeOrigin,
        pub kind: ChequeKind,
        pub doc_class: DocClass,
        pub number: String,
        pub bank: String,
        pub holder: String,
        pub amount_minor: i64,
        pub currency: Option<Currency>,
        pub issue_date: NaiveDate,
        pub due_date: NaiveDate,
        pub bank_account_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChequeList {
        pub state: Option<ChequeState>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChequeVoid {
        pub reason: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ChequeView {
        pub id: Uuid,
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
        pub void_reason: Option<String>,
    }
}

pub mod deposit {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DepositState {
        Pending,
        Confirmed,
        Rejected,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub cash_account_id: Uuid,
        pub bank_account_id: Uuid,
        pub cheque_ids: Vec<Uuid>,
        pub cash_amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositView {
        pub id: Uuid,
        pub cash_account_id: Uuid,
        pub bank_account_id: Uuid,
        pub cash_amount_minor: i64,
        pub state: DepositState,
        pub cheque_ids: Vec<Uuid>,
        pub outbound_movement_id: Uuid,
        pub inbound_movement_id: Uuid,
        pub confirmed_by: Option<String>,
        pub confirmed_at: Option<DateTime<Utc>>,
    }

    /// Write response: the deposit plus the idempotency replay indicator, so
    /// clients can tell "already done" from "just did it".
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositWriteResponse {
        pub deposit: DepositView,
        pub replayed: bool,
    }
}

pub mod closing {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ClosingState {
        Balanced,
        WithDifference,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingPreviewQuery {
        pub cash_account_id: Uuid,
        pub as_of: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingPreviewResponse {
        pub system_cash_minor: i64,
        pub system_cheques_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingNew {
        pub cash_account_id: Uuid,
        pub closing_date: NaiveDate,
        pub counted_cash_minor: i64,
        pub counted_cheques_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingView {
        pub id: Uuid,
        pub cash_account_id: Uuid,
        pub closing_date: NaiveDate,
        pub counted_cash_minor: i64,
        pub counted_cheques_minor: i64,
        pub system_cash_minor: i64,
        pub system_cheques_minor: i64,
        pub discrepancy_minor: i64,
        pub state: ClosingState,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ClosingWriteResponse {
        pub closing: ClosingView,
        pub summary: String,
        pub replayed: bool,
    }
}

pub mod reconciliation {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Confidence {
        Low,
        Medium,
        High,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankMovementNew {
        pub bank_account_id: Uuid,
        pub occurred_on: NaiveDate,
        pub description: String,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub bank_account_id: Uuid,
        pub counterparty_id: Uuid,
        pub counterparty_name: String,
        pub amount_minor: i64,
        pub paid_on: NaiveDate,
        pub reference: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SuggestionsQuery {
        pub bank_account_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankMovementView {
        pub id: Uuid,
        pub bank_account_id: Uuid,
        pub occurred_on: NaiveDate,
        pub description: String,
        pub amount_minor: i64,
        pub reconciled: bool,
        pub matched_payment_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MatchView {
        pub payment_id: Uuid,
        pub counterparty_id: Uuid,
        pub score: f64,
        pub confidence: Confidence,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SuggestionView {
        pub movement: BankMovementView,
        pub matches: Vec<MatchView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReconciliationConfirm {
        pub bank_movement_id: Uuid,
        pub payment_id: Uuid,
    }
}
