//! Treasury ledger & reconciliation engine.
//!
//! The engine owns the financial state transitions of the treasury (cheque
//! lifecycle, cash deposits, cash closings, treasury movements), makes every
//! write idempotent against client retries, and scores fuzzy pairings
//! between externally reported bank movements and internal payments.
//!
//! Authentication, permissions and tenant resolution are external
//! collaborators: every operation takes the tenant id explicitly and assumes
//! the caller was already authorized.

pub use bank_movements::BankMovement;
pub use cheques::{Cheque, ChequeKind, ChequeOrigin, ChequeState, DocClass};
pub use closings::{CashClosing, ClosingPreview, ClosingState};
pub use commands::{
    ConfirmMatchCmd, CreateChequeCmd, CreateClosingCmd, CreateDepositCmd, DepositDecisionCmd,
    OpMeta, RecordBankMovementCmd, RecordPaymentCmd, VoidChequeCmd,
};
pub use currency::Currency;
pub use deposits::{CashDeposit, DepositState};
pub use error::EngineError;
pub use idempotency::{IdempotencyRecord, IdempotencyStatus, OperationKind};
pub use movements::{AccountKind, MovementRelation, MovementStatus, TreasuryMovement};
pub use ops::{Begun, Engine, EngineBuilder, MatchCandidate, Receipt, ReconciliationSuggestion};
pub use patterns::ReconciliationPattern;
pub use payments::Payment;
pub use scoring::{Confidence, MatcherConfig};

mod bank_movements;
mod cheques;
mod closings;
mod commands;
mod currency;
mod deposit_cheques;
mod deposits;
mod error;
mod idempotency;
mod movements;
mod ops;
mod patterns;
mod payments;
mod scoring;
mod text;

type ResultEngine<T> = Result<T, EngineError>;
