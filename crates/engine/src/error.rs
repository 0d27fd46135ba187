//! The module contains the error the engine can throw.
//!
//! Business-rule failures are typed variants so callers can branch on them;
//! only infrastructure problems travel through [`Database`] / [`Internal`].
//!
//!  [`Database`]: EngineError::Database
//!  [`Internal`]: EngineError::Internal
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// An identical operation is currently in progress for the same
    /// idempotency key. Retry later with the *same* key.
    #[error("operation already in progress: {0}")]
    Conflict(String),
    /// The entity is not in the state the transition requires.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// The input violates a business rule.
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found")]
    NotFound(String),
    /// A cash closing already exists for the account/date pair.
    #[error("closing already exists: {0}")]
    DuplicateClosing(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Stable machine-readable code for API payloads and logs.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "conflict",
            Self::InvalidState(_) => "invalid_state",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::DuplicateClosing(_) => "duplicate_closing",
            Self::Internal(_) => "internal",
            Self::Database(_) => "database",
        }
    }

    /// Builds an [`InvalidState`] naming the current vs. required state, so
    /// operators can see at a glance why a transition was refused.
    ///
    /// [`InvalidState`]: EngineError::InvalidState
    pub(crate) fn state(entity: &str, current: &str, required: &str) -> Self {
        Self::InvalidState(format!("{entity} is {current}, requires {required}"))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::DuplicateClosing(a), Self::DuplicateClosing(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
