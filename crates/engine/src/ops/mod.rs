use std::{future::Future, pin::Pin};

use chrono::Duration;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{EngineError, ResultEngine, scoring::MatcherConfig};

mod cheques;
mod closings;
mod deposits;
mod idempotency;
mod ledger;
mod reconciliation;

pub use idempotency::{Begun, Receipt};
pub use reconciliation::{MatchCandidate, ReconciliationSuggestion};

pub(crate) type BoxTxFuture<'t, T> = Pin<Box<dyn Future<Output = ResultEngine<T>> + Send + 't>>;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    matcher: MatcherConfig,
    /// Age after which an `in_progress` idempotency record left by a crashed
    /// process may be reclaimed by a retry.
    staleness: Duration,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub(crate) fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    pub(crate) fn matcher(&self) -> &MatcherConfig {
        &self.matcher
    }

    /// Run a block inside a DB transaction, committing on success. On error
    /// the transaction is dropped and rolls back, so no partial flip ever
    /// survives a failed operation.
    pub(crate) async fn with_tx<T, F>(&self, run: F) -> ResultEngine<T>
    where
        F: for<'t> FnOnce(&'t Engine, &'t DatabaseTransaction) -> BoxTxFuture<'t, T>,
    {
        let db_tx = self.database.begin().await?;
        match run(self, &db_tx).await {
            Ok(value) => {
                db_tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    matcher: MatcherConfig,
    staleness: Duration,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            matcher: MatcherConfig::default(),
            staleness: Duration::minutes(5),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Override the matcher tuning knobs (defaults are hand-tuned, see
    /// [`MatcherConfig`]).
    pub fn matcher(mut self, matcher: MatcherConfig) -> EngineBuilder {
        self.matcher = matcher;
        self
    }

    /// Override the idempotency staleness threshold.
    pub fn staleness(mut self, staleness: Duration) -> EngineBuilder {
        self.staleness = staleness;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            matcher: self.matcher,
            staleness: self.staleness,
        })
    }
}
