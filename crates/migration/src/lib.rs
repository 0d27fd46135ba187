pub use sea_orm_migration::prelude::*;

mod m20260305_000001_cheques;
mod m20260305_000002_treasury_movements;
mod m20260308_000001_cash_deposits;
mod m20260315_000001_cash_closings;
mod m20260322_000001_reconciliation;
mod m20260401_000001_idempotency;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260305_000001_cheques::Migration),
            Box::new(m20260305_000002_treasury_movements::Migration),
            Box::new(m20260308_000001_cash_deposits::Migration),
            Box::new(m20260315_000001_cash_closings::Migration),
            Box::new(m20260322_000001_reconciliation::Migration),
            Box::new(m20260401_000001_idempotency::Migration),
        ]
    }
}
