#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    Cheque, ChequeKind, ChequeOrigin, CreateChequeCmd, Engine, MovementStatus,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Records a received physical cheque sitting in the portfolio.
pub async fn portfolio_cheque(engine: &Engine, tenant_id: Uuid, amount_minor: i64) -> Cheque {
    engine
        .create_cheque(CreateChequeCmd::new(
            tenant_id,
            ChequeOrigin::Received,
            ChequeKind::Physical,
            format!("{:08}", amount_minor % 100_000_000),
            "Banco Nación",
            "Cliente SA",
            amount_minor,
            date(2026, 3, 1),
            date(2026, 4, 1),
        ))
        .await
        .unwrap()
}

/// Seeds a confirmed cash movement directly, standing in for the
/// collections the wider application would have recorded.
pub async fn seed_cash_movement(
    db: &DatabaseConnection,
    tenant_id: Uuid,
    cash_account_id: Uuid,
    amount_minor: i64,
    occurred_on: NaiveDate,
) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO treasury_movements \
         (id, tenant_id, account_kind, account_id, amount_minor, status, occurred_on, description) \
         VALUES (?, ?, 'cash', ?, ?, ?, ?, 'seeded collection')",
        vec![
            Uuid::new_v4().into(),
            tenant_id.into(),
            cash_account_id.into(),
            amount_minor.into(),
            MovementStatus::Confirmed.as_str().into(),
            occurred_on.into(),
        ],
    ))
    .await
    .unwrap();
}
