use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    TenantId,
    BankAccountId,
    CounterpartyId,
    CounterpartyName,
    AmountMinor,
    PaidOn,
    Reference,
}

#[derive(Iden)]
enum BankMovements {
    Table,
    Id,
    TenantId,
    BankAccountId,
    OccurredOn,
    Description,
    AmountMinor,
    Reconciled,
    MatchedPaymentId,
}

#[derive(Iden)]
enum ReconciliationPatterns {
    Table,
    Id,
    TenantId,
    TextKey,
    CounterpartyId,
    Hits,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Payments::TenantId).blob().not_null())
                    .col(ColumnDef::new(Payments::BankAccountId).blob().not_null())
                    .col(ColumnDef::new(Payments::CounterpartyId).blob().not_null())
                    .col(
                        ColumnDef::new(Payments::CounterpartyName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::AmountMinor).big_integer().not_null())
                    .col(ColumnDef::new(Payments::PaidOn).date().not_null())
                    .col(ColumnDef::new(Payments::Reference).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payments-tenant_id-paid_on")
                    .table(Payments::Table)
                    .col(Payments::TenantId)
                    .col(Payments::PaidOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BankMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankMovements::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BankMovements::TenantId).blob().not_null())
                    .col(ColumnDef::new(BankMovements::BankAccountId).blob().not_null())
                    .col(ColumnDef::new(BankMovements::OccurredOn).date().not_null())
                    .col(ColumnDef::new(BankMovements::Description).string().not_null())
                    .col(
                        ColumnDef::new(BankMovements::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BankMovements::Reconciled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(BankMovements::MatchedPaymentId).blob())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bank_movements-tenant_id-reconciled")
                    .table(BankMovements::Table)
                    .col(BankMovements::TenantId)
                    .col(BankMovements::Reconciled)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReconciliationPatterns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReconciliationPatterns::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReconciliationPatterns::TenantId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReconciliationPatterns::TextKey)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReconciliationPatterns::CounterpartyId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReconciliationPatterns::Hits)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReconciliationPatterns::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uidx-reconciliation_patterns-tenant_id-text_key")
                    .table(ReconciliationPatterns::Table)
                    .col(ReconciliationPatterns::TenantId)
                    .col(ReconciliationPatterns::TextKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReconciliationPatterns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        Ok(())
    }
}
