use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum CashClosings {
    Table,
    Id,
    TenantId,
    CashAccountId,
    ClosingDate,
    CountedCashMinor,
    CountedChequesMinor,
    SystemCashMinor,
    SystemChequesMinor,
    DiscrepancyMinor,
    State,
    CreatedBy,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashClosings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashClosings::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashClosings::TenantId).blob().not_null())
                    .col(ColumnDef::new(CashClosings::CashAccountId).blob().not_null())
                    .col(ColumnDef::new(CashClosings::ClosingDate).date().not_null())
                    .col(
                        ColumnDef::new(CashClosings::CountedCashMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashClosings::CountedChequesMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashClosings::SystemCashMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashClosings::SystemChequesMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashClosings::DiscrepancyMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashClosings::State).string().not_null())
                    .col(ColumnDef::new(CashClosings::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(CashClosings::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One closing per account per date.
        manager
            .create_index(
                Index::create()
                    .name("uidx-cash_closings-tenant_id-account-date")
                    .table(CashClosings::Table)
                    .col(CashClosings::TenantId)
                    .col(CashClosings::CashAccountId)
                    .col(CashClosings::ClosingDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashClosings::Table).to_owned())
            .await?;
        Ok(())
    }
}
