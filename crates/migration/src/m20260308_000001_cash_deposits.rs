use sea_orm_migration::prelude::*;

use crate::m20260305_000001_cheques::Cheques;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum CashDeposits {
    Table,
    Id,
    TenantId,
    CashAccountId,
    BankAccountId,
    CashAmountMinor,
    State,
    OutboundMovementId,
    InboundMovementId,
    ConfirmedBy,
    ConfirmedAt,
    CreatedAt,
}

#[derive(Iden)]
enum DepositCheques {
    Table,
    Id,
    DepositId,
    ChequeId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashDeposits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashDeposits::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashDeposits::TenantId).blob().not_null())
                    .col(ColumnDef::new(CashDeposits::CashAccountId).blob().not_null())
                    .col(ColumnDef::new(CashDeposits::BankAccountId).blob().not_null())
                    .col(
                        ColumnDef::new(CashDeposits::CashAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashDeposits::State).string().not_null())
                    .col(
                        ColumnDef::new(CashDeposits::OutboundMovementId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashDeposits::InboundMovementId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CashDeposits::ConfirmedBy).string())
                    .col(ColumnDef::new(CashDeposits::ConfirmedAt).timestamp())
                    .col(ColumnDef::new(CashDeposits::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_deposits-tenant_id-state")
                    .table(CashDeposits::Table)
                    .col(CashDeposits::TenantId)
                    .col(CashDeposits::State)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DepositCheques::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DepositCheques::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DepositCheques::DepositId).blob().not_null())
                    .col(ColumnDef::new(DepositCheques::ChequeId).blob().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposit_cheques-deposit_id")
                            .from(DepositCheques::Table, DepositCheques::DepositId)
                            .to(CashDeposits::Table, CashDeposits::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-deposit_cheques-cheque_id")
                            .from(DepositCheques::Table, DepositCheques::ChequeId)
                            .to(Cheques::Table, Cheques::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deposit_cheques-deposit_id")
                    .table(DepositCheques::Table)
                    .col(DepositCheques::DepositId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-deposit_cheques-cheque_id")
                    .table(DepositCheques::Table)
                    .col(DepositCheques::ChequeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DepositCheques::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CashDeposits::Table).to_owned())
            .await?;
        Ok(())
    }
}
