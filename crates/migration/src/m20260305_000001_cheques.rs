use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum Cheques {
    Table,
    Id,
    TenantId,
    Origin,
    Kind,
    DocClass,
    Number,
    Bank,
    Holder,
    AmountMinor,
    Currency,
    IssueDate,
    DueDate,
    State,
    BankAccountId,
    DepositedAccountId,
    DepositDate,
    VoidReason,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cheques::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cheques::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Cheques::TenantId).blob().not_null())
                    .col(ColumnDef::new(Cheques::Origin).string().not_null())
                    .col(ColumnDef::new(Cheques::Kind).string().not_null())
                    .col(ColumnDef::new(Cheques::DocClass).string().not_null())
                    .col(ColumnDef::new(Cheques::Number).string().not_null())
                    .col(ColumnDef::new(Cheques::Bank).string().not_null())
                    .col(ColumnDef::new(Cheques::Holder).string().not_null())
                    .col(
                        ColumnDef::new(Cheques::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Cheques::Currency).string().not_null())
                    .col(ColumnDef::new(Cheques::IssueDate).date().not_null())
                    .col(ColumnDef::new(Cheques::DueDate).date().not_null())
                    .col(ColumnDef::new(Cheques::State).string().not_null())
                    .col(ColumnDef::new(Cheques::BankAccountId).blob())
                    .col(ColumnDef::new(Cheques::DepositedAccountId).blob())
                    .col(ColumnDef::new(Cheques::DepositDate).timestamp())
                    .col(ColumnDef::new(Cheques::VoidReason).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cheques-tenant_id-state")
                    .table(Cheques::Table)
                    .col(Cheques::TenantId)
                    .col(Cheques::State)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cheques-tenant_id-due_date")
                    .table(Cheques::Table)
                    .col(Cheques::TenantId)
                    .col(Cheques::DueDate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cheques::Table).to_owned())
            .await?;
        Ok(())
    }
}
