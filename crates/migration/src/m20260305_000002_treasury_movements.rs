use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
pub enum TreasuryMovements {
    Table,
    Id,
    TenantId,
    AccountKind,
    AccountId,
    AmountMinor,
    Status,
    RelatedKind,
    RelatedId,
    OccurredOn,
    Description,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TreasuryMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TreasuryMovements::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::TenantId).blob().not_null())
                    .col(
                        ColumnDef::new(TreasuryMovements::AccountKind)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::AccountId).blob().not_null())
                    .col(
                        ColumnDef::new(TreasuryMovements::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TreasuryMovements::Status).string().not_null())
                    .col(ColumnDef::new(TreasuryMovements::RelatedKind).string())
                    .col(ColumnDef::new(TreasuryMovements::RelatedId).blob())
                    .col(
                        ColumnDef::new(TreasuryMovements::OccurredOn)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TreasuryMovements::Description)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-treasury_movements-account")
                    .table(TreasuryMovements::Table)
                    .col(TreasuryMovements::TenantId)
                    .col(TreasuryMovements::AccountKind)
                    .col(TreasuryMovements::AccountId)
                    .col(TreasuryMovements::OccurredOn)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-treasury_movements-related")
                    .table(TreasuryMovements::Table)
                    .col(TreasuryMovements::RelatedKind)
                    .col(TreasuryMovements::RelatedId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TreasuryMovements::Table).to_owned())
            .await?;
        Ok(())
    }
}
