use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum IdempotencyRecords {
    Table,
    Id,
    TenantId,
    Operation,
    Key,
    Status,
    ResultPayload,
    EntityKind,
    EntityId,
    CreatedAt,
    CompletedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(IdempotencyRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(IdempotencyRecords::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(IdempotencyRecords::TenantId).blob().not_null())
                    .col(
                        ColumnDef::new(IdempotencyRecords::Operation)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IdempotencyRecords::Key).string().not_null())
                    .col(ColumnDef::new(IdempotencyRecords::Status).string().not_null())
                    .col(ColumnDef::new(IdempotencyRecords::ResultPayload).string())
                    .col(ColumnDef::new(IdempotencyRecords::EntityKind).string())
                    .col(ColumnDef::new(IdempotencyRecords::EntityId).blob())
                    .col(
                        ColumnDef::new(IdempotencyRecords::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(IdempotencyRecords::CompletedAt).timestamp())
                    .to_owned(),
            )
            .await?;

        // Concurrent duplicates race on this index; at most one in-progress
        // or completed execution per key.
        manager
            .create_index(
                Index::create()
                    .name("uidx-idempotency_records-tenant_id-operation-key")
                    .table(IdempotencyRecords::Table)
                    .col(IdempotencyRecords::TenantId)
                    .col(IdempotencyRecords::Operation)
                    .col(IdempotencyRecords::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uidx-idempotency_records-tenant_id-operation-key")
                    .table(IdempotencyRecords::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(IdempotencyRecords::Table).to_owned())
            .await?;

        Ok(())
    }
}
