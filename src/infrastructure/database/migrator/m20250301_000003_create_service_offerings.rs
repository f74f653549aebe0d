//! Create service_offerings table (the service catalog)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ServiceOfferings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ServiceOfferings::Name).string().not_null())
                    .col(ColumnDef::new(ServiceOfferings::Description).text())
                    .col(
                        ColumnDef::new(ServiceOfferings::Price)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ServiceOfferings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceOfferings::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(ServiceOfferings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ServiceOfferings::UpdatedBy).string())
                    .col(ColumnDef::new(ServiceOfferings::DeletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(ServiceOfferings::DeletedBy).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_service_offerings_name")
                    .table(ServiceOfferings::Table)
                    .col(ServiceOfferings::Name)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceOfferings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ServiceOfferings {
    Table,
    Id,
    Name,
    Description,
    Price,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
    DeletedAt,
    DeletedBy,
}
