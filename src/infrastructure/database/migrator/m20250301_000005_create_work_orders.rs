//! Create work_orders and work_order_service_lines tables

use sea_orm_migration::prelude::*;

use super::m20250301_000004_create_bookings::Bookings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkOrders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkOrders::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(WorkOrders::BookingId).string().not_null())
                    .col(ColumnDef::new(WorkOrders::CustomerId).string().not_null())
                    .col(ColumnDef::new(WorkOrders::VehicleId).string().not_null())
                    .col(ColumnDef::new(WorkOrders::MechanicId).string())
                    .col(
                        ColumnDef::new(WorkOrders::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(ColumnDef::new(WorkOrders::Notes).text())
                    .col(
                        ColumnDef::new(WorkOrders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkOrders::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(WorkOrders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkOrders::UpdatedBy).string())
                    .col(ColumnDef::new(WorkOrders::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_orders_booking")
                            .from(WorkOrders::Table, WorkOrders::BookingId)
                            .to(Bookings::Table, Bookings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_work_orders_booking", WorkOrders::BookingId),
            ("idx_work_orders_mechanic", WorkOrders::MechanicId),
            ("idx_work_orders_status", WorkOrders::Status),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(WorkOrders::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(WorkOrderServiceLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::WorkOrderId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::ServiceOfferingId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::ServiceName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::Price)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::Status)
                            .string_len(20)
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkOrderServiceLines::CreatedBy)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_order_service_lines_work_order")
                            .from(
                                WorkOrderServiceLines::Table,
                                WorkOrderServiceLines::WorkOrderId,
                            )
                            .to(WorkOrders::Table, WorkOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_work_order_service_lines_work_order")
                    .table(WorkOrderServiceLines::Table)
                    .col(WorkOrderServiceLines::WorkOrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkOrderServiceLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
pub enum WorkOrders {
    Table,
    Id,
    BookingId,
    CustomerId,
    VehicleId,
    MechanicId,
    Status,
    Notes,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
    DeletedAt,
}

#[derive(Iden)]
pub enum WorkOrderServiceLines {
    Table,
    Id,
    WorkOrderId,
    ServiceOfferingId,
    ServiceName,
    Price,
    Quantity,
    Status,
    Position,
    CreatedAt,
    CreatedBy,
}
