//! Create bookings and booked_services tables

use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_service_offerings::ServiceOfferings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bookings::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Bookings::CustomerId).string().not_null())
                    .col(ColumnDef::new(Bookings::VehicleId).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::BookingDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::Notes).text())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::UpdatedBy).string())
                    .col(ColumnDef::new(Bookings::DeletedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_customer")
                    .table(Bookings::Table)
                    .col(Bookings::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookedServices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BookedServices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BookedServices::BookingId).string().not_null())
                    .col(
                        ColumnDef::new(BookedServices::ServiceOfferingId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BookedServices::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booked_services_booking")
                            .from(BookedServices::Table, BookedServices::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booked_services_service_offering")
                            .from(BookedServices::Table, BookedServices::ServiceOfferingId)
                            .to(ServiceOfferings::Table, ServiceOfferings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booked_services_booking")
                    .table(BookedServices::Table)
                    .col(BookedServices::BookingId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookedServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    CustomerId,
    VehicleId,
    BookingDate,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
    UpdatedBy,
    DeletedAt,
}

#[derive(Iden)]
pub enum BookedServices {
    Table,
    Id,
    BookingId,
    ServiceOfferingId,
    /// Index within the booking request
    Position,
}
