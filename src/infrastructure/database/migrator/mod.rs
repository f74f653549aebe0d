//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_vehicles;
mod m20250301_000003_create_service_offerings;
mod m20250301_000004_create_bookings;
mod m20250301_000005_create_work_orders;
mod m20250301_000006_create_revoked_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_vehicles::Migration),
            Box::new(m20250301_000003_create_service_offerings::Migration),
            Box::new(m20250301_000004_create_bookings::Migration),
            Box::new(m20250301_000005_create_work_orders::Migration),
            Box::new(m20250301_000006_create_revoked_tokens::Migration),
        ]
    }
}
