//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::booking::BookingRepository;
use crate::domain::catalog::ServiceOfferingRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::user::{RevokedTokenRepository, UserRepository};
use crate::domain::vehicle::VehicleRepository;
use crate::domain::work_order::WorkOrderRepository;

use super::booking_repository::SeaOrmBookingRepository;
use super::service_offering_repository::SeaOrmServiceOfferingRepository;
use super::user_repository::{SeaOrmRevokedTokenRepository, SeaOrmUserRepository};
use super::vehicle_repository::SeaOrmVehicleRepository;
use super::work_order_repository::SeaOrmWorkOrderRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let booking = repos.bookings().find_by_id(&id).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    users: SeaOrmUserRepository,
    revoked_tokens: SeaOrmRevokedTokenRepository,
    vehicles: SeaOrmVehicleRepository,
    service_offerings: SeaOrmServiceOfferingRepository,
    bookings: SeaOrmBookingRepository,
    work_orders: SeaOrmWorkOrderRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            revoked_tokens: SeaOrmRevokedTokenRepository::new(db.clone()),
            vehicles: SeaOrmVehicleRepository::new(db.clone()),
            service_offerings: SeaOrmServiceOfferingRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            work_orders: SeaOrmWorkOrderRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn revoked_tokens(&self) -> &dyn RevokedTokenRepository {
        &self.revoked_tokens
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn service_offerings(&self) -> &dyn ServiceOfferingRepository {
        &self.service_offerings
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn work_orders(&self) -> &dyn WorkOrderRepository {
        &self.work_orders
    }
}
