//! Application layer: use-case services on top of the repository provider.

pub mod catalog;
pub mod identity;
pub mod lifecycle;
pub mod vehicles;

pub use catalog::{CatalogService, ServiceOfferingChanges};
pub use identity::{AuthResult, UserService};
pub use lifecycle::{BookingService, NewBooking, WorkOrderService};
pub use vehicles::{NewVehicle, VehicleChanges, VehicleService};
