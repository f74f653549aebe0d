//! Customer vehicles.

pub mod service;

pub use service::{NewVehicle, VehicleChanges, VehicleService};
