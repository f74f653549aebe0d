//! Vehicle aggregate

pub mod model;
pub mod repository;

pub use model::{Vehicle, VehicleFilter, VehicleSort};
pub use repository::{VehicleFetchParams, VehicleRepository};
