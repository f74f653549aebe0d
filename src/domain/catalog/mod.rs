//! Service catalog aggregate

pub mod model;
pub mod repository;

pub use model::{ServiceOffering, ServiceOfferingFilter, ServiceOfferingSort};
pub use repository::{ServiceOfferingFetchParams, ServiceOfferingRepository};
