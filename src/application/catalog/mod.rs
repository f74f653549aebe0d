//! Service catalog — the offerings customers can book.

pub mod service;

pub use service::{CatalogService, ServiceOfferingChanges};
