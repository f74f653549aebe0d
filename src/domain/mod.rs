//! Domain layer: aggregates, their rules and repository interfaces.

pub mod booking;
pub mod catalog;
pub mod query;
pub mod repositories;
pub mod status;
pub mod user;
pub mod vehicle;
pub mod work_order;

// Re-export commonly used types
pub use booking::{BookedService, Booking, BookingStatus};
pub use catalog::ServiceOffering;
pub use query::{FetchParams, FilterValue, ListQuery, SortDirection};
pub use repositories::{DomainResult, RepositoryProvider};
pub use status::StatusChange;
pub use user::{Actor, User, UserRole};
pub use vehicle::Vehicle;
pub use work_order::{WorkOrder, WorkOrderServiceLine, WorkOrderStatus};

pub use crate::shared::errors::{DomainError, TransitionRejection};
