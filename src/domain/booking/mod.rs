//! Booking aggregate
//!
//! Contains the Booking entity, its transition rules and repository interface.

pub mod model;
pub mod repository;
pub mod transition;

pub use model::{BookedService, Booking, BookingFilter, BookingSort, BookingStatus};
pub use repository::{BookingFetchParams, BookingRepository};
pub use transition::check_booking_transition;
