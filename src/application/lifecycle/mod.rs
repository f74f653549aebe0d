//! Lifecycle engine
//!
//! Drives bookings from request to completion and derives work orders from
//! confirmed bookings. Transition rules live in the domain layer; these
//! services re-read state, validate, and write with conditional updates so a
//! concurrent change surfaces as a conflict instead of being overwritten.

pub mod booking;
pub mod work_order;

pub use booking::{BookingService, NewBooking};
pub use work_order::WorkOrderService;
