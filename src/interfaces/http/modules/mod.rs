//! HTTP feature modules, one per resource

pub mod auth;
pub mod bookings;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod services;
pub mod users;
pub mod vehicles;
pub mod work_orders;
