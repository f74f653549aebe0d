//! Identity module — user management & authentication
//!
//! Contains the `UserService` which orchestrates registration, login,
//! logout (token revocation), profile updates and staff administration.

pub mod service;

pub use service::{AuthResult, UserService};
