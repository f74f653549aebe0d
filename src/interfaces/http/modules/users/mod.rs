//! User administration (admin; list/get also for cashiers)

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
