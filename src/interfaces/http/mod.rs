//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error mapping, list-query parsing
//! - `middleware`: JWT authentication and admin guard
//! - `modules`: handlers and DTOs per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::{create_api_router, ApiDependencies, ApiDoc};
pub use state::AppState;
