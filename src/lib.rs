//! # Workshop Service
//!
//! REST backend for a vehicle workshop: customers register vehicles and book
//! catalog services, staff confirm bookings and turn them into work orders
//! that mechanics carry out.
//!
//! ## Architecture
//!
//! - **domain**: aggregates, status lifecycles and repository traits
//! - **application**: services enforcing roles and transitions
//! - **infrastructure**: SeaORM persistence, JWT and password hashing
//! - **interfaces**: axum REST API with Swagger documentation
//! - **server**: runtime bootstrap shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiDependencies};
