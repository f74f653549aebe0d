//! User aggregate
//!
//! Contains the User entity, DTOs, and repository interfaces.

pub mod model;
pub mod repository;

mod dto_create;
mod dto_update;

// Re-export model types
pub use model::{Actor, User, UserFilter, UserRole, UserSort};

// Re-export DTOs
pub use dto_create::CreateUserDto;
pub use dto_update::UpdateUserDto;

// Re-export repository traits
pub use repository::{RevokedTokenRepository, UserFetchParams, UserRepository};
