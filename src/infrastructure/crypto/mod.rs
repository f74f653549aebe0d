//! Token and password primitives

pub mod jwt;
pub mod password;

pub use jwt::{create_token, hash_token, verify_token, JwtConfig, TokenClaims};
pub use password::{hash_password, verify_password};
