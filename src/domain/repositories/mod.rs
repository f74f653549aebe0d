//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider` — unified access to all per-aggregate repositories
//! - `DomainResult` — standard result type for domain operations

use super::booking::BookingRepository;
use super::catalog::ServiceOfferingRepository;
use super::user::{RevokedTokenRepository, UserRepository};
use super::vehicle::VehicleRepository;
use super::work_order::WorkOrderRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// Consumers request only the repository they need:
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let booking = repos.bookings().find_by_id(id).await?;
///     let services = repos.service_offerings().find_by_ids(&ids).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn revoked_tokens(&self) -> &dyn RevokedTokenRepository;
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn service_offerings(&self) -> &dyn ServiceOfferingRepository;
    fn bookings(&self) -> &dyn BookingRepository;
    fn work_orders(&self) -> &dyn WorkOrderRepository;
}
