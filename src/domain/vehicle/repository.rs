use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Vehicle, VehicleFilter, VehicleSort};
use crate::domain::query::FetchParams;
use crate::domain::DomainResult;

pub type VehicleFetchParams = FetchParams<VehicleFilter, VehicleSort>;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> DomainResult<()>;
    /// Soft-deleted vehicles are not returned.
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>>;
    async fn find_by_plate(&self, license_plate: &str) -> DomainResult<Option<Vehicle>>;
    async fn update(&self, vehicle: &Vehicle) -> DomainResult<u64>;
    async fn soft_delete(&self, id: &str, actor_id: &str, at: DateTime<Utc>) -> DomainResult<u64>;
    async fn fetch(&self, params: &VehicleFetchParams) -> DomainResult<(Vec<Vehicle>, u64)>;
}
