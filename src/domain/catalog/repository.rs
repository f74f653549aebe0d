use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ServiceOffering, ServiceOfferingFilter, ServiceOfferingSort};
use crate::domain::query::FetchParams;
use crate::domain::DomainResult;

pub type ServiceOfferingFetchParams = FetchParams<ServiceOfferingFilter, ServiceOfferingSort>;

#[async_trait]
pub trait ServiceOfferingRepository: Send + Sync {
    async fn create(&self, offering: &ServiceOffering) -> DomainResult<()>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceOffering>>;
    /// Catalog lookup in the order of `ids`, each offering once; unknown or
    /// deleted ids are absent.
    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<ServiceOffering>>;
    async fn update(&self, offering: &ServiceOffering) -> DomainResult<u64>;
    async fn soft_delete(&self, id: &str, actor_id: &str, at: DateTime<Utc>) -> DomainResult<u64>;
    async fn fetch(
        &self,
        params: &ServiceOfferingFetchParams,
    ) -> DomainResult<(Vec<ServiceOffering>, u64)>;
}
