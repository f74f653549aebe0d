use async_trait::async_trait;

use super::{WorkOrder, WorkOrderFilter, WorkOrderSort, WorkOrderStatus};
use crate::domain::query::FetchParams;
use crate::domain::status::StatusChange;
use crate::domain::DomainResult;

pub type WorkOrderFetchParams = FetchParams<WorkOrderFilter, WorkOrderSort>;

#[async_trait]
pub trait WorkOrderRepository: Send + Sync {
    /// Insert the work order and all its service lines in one transaction.
    async fn create(&self, work_order: &WorkOrder) -> DomainResult<()>;

    /// Loads the service lines as well.
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<WorkOrder>>;

    /// Set the mechanic and status while the stored status is still `expected`.
    async fn assign_mechanic(
        &self,
        id: &str,
        mechanic_id: &str,
        expected: WorkOrderStatus,
        change: &StatusChange<WorkOrderStatus>,
    ) -> DomainResult<u64>;

    /// Unconditional status write. 0 rows means not found.
    async fn update_status(
        &self,
        id: &str,
        change: &StatusChange<WorkOrderStatus>,
    ) -> DomainResult<u64>;

    async fn fetch(&self, params: &WorkOrderFetchParams) -> DomainResult<(Vec<WorkOrder>, u64)>;
}
