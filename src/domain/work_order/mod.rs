//! Work order aggregate

pub mod model;
pub mod repository;

pub use model::{WorkOrder, WorkOrderFilter, WorkOrderServiceLine, WorkOrderSort, WorkOrderStatus};
pub use repository::{WorkOrderFetchParams, WorkOrderRepository};
