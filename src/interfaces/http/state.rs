//! Shared handler state

use std::sync::Arc;

use crate::application::{
    BookingService, CatalogService, UserService, VehicleService, WorkOrderService,
};
use crate::domain::{FetchParams, ListQuery};
use crate::domain::query::{FilterField, SortField};
use crate::interfaces::http::common::{error_response, ApiError};

/// Services every API handler draws from.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub catalog: Arc<CatalogService>,
    pub vehicles: Arc<VehicleService>,
    pub bookings: Arc<BookingService>,
    pub work_orders: Arc<WorkOrderService>,
    /// Page size used when a list request has no valid `limit`.
    pub default_limit: u64,
}

impl AppState {
    /// Resolve raw list parameters against an aggregate's allow-lists.
    pub fn fetch_params<F: FilterField, S: SortField>(
        &self,
        query: &ListQuery,
    ) -> Result<FetchParams<F, S>, ApiError> {
        FetchParams::from_query(query, self.default_limit).map_err(error_response)
    }
}
