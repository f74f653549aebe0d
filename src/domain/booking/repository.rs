use async_trait::async_trait;

use super::{BookedService, Booking, BookingFilter, BookingSort, BookingStatus};
use crate::domain::query::FetchParams;
use crate::domain::status::StatusChange;
use crate::domain::DomainResult;

pub type BookingFetchParams = FetchParams<BookingFilter, BookingSort>;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert the booking and its join rows in one transaction.
    async fn create(&self, booking: &Booking, services: &[BookedService]) -> DomainResult<()>;

    /// Loads the attached services as well.
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>>;

    /// Apply `change` only while the stored status is still `expected`.
    /// Returns rows changed; 0 means the status moved underneath us or the row is gone.
    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        change: &StatusChange<BookingStatus>,
    ) -> DomainResult<u64>;

    async fn fetch(&self, params: &BookingFetchParams) -> DomainResult<(Vec<Booking>, u64)>;
}
