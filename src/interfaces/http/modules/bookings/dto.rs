//! Booking DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::NewBooking;
use crate::domain::{Booking, BookingStatus};
use crate::interfaces::http::modules::services::ServiceOfferingDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    pub booking_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[schema(value_type = String, example = "pending")]
    pub status: BookingStatus,
    pub services: Vec<ServiceOfferingDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            customer_id: b.customer_id,
            vehicle_id: b.vehicle_id,
            booking_date: b.booking_date,
            notes: b.notes,
            status: b.status,
            services: b.services.into_iter().map(ServiceOfferingDto::from).collect(),
            created_at: b.created_at,
            updated_at: b.updated_at,
            updated_by: b.updated_by,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "vehicle_id is required"))]
    pub vehicle_id: String,
    pub booking_date: DateTime<Utc>,
    #[validate(length(max = 1000, message = "notes must be at most 1000 characters"))]
    pub notes: Option<String>,
    /// Catalog ids; unknown ids are ignored
    pub service_ids: Vec<String>,
}

impl From<CreateBookingRequest> for NewBooking {
    fn from(r: CreateBookingRequest) -> Self {
        Self {
            vehicle_id: r.vehicle_id,
            booking_date: r.booking_date,
            notes: r.notes,
            service_ids: r.service_ids,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "status is required"))]
    #[schema(example = "cancelled")]
    pub status: String,
}

/// Rows changed by a status write.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RowsAffected {
    pub rows_affected: u64,
}
