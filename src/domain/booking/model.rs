//! Booking domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::ServiceOffering;
use crate::domain::query::{allow_list, FilterField, SortField};
use crate::shared::errors::DomainError;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Requested by the customer, not yet handled
    Pending,
    /// Accepted by the workshop; eligible for a work order
    Confirmed,
    /// Vehicle is being worked on
    OnProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::OnProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::OnProgress => "on_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown booking status: {}", s)))
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer's reservation for services on a vehicle
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    /// Requested service date
    pub booking_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    /// Resolved catalog entries, not ids
    pub services: Vec<ServiceOffering>,
}

impl Booking {
    /// New pending booking. Only offerings in `services` get attached.
    pub fn new(
        customer_id: impl Into<String>,
        vehicle_id: impl Into<String>,
        booking_date: DateTime<Utc>,
        notes: Option<String>,
        services: Vec<ServiceOffering>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            vehicle_id: vehicle_id.into(),
            booking_date,
            notes,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
            updated_by: None,
            deleted_at: None,
            services,
        }
    }

    /// Join rows for the attached services, numbered in list order.
    pub fn booked_services(&self) -> Vec<BookedService> {
        self.services
            .iter()
            .zip(0..)
            .map(|(s, position)| BookedService {
                id: uuid::Uuid::new_v4().to_string(),
                booking_id: self.id.clone(),
                service_offering_id: s.id.clone(),
                position,
            })
            .collect()
    }
}

/// Link between a booking and a catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedService {
    pub id: String,
    pub booking_id: String,
    pub service_offering_id: String,
    pub position: i32,
}

allow_list!(BookingFilter {
    CustomerId => "customer_id",
    VehicleId => "vehicle_id",
    Status => "status",
});

allow_list!(BookingSort {
    BookingDate => "booking_date",
    Status => "status",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

impl FilterField for BookingFilter {
    fn from_key(key: &str) -> Option<Self> {
        Self::lookup(key)
    }
}

impl SortField for BookingSort {
    fn from_column(column: &str) -> Option<Self> {
        Self::lookup(column)
    }

    fn default_column() -> Self {
        Self::UpdatedAt
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn offering(name: &str) -> ServiceOffering {
        ServiceOffering::new(name, None, Decimal::new(10000, 2), "admin")
    }

    #[test]
    fn status_wire_form_is_snake_case() {
        assert_eq!(BookingStatus::OnProgress.as_str(), "on_progress");
        assert_eq!(
            serde_json::to_string(&BookingStatus::OnProgress).unwrap(),
            "\"on_progress\""
        );
        assert_eq!(
            "on_progress".parse::<BookingStatus>().unwrap(),
            BookingStatus::OnProgress
        );
        assert!("On Progress".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        let terminal: Vec<_> = BookingStatus::ALL
            .into_iter()
            .filter(BookingStatus::is_terminal)
            .collect();
        assert_eq!(terminal, vec![BookingStatus::Completed, BookingStatus::Cancelled]);
    }

    #[test]
    fn new_booking_is_pending_with_join_rows() {
        let booking = Booking::new(
            "c1",
            "v1",
            Utc::now(),
            Some("rattle in the back".into()),
            vec![offering("oil change"), offering("tyre rotation")],
        );
        assert_eq!(booking.status, BookingStatus::Pending);

        let rows = booking.booked_services();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.booking_id == booking.id));
        assert_eq!(rows[0].service_offering_id, booking.services[0].id);
        assert_eq!((rows[0].position, rows[1].position), (0, 1));
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[test]
    fn booking_without_services_is_allowed() {
        let booking = Booking::new("c1", "v1", Utc::now(), None, vec![]);
        assert!(booking.booked_services().is_empty());
    }
}
