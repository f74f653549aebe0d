//! Work order domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::query::{allow_list, FilterField, SortField};
use crate::shared::errors::{DomainError, TransitionRejection};

/// Work order status (also used for service lines)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    Open,
    OnProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    pub const ALL: [WorkOrderStatus; 4] = [
        Self::Open,
        Self::OnProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::OnProgress => "on_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for WorkOrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown work order status: {}", s)))
    }
}

impl std::fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational record of the work done for a booking
#[derive(Debug, Clone)]
pub struct WorkOrder {
    pub id: String,
    pub booking_id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    /// Set by mechanic assignment
    pub mechanic_id: Option<String>,
    pub status: WorkOrderStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub lines: Vec<WorkOrderServiceLine>,
}

/// Snapshot of a booked service at work-order creation time
#[derive(Debug, Clone, PartialEq)]
pub struct WorkOrderServiceLine {
    pub id: String,
    pub work_order_id: String,
    pub service_offering_id: String,
    pub service_name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub status: WorkOrderStatus,
    /// Index of the service in the originating booking
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl WorkOrder {
    /// Derive an open work order from a confirmed booking, one line per
    /// attached service with its current name and price.
    pub fn from_booking(booking: &Booking, actor_id: &str) -> Result<Self, TransitionRejection> {
        if booking.status != BookingStatus::Confirmed {
            return Err(TransitionRejection::NotEligible {
                entity: "booking",
                status: booking.status.to_string(),
                action: "cannot create work order",
            });
        }

        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let lines = booking
            .services
            .iter()
            .zip(0..)
            .map(|(s, position)| WorkOrderServiceLine {
                id: uuid::Uuid::new_v4().to_string(),
                work_order_id: id.clone(),
                service_offering_id: s.id.clone(),
                service_name: s.name.clone(),
                price: s.price,
                quantity: 1,
                status: WorkOrderStatus::Open,
                position,
                created_at: now,
                created_by: actor_id.to_string(),
            })
            .collect();

        Ok(Self {
            id,
            booking_id: booking.id.clone(),
            customer_id: booking.customer_id.clone(),
            vehicle_id: booking.vehicle_id.clone(),
            mechanic_id: None,
            status: WorkOrderStatus::Open,
            notes: booking.notes.clone(),
            created_at: now,
            created_by: actor_id.to_string(),
            updated_at: now,
            updated_by: None,
            deleted_at: None,
            lines,
        })
    }

    /// Only open work orders take a mechanic.
    pub fn ensure_assignable(&self) -> Result<(), TransitionRejection> {
        if self.status == WorkOrderStatus::Open {
            Ok(())
        } else {
            Err(TransitionRejection::NotEligible {
                entity: "work order",
                status: self.status.to_string(),
                action: "work order cannot be assigned",
            })
        }
    }

    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.price * Decimal::from(l.quantity))
            .sum()
    }
}

allow_list!(WorkOrderFilter {
    CustomerId => "customer_id",
    VehicleId => "vehicle_id",
    MechanicId => "mechanic_id",
    BookingId => "booking_id",
    Status => "status",
});

allow_list!(WorkOrderSort {
    Status => "status",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

impl FilterField for WorkOrderFilter {
    fn from_key(key: &str) -> Option<Self> {
        Self::lookup(key)
    }
}

impl SortField for WorkOrderSort {
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
    use crate::domain::catalog::ServiceOffering;
    use std::str::FromStr;

    fn confirmed_booking(services: Vec<ServiceOffering>) -> Booking {
        let mut booking = Booking::new("c1", "v1", Utc::now(), Some("noisy brakes".into()), services);
        booking.status = BookingStatus::Confirmed;
        booking
    }

    fn offering(name: &str, price: &str) -> ServiceOffering {
        ServiceOffering::new(name, None, Decimal::from_str(price).unwrap(), "admin")
    }

    #[test]
    fn derives_lines_from_confirmed_booking() {
        let booking = confirmed_booking(vec![
            offering("brake pads", "250.00"),
            offering("brake fluid", "40.50"),
        ]);
        let wo = WorkOrder::from_booking(&booking, "cashier-1").unwrap();

        assert_eq!(wo.status, WorkOrderStatus::Open);
        assert_eq!(wo.booking_id, booking.id);
        assert_eq!(wo.customer_id, "c1");
        assert_eq!(wo.vehicle_id, "v1");
        assert_eq!(wo.created_by, "cashier-1");
        assert!(wo.mechanic_id.is_none());

        assert_eq!(wo.lines.len(), 2);
        for (line, service) in wo.lines.iter().zip(&booking.services) {
            assert_eq!(line.work_order_id, wo.id);
            assert_eq!(line.service_offering_id, service.id);
            assert_eq!(line.service_name, service.name);
            assert_eq!(line.price, service.price);
            assert_eq!(line.quantity, 1);
            assert_eq!(line.status, WorkOrderStatus::Open);
        }
        let positions: Vec<i32> = wo.lines.iter().map(|l| l.position).collect();
        assert_eq!(positions, [0, 1]);
        assert_eq!(wo.total(), Decimal::from_str("290.50").unwrap());
    }

    #[test]
    fn rejects_every_non_confirmed_booking() {
        for status in BookingStatus::ALL {
            if status == BookingStatus::Confirmed {
                continue;
            }
            let mut booking = confirmed_booking(vec![]);
            booking.status = status;
            let err = WorkOrder::from_booking(&booking, "cashier-1").unwrap_err();
            assert!(err.to_string().starts_with("cannot create work order"));
        }
    }

    #[test]
    fn only_open_work_orders_are_assignable() {
        let mut wo = WorkOrder::from_booking(&confirmed_booking(vec![]), "a").unwrap();
        assert!(wo.ensure_assignable().is_ok());
        for status in [
            WorkOrderStatus::OnProgress,
            WorkOrderStatus::Completed,
            WorkOrderStatus::Cancelled,
        ] {
            wo.status = status;
            assert!(matches!(
                wo.ensure_assignable(),
                Err(TransitionRejection::NotEligible { .. })
            ));
        }
    }

    #[test]
    fn status_parsing() {
        assert_eq!(
            WorkOrderStatus::from_str("on_progress").unwrap(),
            WorkOrderStatus::OnProgress
        );
        assert!(WorkOrderStatus::from_str("pending").is_err());
    }
}
