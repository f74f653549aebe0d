//! Work order DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{WorkOrder, WorkOrderServiceLine, WorkOrderStatus};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderLineDto {
    pub id: String,
    pub service_offering_id: String,
    pub service_name: String,
    #[schema(value_type = String, example = "150000.00")]
    pub price: Decimal,
    pub quantity: i32,
    #[schema(value_type = String, example = "open")]
    pub status: WorkOrderStatus,
}

impl From<WorkOrderServiceLine> for WorkOrderLineDto {
    fn from(l: WorkOrderServiceLine) -> Self {
        Self {
            id: l.id,
            service_offering_id: l.service_offering_id,
            service_name: l.service_name,
            price: l.price,
            quantity: l.quantity,
            status: l.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WorkOrderDto {
    pub id: String,
    pub booking_id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<String>,
    #[schema(value_type = String, example = "open")]
    pub status: WorkOrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Sum of price × quantity over all lines
    #[schema(value_type = String, example = "300000.00")]
    pub total: Decimal,
    pub services: Vec<WorkOrderLineDto>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl From<WorkOrder> for WorkOrderDto {
    fn from(w: WorkOrder) -> Self {
        let total = w.total();
        Self {
            id: w.id,
            booking_id: w.booking_id,
            customer_id: w.customer_id,
            vehicle_id: w.vehicle_id,
            mechanic_id: w.mechanic_id,
            status: w.status,
            notes: w.notes,
            total,
            services: w.lines.into_iter().map(WorkOrderLineDto::from).collect(),
            created_at: w.created_at,
            created_by: w.created_by,
            updated_at: w.updated_at,
            updated_by: w.updated_by,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignMechanicRequest {
    #[validate(length(min = 1, message = "mechanic_id is required"))]
    pub mechanic_id: String,
}
