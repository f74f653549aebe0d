//! Vehicle DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::{NewVehicle, VehicleChanges};
use crate::domain::Vehicle;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VehicleDto {
    pub id: String,
    pub user_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl From<Vehicle> for VehicleDto {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            user_id: v.user_id,
            license_plate: v.license_plate,
            brand: v.brand,
            model: v.model,
            year: v.year,
            color: v.color,
            created_at: v.created_at,
            created_by: v.created_by,
            updated_at: v.updated_at,
            updated_by: v.updated_by,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 20, message = "license_plate must be 1–20 characters"))]
    pub license_plate: String,
    #[validate(length(min = 1, max = 50, message = "brand must be 1–50 characters"))]
    pub brand: String,
    #[validate(length(min = 1, max = 50, message = "model must be 1–50 characters"))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100, message = "year is out of range"))]
    pub year: i32,
    #[validate(length(max = 30, message = "color must be at most 30 characters"))]
    pub color: Option<String>,
}

impl From<CreateVehicleRequest> for NewVehicle {
    fn from(r: CreateVehicleRequest) -> Self {
        Self {
            license_plate: r.license_plate,
            brand: r.brand,
            model: r.model,
            year: r.year,
            color: r.color,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 20, message = "license_plate must be 1–20 characters"))]
    pub license_plate: Option<String>,
    #[validate(length(min = 1, max = 50, message = "brand must be 1–50 characters"))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 50, message = "model must be 1–50 characters"))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "year is out of range"))]
    pub year: Option<i32>,
    #[validate(length(max = 30, message = "color must be at most 30 characters"))]
    pub color: Option<String>,
}

impl From<UpdateVehicleRequest> for VehicleChanges {
    fn from(r: UpdateVehicleRequest) -> Self {
        Self {
            license_plate: r.license_plate,
            brand: r.brand,
            model: r.model,
            year: r.year,
            color: r.color,
        }
    }
}
