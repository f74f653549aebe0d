//! Service offering DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::application::ServiceOfferingChanges;
use crate::domain::ServiceOffering;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceOfferingDto {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(value_type = String, example = "150000.00")]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl From<ServiceOffering> for ServiceOfferingDto {
    fn from(s: ServiceOffering) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            price: s.price,
            created_at: s.created_at,
            created_by: s.created_by,
            updated_at: s.updated_at,
            updated_by: s.updated_by,
        }
    }
}

fn non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceOfferingRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1–100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = String, example = "150000")]
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceOfferingRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1–100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "non_negative"))]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
}

impl From<UpdateServiceOfferingRequest> for ServiceOfferingChanges {
    fn from(r: UpdateServiceOfferingRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            price: r.price,
        }
    }
}
