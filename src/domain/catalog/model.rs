//! Service catalog entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::query::{allow_list, FilterField, SortField};
use crate::shared::validations::title_case;

/// A sellable service type
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceOffering {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

impl ServiceOffering {
    pub fn new(
        name: &str,
        description: Option<String>,
        price: Decimal,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: title_case(name),
            description,
            price,
            created_at: now,
            created_by: created_by.into(),
            updated_at: now,
            updated_by: None,
        }
    }
}

allow_list!(
    /// The catalog has no filterable fields; list it with search and sort.
    ServiceOfferingFilter {}
);

allow_list!(ServiceOfferingSort {
    Name => "name",
    Price => "price",
    CreatedAt => "created_at",
    UpdatedAt => "updated_at",
});

impl FilterField for ServiceOfferingFilter {
    fn from_key(key: &str) -> Option<Self> {
        Self::lookup(key)
    }
}

impl SortField for ServiceOfferingSort {
    fn from_column(column: &str) -> Option<Self> {
        Self::lookup(column)
    }

    fn default_column() -> Self {
        Self::UpdatedAt
    }
}
