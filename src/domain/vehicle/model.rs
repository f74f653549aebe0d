//! Vehicle domain entity

use chrono::{DateTime, Utc};

use crate::domain::query::{allow_list, FilterField, SortField};
use crate::shared::validations::{normalize_plate, title_case};

/// A customer's vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Stored upper case
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Vehicle {
    pub fn new(
        user_id: impl Into<String>,
        license_plate: &str,
        brand: &str,
        model: &str,
        year: i32,
        color: Option<&str>,
        created_by: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            license_plate: normalize_plate(license_plate),
            brand: title_case(brand),
            model: title_case(model),
            year,
            color: color.map(title_case),
            created_at: now,
            created_by: created_by.into(),
            updated_at: now,
            updated_by: None,
            deleted_at: None,
        }
    }
}

allow_list!(
    /// Fields vehicles can be filtered on
    VehicleFilter {
        UserId => "user_id",
        Brand => "brand",
        Year => "year",
    }
);

allow_list!(
    /// Columns vehicles can be ordered by
    VehicleSort {
        LicensePlate => "license_plate",
        Brand => "brand",
        Year => "year",
        CreatedAt => "created_at",
        UpdatedAt => "updated_at",
    }
);

impl FilterField for VehicleFilter {
    fn from_key(key: &str) -> Option<Self> {
        Self::lookup(key)
    }
}

impl SortField for VehicleSort {
    fn from_column(column: &str) -> Option<Self> {
        Self::lookup(column)
    }

    fn default_column() -> Self {
        Self::UpdatedAt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vehicle_is_normalized() {
        let v = Vehicle::new("u1", "b 1234 abc", "toyota", "land cruiser", 2020, Some("dark BLUE"), "u1");
        assert_eq!(v.license_plate, "B 1234 ABC");
        assert_eq!(v.brand, "Toyota");
        assert_eq!(v.model, "Land Cruiser");
        assert_eq!(v.color.as_deref(), Some("Dark Blue"));
        assert!(v.deleted_at.is_none());
    }

    #[test]
    fn allow_lists() {
        assert_eq!(VehicleFilter::from_key("user_id"), Some(VehicleFilter::UserId));
        assert_eq!(VehicleFilter::from_key("license_plate"), None);
        assert_eq!(VehicleSort::from_column("year"), Some(VehicleSort::Year));
        assert_eq!(VehicleSort::from_column("model"), None);
    }
}
