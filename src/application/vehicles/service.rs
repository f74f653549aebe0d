//! Vehicle service
//!
//! Any authenticated user registers vehicles under their own account.
//! Customers only read their own vehicles; changes need the owner or an admin.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tracing::info;

use crate::domain::vehicle::{VehicleFetchParams, VehicleFilter};
use crate::domain::{Actor, DomainError, DomainResult, RepositoryProvider, UserRole, Vehicle};
use crate::shared::validations::{normalize_plate, title_case};
use crate::shared::PaginatedResult;

const OLDEST_MODEL_YEAR: i32 = 1900;

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleChanges {
    pub license_plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
}

pub struct VehicleService {
    repos: Arc<dyn RepositoryProvider>,
}

impl VehicleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, actor: &Actor, input: NewVehicle) -> DomainResult<Vehicle> {
        validate_year(input.year)?;
        let vehicle = Vehicle::new(
            actor.id.as_str(),
            &input.license_plate,
            &input.brand,
            &input.model,
            input.year,
            input.color.as_deref(),
            actor.id.as_str(),
        );
        if vehicle.license_plate.is_empty() {
            return Err(DomainError::Validation("License plate is required".into()));
        }
        self.ensure_plate_free(&vehicle.license_plate, None).await?;

        self.repos.vehicles().create(&vehicle).await?;
        info!(vehicle_id = %vehicle.id, owner_id = %vehicle.user_id, "Vehicle registered");
        Ok(vehicle)
    }

    /// Fetch a vehicle the caller may see.
    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Vehicle> {
        let vehicle = self.find(id).await?;
        ensure_vehicle_access(actor, &vehicle)?;
        Ok(vehicle)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        mut params: VehicleFetchParams,
    ) -> DomainResult<PaginatedResult<Vehicle>> {
        if actor.role == UserRole::Customer {
            params = params.force_filter(VehicleFilter::UserId, actor.id.as_str());
        }
        let (items, total) = self.repos.vehicles().fetch(&params).await?;
        Ok(PaginatedResult::new(items, total, params.page))
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        changes: VehicleChanges,
    ) -> DomainResult<Vehicle> {
        let mut vehicle = self.find(id).await?;
        actor.require_owner_or_admin(&vehicle.user_id)?;

        if let Some(plate) = changes.license_plate {
            let plate = normalize_plate(&plate);
            if plate.is_empty() {
                return Err(DomainError::Validation("License plate is required".into()));
            }
            if plate != vehicle.license_plate {
                self.ensure_plate_free(&plate, Some(&vehicle.id)).await?;
                vehicle.license_plate = plate;
            }
        }
        if let Some(brand) = changes.brand {
            vehicle.brand = title_case(&brand);
        }
        if let Some(model) = changes.model {
            vehicle.model = title_case(&model);
        }
        if let Some(year) = changes.year {
            validate_year(year)?;
            vehicle.year = year;
        }
        if let Some(color) = changes.color {
            vehicle.color = Some(title_case(&color)).filter(|c| !c.is_empty());
        }
        vehicle.updated_at = Utc::now();
        vehicle.updated_by = Some(actor.id.clone());

        if self.repos.vehicles().update(&vehicle).await? == 0 {
            return Err(DomainError::not_found("Vehicle", id));
        }
        info!(vehicle_id = %vehicle.id, "Vehicle updated");
        Ok(vehicle)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        let vehicle = self.find(id).await?;
        actor.require_owner_or_admin(&vehicle.user_id)?;

        if self
            .repos
            .vehicles()
            .soft_delete(id, &actor.id, Utc::now())
            .await?
            == 0
        {
            return Err(DomainError::not_found("Vehicle", id));
        }
        info!(vehicle_id = id, deleted_by = %actor.id, "Vehicle deleted");
        Ok(())
    }

    async fn find(&self, id: &str) -> DomainResult<Vehicle> {
        self.repos
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", id))
    }

    async fn ensure_plate_free(&self, plate: &str, except: Option<&str>) -> DomainResult<()> {
        match self.repos.vehicles().find_by_plate(plate).await? {
            Some(existing) if Some(existing.id.as_str()) != except => Err(DomainError::Conflict(
                format!("License plate {} is already registered", plate),
            )),
            _ => Ok(()),
        }
    }
}

fn validate_year(year: i32) -> DomainResult<()> {
    let latest = Utc::now().year() + 1;
    if !(OLDEST_MODEL_YEAR..=latest).contains(&year) {
        return Err(DomainError::Validation(format!(
            "Year must be between {} and {}",
            OLDEST_MODEL_YEAR, latest
        )));
    }
    Ok(())
}

/// Customers are limited to their own vehicles.
pub(crate) fn ensure_vehicle_access(actor: &Actor, vehicle: &Vehicle) -> DomainResult<()> {
    if actor.role == UserRole::Customer {
        actor.require_owner_or_admin(&vehicle.user_id)
    } else {
        Ok(())
    }
}
