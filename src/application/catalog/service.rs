//! Catalog service: public lookup plus admin maintenance of offerings

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::catalog::ServiceOfferingFetchParams;
use crate::domain::{Actor, DomainError, DomainResult, RepositoryProvider, ServiceOffering, UserRole};
use crate::shared::validations::title_case;
use crate::shared::PaginatedResult;

/// Partial update of an offering.
#[derive(Debug, Clone, Default)]
pub struct ServiceOfferingChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
}

pub struct CatalogService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CatalogService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        name: &str,
        description: Option<String>,
        price: Decimal,
    ) -> DomainResult<ServiceOffering> {
        require_admin(actor)?;
        validate_name(name)?;
        validate_price(price)?;

        let offering = ServiceOffering::new(name, description, price, actor.id.as_str());
        self.repos.service_offerings().create(&offering).await?;

        info!(offering_id = %offering.id, name = %offering.name, "Service offering created");
        Ok(offering)
    }

    pub async fn get(&self, id: &str) -> DomainResult<ServiceOffering> {
        self.repos
            .service_offerings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ServiceOffering", id))
    }

    pub async fn list(
        &self,
        params: ServiceOfferingFetchParams,
    ) -> DomainResult<PaginatedResult<ServiceOffering>> {
        let (items, total) = self.repos.service_offerings().fetch(&params).await?;
        Ok(PaginatedResult::new(items, total, params.page))
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        changes: ServiceOfferingChanges,
    ) -> DomainResult<ServiceOffering> {
        require_admin(actor)?;
        let mut offering = self.get(id).await?;

        if let Some(name) = changes.name {
            validate_name(&name)?;
            offering.name = title_case(&name);
        }
        if let Some(description) = changes.description {
            offering.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(price) = changes.price {
            validate_price(price)?;
            offering.price = price;
        }
        offering.updated_at = Utc::now();
        offering.updated_by = Some(actor.id.clone());

        if self.repos.service_offerings().update(&offering).await? == 0 {
            return Err(DomainError::not_found("ServiceOffering", id));
        }

        info!(offering_id = %offering.id, "Service offering updated");
        Ok(offering)
    }

    /// Soft delete; existing bookings stop resolving the offering.
    pub async fn delete(&self, actor: &Actor, id: &str) -> DomainResult<()> {
        require_admin(actor)?;
        let affected = self
            .repos
            .service_offerings()
            .soft_delete(id, &actor.id, Utc::now())
            .await?;
        if affected == 0 {
            return Err(DomainError::not_found("ServiceOffering", id));
        }

        info!(offering_id = id, "Service offering deleted");
        Ok(())
    }
}

fn require_admin(actor: &Actor) -> DomainResult<()> {
    if actor.role == UserRole::Admin {
        Ok(())
    } else {
        Err(DomainError::Forbidden("admin role required".into()))
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("Service name is required".into()));
    }
    Ok(())
}

fn validate_price(price: Decimal) -> DomainResult<()> {
    if price.is_sign_negative() {
        return Err(DomainError::Validation("Price must not be negative".into()));
    }
    Ok(())
}
