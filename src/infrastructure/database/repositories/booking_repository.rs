//! SeaORM implementation of BookingRepository

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::service_offering_repository::model_to_domain as offering_to_domain;
use super::{db_err, filter_by, order, search_any};
use crate::domain::booking::{
    BookedService, Booking, BookingFetchParams, BookingFilter, BookingRepository, BookingSort,
    BookingStatus,
};
use crate::domain::{DomainError, DomainResult, ServiceOffering, StatusChange};
use crate::infrastructure::database::entities::{booked_service, booking, service_offering};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolve the attached services for a page of bookings with two queries.
    async fn with_services(&self, models: Vec<booking::Model>) -> DomainResult<Vec<Booking>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let links = booked_service::Entity::find()
            .filter(booked_service::Column::BookingId.is_in(models.iter().map(|m| m.id.as_str())))
            .order_by_asc(booked_service::Column::Position)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let offerings: HashMap<String, ServiceOffering> = if links.is_empty() {
            HashMap::new()
        } else {
            service_offering::Entity::find()
                .filter(
                    service_offering::Column::Id
                        .is_in(links.iter().map(|l| l.service_offering_id.as_str())),
                )
                .filter(service_offering::Column::DeletedAt.is_null())
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|m| (m.id.clone(), offering_to_domain(m)))
                .collect()
        };

        let mut by_booking: HashMap<&str, Vec<ServiceOffering>> = HashMap::new();
        for link in &links {
            if let Some(offering) = offerings.get(&link.service_offering_id) {
                by_booking
                    .entry(link.booking_id.as_str())
                    .or_default()
                    .push(offering.clone());
            }
        }

        models
            .into_iter()
            .map(|m| {
                let services = by_booking.remove(m.id.as_str()).unwrap_or_default();
                model_to_domain(m, services)
            })
            .collect()
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: booking::Model, services: Vec<ServiceOffering>) -> DomainResult<Booking> {
    let status = m
        .status
        .parse::<BookingStatus>()
        .map_err(|_| DomainError::Database(format!("booking {} has unknown status {}", m.id, m.status)))?;

    Ok(Booking {
        id: m.id,
        customer_id: m.customer_id,
        vehicle_id: m.vehicle_id,
        booking_date: m.booking_date,
        notes: m.notes,
        status,
        created_at: m.created_at,
        updated_at: m.updated_at,
        updated_by: m.updated_by,
        deleted_at: m.deleted_at,
        services,
    })
}

// ── BookingRepository impl ──────────────────────────────────────

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn create(&self, b: &Booking, services: &[BookedService]) -> DomainResult<()> {
        debug!("Creating booking {} with {} services", b.id, services.len());

        let txn = self.db.begin().await.map_err(db_err)?;

        let header = booking::ActiveModel {
            id: Set(b.id.clone()),
            customer_id: Set(b.customer_id.clone()),
            vehicle_id: Set(b.vehicle_id.clone()),
            booking_date: Set(b.booking_date),
            notes: Set(b.notes.clone()),
            status: Set(b.status.as_str().to_string()),
            created_at: Set(b.created_at),
            updated_at: Set(b.updated_at),
            updated_by: Set(b.updated_by.clone()),
            deleted_at: Set(None),
        };
        let links: Vec<booked_service::ActiveModel> = services
            .iter()
            .map(|s| booked_service::ActiveModel {
                id: Set(s.id.clone()),
                booking_id: Set(s.booking_id.clone()),
                service_offering_id: Set(s.service_offering_id.clone()),
                position: Set(s.position),
            })
            .collect();

        let written = async {
            header.insert(&txn).await?;
            if !links.is_empty() {
                booked_service::Entity::insert_many(links).exec(&txn).await?;
            }
            Ok::<_, sea_orm::DbErr>(())
        }
        .await;

        match written {
            Ok(()) => txn.commit().await.map_err(db_err),
            Err(e) => {
                txn.rollback().await.map_err(db_err)?;
                Err(db_err(e))
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Booking>> {
        let model = booking::Entity::find_by_id(id)
            .filter(booking::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(m) => Ok(self.with_services(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn update_status(
        &self,
        id: &str,
        expected: BookingStatus,
        change: &StatusChange<BookingStatus>,
    ) -> DomainResult<u64> {
        debug!(
            "Updating booking {} status {} -> {}",
            id, expected, change.status
        );

        let result = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(change.status.as_str()))
            .col_expr(booking::Column::UpdatedBy, Expr::value(change.actor_id.clone()))
            .col_expr(booking::Column::UpdatedAt, Expr::value(change.at))
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(expected.as_str()))
            .filter(booking::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn fetch(&self, params: &BookingFetchParams) -> DomainResult<(Vec<Booking>, u64)> {
        let mut query = booking::Entity::find().filter(booking::Column::DeletedAt.is_null());

        for (field, value) in &params.filters {
            let column = match field {
                BookingFilter::CustomerId => booking::Column::CustomerId,
                BookingFilter::VehicleId => booking::Column::VehicleId,
                BookingFilter::Status => booking::Column::Status,
            };
            query = filter_by(query, column, value);
        }

        if let Some(search) = &params.search {
            query = query.filter(search_any(&[booking::Column::Notes], search));
        }

        let column = match params.order_by {
            BookingSort::BookingDate => booking::Column::BookingDate,
            BookingSort::Status => booking::Column::Status,
            BookingSort::CreatedAt => booking::Column::CreatedAt,
            BookingSort::UpdatedAt => booking::Column::UpdatedAt,
        };
        query = query.order_by(column, order(params.direction));

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset(params.page.offset())
            .limit(params.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok((self.with_services(models).await?, total))
    }
}
