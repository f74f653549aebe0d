//! Booking use-cases: create, read, list and status updates

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::application::vehicles::service::ensure_vehicle_access;
use crate::domain::booking::{check_booking_transition, BookingFetchParams, BookingFilter};
use crate::domain::{
    Actor, Booking, BookingStatus, DomainError, DomainResult, RepositoryProvider, StatusChange,
    UserRole,
};
use crate::shared::PaginatedResult;

/// Booking request as submitted by a caller.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub vehicle_id: String,
    pub booking_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub service_ids: Vec<String>,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
}

impl BookingService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Create a pending booking for the vehicle's owner.
    ///
    /// Service ids that do not resolve to a live offering are dropped; the
    /// booking and its join rows are written in one transaction.
    pub async fn create(&self, actor: &Actor, input: NewBooking) -> DomainResult<Booking> {
        let vehicle = self
            .repos
            .vehicles()
            .find_by_id(&input.vehicle_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Vehicle", input.vehicle_id.as_str()))?;
        ensure_vehicle_access(actor, &vehicle)?;

        let services = self
            .repos
            .service_offerings()
            .find_by_ids(&input.service_ids)
            .await?;
        if services.len() < input.service_ids.len() {
            warn!(
                requested = input.service_ids.len(),
                resolved = services.len(),
                "Dropping unknown service ids from booking"
            );
        }

        let notes = input.notes.filter(|n| !n.trim().is_empty());
        let booking = Booking::new(
            vehicle.user_id.as_str(),
            vehicle.id.as_str(),
            input.booking_date,
            notes,
            services,
        );
        self.repos
            .bookings()
            .create(&booking, &booking.booked_services())
            .await?;

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            booking_id = %booking.id,
            customer_id = %booking.customer_id,
            services = booking.services.len(),
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<Booking> {
        let booking = self.find(id).await?;
        if actor.role == UserRole::Customer && booking.customer_id != actor.id {
            return Err(DomainError::Forbidden("not the owner of this booking".into()));
        }
        Ok(booking)
    }

    /// List bookings; customers only ever see their own.
    pub async fn fetch(
        &self,
        actor: &Actor,
        mut params: BookingFetchParams,
    ) -> DomainResult<PaginatedResult<Booking>> {
        if actor.role == UserRole::Customer {
            params = params.force_filter(BookingFilter::CustomerId, actor.id.as_str());
        }
        let (items, total) = self.repos.bookings().fetch(&params).await?;
        Ok(PaginatedResult::new(items, total, params.page))
    }

    /// Move a booking to `requested` if the transition table allows it for
    /// the caller's role. Returns the number of rows changed.
    pub async fn update_status(
        &self,
        actor: &Actor,
        id: &str,
        requested: BookingStatus,
    ) -> DomainResult<u64> {
        let booking = self.find(id).await?;
        if actor.role == UserRole::Customer && booking.customer_id != actor.id {
            return Err(DomainError::Forbidden("not the owner of this booking".into()));
        }

        let next = check_booking_transition(booking.status, actor.role, requested)?;
        let change = StatusChange::now(next, actor.id.as_str());

        let affected = self
            .repos
            .bookings()
            .update_status(id, booking.status, &change)
            .await?;
        if affected == 0 {
            return Err(DomainError::Conflict(format!(
                "booking {} changed status concurrently",
                id
            )));
        }

        metrics::counter!(
            "booking_transitions_total",
            "from" => booking.status.as_str(),
            "to" => next.as_str()
        )
        .increment(1);
        info!(
            booking_id = id,
            from = %booking.status,
            to = %next,
            actor_id = %actor.id,
            "Booking status updated"
        );
        Ok(affected)
    }

    async fn find(&self, id: &str) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::ListQuery;
    use crate::domain::TransitionRejection;
    use crate::infrastructure::database::repositories::testing::{
        seed_offering, seed_user, seed_vehicle, test_repos,
    };
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use chrono::Duration;
    use rust_decimal::Decimal;

    struct Fixture {
        repos: Arc<SeaOrmRepositoryProvider>,
        svc: BookingService,
        customer: Actor,
        cashier: Actor,
        vehicle_id: String,
    }

    async fn fixture() -> Fixture {
        let (_db, repos) = test_repos().await;
        let repos = Arc::new(repos);
        let customer = seed_user(&*repos, "cust@example.com", UserRole::Customer).await;
        let cashier = seed_user(&*repos, "cash@example.com", UserRole::Cashier).await;
        let vehicle = seed_vehicle(&*repos, &customer.id, "B 1 CUS").await;
        Fixture {
            svc: BookingService::new(repos.clone()),
            repos,
            customer: Actor::new(customer.id, UserRole::Customer),
            cashier: Actor::new(cashier.id, UserRole::Cashier),
            vehicle_id: vehicle.id,
        }
    }

    fn request(vehicle_id: &str, service_ids: Vec<String>) -> NewBooking {
        NewBooking {
            vehicle_id: vehicle_id.to_string(),
            booking_date: Utc::now() + Duration::days(3),
            notes: Some("rattle from the back".into()),
            service_ids,
        }
    }

    #[tokio::test]
    async fn create_drops_unresolved_services() {
        let f = fixture().await;
        let oil = seed_offering(&*f.repos, "oil change", Decimal::new(50, 0)).await;

        let booking = f
            .svc
            .create(
                &f.customer,
                request(&f.vehicle_id, vec![oil.id.clone(), "no-such-service".into()]),
            )
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.customer_id, f.customer.id);
        assert_eq!(booking.services.len(), 1);
        assert_eq!(booking.services[0].id, oil.id);

        let stored = f.svc.get(&f.customer, &booking.id).await.unwrap();
        assert_eq!(stored.services.len(), 1);
    }

    #[tokio::test]
    async fn services_keep_the_requested_order() {
        let f = fixture().await;
        let mut ids = Vec::new();
        for name in ["wiper blades", "air filter", "spark plugs", "battery check"] {
            ids.push(seed_offering(&*f.repos, name, Decimal::new(15, 0)).await.id);
        }
        ids.reverse();

        let booking = f
            .svc
            .create(&f.customer, request(&f.vehicle_id, ids.clone()))
            .await
            .unwrap();
        let created: Vec<String> = booking.services.iter().map(|s| s.id.clone()).collect();
        assert_eq!(created, ids);

        let stored = f.svc.get(&f.customer, &booking.id).await.unwrap();
        let stored: Vec<String> = stored.services.into_iter().map(|s| s.id).collect();
        assert_eq!(stored, ids);
    }

    #[tokio::test]
    async fn create_with_no_resolvable_services_is_allowed() {
        let f = fixture().await;
        let booking = f
            .svc
            .create(&f.customer, request(&f.vehicle_id, vec!["ghost".into()]))
            .await
            .unwrap();
        assert!(booking.services.is_empty());
    }

    #[tokio::test]
    async fn customers_cannot_book_someone_elses_vehicle() {
        let f = fixture().await;
        let other = seed_user(&*f.repos, "other@example.com", UserRole::Customer).await;
        let err = f
            .svc
            .create(
                &Actor::new(other.id, UserRole::Customer),
                request(&f.vehicle_id, vec![]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = f
            .svc
            .create(&f.customer, request("missing-vehicle", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn customer_may_only_cancel_a_pending_booking() {
        let f = fixture().await;
        let booking = f
            .svc
            .create(&f.customer, request(&f.vehicle_id, vec![]))
            .await
            .unwrap();

        for target in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::OnProgress,
            BookingStatus::Completed,
        ] {
            let err = f
                .svc
                .update_status(&f.customer, &booking.id, target)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DomainError::InvalidTransition(TransitionRejection::RoleNotAllowed { .. })
            ));
        }

        let rows = f
            .svc
            .update_status(&f.customer, &booking.id, BookingStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn staff_walks_booking_to_completion_then_it_is_final() {
        let f = fixture().await;
        let booking = f
            .svc
            .create(&f.customer, request(&f.vehicle_id, vec![]))
            .await
            .unwrap();

        f.svc
            .update_status(&f.cashier, &booking.id, BookingStatus::OnProgress)
            .await
            .unwrap();
        f.svc
            .update_status(&f.cashier, &booking.id, BookingStatus::Completed)
            .await
            .unwrap();

        let stored = f.svc.get(&f.cashier, &booking.id).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
        assert_eq!(stored.updated_by.as_deref(), Some(f.cashier.id.as_str()));

        for target in BookingStatus::ALL {
            let err = f
                .svc
                .update_status(&f.cashier, &booking.id, target)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DomainError::InvalidTransition(TransitionRejection::TerminalState { .. })
            ));
        }
    }

    #[tokio::test]
    async fn confirmed_booking_has_no_transitions() {
        let f = fixture().await;
        let mut booking = Booking::new(
            f.customer.id.as_str(),
            f.vehicle_id.as_str(),
            Utc::now(),
            None,
            vec![],
        );
        booking.status = BookingStatus::Confirmed;
        f.repos.bookings().create(&booking, &[]).await.unwrap();

        let err = f
            .svc
            .update_status(&f.cashier, &booking.id, BookingStatus::OnProgress)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition(TransitionRejection::NoTransitions { .. })
        ));
    }

    #[tokio::test]
    async fn missing_booking_is_not_found() {
        let f = fixture().await;
        let err = f
            .svc
            .update_status(&f.cashier, "nope", BookingStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn fetch_is_scoped_for_customers() {
        let f = fixture().await;
        let other = seed_user(&*f.repos, "other@example.com", UserRole::Customer).await;
        let other_vehicle = seed_vehicle(&*f.repos, &other.id, "B 2 OTH").await;
        let other = Actor::new(other.id, UserRole::Customer);

        f.svc
            .create(&f.customer, request(&f.vehicle_id, vec![]))
            .await
            .unwrap();
        f.svc
            .create(&other, request(&other_vehicle.id, vec![]))
            .await
            .unwrap();

        let query = ListQuery {
            filters: vec![("customer_id".into(), other.id.clone())],
            ..Default::default()
        };
        let params = BookingFetchParams::from_query(&query, 10).unwrap();
        let mine = f.svc.fetch(&f.customer, params).await.unwrap();
        assert_eq!(mine.total, 1);
        assert_eq!(mine.items[0].customer_id, f.customer.id);

        let all = f
            .svc
            .fetch(&f.cashier, BookingFetchParams::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let err = f.svc.get(&other, &mine.items[0].id).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
