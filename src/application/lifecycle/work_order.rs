//! Work-order use-cases: derive from a booking, assign a mechanic, track status

use std::sync::Arc;

use tracing::info;

use crate::domain::work_order::{WorkOrderFetchParams, WorkOrderFilter};
use crate::domain::{
    Actor, DomainError, DomainResult, RepositoryProvider, StatusChange, UserRole, WorkOrder,
    WorkOrderStatus,
};
use crate::shared::PaginatedResult;

pub struct WorkOrderService {
    repos: Arc<dyn RepositoryProvider>,
}

impl WorkOrderService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Turn a confirmed booking into an open work order with one line per
    /// booked service. Nothing is written when the booking is not eligible.
    pub async fn create_from_booking(
        &self,
        actor: &Actor,
        booking_id: &str,
    ) -> DomainResult<WorkOrder> {
        actor.require_staff()?;

        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;

        let work_order = WorkOrder::from_booking(&booking, &actor.id)?;
        self.repos.work_orders().create(&work_order).await?;

        metrics::counter!("work_orders_created_total").increment(1);
        info!(
            work_order_id = %work_order.id,
            booking_id,
            lines = work_order.lines.len(),
            "Work order created from booking"
        );
        Ok(work_order)
    }

    /// Put a mechanic on an open work order and start it. `mechanic_id` must
    /// name an active user with the mechanic role.
    pub async fn assign_mechanic(
        &self,
        actor: &Actor,
        work_order_id: &str,
        mechanic_id: &str,
    ) -> DomainResult<u64> {
        actor.require_staff()?;

        let work_order = self.find(work_order_id).await?;
        work_order.ensure_assignable()?;
        self.ensure_active_mechanic(mechanic_id).await?;

        let change = StatusChange::now(WorkOrderStatus::OnProgress, actor.id.as_str());
        let affected = self
            .repos
            .work_orders()
            .assign_mechanic(work_order_id, mechanic_id, work_order.status, &change)
            .await?;
        if affected == 0 {
            return Err(DomainError::Conflict(format!(
                "work order {} changed status concurrently",
                work_order_id
            )));
        }

        info!(work_order_id, mechanic_id, actor_id = %actor.id, "Mechanic assigned");
        Ok(affected)
    }

    /// Write the requested status as given; there is no transition table for
    /// work orders. Mechanics may only touch work orders assigned to them.
    pub async fn update_status(
        &self,
        actor: &Actor,
        work_order_id: &str,
        status: WorkOrderStatus,
    ) -> DomainResult<u64> {
        match actor.role {
            UserRole::Admin | UserRole::Cashier => {}
            UserRole::Mechanic => {
                let work_order = self.find(work_order_id).await?;
                ensure_visible(actor, &work_order)?;
            }
            UserRole::Customer => {
                return Err(DomainError::Forbidden(
                    "customers cannot update work orders".into(),
                ))
            }
        }

        let change = StatusChange::now(status, actor.id.as_str());
        let affected = self
            .repos
            .work_orders()
            .update_status(work_order_id, &change)
            .await?;
        if affected == 0 {
            return Err(DomainError::not_found("WorkOrder", work_order_id));
        }

        info!(work_order_id, status = %status, actor_id = %actor.id, "Work order status updated");
        Ok(affected)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<WorkOrder> {
        let work_order = self.find(id).await?;
        ensure_visible(actor, &work_order)?;
        Ok(work_order)
    }

    /// List work orders. Customers see their own, mechanics their assignments.
    pub async fn fetch(
        &self,
        actor: &Actor,
        mut params: WorkOrderFetchParams,
    ) -> DomainResult<PaginatedResult<WorkOrder>> {
        params = match actor.role {
            UserRole::Customer => params.force_filter(WorkOrderFilter::CustomerId, actor.id.as_str()),
            UserRole::Mechanic => params.force_filter(WorkOrderFilter::MechanicId, actor.id.as_str()),
            UserRole::Admin | UserRole::Cashier => params,
        };
        let (items, total) = self.repos.work_orders().fetch(&params).await?;
        Ok(PaginatedResult::new(items, total, params.page))
    }

    async fn ensure_active_mechanic(&self, user_id: &str) -> DomainResult<()> {
        match self.repos.users().find_by_id(user_id).await? {
            Some(user) if user.role == UserRole::Mechanic && user.is_active => Ok(()),
            _ => Err(DomainError::Unprocessable(format!(
                "'{}' is not an active mechanic",
                user_id
            ))),
        }
    }

    async fn find(&self, id: &str) -> DomainResult<WorkOrder> {
        self.repos
            .work_orders()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("WorkOrder", id))
    }
}

fn ensure_visible(actor: &Actor, work_order: &WorkOrder) -> DomainResult<()> {
    let allowed = match actor.role {
        UserRole::Admin | UserRole::Cashier => true,
        UserRole::Customer => work_order.customer_id == actor.id,
        UserRole::Mechanic => work_order.mechanic_id.as_deref() == Some(actor.id.as_str()),
    };
    if allowed {
        Ok(())
    } else {
        Err(DomainError::Forbidden("work order belongs to someone else".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Booking, BookingStatus, ServiceOffering, TransitionRejection};
    use crate::infrastructure::database::entities::{work_order, work_order_service_line};
    use crate::infrastructure::database::repositories::testing::{
        seed_offering, seed_user, seed_vehicle, test_repos,
    };
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

    struct Fixture {
        db: DatabaseConnection,
        repos: Arc<SeaOrmRepositoryProvider>,
        svc: WorkOrderService,
        customer_id: String,
        vehicle_id: String,
        cashier: Actor,
        mechanic: Actor,
    }

    async fn fixture() -> Fixture {
        let (db, repos) = test_repos().await;
        let repos = Arc::new(repos);
        let customer = seed_user(&*repos, "cust@example.com", UserRole::Customer).await;
        let cashier = seed_user(&*repos, "cash@example.com", UserRole::Cashier).await;
        let mechanic = seed_user(&*repos, "mech@example.com", UserRole::Mechanic).await;
        let vehicle = seed_vehicle(&*repos, &customer.id, "B 7 WO").await;
        Fixture {
            db,
            svc: WorkOrderService::new(repos.clone()),
            repos,
            customer_id: customer.id,
            vehicle_id: vehicle.id,
            cashier: Actor::new(cashier.id, UserRole::Cashier),
            mechanic: Actor::new(mechanic.id, UserRole::Mechanic),
        }
    }

    async fn booking_in(f: &Fixture, status: BookingStatus, services: Vec<ServiceOffering>) -> Booking {
        let mut booking = Booking::new(
            f.customer_id.as_str(),
            f.vehicle_id.as_str(),
            Utc::now(),
            Some("grinding brakes".into()),
            services,
        );
        booking.status = status;
        f.repos
            .bookings()
            .create(&booking, &booking.booked_services())
            .await
            .unwrap();
        booking
    }

    #[tokio::test]
    async fn confirmed_booking_becomes_work_order_with_lines() {
        let f = fixture().await;
        let oil = seed_offering(&*f.repos, "oil change", Decimal::new(5050, 2)).await;
        let pads = seed_offering(&*f.repos, "brake pads", Decimal::new(120, 0)).await;
        let booking = booking_in(&f, BookingStatus::Confirmed, vec![oil, pads]).await;

        let wo = f.svc.create_from_booking(&f.cashier, &booking.id).await.unwrap();
        assert_eq!(wo.status, WorkOrderStatus::Open);
        assert_eq!(wo.customer_id, f.customer_id);
        assert_eq!(wo.created_by, f.cashier.id);
        assert_eq!(wo.lines.len(), 2);
        assert!(wo.lines.iter().all(|l| l.work_order_id == wo.id && l.quantity == 1));
        assert_eq!(wo.total(), Decimal::new(17050, 2));

        let stored = f.svc.get(&f.cashier, &wo.id).await.unwrap();
        assert_eq!(stored.lines.len(), 2);
        assert_eq!(work_order_service_line::Entity::find().count(&f.db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn lines_follow_booking_order() {
        let f = fixture().await;
        let mut services = Vec::new();
        for name in ["tyre rotation", "wheel balance", "alignment"] {
            services.push(seed_offering(&*f.repos, name, Decimal::new(25, 0)).await);
        }
        services.swap(0, 2);
        let expected: Vec<String> = services.iter().map(|s| s.id.clone()).collect();
        let booking = booking_in(&f, BookingStatus::Confirmed, services).await;

        let wo = f.svc.create_from_booking(&f.cashier, &booking.id).await.unwrap();
        let stored = f.svc.get(&f.cashier, &wo.id).await.unwrap();
        let line_ids: Vec<String> = stored
            .lines
            .iter()
            .map(|l| l.service_offering_id.clone())
            .collect();
        assert_eq!(line_ids, expected);
        assert!(stored.lines.iter().zip(0..).all(|(l, i)| l.position == i));
    }

    #[tokio::test]
    async fn non_confirmed_booking_writes_nothing() {
        let f = fixture().await;
        for status in [
            BookingStatus::Pending,
            BookingStatus::OnProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let booking = booking_in(&f, status, vec![]).await;
            let err = f
                .svc
                .create_from_booking(&f.cashier, &booking.id)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                DomainError::InvalidTransition(TransitionRejection::NotEligible { .. })
            ));
        }
        assert_eq!(work_order::Entity::find().count(&f.db).await.unwrap(), 0);
        assert_eq!(work_order_service_line::Entity::find().count(&f.db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn only_staff_create_work_orders() {
        let f = fixture().await;
        let booking = booking_in(&f, BookingStatus::Confirmed, vec![]).await;
        let err = f
            .svc
            .create_from_booking(&f.mechanic, &booking.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn assign_mechanic_once() {
        let f = fixture().await;
        let booking = booking_in(&f, BookingStatus::Confirmed, vec![]).await;
        let wo = f.svc.create_from_booking(&f.cashier, &booking.id).await.unwrap();

        let rows = f
            .svc
            .assign_mechanic(&f.cashier, &wo.id, &f.mechanic.id)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = f.svc.get(&f.mechanic, &wo.id).await.unwrap();
        assert_eq!(stored.status, WorkOrderStatus::OnProgress);
        assert_eq!(stored.mechanic_id.as_deref(), Some(f.mechanic.id.as_str()));

        let err = f
            .svc
            .assign_mechanic(&f.cashier, &wo.id, &f.mechanic.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidTransition(TransitionRejection::NotEligible { .. })
        ));
    }

    #[tokio::test]
    async fn assignee_must_be_an_active_mechanic() {
        let f = fixture().await;
        let booking = booking_in(&f, BookingStatus::Confirmed, vec![]).await;
        let wo = f.svc.create_from_booking(&f.cashier, &booking.id).await.unwrap();

        let mut retired = seed_user(&*f.repos, "old-mech@example.com", UserRole::Mechanic).await;
        retired.is_active = false;
        f.repos.users().update(&retired).await.unwrap();

        for candidate in [f.customer_id.as_str(), f.cashier.id.as_str(), retired.id.as_str(), "nobody"] {
            let err = f
                .svc
                .assign_mechanic(&f.cashier, &wo.id, candidate)
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Unprocessable(_)), "{candidate}: {err}");

            let stored = f.svc.get(&f.cashier, &wo.id).await.unwrap();
            assert_eq!(stored.status, WorkOrderStatus::Open);
            assert_eq!(stored.mechanic_id, None);
        }
    }

    #[tokio::test]
    async fn status_updates_are_trusted_but_scoped() {
        let f = fixture().await;
        let booking = booking_in(&f, BookingStatus::Confirmed, vec![]).await;
        let wo = f.svc.create_from_booking(&f.cashier, &booking.id).await.unwrap();

        // not assigned yet
        let err = f
            .svc
            .update_status(&f.mechanic, &wo.id, WorkOrderStatus::Completed)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        f.svc
            .assign_mechanic(&f.cashier, &wo.id, &f.mechanic.id)
            .await
            .unwrap();
        let rows = f
            .svc
            .update_status(&f.mechanic, &wo.id, WorkOrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(rows, 1);

        // no transition table: a completed order can be reopened by staff
        f.svc
            .update_status(&f.cashier, &wo.id, WorkOrderStatus::Open)
            .await
            .unwrap();

        let err = f
            .svc
            .update_status(&f.cashier, "missing", WorkOrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn fetch_scopes_by_role() {
        let f = fixture().await;
        let first = booking_in(&f, BookingStatus::Confirmed, vec![]).await;
        let second = booking_in(&f, BookingStatus::Confirmed, vec![]).await;
        let assigned = f.svc.create_from_booking(&f.cashier, &first.id).await.unwrap();
        f.svc.create_from_booking(&f.cashier, &second.id).await.unwrap();
        f.svc
            .assign_mechanic(&f.cashier, &assigned.id, &f.mechanic.id)
            .await
            .unwrap();

        let all = f
            .svc
            .fetch(&f.cashier, WorkOrderFetchParams::default())
            .await
            .unwrap();
        assert_eq!(all.total, 2);

        let mine = f
            .svc
            .fetch(&f.mechanic, WorkOrderFetchParams::default())
            .await
            .unwrap();
        assert_eq!(mine.total, 1);
        assert_eq!(mine.items[0].id, assigned.id);

        let customer = Actor::new(f.customer_id.as_str(), UserRole::Customer);
        let theirs = f
            .svc
            .fetch(&customer, WorkOrderFetchParams::default())
            .await
            .unwrap();
        assert_eq!(theirs.total, 2);

        let stranger = Actor::new("someone-else", UserRole::Customer);
        assert_eq!(
            f.svc
                .fetch(&stranger, WorkOrderFetchParams::default())
                .await
                .unwrap()
                .total,
            0
        );
    }
}
