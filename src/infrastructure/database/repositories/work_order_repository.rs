//! SeaORM implementation of WorkOrderRepository

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::{db_err, filter_by, order, search_any};
use crate::domain::work_order::{
    WorkOrder, WorkOrderFetchParams, WorkOrderFilter, WorkOrderRepository, WorkOrderServiceLine,
    WorkOrderSort, WorkOrderStatus,
};
use crate::domain::{DomainError, DomainResult, StatusChange};
use crate::infrastructure::database::entities::{work_order, work_order_service_line};

pub struct SeaOrmWorkOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmWorkOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn with_lines(&self, models: Vec<work_order::Model>) -> DomainResult<Vec<WorkOrder>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let mut lines: HashMap<String, Vec<WorkOrderServiceLine>> = HashMap::new();
        for line in work_order_service_line::Entity::find()
            .filter(
                work_order_service_line::Column::WorkOrderId
                    .is_in(models.iter().map(|m| m.id.as_str())),
            )
            .order_by_asc(work_order_service_line::Column::Position)
            .all(&self.db)
            .await
            .map_err(db_err)?
        {
            let line = line_to_domain(line)?;
            lines.entry(line.work_order_id.clone()).or_default().push(line);
        }

        models
            .into_iter()
            .map(|m| {
                let own = lines.remove(&m.id).unwrap_or_default();
                model_to_domain(m, own)
            })
            .collect()
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn parse_status(owner: &str, raw: &str) -> DomainResult<WorkOrderStatus> {
    raw.parse::<WorkOrderStatus>()
        .map_err(|_| DomainError::Database(format!("{} has unknown status {}", owner, raw)))
}

fn model_to_domain(m: work_order::Model, lines: Vec<WorkOrderServiceLine>) -> DomainResult<WorkOrder> {
    Ok(WorkOrder {
        status: parse_status(&m.id, &m.status)?,
        id: m.id,
        booking_id: m.booking_id,
        customer_id: m.customer_id,
        vehicle_id: m.vehicle_id,
        mechanic_id: m.mechanic_id,
        notes: m.notes,
        created_at: m.created_at,
        created_by: m.created_by,
        updated_at: m.updated_at,
        updated_by: m.updated_by,
        deleted_at: m.deleted_at,
        lines,
    })
}

fn line_to_domain(m: work_order_service_line::Model) -> DomainResult<WorkOrderServiceLine> {
    Ok(WorkOrderServiceLine {
        status: parse_status(&m.id, &m.status)?,
        id: m.id,
        work_order_id: m.work_order_id,
        service_offering_id: m.service_offering_id,
        service_name: m.service_name,
        price: m.price,
        quantity: m.quantity,
        position: m.position,
        created_at: m.created_at,
        created_by: m.created_by,
    })
}

// ── WorkOrderRepository impl ────────────────────────────────────

#[async_trait]
impl WorkOrderRepository for SeaOrmWorkOrderRepository {
    async fn create(&self, wo: &WorkOrder) -> DomainResult<()> {
        debug!(
            "Creating work order {} for booking {} with {} lines",
            wo.id,
            wo.booking_id,
            wo.lines.len()
        );

        let header = work_order::ActiveModel {
            id: Set(wo.id.clone()),
            booking_id: Set(wo.booking_id.clone()),
            customer_id: Set(wo.customer_id.clone()),
            vehicle_id: Set(wo.vehicle_id.clone()),
            mechanic_id: Set(wo.mechanic_id.clone()),
            status: Set(wo.status.as_str().to_string()),
            notes: Set(wo.notes.clone()),
            created_at: Set(wo.created_at),
            created_by: Set(wo.created_by.clone()),
            updated_at: Set(wo.updated_at),
            updated_by: Set(wo.updated_by.clone()),
            deleted_at: Set(None),
        };
        let lines: Vec<work_order_service_line::ActiveModel> = wo
            .lines
            .iter()
            .map(|l| work_order_service_line::ActiveModel {
                id: Set(l.id.clone()),
                work_order_id: Set(l.work_order_id.clone()),
                service_offering_id: Set(l.service_offering_id.clone()),
                service_name: Set(l.service_name.clone()),
                price: Set(l.price),
                quantity: Set(l.quantity),
                status: Set(l.status.as_str().to_string()),
                position: Set(l.position),
                created_at: Set(l.created_at),
                created_by: Set(l.created_by.clone()),
            })
            .collect();

        let txn = self.db.begin().await.map_err(db_err)?;
        let written = async {
            header.insert(&txn).await?;
            if !lines.is_empty() {
                work_order_service_line::Entity::insert_many(lines)
                    .exec(&txn)
                    .await?;
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

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<WorkOrder>> {
        let model = work_order::Entity::find_by_id(id)
            .filter(work_order::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match model {
            Some(m) => Ok(self.with_lines(vec![m]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn assign_mechanic(
        &self,
        id: &str,
        mechanic_id: &str,
        expected: WorkOrderStatus,
        change: &StatusChange<WorkOrderStatus>,
    ) -> DomainResult<u64> {
        debug!("Assigning mechanic {} to work order {}", mechanic_id, id);

        let result = work_order::Entity::update_many()
            .col_expr(work_order::Column::MechanicId, Expr::value(mechanic_id))
            .col_expr(work_order::Column::Status, Expr::value(change.status.as_str()))
            .col_expr(work_order::Column::UpdatedBy, Expr::value(change.actor_id.clone()))
            .col_expr(work_order::Column::UpdatedAt, Expr::value(change.at))
            .filter(work_order::Column::Id.eq(id))
            .filter(work_order::Column::Status.eq(expected.as_str()))
            .filter(work_order::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn update_status(
        &self,
        id: &str,
        change: &StatusChange<WorkOrderStatus>,
    ) -> DomainResult<u64> {
        debug!("Updating work order {} status -> {}", id, change.status);

        let result = work_order::Entity::update_many()
            .col_expr(work_order::Column::Status, Expr::value(change.status.as_str()))
            .col_expr(work_order::Column::UpdatedBy, Expr::value(change.actor_id.clone()))
            .col_expr(work_order::Column::UpdatedAt, Expr::value(change.at))
            .filter(work_order::Column::Id.eq(id))
            .filter(work_order::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn fetch(&self, params: &WorkOrderFetchParams) -> DomainResult<(Vec<WorkOrder>, u64)> {
        let mut query = work_order::Entity::find().filter(work_order::Column::DeletedAt.is_null());

        for (field, value) in &params.filters {
            let column = match field {
                WorkOrderFilter::CustomerId => work_order::Column::CustomerId,
                WorkOrderFilter::VehicleId => work_order::Column::VehicleId,
                WorkOrderFilter::MechanicId => work_order::Column::MechanicId,
                WorkOrderFilter::BookingId => work_order::Column::BookingId,
                WorkOrderFilter::Status => work_order::Column::Status,
            };
            query = filter_by(query, column, value);
        }

        if let Some(search) = &params.search {
            query = query.filter(search_any(
                &[work_order::Column::Notes, work_order::Column::Status],
                search,
            ));
        }

        let column = match params.order_by {
            WorkOrderSort::Status => work_order::Column::Status,
            WorkOrderSort::CreatedAt => work_order::Column::CreatedAt,
            WorkOrderSort::UpdatedAt => work_order::Column::UpdatedAt,
        };
        query = query.order_by(column, order(params.direction));

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset(params.page.offset())
            .limit(params.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok((self.with_lines(models).await?, total))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{seed_offering, test_repos};
    use super::*;
    use crate::domain::query::ListQuery;
    use crate::domain::{Booking, BookingStatus, RepositoryProvider};
    use chrono::Utc;
    use rust_decimal::Decimal;

    async fn confirmed_booking(repos: &dyn RepositoryProvider, service_count: usize) -> Booking {
        let mut services = Vec::new();
        for i in 0..service_count {
            services.push(seed_offering(repos, &format!("service {}", i), Decimal::new(100 + i as i64, 0)).await);
        }
        let mut booking = Booking::new("customer-1", "vehicle-1", Utc::now(), None, services);
        booking.status = BookingStatus::Confirmed;
        repos
            .bookings()
            .create(&booking, &booking.booked_services())
            .await
            .unwrap();
        booking
    }

    #[tokio::test]
    async fn create_persists_header_and_lines() {
        let (_db, repos) = test_repos().await;
        let booking = confirmed_booking(&repos, 3).await;
        let wo = WorkOrder::from_booking(&booking, "cashier-1").unwrap();

        repos.work_orders().create(&wo).await.unwrap();

        let stored = repos.work_orders().find_by_id(&wo.id).await.unwrap().unwrap();
        assert_eq!(stored.status, WorkOrderStatus::Open);
        assert_eq!(stored.lines.len(), 3);
        assert!(stored.lines.iter().all(|l| l.work_order_id == wo.id));
        assert!(stored.lines.iter().all(|l| l.quantity == 1));
    }

    #[tokio::test]
    async fn failing_line_insert_leaves_nothing_behind() {
        let (db, repos) = test_repos().await;
        let booking = confirmed_booking(&repos, 3).await;
        let mut wo = WorkOrder::from_booking(&booking, "cashier-1").unwrap();
        // Third line collides with the first one's primary key.
        wo.lines[2].id = wo.lines[0].id.clone();

        let result = repos.work_orders().create(&wo).await;
        assert!(matches!(result, Err(DomainError::Database(_))));

        assert_eq!(work_order::Entity::find().count(&db).await.unwrap(), 0);
        assert_eq!(
            work_order_service_line::Entity::find().count(&db).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn assign_mechanic_only_from_expected_status() {
        let (_db, repos) = test_repos().await;
        let booking = confirmed_booking(&repos, 1).await;
        let wo = WorkOrder::from_booking(&booking, "cashier-1").unwrap();
        repos.work_orders().create(&wo).await.unwrap();

        let change = StatusChange::now(WorkOrderStatus::OnProgress, "cashier-1");
        let first = repos
            .work_orders()
            .assign_mechanic(&wo.id, "mech-1", WorkOrderStatus::Open, &change)
            .await
            .unwrap();
        let second = repos
            .work_orders()
            .assign_mechanic(&wo.id, "mech-2", WorkOrderStatus::Open, &change)
            .await
            .unwrap();
        assert_eq!((first, second), (1, 0));

        let stored = repos.work_orders().find_by_id(&wo.id).await.unwrap().unwrap();
        assert_eq!(stored.mechanic_id.as_deref(), Some("mech-1"));
        assert_eq!(stored.status, WorkOrderStatus::OnProgress);
    }

    #[tokio::test]
    async fn unconditional_update_reports_missing_rows() {
        let (_db, repos) = test_repos().await;
        let change = StatusChange::now(WorkOrderStatus::Completed, "mech-1");
        assert_eq!(
            repos.work_orders().update_status("nope", &change).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn fetch_by_mechanic() {
        let (_db, repos) = test_repos().await;
        for mechanic in ["mech-1", "mech-2"] {
            let booking = confirmed_booking(&repos, 0).await;
            let wo = WorkOrder::from_booking(&booking, "cashier-1").unwrap();
            repos.work_orders().create(&wo).await.unwrap();
            let change = StatusChange::now(WorkOrderStatus::OnProgress, "cashier-1");
            repos
                .work_orders()
                .assign_mechanic(&wo.id, mechanic, WorkOrderStatus::Open, &change)
                .await
                .unwrap();
        }

        let query = ListQuery {
            filters: vec![("mechanic_id".into(), "mech-2".into())],
            search: Some("progress".into()),
            ..Default::default()
        };
        let params = WorkOrderFetchParams::from_query(&query, 10).unwrap();
        let (items, total) = repos.work_orders().fetch(&params).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].mechanic_id.as_deref(), Some("mech-2"));
    }
}
