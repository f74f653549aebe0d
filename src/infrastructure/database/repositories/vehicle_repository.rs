//! SeaORM implementation of VehicleRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, filter_by, filter_by_int, order, search_any};
use crate::domain::vehicle::{VehicleFetchParams, VehicleFilter, VehicleRepository, VehicleSort};
use crate::domain::{DomainResult, Vehicle};
use crate::infrastructure::database::entities::vehicle;

pub struct SeaOrmVehicleRepository {
    db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: vehicle::Model) -> Vehicle {
    Vehicle {
        id: m.id,
        user_id: m.user_id,
        license_plate: m.license_plate,
        brand: m.brand,
        model: m.model,
        year: m.year,
        color: m.color,
        created_at: m.created_at,
        created_by: m.created_by,
        updated_at: m.updated_at,
        updated_by: m.updated_by,
        deleted_at: m.deleted_at,
    }
}

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn create(&self, v: &Vehicle) -> DomainResult<()> {
        debug!("Creating vehicle {} for user {}", v.license_plate, v.user_id);

        let model = vehicle::ActiveModel {
            id: Set(v.id.clone()),
            user_id: Set(v.user_id.clone()),
            license_plate: Set(v.license_plate.clone()),
            brand: Set(v.brand.clone()),
            model: Set(v.model.clone()),
            year: Set(v.year),
            color: Set(v.color.clone()),
            created_at: Set(v.created_at),
            created_by: Set(v.created_by.clone()),
            updated_at: Set(v.updated_at),
            updated_by: Set(v.updated_by.clone()),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find_by_id(id)
            .filter(vehicle::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_plate(&self, license_plate: &str) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find()
            .filter(vehicle::Column::LicensePlate.eq(license_plate))
            .filter(vehicle::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn update(&self, v: &Vehicle) -> DomainResult<u64> {
        debug!("Updating vehicle: {}", v.id);
        let result = vehicle::Entity::update_many()
            .col_expr(vehicle::Column::LicensePlate, Expr::value(v.license_plate.clone()))
            .col_expr(vehicle::Column::Brand, Expr::value(v.brand.clone()))
            .col_expr(vehicle::Column::Model, Expr::value(v.model.clone()))
            .col_expr(vehicle::Column::Year, Expr::value(v.year))
            .col_expr(vehicle::Column::Color, Expr::value(v.color.clone()))
            .col_expr(vehicle::Column::UpdatedAt, Expr::value(v.updated_at))
            .col_expr(vehicle::Column::UpdatedBy, Expr::value(v.updated_by.clone()))
            .filter(vehicle::Column::Id.eq(v.id.as_str()))
            .filter(vehicle::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn soft_delete(&self, id: &str, actor_id: &str, at: DateTime<Utc>) -> DomainResult<u64> {
        debug!("Soft-deleting vehicle: {}", id);
        let result = vehicle::Entity::update_many()
            .col_expr(vehicle::Column::DeletedAt, Expr::value(at))
            .col_expr(vehicle::Column::DeletedBy, Expr::value(actor_id))
            .filter(vehicle::Column::Id.eq(id))
            .filter(vehicle::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn fetch(&self, params: &VehicleFetchParams) -> DomainResult<(Vec<Vehicle>, u64)> {
        let mut query = vehicle::Entity::find().filter(vehicle::Column::DeletedAt.is_null());

        for (field, value) in &params.filters {
            query = match field {
                VehicleFilter::UserId => filter_by(query, vehicle::Column::UserId, value),
                VehicleFilter::Brand => filter_by(query, vehicle::Column::Brand, value),
                VehicleFilter::Year => filter_by_int(query, vehicle::Column::Year, value)?,
            };
        }

        if let Some(search) = &params.search {
            query = query.filter(search_any(
                &[
                    vehicle::Column::LicensePlate,
                    vehicle::Column::Brand,
                    vehicle::Column::Model,
                ],
                search,
            ));
        }

        let column = match params.order_by {
            VehicleSort::LicensePlate => vehicle::Column::LicensePlate,
            VehicleSort::Brand => vehicle::Column::Brand,
            VehicleSort::Year => vehicle::Column::Year,
            VehicleSort::CreatedAt => vehicle::Column::CreatedAt,
            VehicleSort::UpdatedAt => vehicle::Column::UpdatedAt,
        };
        query = query.order_by(column, order(params.direction));

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let models = query
            .offset(params.page.offset())
            .limit(params.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(model_to_domain).collect(), total))
    }
}
