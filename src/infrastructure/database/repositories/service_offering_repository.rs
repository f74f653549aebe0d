//! SeaORM implementation of ServiceOfferingRepository (catalog lookup)

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, order, search_any};
use crate::domain::catalog::{
    ServiceOfferingFetchParams, ServiceOfferingRepository, ServiceOfferingSort,
};
use crate::domain::{DomainResult, ServiceOffering};
use crate::infrastructure::database::entities::service_offering;

pub struct SeaOrmServiceOfferingRepository {
    db: DatabaseConnection,
}

impl SeaOrmServiceOfferingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(crate) fn model_to_domain(m: service_offering::Model) -> ServiceOffering {
    ServiceOffering {
        id: m.id,
        name: m.name,
        description: m.description,
        price: m.price,
        created_at: m.created_at,
        created_by: m.created_by,
        updated_at: m.updated_at,
        updated_by: m.updated_by,
    }
}

#[async_trait]
impl ServiceOfferingRepository for SeaOrmServiceOfferingRepository {
    async fn create(&self, s: &ServiceOffering) -> DomainResult<()> {
        debug!("Creating service offering: {}", s.name);

        let model = service_offering::ActiveModel {
            id: Set(s.id.clone()),
            name: Set(s.name.clone()),
            description: Set(s.description.clone()),
            price: Set(s.price),
            created_at: Set(s.created_at),
            created_by: Set(s.created_by.clone()),
            updated_at: Set(s.updated_at),
            updated_by: Set(s.updated_by.clone()),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };
        model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<ServiceOffering>> {
        let model = service_offering::Entity::find_by_id(id)
            .filter(service_offering::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_ids(&self, ids: &[String]) -> DomainResult<Vec<ServiceOffering>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = service_offering::Entity::find()
            .filter(service_offering::Column::Id.is_in(ids.iter().map(String::as_str)))
            .filter(service_offering::Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut by_id: HashMap<String, service_offering::Model> =
            models.into_iter().map(|m| (m.id.clone(), m)).collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(model_to_domain)
            .collect())
    }

    async fn update(&self, s: &ServiceOffering) -> DomainResult<u64> {
        debug!("Updating service offering: {}", s.id);
        let result = service_offering::Entity::update_many()
            .col_expr(service_offering::Column::Name, Expr::value(s.name.clone()))
            .col_expr(
                service_offering::Column::Description,
                Expr::value(s.description.clone()),
            )
            .col_expr(service_offering::Column::Price, Expr::value(s.price))
            .col_expr(service_offering::Column::UpdatedAt, Expr::value(s.updated_at))
            .col_expr(
                service_offering::Column::UpdatedBy,
                Expr::value(s.updated_by.clone()),
            )
            .filter(service_offering::Column::Id.eq(s.id.as_str()))
            .filter(service_offering::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn soft_delete(&self, id: &str, actor_id: &str, at: DateTime<Utc>) -> DomainResult<u64> {
        debug!("Soft-deleting service offering: {}", id);
        let result = service_offering::Entity::update_many()
            .col_expr(service_offering::Column::DeletedAt, Expr::value(at))
            .col_expr(service_offering::Column::DeletedBy, Expr::value(actor_id))
            .filter(service_offering::Column::Id.eq(id))
            .filter(service_offering::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }

    async fn fetch(
        &self,
        params: &ServiceOfferingFetchParams,
    ) -> DomainResult<(Vec<ServiceOffering>, u64)> {
        let mut query =
            service_offering::Entity::find().filter(service_offering::Column::DeletedAt.is_null());

        // ServiceOfferingFilter has no variants, so `params.filters` is always empty.

        if let Some(search) = &params.search {
            query = query.filter(search_any(
                &[
                    service_offering::Column::Name,
                    service_offering::Column::Description,
                ],
                search,
            ));
        }

        let column = match params.order_by {
            ServiceOfferingSort::Name => service_offering::Column::Name,
            ServiceOfferingSort::Price => service_offering::Column::Price,
            ServiceOfferingSort::CreatedAt => service_offering::Column::CreatedAt,
            ServiceOfferingSort::UpdatedAt => service_offering::Column::UpdatedAt,
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

#[cfg(test)]
mod tests {
    use super::super::testing::{seed_offering, test_repos};
    use super::*;
    use crate::domain::RepositoryProvider;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn find_by_ids_skips_unknown_and_deleted() {
        let (_db, repos) = test_repos().await;
        let oil = seed_offering(&repos, "oil change", Decimal::new(7550, 2)).await;
        let tyres = seed_offering(&repos, "tyre rotation", Decimal::new(2000, 0)).await;
        repos
            .service_offerings()
            .soft_delete(&tyres.id, "admin", Utc::now())
            .await
            .unwrap();

        let found = repos
            .service_offerings()
            .find_by_ids(&[oil.id.clone(), tyres.id.clone(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, oil.id);
        assert_eq!(found[0].name, "Oil Change");
        assert_eq!(found[0].price, Decimal::new(7550, 2));

        assert!(repos.service_offerings().find_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_by_ids_follows_request_order() {
        let (_db, repos) = test_repos().await;
        let a = seed_offering(&repos, "alignment", Decimal::new(10, 0)).await;
        let b = seed_offering(&repos, "brake bleed", Decimal::new(20, 0)).await;
        let c = seed_offering(&repos, "coolant flush", Decimal::new(30, 0)).await;

        let found = repos
            .service_offerings()
            .find_by_ids(&[c.id.clone(), a.id.clone(), c.id.clone(), b.id.clone()])
            .await
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, [c.id.as_str(), a.id.as_str(), b.id.as_str()]);
    }

    #[tokio::test]
    async fn fetch_sorts_by_price() {
        let (_db, repos) = test_repos().await;
        seed_offering(&repos, "cheap", Decimal::new(10, 0)).await;
        seed_offering(&repos, "pricey", Decimal::new(900, 0)).await;
        seed_offering(&repos, "middle", Decimal::new(300, 0)).await;

        let params = ServiceOfferingFetchParams {
            order_by: ServiceOfferingSort::Price,
            ..Default::default()
        };
        let (items, total) = repos.service_offerings().fetch(&params).await.unwrap();
        assert_eq!(total, 3);
        let names: Vec<_> = items.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Pricey", "Middle", "Cheap"]);
    }
}
