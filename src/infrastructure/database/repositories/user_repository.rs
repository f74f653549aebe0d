//! SeaORM implementations of UserRepository and RevokedTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::{db_err, filter_by, is_unique_violation, order, search_any};
use crate::domain::query::FilterValue;
use crate::domain::user::{
    RevokedTokenRepository, UserFetchParams, UserFilter, UserRepository, UserSort,
};
use crate::domain::{DomainError, DomainResult, User};
use crate::infrastructure::database::entities::{revoked_token, user};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        password_hash: model.password_hash,
        role: model.role.into(),
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
        last_login_at: model.last_login_at,
    }
}

fn domain_to_active(u: &User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(u.id.clone()),
        name: Set(u.name.clone()),
        email: Set(u.email.clone()),
        phone: Set(u.phone.clone()),
        password_hash: Set(u.password_hash.clone()),
        role: Set(u.role.into()),
        is_active: Set(u.is_active),
        created_at: Set(u.created_at),
        updated_at: Set(u.updated_at),
        last_login_at: Set(u.last_login_at),
    }
}

fn conflict_or_db(e: sea_orm::DbErr) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::Conflict("email already registered".to_string())
    } else {
        db_err(e)
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, u: &User) -> DomainResult<()> {
        debug!("Creating user: {} ({})", u.email, u.role);
        domain_to_active(u)
            .insert(&self.db)
            .await
            .map_err(conflict_or_db)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn fetch(&self, params: &UserFetchParams) -> DomainResult<(Vec<User>, u64)> {
        let mut query = user::Entity::find();

        for (field, value) in &params.filters {
            query = match field {
                UserFilter::Role => filter_by(query, user::Column::Role, value),
                UserFilter::IsActive => {
                    let flag = |v: &str| matches!(v, "true" | "1");
                    match value {
                        FilterValue::Eq(v) => query.filter(user::Column::IsActive.eq(flag(v.as_str()))),
                        FilterValue::In(vs) => query.filter(
                            user::Column::IsActive.is_in(vs.iter().map(|v| flag(v.as_str()))),
                        ),
                    }
                }
            };
        }

        if let Some(search) = &params.search {
            query = query.filter(search_any(&[user::Column::Name, user::Column::Email], search));
        }

        let column = match params.order_by {
            UserSort::Name => user::Column::Name,
            UserSort::Email => user::Column::Email,
            UserSort::CreatedAt => user::Column::CreatedAt,
            UserSort::UpdatedAt => user::Column::UpdatedAt,
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

    async fn update(&self, u: &User) -> DomainResult<()> {
        debug!("Updating user: {}", u.id);
        let result = user::Entity::update_many()
            .col_expr(user::Column::Name, Expr::value(u.name.clone()))
            .col_expr(user::Column::Email, Expr::value(u.email.clone()))
            .col_expr(user::Column::Phone, Expr::value(u.phone.clone()))
            .col_expr(user::Column::PasswordHash, Expr::value(u.password_hash.clone()))
            .col_expr(user::Column::IsActive, Expr::value(u.is_active))
            .col_expr(user::Column::UpdatedAt, Expr::value(u.updated_at))
            .filter(user::Column::Id.eq(u.id.as_str()))
            .exec(&self.db)
            .await
            .map_err(conflict_or_db)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("User", &u.id));
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        user::Entity::update_many()
            .col_expr(user::Column::LastLoginAt, Expr::value(at))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}

// ── RevokedTokenRepository impl ─────────────────────────────────

pub struct SeaOrmRevokedTokenRepository {
    db: DatabaseConnection,
}

impl SeaOrmRevokedTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RevokedTokenRepository for SeaOrmRevokedTokenRepository {
    async fn revoke(&self, token_hash: &str, expires_at: DateTime<Utc>) -> DomainResult<()> {
        let model = revoked_token::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        };
        match model.insert(&self.db).await {
            Ok(_) => Ok(()),
            // Logging out twice with the same token is a no-op.
            Err(e) if is_unique_violation(&e) => Ok(()),
            Err(e) => Err(db_err(e)),
        }
    }

    async fn is_revoked(&self, token_hash: &str) -> DomainResult<bool> {
        let count = revoked_token::Entity::find()
            .filter(revoked_token::Column::TokenHash.eq(token_hash))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<u64> {
        let result = revoked_token::Entity::delete_many()
            .filter(revoked_token::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        debug!("Purged {} expired revoked tokens", result.rows_affected);
        Ok(result.rows_affected)
    }
}
