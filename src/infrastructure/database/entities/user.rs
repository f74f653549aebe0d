//! User entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "cashier")]
    Cashier,
    #[sea_orm(string_value = "mechanic")]
    Mechanic,
    #[sea_orm(string_value = "customer")]
    Customer,
}

impl From<crate::domain::UserRole> for UserRole {
    fn from(role: crate::domain::UserRole) -> Self {
        use crate::domain::UserRole as R;
        match role {
            R::Admin => Self::Admin,
            R::Cashier => Self::Cashier,
            R::Mechanic => Self::Mechanic,
            R::Customer => Self::Customer,
        }
    }
}

impl From<UserRole> for crate::domain::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Cashier => Self::Cashier,
            UserRole::Mechanic => Self::Mechanic,
            UserRole::Customer => Self::Customer,
        }
    }
}

/// User model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(nullable)]
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
