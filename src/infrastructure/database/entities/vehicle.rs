//! Vehicle entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[sea_orm(nullable)]
    pub color: Option<String>,
    pub created_at: DateTimeUtc,
    pub created_by: String,
    pub updated_at: DateTimeUtc,
    #[sea_orm(nullable)]
    pub updated_by: Option<String>,
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub deleted_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
