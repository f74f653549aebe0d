//! Service catalog entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "service_offerings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
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
pub enum Relation {
    #[sea_orm(has_many = "super::booked_service::Entity")]
    BookedServices,
}

impl Related<super::booked_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookedServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
