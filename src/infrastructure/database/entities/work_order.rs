//! Work order entity

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub booking_id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    #[sea_orm(nullable)]
    pub mechanic_id: Option<String>,

    /// open, on_progress, completed, cancelled
    pub status: String,

    #[sea_orm(nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub created_by: String,
    pub updated_at: DateTimeUtc,
    #[sea_orm(nullable)]
    pub updated_by: Option<String>,
    #[sea_orm(nullable)]
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    #[sea_orm(has_many = "super::work_order_service_line::Entity")]
    ServiceLines,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::work_order_service_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
