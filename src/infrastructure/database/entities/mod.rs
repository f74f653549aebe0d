//! Database entities module

pub mod booked_service;
pub mod booking;
pub mod revoked_token;
pub mod service_offering;
pub mod user;
pub mod vehicle;
pub mod work_order;
pub mod work_order_service_line;

pub use booked_service::Entity as BookedService;
pub use booking::Entity as Booking;
pub use revoked_token::Entity as RevokedToken;
pub use service_offering::Entity as ServiceOffering;
pub use user::Entity as User;
pub use vehicle::Entity as Vehicle;
pub use work_order::Entity as WorkOrder;
pub use work_order_service_line::Entity as WorkOrderServiceLine;
