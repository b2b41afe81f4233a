//! `SeaORM` entity definitions.

pub mod prelude;

pub mod customers;
pub mod payments;
pub mod reservation_services;
pub mod reservations;
pub mod rooms;
pub mod sea_orm_active_enums;
pub mod service_items;
pub mod users;
