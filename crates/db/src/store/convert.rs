//! Row <-> domain conversions.

use chrono::{DateTime, Utc};
use innkeep_core::model::{
    self, Customer, DateRange, Payment, Reservation, Room, ServiceItem, ServiceLine, User,
};
use innkeep_core::store::StoreError;
use innkeep_shared::types::{
    CustomerId, Money, PaymentId, ReservationId, RoomId, ServiceItemId, ServiceLineId, UserId,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::entities::sea_orm_active_enums as db;
use crate::entities::{
    customers, payments, reservation_services, reservations, rooms, service_items, users,
};

/// Maps a Postgres enum to its domain twin, both directions.
macro_rules! enum_mapping {
    ($db:ident <=> $core:ident { $($variant:ident),+ $(,)? }) => {
        impl From<db::$db> for model::$core {
            fn from(value: db::$db) -> Self {
                match value {
                    $(db::$db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<model::$core> for db::$db {
            fn from(value: model::$core) -> Self {
                match value {
                    $(model::$core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

enum_mapping!(UserRole <=> Role { Receptionist, Manager, Admin });
enum_mapping!(RoomType <=> RoomType { Single, Double, Twin, Suite, Family });
enum_mapping!(RoomState <=> RoomState { Available, Occupied, Maintenance, OutOfService });
enum_mapping!(ReservationStatus <=> ReservationStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
});
enum_mapping!(PaymentMethod <=> PaymentMethod { Cash, Card, Check, Transfer, Paypal, Online });
enum_mapping!(PaymentType <=> PaymentType { Deposit, Balance, Refund, Fee });

fn money(column: &str, value: Decimal) -> Result<Money, StoreError> {
    Money::from_decimal(value)
        .map_err(|e| StoreError::Backend(format!("bad {column} value {value}: {e}")))
}

fn utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

// ========== Rows -> domain ==========

pub(crate) fn user(row: users::Model) -> User {
    User {
        id: UserId::from_uuid(row.id),
        username: row.username,
        role: row.role.into(),
    }
}

pub(crate) fn room(row: rooms::Model) -> Result<Room, StoreError> {
    Ok(Room {
        id: RoomId::from_uuid(row.id),
        number: row.number,
        room_type: row.room_type.into(),
        state: row.state.into(),
        capacity: row.capacity,
        price: money("rooms.price", row.price)?,
        archived_at: row.archived_at.map(utc),
    })
}

pub(crate) fn customer(row: customers::Model) -> Customer {
    Customer {
        id: CustomerId::from_uuid(row.id),
        full_name: row.full_name,
        phone: row.phone,
        email: row.email,
        created_at: utc(row.created_at),
        archived_at: row.archived_at.map(utc),
    }
}

pub(crate) fn reservation(row: reservations::Model) -> Result<Reservation, StoreError> {
    Ok(Reservation {
        id: ReservationId::from_uuid(row.id),
        room_id: RoomId::from_uuid(row.room_id),
        customer_id: CustomerId::from_uuid(row.customer_id),
        created_by: UserId::from_uuid(row.created_by),
        dates: DateRange {
            start: row.start_date,
            end: row.end_date,
        },
        status: row.status.into(),
        base_amount: money("reservations.base_amount", row.base_amount)?,
        stored_total: money("reservations.total_amount", row.total_amount)?,
        created_at: utc(row.created_at),
        updated_at: utc(row.updated_at),
    })
}

pub(crate) fn service_item(row: service_items::Model) -> Result<ServiceItem, StoreError> {
    Ok(ServiceItem {
        id: ServiceItemId::from_uuid(row.id),
        name: row.name,
        unit_price: money("service_items.unit_price", row.unit_price)?,
        created_at: utc(row.created_at),
        updated_at: utc(row.updated_at),
    })
}

pub(crate) fn service_line(row: reservation_services::Model) -> Result<ServiceLine, StoreError> {
    Ok(ServiceLine {
        id: ServiceLineId::from_uuid(row.id),
        reservation_id: ReservationId::from_uuid(row.reservation_id),
        service_item_id: ServiceItemId::from_uuid(row.service_item_id),
        unit_price: money("reservation_services.unit_price", row.unit_price)?,
        quantity: row.quantity,
        created_at: utc(row.created_at),
    })
}

pub(crate) fn payment(row: payments::Model) -> Result<Payment, StoreError> {
    Ok(Payment {
        id: PaymentId::from_uuid(row.id),
        reservation_id: ReservationId::from_uuid(row.reservation_id),
        amount: money("payments.amount", row.amount)?,
        method: row.method.into(),
        payment_type: row.payment_type.into(),
        paid_at: utc(row.paid_at),
        transaction_ref: row.transaction_ref,
        comment: row.comment,
        recorded_by: UserId::from_uuid(row.recorded_by),
        created_at: utc(row.created_at),
    })
}

/// Applies `convert` to every row, stopping at the first bad one.
pub(crate) fn all<R, T>(
    rows: Vec<R>,
    convert: fn(R) -> Result<T, StoreError>,
) -> Result<Vec<T>, StoreError> {
    rows.into_iter().map(convert).collect()
}

// ========== Domain -> rows ==========

pub(crate) fn room_row(room: &Room) -> rooms::ActiveModel {
    rooms::ActiveModel {
        id: Set(room.id.into_inner()),
        number: Set(room.number.clone()),
        room_type: Set(room.room_type.into()),
        state: Set(room.state.into()),
        capacity: Set(room.capacity),
        price: Set(room.price.to_decimal()),
        archived_at: Set(room.archived_at.map(Into::into)),
        created_at: NotSet,
    }
}

pub(crate) fn customer_row(customer: &Customer) -> customers::ActiveModel {
    customers::ActiveModel {
        id: Set(customer.id.into_inner()),
        full_name: Set(customer.full_name.clone()),
        phone: Set(customer.phone.clone()),
        email: Set(customer.email.clone()),
        archived_at: Set(customer.archived_at.map(Into::into)),
        created_at: Set(customer.created_at.into()),
    }
}

pub(crate) fn reservation_row(reservation: &Reservation) -> reservations::ActiveModel {
    reservations::ActiveModel {
        id: Set(reservation.id.into_inner()),
        room_id: Set(reservation.room_id.into_inner()),
        customer_id: Set(reservation.customer_id.into_inner()),
        created_by: Set(reservation.created_by.into_inner()),
        start_date: Set(reservation.dates.start),
        end_date: Set(reservation.dates.end),
        status: Set(reservation.status.into()),
        base_amount: Set(reservation.base_amount.to_decimal()),
        total_amount: Set(reservation.stored_total.to_decimal()),
        created_at: Set(reservation.created_at.into()),
        updated_at: Set(reservation.updated_at.into()),
    }
}

pub(crate) fn service_item_row(item: &ServiceItem) -> service_items::ActiveModel {
    service_items::ActiveModel {
        id: Set(item.id.into_inner()),
        name: Set(item.name.clone()),
        unit_price: Set(item.unit_price.to_decimal()),
        created_at: Set(item.created_at.into()),
        updated_at: Set(item.updated_at.into()),
    }
}

pub(crate) fn service_line_row(line: &ServiceLine) -> reservation_services::ActiveModel {
    reservation_services::ActiveModel {
        id: Set(line.id.into_inner()),
        reservation_id: Set(line.reservation_id.into_inner()),
        service_item_id: Set(line.service_item_id.into_inner()),
        unit_price: Set(line.unit_price.to_decimal()),
        quantity: Set(line.quantity),
        created_at: Set(line.created_at.into()),
    }
}

pub(crate) fn payment_row(payment: &Payment) -> payments::ActiveModel {
    payments::ActiveModel {
        id: Set(payment.id.into_inner()),
        reservation_id: Set(payment.reservation_id.into_inner()),
        amount: Set(payment.amount.to_decimal()),
        method: Set(payment.method.into()),
        payment_type: Set(payment.payment_type.into()),
        paid_at: Set(payment.paid_at.into()),
        transaction_ref: Set(payment.transaction_ref.clone()),
        comment: Set(payment.comment.clone()),
        recorded_by: Set(payment.recorded_by.into_inner()),
        created_at: Set(payment.created_at.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_mapping_round_trips() {
        for status in [
            model::ReservationStatus::Pending,
            model::ReservationStatus::InProgress,
            model::ReservationStatus::Cancelled,
        ] {
            let row: db::ReservationStatus = status.into();
            assert_eq!(model::ReservationStatus::from(row), status);
        }
        assert_eq!(
            db::RoomState::from(model::RoomState::OutOfService),
            db::RoomState::OutOfService
        );
    }

    #[test]
    fn test_money_column_precision() {
        let value = Decimal::new(15_100, 2);
        assert_eq!(money("t.c", value).unwrap(), Money::from_minor(15_100));
        assert_eq!(
            money("t.c", Decimal::new(1_005, 3)).unwrap(),
            Money::from_minor(101)
        );
        assert!(money("t.c", Decimal::MAX).is_err());
    }
}
