//! Persistence seam for the reservation core.
//!
//! The facade drives every operation through one [`StoreTx`]: it begins a
//! transaction, locks the rows it reads before writing, and commits. Dropping
//! a transaction without committing rolls it back.
//!
//! These traits are implemented by the db crate for Postgres and by
//! [`InMemoryStore`] for tests. Implementations must enforce the same
//! store-level guards: unique service names, room numbers and phones, one
//! line per (reservation, service), no overlapping non-cancelled bookings
//! per room, and restrict-on-delete for referenced service items.

mod memory;

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_shared::types::{
    CustomerId, PaymentId, ReservationId, RoomId, ServiceItemId, ServiceLineId, UserId,
};
use std::future::Future;
use thiserror::Error;

use crate::model::{
    Customer, DateRange, Payment, Reservation, Room, ServiceItem, ServiceLine, User,
};

pub use memory::{InMemoryStore, InMemoryTx};

/// Constraint names shared by every store implementation.
pub mod constraints {
    /// Case-insensitive unique service name.
    pub const SERVICE_NAME_UNIQUE: &str = "service_items_name_lower_key";
    /// Unique number among active rooms.
    pub const ROOM_NUMBER_UNIQUE: &str = "rooms_number_active_key";
    /// Unique phone among active customers.
    pub const CUSTOMER_PHONE_UNIQUE: &str = "customers_phone_active_key";
    /// One line per (reservation, service item).
    pub const SERVICE_LINE_UNIQUE: &str = "reservation_services_reservation_service_key";
    /// No overlapping non-cancelled reservations for a room.
    pub const RESERVATION_NO_OVERLAP: &str = "reservations_room_no_overlap";
    /// Service lines reference service items.
    pub const SERVICE_LINE_ITEM_FK: &str = "reservation_services_service_item_id_fkey";
    /// Service lines reference reservations.
    pub const SERVICE_LINE_RESERVATION_FK: &str = "reservation_services_reservation_id_fkey";
    /// Payments reference reservations.
    pub const PAYMENT_RESERVATION_FK: &str = "payments_reservation_id_fkey";
}

/// Errors raised by a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Opaque backend failure.
    #[error("{0}")]
    Backend(String),

    /// A unique constraint rejected the write.
    #[error("unique constraint {constraint} violated")]
    UniqueViolation {
        /// Constraint name.
        constraint: String,
    },

    /// An exclusion constraint rejected the write.
    #[error("exclusion constraint {constraint} violated")]
    ExclusionViolation {
        /// Constraint name.
        constraint: String,
    },

    /// A foreign key rejected the write or delete.
    #[error("foreign key {constraint} violated")]
    ForeignKeyViolation {
        /// Constraint name.
        constraint: String,
    },
}

impl StoreError {
    /// Returns true if this is a violation of the named constraint.
    #[must_use]
    pub fn violates(&self, name: &str) -> bool {
        match self {
            Self::UniqueViolation { constraint }
            | Self::ExclusionViolation { constraint }
            | Self::ForeignKeyViolation { constraint } => constraint == name,
            Self::Backend(_) => false,
        }
    }
}

/// A source of store transactions.
pub trait Store: Send + Sync {
    /// Transaction type.
    type Tx: StoreTx;

    /// Begins a transaction.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx, StoreError>> + Send;
}

/// One atomic unit of reads and writes.
///
/// `find_*` lookups ignore archived rooms and customers. `lock_*` lookups
/// additionally hold the row until commit or rollback.
pub trait StoreTx: Send {
    // ========== Users ==========
    /// Finds a user by ID.
    fn find_user(
        &mut self,
        id: UserId,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;

    // ========== Rooms ==========
    /// Finds an active room by ID.
    fn find_room(
        &mut self,
        id: RoomId,
    ) -> impl Future<Output = Result<Option<Room>, StoreError>> + Send;

    /// Finds and locks an active room.
    fn lock_room(
        &mut self,
        id: RoomId,
    ) -> impl Future<Output = Result<Option<Room>, StoreError>> + Send;

    /// Finds an active room by number.
    fn find_room_by_number(
        &mut self,
        number: &str,
    ) -> impl Future<Output = Result<Option<Room>, StoreError>> + Send;

    /// Inserts a room.
    fn insert_room(&mut self, room: &Room) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Updates a room.
    fn update_room(&mut self, room: &Room) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Archives a room.
    fn archive_room(
        &mut self,
        id: RoomId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ========== Customers ==========
    /// Finds an active customer by ID.
    fn find_customer(
        &mut self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<Customer>, StoreError>> + Send;

    /// Finds and locks an active customer.
    fn lock_customer(
        &mut self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<Customer>, StoreError>> + Send;

    /// Finds an active customer by normalized phone.
    fn find_customer_by_phone(
        &mut self,
        phone: &str,
    ) -> impl Future<Output = Result<Option<Customer>, StoreError>> + Send;

    /// Inserts a customer.
    fn insert_customer(
        &mut self,
        customer: &Customer,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Archives a customer.
    fn archive_customer(
        &mut self,
        id: CustomerId,
        at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ========== Reservations ==========
    /// Finds a reservation by ID.
    fn find_reservation(
        &mut self,
        id: ReservationId,
    ) -> impl Future<Output = Result<Option<Reservation>, StoreError>> + Send;

    /// Finds and locks a reservation.
    fn lock_reservation(
        &mut self,
        id: ReservationId,
    ) -> impl Future<Output = Result<Option<Reservation>, StoreError>> + Send;

    /// Non-cancelled reservations of `room` overlapping `range`.
    fn overlapping_reservations(
        &mut self,
        room: RoomId,
        range: DateRange,
    ) -> impl Future<Output = Result<Vec<Reservation>, StoreError>> + Send;

    /// Counts reservations of a room ending on or after `today`, cancelled
    /// ones included.
    fn count_active_reservations_for_room(
        &mut self,
        room: RoomId,
        today: NaiveDate,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Counts reservations of a customer ending on or after `today`, cancelled
    /// ones included.
    fn count_active_reservations_for_customer(
        &mut self,
        customer: CustomerId,
        today: NaiveDate,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Inserts a reservation.
    fn insert_reservation(
        &mut self,
        reservation: &Reservation,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Updates a reservation.
    fn update_reservation(
        &mut self,
        reservation: &Reservation,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes a reservation.
    fn delete_reservation(
        &mut self,
        id: ReservationId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ========== Service Items ==========
    /// Lists the catalog ordered by name.
    fn list_service_items(
        &mut self,
    ) -> impl Future<Output = Result<Vec<ServiceItem>, StoreError>> + Send;

    /// Finds a service item by ID.
    fn find_service_item(
        &mut self,
        id: ServiceItemId,
    ) -> impl Future<Output = Result<Option<ServiceItem>, StoreError>> + Send;

    /// Finds a service item by name, case-insensitively.
    fn find_service_item_by_name(
        &mut self,
        name: &str,
    ) -> impl Future<Output = Result<Option<ServiceItem>, StoreError>> + Send;

    /// Inserts a service item.
    fn insert_service_item(
        &mut self,
        item: &ServiceItem,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Updates a service item.
    fn update_service_item(
        &mut self,
        item: &ServiceItem,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes a service item.
    fn delete_service_item(
        &mut self,
        id: ServiceItemId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Counts lines referencing a service item.
    fn count_service_lines_for_item(
        &mut self,
        id: ServiceItemId,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    // ========== Service Lines ==========
    /// Lines of a reservation in attach order.
    fn service_lines(
        &mut self,
        reservation: ReservationId,
    ) -> impl Future<Output = Result<Vec<ServiceLine>, StoreError>> + Send;

    /// Inserts a line.
    fn insert_service_line(
        &mut self,
        line: &ServiceLine,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Updates a line.
    fn update_service_line(
        &mut self,
        line: &ServiceLine,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes a line.
    fn delete_service_line(
        &mut self,
        id: ServiceLineId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ========== Payments ==========
    /// Payments of a reservation in recording order.
    fn payments(
        &mut self,
        reservation: ReservationId,
    ) -> impl Future<Output = Result<Vec<Payment>, StoreError>> + Send;

    /// Finds a payment by ID.
    fn find_payment(
        &mut self,
        id: PaymentId,
    ) -> impl Future<Output = Result<Option<Payment>, StoreError>> + Send;

    /// Inserts a payment.
    fn insert_payment(
        &mut self,
        payment: &Payment,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes a payment.
    fn delete_payment(
        &mut self,
        id: PaymentId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    // ========== Completion ==========
    /// Commits the transaction.
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
