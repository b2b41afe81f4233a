//! In-memory [`Store`] used by tests and local tooling.
//!
//! A transaction owns the table lock for its whole lifetime and works on a
//! private copy; commit swaps the copy in. Transactions are therefore fully
//! serialized, which is stronger than row locking but observably equivalent
//! for the facade.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_shared::types::{
    CustomerId, PaymentId, ReservationId, RoomId, ServiceItemId, ServiceLineId, UserId,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Store, StoreError, StoreTx, constraints};
use crate::model::{
    Customer, DateRange, Payment, Reservation, Room, ServiceItem, ServiceLine, User,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<User>,
    rooms: Vec<Room>,
    customers: Vec<Customer>,
    reservations: Vec<Reservation>,
    service_items: Vec<ServiceItem>,
    service_lines: Vec<ServiceLine>,
    payments: Vec<Payment>,
}

/// Store backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a back-office user. Users are managed outside the core.
    pub async fn add_user(&self, user: User) {
        self.tables.lock().await.users.push(user);
    }

    /// Number of reservations currently stored, cancelled ones included.
    pub async fn reservation_count(&self) -> usize {
        self.tables.lock().await.reservations.len()
    }
}

impl Store for InMemoryStore {
    type Tx = InMemoryTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let work = guard.clone();
        Ok(InMemoryTx { guard, work })
    }
}

/// Transaction over an [`InMemoryStore`].
pub struct InMemoryTx {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

fn missing(what: &str) -> StoreError {
    StoreError::Backend(format!("{what} does not exist"))
}

fn unique(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

fn foreign_key(constraint: &str) -> StoreError {
    StoreError::ForeignKeyViolation {
        constraint: constraint.to_string(),
    }
}

impl Tables {
    fn check_room_number(&self, room: &Room) -> Result<(), StoreError> {
        let taken = self.rooms.iter().any(|r| {
            r.id != room.id
                && r.archived_at.is_none()
                && room.archived_at.is_none()
                && r.number == room.number
        });
        if taken {
            return Err(unique(constraints::ROOM_NUMBER_UNIQUE));
        }
        Ok(())
    }

    fn check_service_name(&self, item: &ServiceItem) -> Result<(), StoreError> {
        let lower = item.name.to_lowercase();
        if self
            .service_items
            .iter()
            .any(|s| s.id != item.id && s.name.to_lowercase() == lower)
        {
            return Err(unique(constraints::SERVICE_NAME_UNIQUE));
        }
        Ok(())
    }

    fn check_no_overlap(&self, reservation: &Reservation) -> Result<(), StoreError> {
        if !reservation.status.blocks_availability() {
            return Ok(());
        }
        let clash = self.reservations.iter().any(|r| {
            r.id != reservation.id
                && r.room_id == reservation.room_id
                && r.status.blocks_availability()
                && r.dates.overlaps(&reservation.dates)
        });
        if clash {
            return Err(StoreError::ExclusionViolation {
                constraint: constraints::RESERVATION_NO_OVERLAP.to_string(),
            });
        }
        Ok(())
    }

    fn count_active<F>(&self, today: NaiveDate, belongs: F) -> u64
    where
        F: Fn(&Reservation) -> bool,
    {
        let count = self
            .reservations
            .iter()
            .filter(|r| belongs(r) && r.dates.end >= today)
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }
}

impl StoreTx for InMemoryTx {
    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.work.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_room(&mut self, id: RoomId) -> Result<Option<Room>, StoreError> {
        Ok(self
            .work
            .rooms
            .iter()
            .find(|r| r.id == id && r.archived_at.is_none())
            .cloned())
    }

    async fn lock_room(&mut self, id: RoomId) -> Result<Option<Room>, StoreError> {
        self.find_room(id).await
    }

    async fn find_room_by_number(&mut self, number: &str) -> Result<Option<Room>, StoreError> {
        Ok(self
            .work
            .rooms
            .iter()
            .find(|r| r.number == number && r.archived_at.is_none())
            .cloned())
    }

    async fn insert_room(&mut self, room: &Room) -> Result<(), StoreError> {
        self.work.check_room_number(room)?;
        self.work.rooms.push(room.clone());
        Ok(())
    }

    async fn update_room(&mut self, room: &Room) -> Result<(), StoreError> {
        self.work.check_room_number(room)?;
        let slot = self
            .work
            .rooms
            .iter_mut()
            .find(|r| r.id == room.id)
            .ok_or_else(|| missing("room"))?;
        *slot = room.clone();
        Ok(())
    }

    async fn archive_room(&mut self, id: RoomId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let slot = self
            .work
            .rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| missing("room"))?;
        slot.archived_at = Some(at);
        Ok(())
    }

    async fn find_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .work
            .customers
            .iter()
            .find(|c| c.id == id && c.archived_at.is_none())
            .cloned())
    }

    async fn lock_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        self.find_customer(id).await
    }

    async fn find_customer_by_phone(
        &mut self,
        phone: &str,
    ) -> Result<Option<Customer>, StoreError> {
        Ok(self
            .work
            .customers
            .iter()
            .find(|c| c.phone == phone && c.archived_at.is_none())
            .cloned())
    }

    async fn insert_customer(&mut self, customer: &Customer) -> Result<(), StoreError> {
        if self
            .work
            .customers
            .iter()
            .any(|c| c.archived_at.is_none() && c.phone == customer.phone)
        {
            return Err(unique(constraints::CUSTOMER_PHONE_UNIQUE));
        }
        self.work.customers.push(customer.clone());
        Ok(())
    }

    async fn archive_customer(
        &mut self,
        id: CustomerId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let slot = self
            .work
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| missing("customer"))?;
        slot.archived_at = Some(at);
        Ok(())
    }

    async fn find_reservation(
        &mut self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, StoreError> {
        Ok(self.work.reservations.iter().find(|r| r.id == id).cloned())
    }

    async fn lock_reservation(
        &mut self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, StoreError> {
        self.find_reservation(id).await
    }

    async fn overlapping_reservations(
        &mut self,
        room: RoomId,
        range: DateRange,
    ) -> Result<Vec<Reservation>, StoreError> {
        Ok(self
            .work
            .reservations
            .iter()
            .filter(|r| {
                r.room_id == room && r.status.blocks_availability() && r.dates.overlaps(&range)
            })
            .cloned()
            .collect())
    }

    async fn count_active_reservations_for_room(
        &mut self,
        room: RoomId,
        today: NaiveDate,
    ) -> Result<u64, StoreError> {
        Ok(self.work.count_active(today, |r| r.room_id == room))
    }

    async fn count_active_reservations_for_customer(
        &mut self,
        customer: CustomerId,
        today: NaiveDate,
    ) -> Result<u64, StoreError> {
        Ok(self.work.count_active(today, |r| r.customer_id == customer))
    }

    async fn insert_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError> {
        self.work.check_no_overlap(reservation)?;
        self.work.reservations.push(reservation.clone());
        Ok(())
    }

    async fn update_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError> {
        self.work.check_no_overlap(reservation)?;
        let slot = self
            .work
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation.id)
            .ok_or_else(|| missing("reservation"))?;
        *slot = reservation.clone();
        Ok(())
    }

    async fn delete_reservation(&mut self, id: ReservationId) -> Result<(), StoreError> {
        if self.work.payments.iter().any(|p| p.reservation_id == id) {
            return Err(foreign_key(constraints::PAYMENT_RESERVATION_FK));
        }
        if self.work.service_lines.iter().any(|l| l.reservation_id == id) {
            return Err(foreign_key(constraints::SERVICE_LINE_RESERVATION_FK));
        }
        self.work.reservations.retain(|r| r.id != id);
        Ok(())
    }

    async fn list_service_items(&mut self) -> Result<Vec<ServiceItem>, StoreError> {
        let mut items = self.work.service_items.clone();
        items.sort_by_key(|s| s.name.to_lowercase());
        Ok(items)
    }

    async fn find_service_item(
        &mut self,
        id: ServiceItemId,
    ) -> Result<Option<ServiceItem>, StoreError> {
        Ok(self.work.service_items.iter().find(|s| s.id == id).cloned())
    }

    async fn find_service_item_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<ServiceItem>, StoreError> {
        let lower = name.to_lowercase();
        Ok(self
            .work
            .service_items
            .iter()
            .find(|s| s.name.to_lowercase() == lower)
            .cloned())
    }

    async fn insert_service_item(&mut self, item: &ServiceItem) -> Result<(), StoreError> {
        self.work.check_service_name(item)?;
        self.work.service_items.push(item.clone());
        Ok(())
    }

    async fn update_service_item(&mut self, item: &ServiceItem) -> Result<(), StoreError> {
        self.work.check_service_name(item)?;
        let slot = self
            .work
            .service_items
            .iter_mut()
            .find(|s| s.id == item.id)
            .ok_or_else(|| missing("service item"))?;
        *slot = item.clone();
        Ok(())
    }

    async fn delete_service_item(&mut self, id: ServiceItemId) -> Result<(), StoreError> {
        if self.work.service_lines.iter().any(|l| l.service_item_id == id) {
            return Err(foreign_key(constraints::SERVICE_LINE_ITEM_FK));
        }
        self.work.service_items.retain(|s| s.id != id);
        Ok(())
    }

    async fn count_service_lines_for_item(&mut self, id: ServiceItemId) -> Result<u64, StoreError> {
        let count = self
            .work
            .service_lines
            .iter()
            .filter(|l| l.service_item_id == id)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn service_lines(
        &mut self,
        reservation: ReservationId,
    ) -> Result<Vec<ServiceLine>, StoreError> {
        Ok(self
            .work
            .service_lines
            .iter()
            .filter(|l| l.reservation_id == reservation)
            .cloned()
            .collect())
    }

    async fn insert_service_line(&mut self, line: &ServiceLine) -> Result<(), StoreError> {
        if !self.work.service_items.iter().any(|s| s.id == line.service_item_id) {
            return Err(foreign_key(constraints::SERVICE_LINE_ITEM_FK));
        }
        if !self.work.reservations.iter().any(|r| r.id == line.reservation_id) {
            return Err(foreign_key(constraints::SERVICE_LINE_RESERVATION_FK));
        }
        if self.work.service_lines.iter().any(|l| {
            l.reservation_id == line.reservation_id && l.service_item_id == line.service_item_id
        }) {
            return Err(unique(constraints::SERVICE_LINE_UNIQUE));
        }
        self.work.service_lines.push(line.clone());
        Ok(())
    }

    async fn update_service_line(&mut self, line: &ServiceLine) -> Result<(), StoreError> {
        let slot = self
            .work
            .service_lines
            .iter_mut()
            .find(|l| l.id == line.id)
            .ok_or_else(|| missing("service line"))?;
        *slot = line.clone();
        Ok(())
    }

    async fn delete_service_line(&mut self, id: ServiceLineId) -> Result<(), StoreError> {
        self.work.service_lines.retain(|l| l.id != id);
        Ok(())
    }

    async fn payments(&mut self, reservation: ReservationId) -> Result<Vec<Payment>, StoreError> {
        Ok(self
            .work
            .payments
            .iter()
            .filter(|p| p.reservation_id == reservation)
            .cloned()
            .collect())
    }

    async fn find_payment(&mut self, id: PaymentId) -> Result<Option<Payment>, StoreError> {
        Ok(self.work.payments.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        if !self
            .work
            .reservations
            .iter()
            .any(|r| r.id == payment.reservation_id)
        {
            return Err(foreign_key(constraints::PAYMENT_RESERVATION_FK));
        }
        self.work.payments.push(payment.clone());
        Ok(())
    }

    async fn delete_payment(&mut self, id: PaymentId) -> Result<(), StoreError> {
        self.work.payments.retain(|p| p.id != id);
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let Self { mut guard, work } = self;
        *guard = work;
        Ok(())
    }
}
