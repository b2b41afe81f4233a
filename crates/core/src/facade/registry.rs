//! Rooms and customers.

use innkeep_shared::types::{CustomerId, RoomId};

use super::ReconciliationFacade;
use crate::authz::{Action, Actor, ResourceKind};
use crate::error::HotelError;
use crate::model::{Customer, Room, RoomState};
use crate::registry::{NewCustomer, NewRoom, prepare_customer, prepare_room};
use crate::store::{Store, StoreTx, constraints};

impl<S: Store> ReconciliationFacade<S> {
    /// Registers a room.
    ///
    /// # Errors
    ///
    /// - `Validation`, `InvalidAmount`
    /// - `DuplicateRoomNumber` if an active room has the same number
    pub async fn create_room(&self, actor: &Actor, input: NewRoom) -> Result<Room, HotelError> {
        self.run("create_room", async {
            self.authorize(actor, Action::Create, ResourceKind::Room)?;
            let room = prepare_room(&input)?;

            let mut tx = self.store.begin().await?;
            if tx.find_room_by_number(&room.number).await?.is_some() {
                return Err(HotelError::DuplicateRoomNumber(room.number));
            }
            tx.insert_room(&room).await.map_err(|e| {
                if e.violates(constraints::ROOM_NUMBER_UNIQUE) {
                    HotelError::DuplicateRoomNumber(room.number.clone())
                } else {
                    e.into()
                }
            })?;
            tx.commit().await?;

            self.audit(
                actor,
                "create_room",
                ResourceKind::Room,
                room.id,
                format!("{} {} at {}", room.number, room.room_type.as_str(), room.price),
            );
            Ok(room)
        })
        .await
    }

    /// Changes a room's housekeeping state. Existing bookings are kept.
    ///
    /// # Errors
    ///
    /// Returns `RoomNotFound`.
    pub async fn set_room_state(
        &self,
        actor: &Actor,
        id: RoomId,
        state: RoomState,
    ) -> Result<Room, HotelError> {
        self.run("set_room_state", async {
            self.authorize(actor, Action::Update, ResourceKind::Room)?;

            let mut tx = self.store.begin().await?;
            let mut room = tx
                .lock_room(id)
                .await?
                .ok_or(HotelError::RoomNotFound(id))?;
            if room.state == state {
                return Ok(room);
            }
            let previous = room.state;
            room.state = state;
            tx.update_room(&room).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "set_room_state",
                ResourceKind::Room,
                id,
                format!("{previous} -> {state}"),
            );
            Ok(room)
        })
        .await
    }

    /// Returns an active room.
    ///
    /// # Errors
    ///
    /// Returns `RoomNotFound`.
    pub async fn get_room(&self, actor: &Actor, id: RoomId) -> Result<Room, HotelError> {
        self.run("get_room", async {
            self.authorize(actor, Action::View, ResourceKind::Room)?;
            let mut tx = self.store.begin().await?;
            tx.find_room(id).await?.ok_or(HotelError::RoomNotFound(id))
        })
        .await
    }

    /// Archives a room with no current or upcoming bookings.
    ///
    /// # Errors
    ///
    /// - `RoomNotFound`
    /// - `HasActiveReservations` while any booking, cancelled or not, ends today
    ///   or later
    pub async fn delete_room(&self, actor: &Actor, id: RoomId) -> Result<(), HotelError> {
        self.run("delete_room", async {
            self.authorize(actor, Action::Delete, ResourceKind::Room)?;

            let mut tx = self.store.begin().await?;
            let room = tx
                .lock_room(id)
                .await?
                .ok_or(HotelError::RoomNotFound(id))?;
            let active = tx
                .count_active_reservations_for_room(id, self.clock.today())
                .await?;
            if active > 0 {
                return Err(HotelError::HasActiveReservations(active));
            }
            tx.archive_room(id, self.now()).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "delete_room",
                ResourceKind::Room,
                id,
                format!("room {} archived", room.number),
            );
            Ok(())
        })
        .await
    }

    /// Registers a guest.
    ///
    /// # Errors
    ///
    /// - `InvalidName`, `Validation`
    /// - `DuplicatePhone` if an active customer has the same phone number
    pub async fn create_customer(
        &self,
        actor: &Actor,
        input: NewCustomer,
    ) -> Result<Customer, HotelError> {
        self.run("create_customer", async {
            self.authorize(actor, Action::Create, ResourceKind::Customer)?;
            let customer = prepare_customer(self.sanitizer.as_ref(), &input, self.now())?;

            let mut tx = self.store.begin().await?;
            if tx.find_customer_by_phone(&customer.phone).await?.is_some() {
                return Err(HotelError::DuplicatePhone(customer.phone));
            }
            tx.insert_customer(&customer).await.map_err(|e| {
                if e.violates(constraints::CUSTOMER_PHONE_UNIQUE) {
                    HotelError::DuplicatePhone(customer.phone.clone())
                } else {
                    e.into()
                }
            })?;
            tx.commit().await?;

            self.audit(
                actor,
                "create_customer",
                ResourceKind::Customer,
                customer.id,
                customer.full_name.clone(),
            );
            Ok(customer)
        })
        .await
    }

    /// Returns an active customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`.
    pub async fn get_customer(
        &self,
        actor: &Actor,
        id: CustomerId,
    ) -> Result<Customer, HotelError> {
        self.run("get_customer", async {
            self.authorize(actor, Action::View, ResourceKind::Customer)?;
            let mut tx = self.store.begin().await?;
            tx.find_customer(id)
                .await?
                .ok_or(HotelError::CustomerNotFound(id))
        })
        .await
    }

    /// Archives a customer with no current or upcoming bookings.
    ///
    /// # Errors
    ///
    /// - `CustomerNotFound`
    /// - `HasActiveReservations`
    pub async fn delete_customer(&self, actor: &Actor, id: CustomerId) -> Result<(), HotelError> {
        self.run("delete_customer", async {
            self.authorize(actor, Action::Delete, ResourceKind::Customer)?;

            let mut tx = self.store.begin().await?;
            let customer = tx
                .lock_customer(id)
                .await?
                .ok_or(HotelError::CustomerNotFound(id))?;
            let active = tx
                .count_active_reservations_for_customer(id, self.clock.today())
                .await?;
            if active > 0 {
                return Err(HotelError::HasActiveReservations(active));
            }
            tx.archive_customer(id, self.now()).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "delete_customer",
                ResourceKind::Customer,
                id,
                format!("{} archived", customer.full_name),
            );
            Ok(())
        })
        .await
    }
}
