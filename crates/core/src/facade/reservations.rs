//! Reservation lifecycle: create, move, re-status, delete, read.

use innkeep_shared::types::{MoneyBounds, ReservationId, RoomId};

use super::{ReconciliationFacade, load_folio, refresh_folio};
use super::types::{CreateReservationInput, UpdateReservationInput};
use crate::authz::{Action, Actor, ResourceKind};
use crate::availability::RoomAvailability;
use crate::error::HotelError;
use crate::ledger::ReservationFolio;
use crate::model::{DateRange, Reservation, ReservationStatus};
use crate::store::{Store, StoreError, StoreTx, constraints};

fn booking_conflict(err: StoreError, room: RoomId, range: DateRange) -> HotelError {
    if err.violates(constraints::RESERVATION_NO_OVERLAP) {
        HotelError::RoomUnavailable {
            room,
            range,
            conflicting: None,
        }
    } else {
        err.into()
    }
}

impl<S: Store> ReconciliationFacade<S> {
    fn check_stay_length(&self, range: &DateRange) -> Result<(), HotelError> {
        let nights = range.nights();
        if nights > self.max_stay_days {
            return Err(HotelError::StayTooLong {
                nights,
                max: self.max_stay_days,
            });
        }
        Ok(())
    }

    /// Books a room.
    ///
    /// The availability check and the insert run in one transaction with the
    /// room row locked; the store's exclusion constraint is the final guard.
    ///
    /// # Errors
    ///
    /// - `InvalidDateRange`, `StayTooLong`, `InvalidAmount`, `Validation`
    /// - `UserNotFound`, `RoomNotFound`, `CustomerNotFound`
    /// - `RoomOutOfService`
    /// - `RoomUnavailable` when another booking overlaps
    pub async fn create_reservation(
        &self,
        actor: &Actor,
        input: CreateReservationInput,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("create_reservation", async {
            self.authorize(actor, Action::Create, ResourceKind::Reservation)?;

            let range = DateRange::new(input.start_date, input.end_date)?;
            self.check_stay_length(&range)?;
            let base_amount = MoneyBounds::RESERVATION_BASE.check(input.base_amount)?;
            let status = input.status.unwrap_or_default();
            if !status.is_valid_initial() {
                return Err(HotelError::Validation(format!(
                    "a reservation cannot be created as {status}"
                )));
            }

            let mut tx = self.store.begin().await?;
            tx.find_user(actor.id)
                .await?
                .ok_or(HotelError::UserNotFound(actor.id))?;
            let room = tx
                .lock_room(input.room_id)
                .await?
                .ok_or(HotelError::RoomNotFound(input.room_id))?;
            if !room.state.accepts_reservations() {
                return Err(HotelError::RoomOutOfService(room.id));
            }
            tx.lock_customer(input.customer_id)
                .await?
                .ok_or(HotelError::CustomerNotFound(input.customer_id))?;

            let existing = tx.overlapping_reservations(room.id, range).await?;
            RoomAvailability::ensure_available(&existing, room.id, &range, None)?;

            let now = self.now();
            let reservation = Reservation {
                id: ReservationId::new(),
                room_id: room.id,
                customer_id: input.customer_id,
                created_by: actor.id,
                dates: range,
                status,
                base_amount,
                stored_total: base_amount,
                created_at: now,
                updated_at: now,
            };
            tx.insert_reservation(&reservation)
                .await
                .map_err(|e| booking_conflict(e, room.id, range))?;
            tx.commit().await?;

            self.audit(
                actor,
                "create_reservation",
                ResourceKind::Reservation,
                reservation.id,
                format!("room {} {} base {}", room.number, range, base_amount),
            );
            ReservationFolio::build(reservation, Vec::new(), Vec::new())
        })
        .await
    }

    /// Changes room, dates, status or base amount.
    ///
    /// Availability is re-checked, excluding the reservation itself, whenever
    /// the room or dates of a non-cancelled reservation change.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound`, `RoomNotFound`
    /// - `InvalidDateRange`, `StayTooLong`, `InvalidAmount`
    /// - `InvalidStatusTransition`
    /// - `RoomOutOfService` when moving into an out-of-service room
    /// - `RoomUnavailable`
    pub async fn update_reservation(
        &self,
        actor: &Actor,
        id: ReservationId,
        input: UpdateReservationInput,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("update_reservation", async {
            self.authorize(actor, Action::Update, ResourceKind::Reservation)?;
            if let Some(base) = input.base_amount {
                MoneyBounds::RESERVATION_BASE.check(base)?;
            }

            let mut tx = self.store.begin().await?;
            let current = tx
                .lock_reservation(id)
                .await?
                .ok_or(HotelError::ReservationNotFound(id))?;

            let range = DateRange::new(
                input.start_date.unwrap_or(current.dates.start),
                input.end_date.unwrap_or(current.dates.end),
            )?;
            if range != current.dates {
                self.check_stay_length(&range)?;
            }

            let status = input.status.unwrap_or(current.status);
            if !current.status.can_transition_to(status) {
                return Err(HotelError::InvalidStatusTransition {
                    from: current.status,
                    to: status,
                });
            }

            let room_id = input.room_id.unwrap_or(current.room_id);
            if room_id != current.room_id || range != current.dates {
                let room = tx
                    .lock_room(room_id)
                    .await?
                    .ok_or(HotelError::RoomNotFound(room_id))?;
                if room_id != current.room_id && !room.state.accepts_reservations() {
                    return Err(HotelError::RoomOutOfService(room_id));
                }
                if status.blocks_availability() {
                    let existing = tx.overlapping_reservations(room_id, range).await?;
                    RoomAvailability::ensure_available(&existing, room_id, &range, Some(id))?;
                }
            }

            let mut updated = current.clone();
            updated.room_id = room_id;
            updated.dates = range;
            updated.status = status;
            if let Some(base) = input.base_amount {
                updated.base_amount = base;
            }

            let mut folio = load_folio(&mut tx, updated).await?;
            if folio.reservation != current || folio.is_total_stale() {
                folio.reservation.stored_total = folio.total;
                folio.reservation.updated_at = self.now();
                tx.update_reservation(&folio.reservation)
                    .await
                    .map_err(|e| booking_conflict(e, room_id, range))?;
            }
            tx.commit().await?;

            self.audit(
                actor,
                "update_reservation",
                ResourceKind::Reservation,
                id,
                format!(
                    "room {room_id} {range} status {status} base {}",
                    folio.reservation.base_amount
                ),
            );
            Ok(folio)
        })
        .await
    }

    /// Moves a reservation to a new status. Shorthand for
    /// [`Self::update_reservation`] with only `status` set.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_reservation`].
    pub async fn set_reservation_status(
        &self,
        actor: &Actor,
        id: ReservationId,
        status: ReservationStatus,
    ) -> Result<ReservationFolio, HotelError> {
        self.update_reservation(
            actor,
            id,
            UpdateReservationInput {
                status: Some(status),
                ..UpdateReservationInput::default()
            },
        )
        .await
    }

    /// Deletes a reservation and its service lines.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound`
    /// - `HasPayments` while any payment or refund references it
    pub async fn delete_reservation(
        &self,
        actor: &Actor,
        id: ReservationId,
    ) -> Result<(), HotelError> {
        self.run("delete_reservation", async {
            self.authorize(actor, Action::Delete, ResourceKind::Reservation)?;

            let mut tx = self.store.begin().await?;
            tx.lock_reservation(id)
                .await?
                .ok_or(HotelError::ReservationNotFound(id))?;
            if !tx.payments(id).await?.is_empty() {
                return Err(HotelError::HasPayments(id));
            }

            let lines = tx.service_lines(id).await?;
            for line in &lines {
                tx.delete_service_line(line.id).await?;
            }
            tx.delete_reservation(id).await.map_err(|e| {
                if e.violates(constraints::PAYMENT_RESERVATION_FK) {
                    HotelError::HasPayments(id)
                } else {
                    e.into()
                }
            })?;
            tx.commit().await?;

            self.audit(
                actor,
                "delete_reservation",
                ResourceKind::Reservation,
                id,
                format!("removed with {} service line(s)", lines.len()),
            );
            Ok(())
        })
        .await
    }

    /// Returns the reservation with its derived balances.
    ///
    /// A stale cached total is rewritten on the way out.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound`.
    pub async fn reservation_folio(
        &self,
        actor: &Actor,
        id: ReservationId,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("reservation_folio", async {
            self.authorize(actor, Action::View, ResourceKind::Reservation)?;

            let mut tx = self.store.begin().await?;
            let reservation = tx
                .find_reservation(id)
                .await?
                .ok_or(HotelError::ReservationNotFound(id))?;
            let mut folio = load_folio(&mut tx, reservation).await?;
            if folio.is_total_stale() {
                // Re-read under lock before repairing the cache.
                let locked = tx
                    .lock_reservation(id)
                    .await?
                    .ok_or(HotelError::ReservationNotFound(id))?;
                folio = refresh_folio(&mut tx, locked, self.now()).await?;
                tx.commit().await?;
            }
            Ok(folio)
        })
        .await
    }
}
