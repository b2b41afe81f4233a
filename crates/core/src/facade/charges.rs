//! Service lines on a reservation: attach, detach, change quantity.

use innkeep_shared::types::{Money, ReservationId, ServiceItemId, ServiceLineId};

use super::{ReconciliationFacade, load_folio, refresh_folio};
use crate::authz::{Action, Actor, ResourceKind};
use crate::error::HotelError;
use crate::ledger::{ReservationFolio, ReservationLedger};
use crate::store::{Store, StoreTx, constraints};

impl<S: Store> ReconciliationFacade<S> {
    /// Attaches a catalog service, freezing its current price.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` outside 1 to 9999
    /// - `ReservationNotFound`, `ServiceNotFound`
    /// - `AlreadyAttached` if the service is already on the reservation,
    ///   including when a concurrent attach wins the race
    pub async fn attach_service(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
        service_id: ServiceItemId,
        quantity: Option<i64>,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("attach_service", async {
            self.authorize(actor, Action::Create, ResourceKind::ServiceLine)?;
            let quantity = quantity.unwrap_or(1);
            ReservationLedger::validate_quantity(quantity)?;

            let mut tx = self.store.begin().await?;
            let reservation = tx
                .lock_reservation(reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(reservation_id))?;
            let item = tx
                .find_service_item(service_id)
                .await?
                .ok_or(HotelError::ServiceNotFound(service_id))?;
            let lines = tx.service_lines(reservation_id).await?;

            let line = ReservationLedger::attach(&reservation, &lines, &item, quantity, self.now())?;
            tx.insert_service_line(&line).await.map_err(|e| {
                if e.violates(constraints::SERVICE_LINE_UNIQUE) {
                    HotelError::AlreadyAttached {
                        reservation: reservation_id,
                        service: service_id,
                    }
                } else if e.violates(constraints::SERVICE_LINE_ITEM_FK) {
                    HotelError::ServiceNotFound(service_id)
                } else {
                    e.into()
                }
            })?;
            let folio = refresh_folio(&mut tx, reservation, self.now()).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "attach_service",
                ResourceKind::Reservation,
                reservation_id,
                format!(
                    "{} x{} at {}, total {}",
                    item.name, line.quantity, line.unit_price, folio.total
                ),
            );
            Ok(folio)
        })
        .await
    }

    /// Removes a service line.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound`
    /// - `ServiceLineNotFound` if the line is not on this reservation
    pub async fn detach_service(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
        line_id: ServiceLineId,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("detach_service", async {
            self.authorize(actor, Action::Delete, ResourceKind::ServiceLine)?;

            let mut tx = self.store.begin().await?;
            let reservation = tx
                .lock_reservation(reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(reservation_id))?;
            let lines = tx.service_lines(reservation_id).await?;
            let line = ReservationLedger::detach(reservation_id, &lines, line_id)?;

            tx.delete_service_line(line.id).await?;
            let folio = refresh_folio(&mut tx, reservation, self.now()).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "detach_service",
                ResourceKind::Reservation,
                reservation_id,
                format!("line {line_id} removed, total {}", folio.total),
            );
            Ok(folio)
        })
        .await
    }

    /// Changes the quantity of a service line in place.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` outside 1 to 9999
    /// - `ReservationNotFound`, `ServiceLineNotFound`
    pub async fn update_service_quantity(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
        line_id: ServiceLineId,
        quantity: i64,
    ) -> Result<ReservationFolio, HotelError> {
        self.run("update_service_quantity", async {
            self.authorize(actor, Action::Update, ResourceKind::ServiceLine)?;
            ReservationLedger::validate_quantity(quantity)?;

            let mut tx = self.store.begin().await?;
            let reservation = tx
                .lock_reservation(reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(reservation_id))?;
            let lines = tx.service_lines(reservation_id).await?;
            let updated =
                ReservationLedger::update_quantity(reservation_id, &lines, line_id, quantity)?;

            tx.update_service_line(&updated).await?;
            let folio = refresh_folio(&mut tx, reservation, self.now()).await?;
            tx.commit().await?;

            self.audit(
                actor,
                "update_service_quantity",
                ResourceKind::Reservation,
                reservation_id,
                format!("line {line_id} quantity {quantity}, total {}", folio.total),
            );
            Ok(folio)
        })
        .await
    }

    /// Returns true if the service is attached to the reservation.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound`.
    pub async fn has_service(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
        service_id: ServiceItemId,
    ) -> Result<bool, HotelError> {
        self.run("has_service", async {
            self.authorize(actor, Action::View, ResourceKind::ServiceLine)?;

            let mut tx = self.store.begin().await?;
            tx.find_reservation(reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(reservation_id))?;
            let lines = tx.service_lines(reservation_id).await?;
            Ok(ReservationLedger::has_service(&lines, service_id))
        })
        .await
    }

    /// Base plus services, derived from the lines.
    ///
    /// # Errors
    ///
    /// Returns `ReservationNotFound`.
    pub async fn reservation_total(
        &self,
        actor: &Actor,
        reservation_id: ReservationId,
    ) -> Result<Money, HotelError> {
        self.run("reservation_total", async {
            self.authorize(actor, Action::View, ResourceKind::Reservation)?;

            let mut tx = self.store.begin().await?;
            let reservation = tx
                .find_reservation(reservation_id)
                .await?
                .ok_or(HotelError::ReservationNotFound(reservation_id))?;
            Ok(load_folio(&mut tx, reservation).await?.total)
        })
        .await
    }
}
