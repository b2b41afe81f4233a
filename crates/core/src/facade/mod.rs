//! Reconciliation facade: the single entry point for every reservation,
//! catalog, payment and registry mutation.
//!
//! Each operation runs the same pipeline:
//! 1. authorize once
//! 2. validate input (pure functions)
//! 3. begin a store transaction and lock the rows it depends on
//!    (reservation first, then room, then customer)
//! 4. check business rules against the locked state
//! 5. write, rewriting the reservation's cached total when charges moved
//! 6. commit, then emit one audit event
//!
//! Store-level guards (unique indexes, the booking exclusion constraint,
//! restrict foreign keys) are translated back into the same domain errors
//! the pre-checks raise, so a lost race looks like an ordinary conflict.

mod catalog;
mod charges;
mod payments;
mod registry;
mod reservations;
pub mod types;


use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

pub use types::{
    CreateReservationInput, RecordPaymentInput, UpdateReservationInput, UpdateServiceInput,
};

use crate::audit::{AuditEvent, AuditSink, TracingAuditSink};
use crate::authz::{Action, Actor, Authorizer, ResourceKind, RolePolicy, ensure_allowed};
use crate::clock::{Clock, SystemClock};
use crate::error::HotelError;
use crate::ledger::ReservationFolio;
use crate::model::Reservation;
use crate::sanitize::{MarkupSanitizer, Sanitizer};
use crate::store::{Store, StoreTx};

/// Default longest stay, in nights.
pub const DEFAULT_MAX_STAY_DAYS: i64 = 365;

/// Orchestrates catalog, availability and ledgers over a [`Store`].
pub struct ReconciliationFacade<S: Store> {
    store: S,
    clock: Arc<dyn Clock>,
    sanitizer: Arc<dyn Sanitizer>,
    audit: Arc<dyn AuditSink>,
    authorizer: Arc<dyn Authorizer>,
    max_stay_days: i64,
}

impl<S: Store> std::fmt::Debug for ReconciliationFacade<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationFacade")
            .field("max_stay_days", &self.max_stay_days)
            .finish_non_exhaustive()
    }
}

impl<S: Store> ReconciliationFacade<S> {
    /// Creates a facade with the default collaborators: wall clock in UTC,
    /// markup sanitizer, tracing audit sink and the default role policy.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock::default()),
            sanitizer: Arc::new(MarkupSanitizer),
            audit: Arc::new(TracingAuditSink),
            authorizer: Arc::new(RolePolicy),
            max_stay_days: DEFAULT_MAX_STAY_DAYS,
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the sanitizer.
    #[must_use]
    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Replaces the authorizer.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: Arc<dyn Authorizer>) -> Self {
        self.authorizer = authorizer;
        self
    }

    /// Sets the longest accepted stay.
    #[must_use]
    pub fn with_max_stay_days(mut self, days: i64) -> Self {
        self.max_stay_days = days;
        self
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Runs an operation, logging rejections at debug level.
    async fn run<T, F>(&self, operation: &'static str, fut: F) -> Result<T, HotelError>
    where
        F: Future<Output = Result<T, HotelError>>,
    {
        let result = fut.await;
        if let Err(err) = &result {
            debug!(operation, code = err.error_code(), error = %err, "operation rejected");
        }
        result
    }

    fn authorize(
        &self,
        actor: &Actor,
        action: Action,
        resource: ResourceKind,
    ) -> Result<(), HotelError> {
        ensure_allowed(self.authorizer.as_ref(), actor, action, resource)
    }

    fn audit(
        &self,
        actor: &Actor,
        action: &'static str,
        resource: ResourceKind,
        resource_id: impl Into<Uuid>,
        detail: String,
    ) {
        self.audit.record(AuditEvent {
            actor: actor.id,
            action,
            resource,
            resource_id: resource_id.into(),
            detail,
            at: self.clock.now(),
        });
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

/// Loads lines and payments and derives the folio.
async fn load_folio<T: StoreTx>(
    tx: &mut T,
    reservation: Reservation,
) -> Result<ReservationFolio, HotelError> {
    let lines = tx.service_lines(reservation.id).await?;
    let payments = tx.payments(reservation.id).await?;
    ReservationFolio::build(reservation, lines, payments)
}

/// Derives the folio and rewrites the cached total if it drifted.
async fn refresh_folio<T: StoreTx>(
    tx: &mut T,
    reservation: Reservation,
    now: DateTime<Utc>,
) -> Result<ReservationFolio, HotelError> {
    let mut folio = load_folio(tx, reservation).await?;
    if folio.is_total_stale() {
        folio.reservation.stored_total = folio.total;
        folio.reservation.updated_at = now;
        tx.update_reservation(&folio.reservation).await?;
    }
    Ok(folio)
}
