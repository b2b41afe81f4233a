//! Postgres implementation of the core [`Store`] contract.
//!
//! One [`PgTx`] wraps one `DatabaseTransaction`. Row locks use
//! `SELECT ... FOR UPDATE`; the schema's unique indexes, exclusion
//! constraint and restrict foreign keys come back as the typed
//! [`StoreError`] variants.

mod convert;

use chrono::{DateTime, NaiveDate, Utc};
use innkeep_core::model::{
    Customer, DateRange, Payment, Reservation, Room, ServiceItem, ServiceLine, User,
};
use innkeep_core::store::{Store, StoreError, StoreTx};
use innkeep_shared::types::{
    CustomerId, PaymentId, ReservationId, RoomId, ServiceItemId, ServiceLineId, UserId,
};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RuntimeErr, TransactionTrait,
};
use tracing::error;

use crate::entities::sea_orm_active_enums::ReservationStatus as DbReservationStatus;
use crate::entities::{
    customers, payments, reservation_services, reservations, rooms, service_items, users,
};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const EXCLUSION_VIOLATION: &str = "23P01";

/// Translates a `SeaORM` error into a [`StoreError`].
///
/// Integrity violations keep the constraint name so the facade can match it;
/// everything else is logged and flattened to `Backend`.
pub fn store_error(err: DbErr) -> StoreError {
    let database_error = match &err {
        DbErr::Exec(RuntimeErr::SqlxError(sqlx::Error::Database(e)))
        | DbErr::Query(RuntimeErr::SqlxError(sqlx::Error::Database(e))) => Some(e),
        _ => None,
    };

    if let Some(e) = database_error {
        let constraint = e.constraint().unwrap_or_default().to_string();
        match e.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return StoreError::UniqueViolation { constraint },
            Some(EXCLUSION_VIOLATION) => return StoreError::ExclusionViolation { constraint },
            Some(FOREIGN_KEY_VIOLATION) => {
                return StoreError::ForeignKeyViolation { constraint };
            }
            _ => {}
        }
    }

    error!(error = %err, "database error");
    StoreError::Backend(err.to_string())
}

fn expect_one(rows_affected: u64, table: &str) -> Result<(), StoreError> {
    if rows_affected == 0 {
        return Err(StoreError::Backend(format!("no {table} row matched")));
    }
    Ok(())
}

/// [`Store`] over a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    /// Creates a store over an open connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        Ok(PgTx { txn })
    }
}

/// One database transaction. Dropping it without commit rolls back.
pub struct PgTx {
    txn: DatabaseTransaction,
}

impl PgTx {
    fn active_room() -> sea_orm::Select<rooms::Entity> {
        rooms::Entity::find().filter(rooms::Column::ArchivedAt.is_null())
    }

    fn active_customer() -> sea_orm::Select<customers::Entity> {
        customers::Entity::find().filter(customers::Column::ArchivedAt.is_null())
    }

    fn blocking_reservations() -> sea_orm::Select<reservations::Entity> {
        reservations::Entity::find()
            .filter(reservations::Column::Status.ne(DbReservationStatus::Cancelled))
    }
}

impl StoreTx for PgTx {
    // ========== Users ==========

    async fn find_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = users::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(row.map(convert::user))
    }

    // ========== Rooms ==========

    async fn find_room(&mut self, id: RoomId) -> Result<Option<Room>, StoreError> {
        Self::active_room()
            .filter(rooms::Column::Id.eq(id.into_inner()))
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::room)
            .transpose()
    }

    async fn lock_room(&mut self, id: RoomId) -> Result<Option<Room>, StoreError> {
        Self::active_room()
            .filter(rooms::Column::Id.eq(id.into_inner()))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::room)
            .transpose()
    }

    async fn find_room_by_number(&mut self, number: &str) -> Result<Option<Room>, StoreError> {
        Self::active_room()
            .filter(rooms::Column::Number.eq(number))
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::room)
            .transpose()
    }

    async fn insert_room(&mut self, room: &Room) -> Result<(), StoreError> {
        convert::room_row(room)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_room(&mut self, room: &Room) -> Result<(), StoreError> {
        convert::room_row(room)
            .update(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn archive_room(&mut self, id: RoomId, at: DateTime<Utc>) -> Result<(), StoreError> {
        rooms::ActiveModel {
            id: Set(id.into_inner()),
            archived_at: Set(Some(at.into())),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    // ========== Customers ==========

    async fn find_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = Self::active_customer()
            .filter(customers::Column::Id.eq(id.into_inner()))
            .one(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(row.map(convert::customer))
    }

    async fn lock_customer(&mut self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = Self::active_customer()
            .filter(customers::Column::Id.eq(id.into_inner()))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(row.map(convert::customer))
    }

    async fn find_customer_by_phone(
        &mut self,
        phone: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let row = Self::active_customer()
            .filter(customers::Column::Phone.eq(phone))
            .one(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(row.map(convert::customer))
    }

    async fn insert_customer(&mut self, customer: &Customer) -> Result<(), StoreError> {
        convert::customer_row(customer)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn archive_customer(
        &mut self,
        id: CustomerId,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        customers::ActiveModel {
            id: Set(id.into_inner()),
            archived_at: Set(Some(at.into())),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    // ========== Reservations ==========

    async fn find_reservation(
        &mut self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, StoreError> {
        reservations::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::reservation)
            .transpose()
    }

    async fn lock_reservation(
        &mut self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, StoreError> {
        reservations::Entity::find_by_id(id.into_inner())
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::reservation)
            .transpose()
    }

    async fn overlapping_reservations(
        &mut self,
        room: RoomId,
        range: DateRange,
    ) -> Result<Vec<Reservation>, StoreError> {
        let rows = Self::blocking_reservations()
            .filter(reservations::Column::RoomId.eq(room.into_inner()))
            .filter(reservations::Column::StartDate.lt(range.end))
            .filter(reservations::Column::EndDate.gt(range.start))
            .order_by_asc(reservations::Column::StartDate)
            .all(&self.txn)
            .await
            .map_err(store_error)?;
        convert::all(rows, convert::reservation)
    }

    async fn count_active_reservations_for_room(
        &mut self,
        room: RoomId,
        today: NaiveDate,
    ) -> Result<u64, StoreError> {
        reservations::Entity::find()
            .filter(reservations::Column::RoomId.eq(room.into_inner()))
            .filter(reservations::Column::EndDate.gte(today))
            .count(&self.txn)
            .await
            .map_err(store_error)
    }

    async fn count_active_reservations_for_customer(
        &mut self,
        customer: CustomerId,
        today: NaiveDate,
    ) -> Result<u64, StoreError> {
        reservations::Entity::find()
            .filter(reservations::Column::CustomerId.eq(customer.into_inner()))
            .filter(reservations::Column::EndDate.gte(today))
            .count(&self.txn)
            .await
            .map_err(store_error)
    }

    async fn insert_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError> {
        convert::reservation_row(reservation)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_reservation(&mut self, reservation: &Reservation) -> Result<(), StoreError> {
        convert::reservation_row(reservation)
            .update(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete_reservation(&mut self, id: ReservationId) -> Result<(), StoreError> {
        let result = reservations::Entity::delete_by_id(id.into_inner())
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        expect_one(result.rows_affected, "reservations")
    }

    // ========== Service catalog ==========

    async fn list_service_items(&mut self) -> Result<Vec<ServiceItem>, StoreError> {
        let rows = service_items::Entity::find()
            .order_by_asc(service_items::Column::Name)
            .all(&self.txn)
            .await
            .map_err(store_error)?;
        convert::all(rows, convert::service_item)
    }

    async fn find_service_item(
        &mut self,
        id: ServiceItemId,
    ) -> Result<Option<ServiceItem>, StoreError> {
        service_items::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::service_item)
            .transpose()
    }

    async fn find_service_item_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<ServiceItem>, StoreError> {
        service_items::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(service_items::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::service_item)
            .transpose()
    }

    async fn insert_service_item(&mut self, item: &ServiceItem) -> Result<(), StoreError> {
        convert::service_item_row(item)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_service_item(&mut self, item: &ServiceItem) -> Result<(), StoreError> {
        convert::service_item_row(item)
            .update(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete_service_item(&mut self, id: ServiceItemId) -> Result<(), StoreError> {
        let result = service_items::Entity::delete_by_id(id.into_inner())
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        expect_one(result.rows_affected, "service_items")
    }

    async fn count_service_lines_for_item(&mut self, id: ServiceItemId) -> Result<u64, StoreError> {
        reservation_services::Entity::find()
            .filter(reservation_services::Column::ServiceItemId.eq(id.into_inner()))
            .count(&self.txn)
            .await
            .map_err(store_error)
    }

    // ========== Service lines ==========

    async fn service_lines(
        &mut self,
        reservation: ReservationId,
    ) -> Result<Vec<ServiceLine>, StoreError> {
        let rows = reservation_services::Entity::find()
            .filter(reservation_services::Column::ReservationId.eq(reservation.into_inner()))
            .order_by_asc(reservation_services::Column::CreatedAt)
            .order_by_asc(reservation_services::Column::Id)
            .all(&self.txn)
            .await
            .map_err(store_error)?;
        convert::all(rows, convert::service_line)
    }

    async fn insert_service_line(&mut self, line: &ServiceLine) -> Result<(), StoreError> {
        convert::service_line_row(line)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn update_service_line(&mut self, line: &ServiceLine) -> Result<(), StoreError> {
        convert::service_line_row(line)
            .update(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete_service_line(&mut self, id: ServiceLineId) -> Result<(), StoreError> {
        let result = reservation_services::Entity::delete_by_id(id.into_inner())
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        expect_one(result.rows_affected, "reservation_services")
    }

    // ========== Payments ==========

    async fn payments(&mut self, reservation: ReservationId) -> Result<Vec<Payment>, StoreError> {
        let rows = payments::Entity::find()
            .filter(payments::Column::ReservationId.eq(reservation.into_inner()))
            .order_by_asc(payments::Column::CreatedAt)
            .order_by_asc(payments::Column::Id)
            .all(&self.txn)
            .await
            .map_err(store_error)?;
        convert::all(rows, convert::payment)
    }

    async fn find_payment(&mut self, id: PaymentId) -> Result<Option<Payment>, StoreError> {
        payments::Entity::find_by_id(id.into_inner())
            .one(&self.txn)
            .await
            .map_err(store_error)?
            .map(convert::payment)
            .transpose()
    }

    async fn insert_payment(&mut self, payment: &Payment) -> Result<(), StoreError> {
        convert::payment_row(payment)
            .insert(&self.txn)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn delete_payment(&mut self, id: PaymentId) -> Result<(), StoreError> {
        let result = payments::Entity::delete_by_id(id.into_inner())
            .exec(&self.txn)
            .await
            .map_err(store_error)?;
        expect_one(result.rows_affected, "payments")
    }

    // ========== Completion ==========

    async fn commit(self) -> Result<(), StoreError> {
        self.txn.commit().await.map_err(store_error)
    }
}
