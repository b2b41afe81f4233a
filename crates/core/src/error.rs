//! Error types for the reservation core.
//!
//! Every rejection carries a machine-checkable [`ErrorKind`], a stable
//! `error_code()` and a human-readable message.

use innkeep_shared::AppError;
use innkeep_shared::types::{
    CustomerId, Money, MoneyError, PaymentId, ReservationId, RoomId, ServiceItemId, ServiceLineId, UserId,
};
use thiserror::Error;

use crate::model::{DateRange, ReservationStatus};
use crate::store::StoreError;

/// Coarse classification of a [`HotelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// The referenced entity does not exist.
    NotFound,
    /// Collides with existing state.
    Conflict,
    /// Blocked by referential or business state.
    PreconditionFailed,
    /// The actor may not perform the operation.
    Forbidden,
    /// Opaque store failure.
    Store,
}

/// Errors that can occur during reservation core operations.
#[derive(Debug, Error)]
pub enum HotelError {
    // ========== Validation Errors ==========
    /// Amount is malformed or outside its bounds.
    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    /// End date is not after the start date.
    #[error("End date {end} must be after start date {start}")]
    InvalidDateRange {
        /// Requested first night.
        start: chrono::NaiveDate,
        /// Requested departure day.
        end: chrono::NaiveDate,
    },

    /// Stay is longer than the configured maximum.
    #[error("Stay of {nights} nights exceeds the maximum of {max} nights")]
    StayTooLong {
        /// Requested nights.
        nights: i64,
        /// Configured maximum.
        max: i64,
    },

    /// Quantity is outside the accepted range.
    #[error("Quantity {0} is invalid, it must be between 1 and 9999")]
    InvalidQuantity(i64),

    /// A name failed sanitization or validation.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Payment date lies in the future.
    #[error("Payment date cannot be in the future")]
    FuturePayment,

    /// Reservation status change is not allowed.
    #[error("Cannot change reservation status from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: ReservationStatus,
        /// Requested status.
        to: ReservationStatus,
    },

    /// Any other invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    // ========== Not Found Errors ==========
    /// Room not found.
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    /// Customer not found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Reservation not found.
    #[error("Reservation not found: {0}")]
    ReservationNotFound(ReservationId),

    /// Catalog service not found.
    #[error("Service not found: {0}")]
    ServiceNotFound(ServiceItemId),

    /// Service line not found on the given reservation.
    #[error("Service line {line} not found on reservation {reservation}")]
    ServiceLineNotFound {
        /// Reservation searched.
        reservation: ReservationId,
        /// Missing line.
        line: ServiceLineId,
    },

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    // ========== Conflict Errors ==========
    /// A catalog service with the same name already exists.
    #[error("A service named {0:?} already exists")]
    DuplicateName(String),

    /// A room with the same number already exists.
    #[error("Room number {0:?} is already in use")]
    DuplicateRoomNumber(String),

    /// A customer with the same phone number already exists.
    #[error("Phone number {0:?} is already registered")]
    DuplicatePhone(String),

    /// The service is already attached to the reservation.
    #[error("Service {service} is already attached to reservation {reservation}")]
    AlreadyAttached {
        /// Target reservation.
        reservation: ReservationId,
        /// Service already present.
        service: ServiceItemId,
    },

    /// The room is booked for an overlapping range.
    #[error("Room {room} is not available for {range}")]
    RoomUnavailable {
        /// Requested room.
        room: RoomId,
        /// Requested range.
        range: DateRange,
        /// Blocking reservation, when known.
        conflicting: Option<ReservationId>,
    },

    // ========== Precondition Errors ==========
    /// The catalog service is referenced by reservation lines.
    #[error("Service {0} is still attached to reservations")]
    ServiceInUse(ServiceItemId),

    /// The reservation still has payments.
    #[error("Reservation {0} has payments and cannot be deleted")]
    HasPayments(ReservationId),

    /// The room or customer still has current or upcoming reservations.
    #[error("{0} active reservation(s) still reference this record")]
    HasActiveReservations(u64),

    /// A non-refund payment is larger than the amount remaining.
    #[error("Payment of {amount} exceeds the remaining {remaining}")]
    ExceedsRemaining {
        /// Requested payment.
        amount: Money,
        /// Amount remaining before the payment.
        remaining: Money,
    },

    /// A refund is larger than the amount paid.
    #[error("Refund of {amount} exceeds the amount paid {paid}")]
    RefundExceedsPaid {
        /// Requested refund.
        amount: Money,
        /// Amount paid before the refund.
        paid: Money,
    },

    /// The room is out of service.
    #[error("Room {0} is out of service")]
    RoomOutOfService(RoomId),

    // ========== Authorization Errors ==========
    /// The actor is not allowed to perform the action.
    #[error("Not allowed to {action} {resource}")]
    Forbidden {
        /// Attempted action.
        action: String,
        /// Targeted resource kind.
        resource: String,
    },

    // ========== Store Errors ==========
    /// The store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl HotelError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount(_)
            | Self::InvalidDateRange { .. }
            | Self::StayTooLong { .. }
            | Self::InvalidQuantity(_)
            | Self::InvalidName(_)
            | Self::FuturePayment
            | Self::InvalidStatusTransition { .. }
            | Self::Validation(_) => ErrorKind::Validation,

            Self::RoomNotFound(_)
            | Self::CustomerNotFound(_)
            | Self::UserNotFound(_)
            | Self::ReservationNotFound(_)
            | Self::ServiceNotFound(_)
            | Self::ServiceLineNotFound { .. }
            | Self::PaymentNotFound(_) => ErrorKind::NotFound,

            Self::DuplicateName(_)
            | Self::DuplicateRoomNumber(_)
            | Self::DuplicatePhone(_)
            | Self::AlreadyAttached { .. }
            | Self::RoomUnavailable { .. } => ErrorKind::Conflict,

            Self::ServiceInUse(_)
            | Self::HasPayments(_)
            | Self::HasActiveReservations(_)
            | Self::ExceedsRemaining { .. }
            | Self::RefundExceedsPaid { .. }
            | Self::RoomOutOfService(_) => ErrorKind::PreconditionFailed,

            Self::Forbidden { .. } => ErrorKind::Forbidden,

            Self::Store(_) => ErrorKind::Store,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::StayTooLong { .. } => "STAY_TOO_LONG",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidName(_) => "INVALID_NAME",
            Self::FuturePayment => "FUTURE_PAYMENT",
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::RoomNotFound(_) => "ROOM_NOT_FOUND",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::ReservationNotFound(_) => "RESERVATION_NOT_FOUND",
            Self::ServiceNotFound(_) => "SERVICE_NOT_FOUND",
            Self::ServiceLineNotFound { .. } => "SERVICE_LINE_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::DuplicateName(_) => "DUPLICATE_NAME",
            Self::DuplicateRoomNumber(_) => "DUPLICATE_ROOM_NUMBER",
            Self::DuplicatePhone(_) => "DUPLICATE_PHONE",
            Self::AlreadyAttached { .. } => "ALREADY_ATTACHED",
            Self::RoomUnavailable { .. } => "ROOM_UNAVAILABLE",
            Self::ServiceInUse(_) => "SERVICE_IN_USE",
            Self::HasPayments(_) => "HAS_PAYMENTS",
            Self::HasActiveReservations(_) => "HAS_ACTIVE_RESERVATIONS",
            Self::ExceedsRemaining { .. } => "EXCEEDS_REMAINING",
            Self::RefundExceedsPaid { .. } => "REFUND_EXCEEDS_PAID",
            Self::RoomOutOfService(_) => "ROOM_OUT_OF_SERVICE",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::PreconditionFailed => 422,
            ErrorKind::Store => 500,
        }
    }
}

impl From<HotelError> for AppError {
    fn from(err: HotelError) -> Self {
        let code = err.error_code();
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation { code, message },
            ErrorKind::NotFound => Self::NotFound { code, message },
            ErrorKind::Conflict => Self::Conflict { code, message },
            ErrorKind::PreconditionFailed => Self::PreconditionFailed { code, message },
            ErrorKind::Forbidden => Self::Forbidden { code, message },
            ErrorKind::Store => Self::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(HotelError::FuturePayment.error_code(), "FUTURE_PAYMENT");
        assert_eq!(
            HotelError::HasPayments(ReservationId::new()).error_code(),
            "HAS_PAYMENTS"
        );
        assert_eq!(
            HotelError::ExceedsRemaining {
                amount: Money::from_minor(200),
                remaining: Money::from_minor(100),
            }
            .error_code(),
            "EXCEEDS_REMAINING"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(HotelError::InvalidQuantity(0).http_status_code(), 400);
        assert_eq!(
            HotelError::RoomNotFound(RoomId::new()).http_status_code(),
            404
        );
        assert_eq!(
            HotelError::DuplicateName("Breakfast".into()).http_status_code(),
            409
        );
        assert_eq!(HotelError::HasActiveReservations(2).http_status_code(), 422);
        assert_eq!(
            HotelError::Forbidden {
                action: "delete".into(),
                resource: "room".into(),
            }
            .http_status_code(),
            403
        );
        assert_eq!(
            HotelError::Store(StoreError::Backend("boom".into())).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let start = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert_eq!(
            HotelError::InvalidDateRange { start, end }.to_string(),
            "End date 2026-06-01 must be after start date 2026-06-05"
        );
        assert_eq!(
            HotelError::ExceedsRemaining {
                amount: Money::from_minor(15_102),
                remaining: Money::from_minor(15_100),
            }
            .to_string(),
            "Payment of 151.02 exceeds the remaining 151.00"
        );
    }

    #[test]
    fn test_into_app_error_keeps_code_and_status() {
        let err: AppError = HotelError::AlreadyAttached {
            reservation: ReservationId::new(),
            service: ServiceItemId::new(),
        }
        .into();
        assert_eq!(err.error_code(), "ALREADY_ATTACHED");
        assert_eq!(err.status_code(), 409);

        let err: AppError = HotelError::ServiceInUse(ServiceItemId::new()).into();
        assert_eq!(err.error_code(), "SERVICE_IN_USE");
        assert_eq!(err.status_code(), 422);

        let err: AppError = HotelError::Store(StoreError::Backend("down".into())).into();
        assert_eq!(err.status_code(), 500);
    }
}
