//! Error to HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use innkeep_core::HotelError;
use innkeep_shared::AppError;
use serde_json::json;
use tracing::error;

/// Renders an application error as `{"error": code, "message": text}`.
///
/// Store and internal failures are logged and their detail withheld.
pub fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if status.is_server_error() {
        error!(error = %err, "Request failed");
        "An internal error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

/// Maps a core error to its HTTP response.
pub fn map_hotel_error(err: HotelError) -> Response {
    error_response(&AppError::from(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use innkeep_core::store::StoreError;
    use innkeep_shared::types::{ReservationId, RoomId};

    #[test]
    fn test_status_follows_error_kind() {
        let cases = [
            (HotelError::InvalidQuantity(0), StatusCode::BAD_REQUEST),
            (
                HotelError::ReservationNotFound(ReservationId::new()),
                StatusCode::NOT_FOUND,
            ),
            (
                HotelError::DuplicateRoomNumber("101".into()),
                StatusCode::CONFLICT,
            ),
            (
                HotelError::RoomOutOfService(RoomId::new()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                HotelError::Forbidden {
                    action: "delete".into(),
                    resource: "room".into(),
                },
                StatusCode::FORBIDDEN,
            ),
            (
                HotelError::Store(StoreError::Backend("connection reset".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(map_hotel_error(err).status(), status);
        }
    }
}
