//! Router tests over the in-memory store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::AUTHORIZATION},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use innkeep_core::ReconciliationFacade;
use innkeep_core::model::{Role, User};
use innkeep_core::store::InMemoryStore;
use innkeep_shared::types::UserId;
use innkeep_shared::{JwtConfig, JwtService};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::{AppState, create_router};

struct TestApp {
    router: Router,
    desk: String,
    manager: String,
}

async fn test_app() -> TestApp {
    let store = InMemoryStore::new();
    let jwt_service = JwtService::new(JwtConfig {
        secret: "api-test-secret".to_string(),
        access_token_expires_minutes: 15,
    });

    let mut tokens = Vec::new();
    for (username, role) in [("desk", Role::Receptionist), ("boss", Role::Manager)] {
        let id = UserId::new();
        store
            .add_user(User {
                id,
                username: username.to_string(),
                role,
            })
            .await;
        tokens.push(
            jwt_service
                .generate_access_token(id.into_inner(), role.as_str())
                .expect("should generate token"),
        );
    }

    let state = AppState {
        facade: Arc::new(ReconciliationFacade::new(store)),
        jwt_service: Arc::new(jwt_service),
    };
    let manager = tokens.pop().expect("manager token");
    let desk = tokens.pop().expect("desk token");
    TestApp {
        router: create_router(state),
        desk,
        manager,
    }
}

async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(format!("/api/v1{uri}"));
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Creates a room and a guest and returns their ids.
async fn room_and_guest(app: &TestApp) -> (String, String) {
    let (status, room) = send(
        app,
        Method::POST,
        "/rooms",
        Some(app.manager.as_str()),
        Some(json!({
            "number": "204",
            "room_type": "double",
            "capacity": 2,
            "price": "95.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{room}");

    let (status, guest) = send(
        app,
        Method::POST,
        "/customers",
        Some(app.desk.as_str()),
        Some(json!({
            "full_name": "Ada Guest",
            "phone": "+33 6 12 34 56 78"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{guest}");

    (
        room["id"].as_str().unwrap().to_string(),
        guest["id"].as_str().unwrap().to_string(),
    )
}

fn stay(room_id: &str, customer_id: &str, offset: i64, nights: i64) -> Value {
    let start = Utc::now().date_naive() + Duration::days(offset);
    json!({
        "room_id": room_id,
        "customer_id": customer_id,
        "start_date": start.to_string(),
        "end_date": (start + Duration::days(nights)).to_string(),
        "base_amount": "100.00"
    })
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/services", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");

    let (status, body) = send(&app, Method::GET, "/services", Some("not.a.token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_receptionist_cannot_edit_catalog() {
    let app = test_app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/services",
        Some(app.desk.as_str()),
        Some(json!({ "name": "Spa", "unit_price": "40.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}

#[tokio::test]
async fn test_catalog_crud_and_duplicate_name() {
    let app = test_app().await;
    let (status, item) = send(
        &app,
        Method::POST,
        "/services",
        Some(app.manager.as_str()),
        Some(json!({ "name": "Breakfast", "unit_price": "12.50" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(item["unit_price"], "12.50");
    let id = item["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/services",
        Some(app.manager.as_str()),
        Some(json!({ "name": "BREAKFAST", "unit_price": "9.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "DUPLICATE_NAME");

    let (status, item) = send(
        &app,
        Method::PATCH,
        &format!("/services/{id}"),
        Some(app.manager.as_str()),
        Some(json!({ "unit_price": "14.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["unit_price"], "14.00");

    let (status, body) = send(&app, Method::GET, "/services", Some(app.desk.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/services/{id}"),
        Some(app.manager.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/services/{id}"),
        Some(app.desk.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "SERVICE_NOT_FOUND");
}

#[tokio::test]
async fn test_booking_charges_and_payments() {
    let app = test_app().await;
    let (room_id, guest_id) = room_and_guest(&app).await;

    let (status, folio) = send(
        &app,
        Method::POST,
        "/reservations",
        Some(app.desk.as_str()),
        Some(stay(&room_id, &guest_id, 10, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{folio}");
    assert_eq!(folio["total"], "100.00");
    let reservation_id = folio["reservation"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/reservations",
        Some(app.desk.as_str()),
        Some(stay(&room_id, &guest_id, 11, 3)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ROOM_UNAVAILABLE");

    let (_, item) = send(
        &app,
        Method::POST,
        "/services",
        Some(app.manager.as_str()),
        Some(json!({ "name": "Breakfast", "unit_price": "12.50" })),
    )
    .await;
    let (status, folio) = send(
        &app,
        Method::POST,
        &format!("/reservations/{reservation_id}/services"),
        Some(app.desk.as_str()),
        Some(json!({ "service_id": item["id"], "quantity": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(folio["total"], "125.00");
    let line_id = folio["lines"][0]["id"].as_str().unwrap().to_string();

    let (status, folio) = send(
        &app,
        Method::PATCH,
        &format!("/reservations/{reservation_id}/services/{line_id}"),
        Some(app.desk.as_str()),
        Some(json!({ "quantity": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio["total"], "150.00");

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/reservations/{reservation_id}/payments"),
        Some(app.desk.as_str()),
        Some(json!({ "amount": "150.01", "method": "card" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "EXCEEDS_REMAINING");

    let (status, folio) = send(
        &app,
        Method::POST,
        &format!("/reservations/{reservation_id}/payments"),
        Some(app.desk.as_str()),
        Some(json!({ "amount": "50.00", "method": "cash", "payment_type": "deposit" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(folio["amount_paid"], "50.00");
    assert_eq!(folio["amount_remaining"], "100.00");
    assert_eq!(folio["payment_status"], "partiel");
    let payment_id = folio["payments"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/reservations/{reservation_id}"),
        Some(app.manager.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "HAS_PAYMENTS");

    let (status, folio) = send(
        &app,
        Method::DELETE,
        &format!("/payments/{payment_id}"),
        Some(app.manager.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(folio["amount_paid"], "0.00");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/reservations/{reservation_id}"),
        Some(app.manager.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_invalid_dates_are_rejected() {
    let app = test_app().await;
    let (room_id, guest_id) = room_and_guest(&app).await;

    let mut body = stay(&room_id, &guest_id, 5, 2);
    body["end_date"] = body["start_date"].clone();
    let (status, body) = send(&app, Method::POST, "/reservations", Some(app.desk.as_str()), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_room_state_and_archival() {
    let app = test_app().await;
    let (room_id, _) = room_and_guest(&app).await;

    let (status, room) = send(
        &app,
        Method::PUT,
        &format!("/rooms/{room_id}/state"),
        Some(app.manager.as_str()),
        Some(json!({ "state": "maintenance" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(room["state"], "maintenance");

    // Archiving a room is an admin action.
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/rooms/{room_id}"),
        Some(app.manager.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
