use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use musafir_api::middleware::auth::Claims;
use musafir_api::state::AuthConfig;
use musafir_api::{app, AppState};
use musafir_booking::{BookingManager, LogNotifier, MemoryBookingStore};
use musafir_catalog::{CatalogItem, Hotel, MemoryCatalog, RoomInventory};
use musafir_core::Role;
use musafir_shared::money::Money;
use musafir_store::app_config::BusinessRules;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "test-secret";

fn test_state(items: Vec<CatalogItem>) -> AppState {
    let catalog = Arc::new(MemoryCatalog::new());
    for item in items {
        catalog.insert(item);
    }
    let bookings = Arc::new(MemoryBookingStore::new());
    let manager = Arc::new(BookingManager::new(
        catalog,
        bookings,
        Arc::new(LogNotifier),
    ));

    AppState {
        manager,
        redis: None,
        auth: AuthConfig {
            secret: SECRET.to_string(),
            expiration: 3600,
        },
        business_rules: BusinessRules {
            rate_limit_per_minute: 100,
        },
    }
}

fn lakeview(id: Uuid) -> CatalogItem {
    CatalogItem::Hotel(Hotel {
        id,
        name: "Lakeview".to_string(),
        city: Some("Udaipur".to_string()),
        rooms: vec![RoomInventory {
            room_type: "deluxe".to_string(),
            price: Money::inr(1000.0),
            available: 2,
            total: 2,
        }],
    })
}

fn token(sub: &str, role: Role) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        email: format!("{sub}@example.com"),
        role,
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_payload(hotel_id: Uuid, start: DateTime<Utc>) -> Value {
    json!({
        "type": "hotel",
        "item_id": hotel_id,
        "start_date": start.to_rfc3339(),
        "end_date": (start + Duration::days(2)).to_rfc3339(),
        "guests": { "adults": 2, "children": 0 },
        "rooms": [{ "room_type": "deluxe", "quantity": 1 }],
    })
}

#[tokio::test]
async fn test_requests_require_a_token() {
    let app = app(test_state(vec![]));
    let response = app
        .oneshot(request(Method::GET, "/bookings/my-bookings", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_booking_returns_created_with_computed_amount() {
    let hotel_id = Uuid::new_v4();
    let app = app(test_state(vec![lakeview(hotel_id)]));
    let start = Utc::now() + Duration::days(10);

    let response = app
        .oneshot(request(
            Method::POST,
            "/bookings",
            Some(&token("user-1", Role::Tourist)),
            Some(create_payload(hotel_id, start)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["booking_status"], "pending");
    assert_eq!(body["payment_status"], "pending");
    assert_eq!(body["amount"]["currency"], "INR");
    let total = body["amount"]["total"].as_f64().unwrap();
    assert!((total - 2360.0).abs() < 1e-6);
}

#[tokio::test]
async fn test_create_booking_for_missing_item_is_not_found() {
    let app = app(test_state(vec![]));
    let start = Utc::now() + Duration::days(10);

    let response = app
        .oneshot(request(
            Method::POST,
            "/bookings",
            Some(&token("user-1", Role::Tourist)),
            Some(create_payload(Uuid::new_v4(), start)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "Item not found");
}

#[tokio::test]
async fn test_malformed_guest_counts_are_rejected() {
    let hotel_id = Uuid::new_v4();
    let app = app(test_state(vec![lakeview(hotel_id)]));
    let start = Utc::now() + Duration::days(10);

    let mut payload = create_payload(hotel_id, start);
    payload["guests"]["adults"] = json!(0);

    let response = app
        .oneshot(request(
            Method::POST,
            "/bookings",
            Some(&token("user-1", Role::Tourist)),
            Some(payload),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_owner_visibility_rules() {
    let hotel_id = Uuid::new_v4();
    let state = test_state(vec![lakeview(hotel_id)]);
    let start = Utc::now() + Duration::days(10);

    let response = app(state.clone())
        .oneshot(request(
            Method::POST,
            "/bookings",
            Some(&token("user-1", Role::Tourist)),
            Some(create_payload(hotel_id, start)),
        ))
        .await
        .unwrap();
    let booking_id = body_json(response).await["id"].as_str().unwrap().to_string();
    let uri = format!("/bookings/{booking_id}");

    // The owner sees their booking.
    let response = app(state.clone())
        .oneshot(request(
            Method::GET,
            &uri,
            Some(&token("user-1", Role::Tourist)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Another tourist does not.
    let response = app(state.clone())
        .oneshot(request(
            Method::GET,
            &uri,
            Some(&token("user-2", Role::Tourist)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A privileged role does.
    let response = app(state)
        .oneshot(request(
            Method::GET,
            &uri,
            Some(&token("ops-1", Role::Admin)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_my_bookings_lists_only_the_caller() {
    let hotel_id = Uuid::new_v4();
    let state = test_state(vec![lakeview(hotel_id)]);
    let start = Utc::now() + Duration::days(10);

    for user in ["user-1", "user-2"] {
        let response = app(state.clone())
            .oneshot(request(
                Method::POST,
                "/bookings",
                Some(&token(user, Role::Tourist)),
                Some(create_payload(hotel_id, start)),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app(state)
        .oneshot(request(
            Method::GET,
            "/bookings/my-bookings",
            Some(&token("user-1", Role::Tourist)),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_is_allow_listed() {
    let hotel_id = Uuid::new_v4();
    let state = test_state(vec![lakeview(hotel_id)]);
    let start = Utc::now() + Duration::days(10);

    let response = app(state.clone())
        .oneshot(request(
            Method::POST,
            "/bookings",
            Some(&token("user-1", Role::Tourist)),
            Some(create_payload(hotel_id, start)),
        ))
        .await
        .unwrap();
    let booking_id = body_json(response).await["id"].as_str().unwrap().to_string();
    let uri = format!("/bookings/{booking_id}");

    let response = app(state.clone())
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(&token("user-1", Role::Tourist)),
            Some(json!({ "special_requests": "late check-in" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["special_requests"],
        "late check-in"
    );

    // Any field outside the allow-list rejects the whole patch.
    let response = app(state)
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some(&token("user-1", Role::Tourist)),
            Some(json!({ "amount": { "total": 1.0 } })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid updates");
}

#[tokio::test]
async fn test_cancel_flow_over_http() {
    let hotel_id = Uuid::new_v4();
    let state = test_state(vec![lakeview(hotel_id)]);
    let start = Utc::now() + Duration::days(10);

    let response = app(state.clone())
        .oneshot(request(
            Method::POST,
            "/bookings",
            Some(&token("user-1", Role::Tourist)),
            Some(create_payload(hotel_id, start)),
        ))
        .await
        .unwrap();
    let booking_id = body_json(response).await["id"].as_str().unwrap().to_string();
    let uri = format!("/bookings/{booking_id}/cancel");

    let response = app(state.clone())
        .oneshot(request(
            Method::POST,
            &uri,
            Some(&token("user-1", Role::Tourist)),
            Some(json!({ "reason": "change of plans" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["booking_status"], "cancelled");
    let refund = body["cancellation"]["refund_amount"].as_f64().unwrap();
    assert!((refund - 2124.0).abs() < 1e-6);

    // A second cancel fails.
    let response = app(state)
        .oneshot(request(
            Method::POST,
            &uri,
            Some(&token("user-1", Role::Tourist)),
            Some(json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Booking is already cancelled"
    );
}
