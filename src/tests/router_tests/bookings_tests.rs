use crate::app::App;
use crate::db::bookings::insert_booking;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, now_unix, sign_in, test_app};
use astra::{Body, Response};
use http::{Method, Request};
use serde_json::{json, Value};

fn get(app: &App, uri: &str, token: &str) -> Result<Response, ServerError> {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    handle(req, app)
}

fn store(app: &App, user_id: i64, booking: Value) -> i64 {
    app.db
        .with_conn(|conn| insert_booking(conn, user_id, &booking, now_unix()))
        .expect("Failed to store booking")
}

fn paid_past_stay() -> Value {
    json!({
        "_id": "bk_100",
        "propertyId": {"propertyName": "Villa Sunrise", "mapLink": "https://maps.google.com/?q=15.55,73.75"},
        "userId": {"firstName": "Asha", "lastName": "Rao", "phone": "9876543210"},
        "checkIn": "2024-01-10",
        "checkOut": "2024-01-12",
        "guests": {"adults": 2, "children": 1},
        "grandTotal": 15000,
        "paymentId": "pay_123"
    })
}

#[test]
fn bookings_page_requires_login() {
    let app = test_app();
    let req = Request::builder()
        .method(Method::GET)
        .uri("/bookings")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &app).expect("Handler failed");
    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/login"
    );
}

#[test]
fn bookings_page_gates_actions_by_facets() {
    let app = test_app();
    let (user_id, token) = sign_in(&app, "9876543210");

    let paid = store(&app, user_id, paid_past_stay());
    let cancelled = store(
        &app,
        user_id,
        json!({
            "propertyId": {"propertyName": "Palm Cove"},
            "checkOut": "2024-02-01",
            "status": "paid",
            "cancelled": true
        }),
    );

    let resp = get(&app, "/bookings", &token).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("Villa Sunrise"));
    assert!(body.contains("Completed"));
    assert!(body.contains("15,000"));
    assert!(body.contains(&format!("/bookings/{paid}/invoice")));
    assert!(body.contains("Rate your stay"));

    assert!(body.contains("Palm Cove"));
    assert!(body.contains("Cancelled"));
    assert!(!body.contains(&format!("/bookings/{cancelled}/invoice")));
}

#[test]
fn detail_page_offers_whatsapp_links() {
    let app = test_app();
    let (user_id, token) = sign_in(&app, "9876543210");
    let id = store(&app, user_id, paid_past_stay());

    let body = body_string(get(&app, &format!("/bookings/{id}"), &token).expect("Handler failed"));

    assert!(body.contains("https://wa.me/919876543210?text="));
    assert!(body.contains("Send confirmation on WhatsApp"));
    assert!(!body.contains("Send cancellation notice"));
    assert!(body.contains("15.55000, 73.75000"));
    assert!(body.contains("How was your stay?"));
}

#[test]
fn cancelled_detail_offers_cancellation_notice_only() {
    let app = test_app();
    let (user_id, token) = sign_in(&app, "9876543210");
    let mut booking = paid_past_stay();
    booking["cancelled"] = json!(true);
    let id = store(&app, user_id, booking);

    let body = body_string(get(&app, &format!("/bookings/{id}"), &token).expect("Handler failed"));
    assert!(body.contains("Send cancellation notice on WhatsApp"));
    assert!(!body.contains("Send confirmation on WhatsApp"));
    assert!(!body.contains("View invoice"));
}

#[test]
fn invoice_requires_paid_active_booking() {
    let app = test_app();
    let (user_id, token) = sign_in(&app, "9876543210");

    let paid = store(&app, user_id, paid_past_stay());
    let resp = get(&app, &format!("/bookings/{paid}/invoice"), &token).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Invoice bk_100"));
    assert!(body.contains("Billed to"));
    assert!(body.contains("Asha Rao"));
    assert!(body.contains("pay_123"));

    let unpaid = store(&app, user_id, json!({"status": "pending"}));
    match get(&app, &format!("/bookings/{unpaid}/invoice"), &token) {
        Err(ServerError::Forbidden(_)) => {}
        other => panic!("expected Forbidden, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn other_users_bookings_are_not_found() {
    let app = test_app();
    let (owner, _) = sign_in(&app, "9876543210");
    let (_, intruder_token) = sign_in(&app, "9123456780");
    let id = store(&app, owner, paid_past_stay());

    assert!(matches!(
        get(&app, &format!("/bookings/{id}"), &intruder_token),
        Err(ServerError::NotFound)
    ));
    assert!(matches!(
        get(&app, "/bookings/not-a-number", &intruder_token),
        Err(ServerError::NotFound)
    ));
}
