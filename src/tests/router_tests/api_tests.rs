use crate::router::handle;
use crate::tests::utils::{body_string, sign_in, test_app};
use astra::Body;
use http::{Method, Request};
use serde_json::{json, Value};

fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    builder
        .body(Body::from(body.to_string().into_bytes()))
        .unwrap()
}

fn json_body(resp: astra::Response) -> Value {
    serde_json::from_str(&body_string(resp)).expect("response is not json")
}

#[test]
fn facets_endpoint_evaluates_booking() {
    let app = test_app();
    let resp = handle(
        post_json(
            "/api/facets",
            &json!({"checkOut": "2020-01-01", "status": "failed", "paymentId": "pay_1"}),
            None,
        ),
        &app,
    )
    .expect("Handler failed");

    assert_eq!(resp.status(), 200);
    assert_eq!(
        json_body(resp),
        json!({
            "isCancelled": false,
            "isPaid": true,
            "isCompleted": true,
            "canViewInvoice": true,
            "canRate": true
        })
    );
}

#[test]
fn facets_endpoint_rejects_bad_json() {
    let app = test_app();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/facets")
        .body(Body::from("{not json".as_bytes().to_vec()))
        .unwrap();

    let resp = handle(req, &app).expect("API errors render as responses");
    assert_eq!(resp.status(), 400);
    assert!(json_body(resp)["error"]
        .as_str()
        .unwrap()
        .contains("invalid booking json"));
}

#[test]
fn reminder_endpoint_returns_message_and_link() {
    let app = test_app();
    let resp = handle(
        post_json(
            "/api/messages/reminder",
            &json!({
                "propertyId": {"propertyName": "Villa Sunrise"},
                "userId": {"phone": "98765 43210"},
                "checkIn": "2025-01-10",
                "checkOut": "2025-01-12",
                "guests": {"adults": 2, "children": 1},
                "grandTotal": 15000
            }),
            None,
        ),
        &app,
    )
    .expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = json_body(resp);
    let message = body["message"].as_str().unwrap();
    let encoded = body["encoded"].as_str().unwrap();
    let link = body["link"].as_str().unwrap();

    assert!(message.contains("Villa Sunrise"));
    assert!(message.contains("15,000"));
    assert_eq!(link, format!("https://wa.me/919876543210?text={encoded}"));
    assert!(urlencoding::decode(encoded).unwrap().contains("Guests: 3"));
}

#[test]
fn cancellation_endpoint_without_phone_uses_share_link() {
    let app = test_app();
    let resp = handle(
        post_json(
            "/api/messages/cancellation",
            &json!({"userId": {"firstName": "Asha"}, "cancelled": true}),
            None,
        ),
        &app,
    )
    .expect("Handler failed");

    let body = json_body(resp);
    assert!(body["message"].as_str().unwrap().starts_with("Dear Asha,"));
    assert!(body["link"].as_str().unwrap().starts_with("https://wa.me/?text=Dear%20Asha"));
}

#[test]
fn storing_bookings_requires_a_session() {
    let app = test_app();

    let resp = handle(post_json("/api/bookings", &json!({}), None), &app).expect("Handler failed");
    assert_eq!(resp.status(), 401);

    let (_, token) = sign_in(&app, "9876543210");
    let resp = handle(
        post_json("/api/bookings", &json!({"_id": "bk_9", "status": "confirmed"}), Some(&token)),
        &app,
    )
    .expect("Handler failed");
    assert_eq!(resp.status(), 201);
    let id = json_body(resp)["id"].as_i64().unwrap();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/bookings")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let list = json_body(handle(req, &app).expect("Handler failed"));
    assert_eq!(list[0]["id"], json!(id));
    assert_eq!(list[0]["externalId"], json!("bk_9"));
    assert_eq!(list[0]["facets"]["isPaid"], json!(true));
}

#[test]
fn geo_endpoint_extracts_coordinates() {
    let app = test_app();
    let link = urlencoding::encode("https://www.google.com/maps/@12.9716,77.5946,15z");
    let req = Request::builder()
        .method(Method::GET)
        .uri(format!("/api/geo?link={link}"))
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &app).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(json_body(resp), json!({"lat": 12.9716, "lng": 77.5946}));

    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/geo?link=https%3A%2F%2Fgoo.gl%2Fmaps%2Fabc")
        .body(Body::empty())
        .unwrap();
    assert_eq!(handle(req, &app).expect("Handler failed").status(), 404);
}

#[test]
fn unknown_api_route_is_json_404() {
    let app = test_app();
    let req = Request::builder()
        .method(Method::GET)
        .uri("/api/nope")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &app).expect("Handler failed");
    assert_eq!(resp.status(), 404);
    assert_eq!(json_body(resp), json!({"error": "Not Found"}));
}
