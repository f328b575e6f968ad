use crate::db::otp_auth::request_login_code;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, now_unix, sign_in, test_app};
use astra::Body;
use http::{Method, Request};

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.as_bytes().to_vec()))
        .unwrap()
}

#[test]
fn login_page_loads_successfully() {
    let app = test_app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/login")
        .body(Body::empty())
        .unwrap();

    let resp = handle(req, &app).expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("name=\"phone\""));
}

#[test]
fn request_otp_returns_partial_code_form() {
    let app = test_app();

    let resp = handle(form_post("/auth/request-otp", "phone=98765+43210"), &app)
        .expect("Failed to handle request");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Enter your code"));
    assert!(body.contains("+919876543210"));
    assert!(body.contains("value=\"919876543210\""));

    // partial for HTMX swapping, not a full page
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(!body.contains("<html"));
}

#[test]
fn repeated_code_requests_are_throttled() {
    let app = test_app();

    for _ in 0..app.otp.max_codes_per_window {
        let resp = handle(form_post("/auth/request-otp", "phone=9876543210"), &app)
            .expect("Failed to handle request");
        assert_eq!(resp.status(), 200);
    }

    match handle(form_post("/auth/request-otp", "phone=9876543210"), &app) {
        Err(err @ ServerError::TooManyRequests(_)) => assert_eq!(err.status(), 429),
        other => panic!("expected TooManyRequests, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn request_otp_rejects_invalid_phone() {
    let app = test_app();
    match handle(form_post("/auth/request-otp", "phone=123"), &app) {
        Err(ServerError::BadRequest(_)) => {}
        other => panic!("expected BadRequest, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn verify_otp_sets_session_cookie_and_redirects() {
    let app = test_app();
    let issued = request_login_code(&app.db, &app.otp, "9876543210", now_unix()).unwrap();

    let resp = handle(
        form_post(
            "/auth/verify-otp",
            &format!("phone=9876543210&code={}", issued.code),
        ),
        &app,
    )
    .expect("Handler failed");

    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/bookings"
    );
    let cookie = resp.headers().get("Set-Cookie").unwrap().to_str().unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
}

#[test]
fn verify_otp_with_wrong_code_is_unauthorized() {
    let app = test_app();
    let issued = request_login_code(&app.db, &app.otp, "9876543210", now_unix()).unwrap();
    let wrong = if issued.code == "000000" { "111111" } else { "000000" };

    match handle(
        form_post("/auth/verify-otp", &format!("phone=9876543210&code={wrong}")),
        &app,
    ) {
        Err(ServerError::Unauthorized(msg)) => assert!(msg.contains("attempts left")),
        other => panic!("expected Unauthorized, got: {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn logout_revokes_session() {
    let app = test_app();
    let (_, token) = sign_in(&app, "9876543210");

    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/logout")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let resp = handle(req, &app).expect("Handler failed");
    assert_eq!(resp.status(), 302);
    assert!(resp
        .headers()
        .get("Set-Cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("Max-Age=0"));

    // the old cookie no longer opens the bookings page
    let req = Request::builder()
        .method(Method::GET)
        .uri("/bookings")
        .header("Cookie", format!("session={token}"))
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
fn account_update_round_trip() {
    let app = test_app();
    let (_, token) = sign_in(&app, "9876543210");

    let mut req = form_post("/account", "first_name=Asha&last_name=Rao");
    req.headers_mut()
        .insert("Cookie", format!("session={token}").parse().unwrap());
    let resp = handle(req, &app).expect("Handler failed");
    assert_eq!(resp.status(), 302);

    let req = Request::builder()
        .method(Method::GET)
        .uri("/account")
        .header("Cookie", format!("session={token}"))
        .body(Body::empty())
        .unwrap();
    let body = body_string(handle(req, &app).expect("Handler failed"));
    assert!(body.contains("Asha Rao"));
}
