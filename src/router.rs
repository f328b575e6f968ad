use std::collections::HashMap;
use std::io::Read;

use astra::Request;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::app::App;
use crate::auth::sessions::{self, CurrentUser};
use crate::db::otp_auth::{request_login_code, verify_login_code};
use crate::db::{bookings, users};
use crate::domain::booking::Booking;
use crate::domain::permissions::BookingFacets;
use crate::errors::ServerError;
use crate::geo::extract_coordinates;
use crate::messages::{
    build_booking_reminder_message, build_cancellation_message, encode_for_messaging_link,
    normalize_phone, whatsapp_link,
};
use crate::responses::{
    html_response, json_error_response, json_response, redirect, redirect_with_cookie,
    text_response, ResultResp,
};
use crate::templates::components::code_form;
use crate::templates::pages::{
    account_page, booking_detail_page, bookings_page, home_page, invoice_page, login_page,
    BookingDetailVm, BookingRow, InvoiceVm,
};

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let now = Utc::now();
    debug!(%method, %path, "request");

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if let ["api", rest @ ..] = segments.as_slice() {
        return Ok(handle_api(&mut req, app, &method, rest, now).unwrap_or_else(json_error_response));
    }

    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => {
            let signed_in = current_user(&req, app, now)?.is_some();
            html_response(home_page(signed_in))
        }
        ("GET", ["healthz"]) => text_response(200, "ok"),

        ("GET", ["login"]) => html_response(login_page()),
        ("POST", ["auth", "request-otp"]) => request_otp(&mut req, app, now),
        ("POST", ["auth", "verify-otp"]) => verify_otp(&mut req, app, now),
        ("POST", ["auth", "logout"]) => logout(&req, app, now),

        ("GET", ["account"]) => {
            let Some(user) = current_user(&req, app, now)? else {
                return redirect("/login");
            };
            let profile = app
                .db
                .with_conn(|conn| users::get_user(conn, user.id))?
                .ok_or(ServerError::NotFound)?;
            html_response(account_page(&profile))
        }
        ("POST", ["account"]) => {
            let Some(user) = current_user(&req, app, now)? else {
                return redirect("/login");
            };
            let form = read_form(&mut req)?;
            let field = |name: &str| form.get(name).map(String::as_str).unwrap_or("");
            app.db.with_conn(|conn| {
                users::update_profile(conn, user.id, field("first_name"), field("last_name"))
            })?;
            redirect("/account")
        }

        ("GET", ["bookings"]) => {
            let Some(user) = current_user(&req, app, now)? else {
                return redirect("/login");
            };
            let rows: Vec<BookingRow> = app
                .db
                .with_conn(|conn| bookings::list_bookings(conn, user.id))?
                .into_iter()
                .map(|stored| BookingRow {
                    id: stored.id,
                    facets: BookingFacets::evaluate(&stored.booking, now),
                    booking: stored.booking,
                })
                .collect();
            html_response(bookings_page(&rows))
        }
        ("GET", ["bookings", id]) => {
            let Some(user) = current_user(&req, app, now)? else {
                return redirect("/login");
            };
            let stored = load_booking(app, &user, id)?;
            let vm = booking_detail(app, stored.id, stored.booking, now)?;
            html_response(booking_detail_page(&vm))
        }
        ("GET", ["bookings", id, "invoice"]) => {
            let Some(user) = current_user(&req, app, now)? else {
                return redirect("/login");
            };
            let stored = load_booking(app, &user, id)?;
            let facets = BookingFacets::evaluate(&stored.booking, now);
            if !facets.can_view_invoice {
                return Err(ServerError::Forbidden(
                    "invoice is available for paid, active bookings only".into(),
                ));
            }

            let profile = app.db.with_conn(|conn| users::get_user(conn, user.id))?;
            let billed_to = billed_to(&stored.booking)
                .or_else(|| profile.map(|p| p.display_name()))
                .unwrap_or_else(|| "Guest".to_string());

            html_response(invoice_page(&InvoiceVm {
                id: stored.id,
                booking: stored.booking,
                billed_to,
            }))
        }

        _ => Err(ServerError::NotFound),
    }
}

fn handle_api(
    req: &mut Request,
    app: &App,
    method: &str,
    segments: &[&str],
    now: DateTime<Utc>,
) -> ResultResp {
    match (method, segments) {
        ("POST", ["facets"]) => {
            let booking = Booking::from_json(&read_body(req)?)?;
            json_response(200, &BookingFacets::evaluate(&booking, now))
        }
        ("POST", ["messages", "reminder"]) => {
            let booking = Booking::from_json(&read_body(req)?)?;
            let message = build_booking_reminder_message(&booking);
            json_response(200, &message_response(app, &booking, message)?)
        }
        ("POST", ["messages", "cancellation"]) => {
            let booking = Booking::from_json(&read_body(req)?)?;
            let message = build_cancellation_message(&booking);
            json_response(200, &message_response(app, &booking, message)?)
        }

        ("GET", ["bookings"]) => {
            let user = require_api_user(req, app, now)?;
            let items: Vec<Value> = app
                .db
                .with_conn(|conn| bookings::list_bookings(conn, user.id))?
                .into_iter()
                .map(|stored| {
                    json!({
                        "id": stored.id,
                        "externalId": stored.external_id,
                        "facets": BookingFacets::evaluate(&stored.booking, now),
                    })
                })
                .collect();
            json_response(200, &items)
        }
        ("POST", ["bookings"]) => {
            let user = require_api_user(req, app, now)?;
            let payload: Value = serde_json::from_str(&read_body(req)?)
                .map_err(|e| ServerError::BadRequest(format!("invalid booking json: {e}")))?;
            let id = app.db.with_conn(|conn| {
                bookings::insert_booking(conn, user.id, &payload, now.timestamp())
            })?;
            info!(user_id = user.id, booking_id = id, "booking stored");
            json_response(201, &json!({ "id": id }))
        }

        ("GET", ["geo"]) => {
            let query = parse_query(req);
            let link = query
                .get("link")
                .ok_or_else(|| ServerError::BadRequest("missing link".into()))?;
            let coords = extract_coordinates(link).ok_or(ServerError::NotFound)?;
            json_response(200, &coords)
        }

        _ => Err(ServerError::NotFound),
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
    encoded: String,
    link: String,
}

fn message_response(
    app: &App,
    booking: &Booking,
    message: String,
) -> Result<MessageResponse, ServerError> {
    let phone = guest_phone(app, booking);
    Ok(MessageResponse {
        encoded: encode_for_messaging_link(Some(&message)),
        link: whatsapp_link(&app.config.whatsapp_base_url, phone.as_deref(), &message)?,
        message,
    })
}

/// The guest's number if the booking carries a usable one.
fn guest_phone(app: &App, booking: &Booking) -> Option<String> {
    booking
        .guest_phone()
        .and_then(|raw| normalize_phone(raw, &app.config.default_country_code).ok())
}

fn billed_to(booking: &Booking) -> Option<String> {
    let first = booking.guest_first_name().unwrap_or("");
    let last = booking.guest_last_name().unwrap_or("");
    Some(format!("{first} {last}").trim().to_string()).filter(|name| !name.is_empty())
}

fn booking_detail(
    app: &App,
    id: i64,
    booking: Booking,
    now: DateTime<Utc>,
) -> Result<BookingDetailVm, ServerError> {
    let facets = BookingFacets::evaluate(&booking, now);
    let phone = guest_phone(app, &booking);
    let base = &app.config.whatsapp_base_url;

    let reminder_link = if facets.is_paid && !facets.is_cancelled {
        Some(whatsapp_link(
            base,
            phone.as_deref(),
            &build_booking_reminder_message(&booking),
        )?)
    } else {
        None
    };
    let cancellation_link = if facets.is_cancelled {
        Some(whatsapp_link(
            base,
            phone.as_deref(),
            &build_cancellation_message(&booking),
        )?)
    } else {
        None
    };
    let coordinates = booking.property_map_link().and_then(extract_coordinates);

    Ok(BookingDetailVm {
        id,
        booking,
        facets,
        reminder_link,
        cancellation_link,
        coordinates,
    })
}

fn load_booking(
    app: &App,
    user: &CurrentUser,
    raw_id: &str,
) -> Result<bookings::StoredBooking, ServerError> {
    let id: i64 = raw_id.parse().map_err(|_| ServerError::NotFound)?;
    app.db
        .with_conn(|conn| bookings::get_booking(conn, user.id, id))?
        .ok_or(ServerError::NotFound)
}

fn request_otp(req: &mut Request, app: &App, now: DateTime<Utc>) -> ResultResp {
    let form = read_form(req)?;
    let phone = form
        .get("phone")
        .ok_or_else(|| ServerError::BadRequest("missing phone".into()))?;

    let issued = request_login_code(&app.db, &app.otp, phone, now.timestamp())?;
    app.deliver_login_code(&issued)?;

    html_response(code_form(&issued.phone))
}

fn verify_otp(req: &mut Request, app: &App, now: DateTime<Utc>) -> ResultResp {
    let form = read_form(req)?;
    let field = |name: &str| {
        form.get(name)
            .ok_or_else(|| ServerError::BadRequest(format!("missing {name}")))
    };

    let login = verify_login_code(&app.db, &app.otp, field("phone")?, field("code")?, now.timestamp())?;
    info!(user_id = login.user_id, "user signed in");

    redirect_with_cookie("/bookings", &sessions::session_cookie(&login.session_token))
}

fn logout(req: &Request, app: &App, now: DateTime<Utc>) -> ResultResp {
    if let Some(token) = session_token(req) {
        app.db
            .with_conn(|conn| sessions::revoke_session(conn, token, now.timestamp()))?;
    }
    redirect_with_cookie("/", &sessions::expired_session_cookie())
}

fn session_token(req: &Request) -> Option<&str> {
    req.headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(sessions::session_token_from_cookie)
}

fn current_user(
    req: &Request,
    app: &App,
    now: DateTime<Utc>,
) -> Result<Option<CurrentUser>, ServerError> {
    let Some(token) = session_token(req) else {
        return Ok(None);
    };
    app.db
        .with_conn(|conn| sessions::load_user_from_session(conn, token, now.timestamp()))
}

fn require_api_user(
    req: &Request,
    app: &App,
    now: DateTime<Utc>,
) -> Result<CurrentUser, ServerError> {
    current_user(req, app, now)?.ok_or_else(|| ServerError::Unauthorized("sign in required".into()))
}

fn read_body(req: &mut Request) -> Result<String, ServerError> {
    let mut body = String::new();
    req.body_mut()
        .reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("unreadable request body: {e}")))?;

    if body.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(body)
}

fn read_form(req: &mut Request) -> Result<HashMap<String, String>, ServerError> {
    let body = read_body(req)?;
    Ok(url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect())
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}
