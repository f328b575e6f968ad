use crate::app::App;
use crate::config::AppConfig;
use crate::db::connection::init_db;
use crate::db::otp_auth::{request_login_code, verify_login_code};
use astra::Response;
use rusqlite::Connection;
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

pub const SCHEMA_PATH: &str = "sql/schema.sql";

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// A bare connection with the production schema, for db-level tests.
pub fn schema_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    let schema = std::fs::read_to_string(SCHEMA_PATH).unwrap();
    conn.execute_batch(&schema).unwrap();
    conn
}

/// An app backed by its own private in-memory database.
pub fn test_app() -> App {
    let n = NEXT_DB.fetch_add(1, Ordering::SeqCst);
    let config = AppConfig {
        database_path: format!("file:booking_desk_test_{n}?mode=memory"),
        ..AppConfig::default()
    };
    let app = App::new(config);

    init_db(&app.db, SCHEMA_PATH)
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    app
}

/// Log in through the OTP flow and return (user_id, session token).
pub fn sign_in(app: &App, phone: &str) -> (i64, String) {
    let now = now_unix();
    let issued = request_login_code(&app.db, &app.otp, phone, now).expect("request code");
    let login =
        verify_login_code(&app.db, &app.otp, phone, &issued.code, now).expect("verify code");
    (login.user_id, login.session_token)
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}
