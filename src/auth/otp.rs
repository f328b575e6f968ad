// src/auth/otp.rs
use crate::errors::ServerError;
use rand::rngs::OsRng;
use rusqlite::{params, Connection};
use tracing::warn;

use crate::auth::token::{generate_numeric_code, hash_token};
use crate::db::auth::{self as db_auth, OtpCheck};
use crate::messages::whatsapp::normalize_phone;

#[derive(Debug, Clone)]
pub struct OtpConfig {
    /// TTL for codes in seconds.
    pub ttl_secs: i64,
    pub code_len: usize,
    /// Wrong guesses allowed before a code is dead.
    pub max_attempts: i64,
    /// Prefixed to ten-digit local numbers.
    pub default_country_code: String,
    /// Sliding window for the per-user limits below.
    pub window_secs: i64,
    /// Codes a user may be sent per window.
    pub max_codes_per_window: i64,
    /// Wrong guesses a user may make per window, across all their codes.
    pub max_failures_per_window: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 5 * 60,
            code_len: 6,
            max_attempts: 5,
            default_country_code: "91".to_string(),
            window_secs: 60 * 60,
            max_codes_per_window: 3,
            max_failures_per_window: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub phone: String,
    pub user_id: i64,
    /// Raw code (never store this in DB).
    pub code: String,
}

pub struct OtpService {
    cfg: OtpConfig,
}

impl OtpService {
    pub fn new(cfg: OtpConfig) -> Self {
        Self { cfg }
    }

    pub fn normalize_phone(&self, phone: &str) -> Result<String, ServerError> {
        normalize_phone(phone, &self.cfg.default_country_code)
    }

    /// Request a login code (signup + login unified):
    /// - normalize phone
    /// - get_or_create_user
    /// - refuse when the user is over the code or failure limit
    /// - purge dead codes outside the window
    /// - insert code (store hash only)
    ///
    /// Delivery is the caller's job.
    pub fn request_code(
        &self,
        conn: &Connection,
        phone: &str,
        now: i64,
    ) -> Result<IssuedOtp, ServerError> {
        let phone = self.normalize_phone(phone)?;
        let user_id = db_auth::get_or_create_user(conn, &phone, now)?;

        let window_start = now - self.cfg.window_secs;
        let activity = db_auth::otp_activity_since(conn, user_id, window_start)?;
        if activity.codes_issued >= self.cfg.max_codes_per_window
            || activity.failed_attempts >= self.cfg.max_failures_per_window
        {
            warn!(
                user_id,
                codes = activity.codes_issued,
                failures = activity.failed_attempts,
                "otp request throttled"
            );
            return Err(ServerError::TooManyRequests(
                "too many login attempts, try again later".into(),
            ));
        }

        db_auth::purge_stale_otps(conn, user_id, window_start, now)?;

        let code = generate_numeric_code(&mut OsRng, self.cfg.code_len);
        db_auth::insert_otp(
            conn,
            user_id,
            &hash_token(&code),
            now,
            now + self.cfg.ttl_secs,
        )?;

        Ok(IssuedOtp {
            phone,
            user_id,
            code,
        })
    }

    /// Verify a code for a phone and return the user id:
    /// - refuse outright once the user is over the failure limit
    /// - hash the code
    /// - check it against the newest live code (single-use, attempt-limited)
    /// - stamp last_login_at
    pub fn verify(
        &self,
        conn: &mut Connection,
        phone: &str,
        code: &str,
        now: i64,
    ) -> Result<i64, ServerError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ServerError::BadRequest("missing code".into()));
        }
        let phone = self.normalize_phone(phone)?;

        let Some(user_id) = db_auth::find_user_by_phone(conn, &phone)? else {
            return Err(ServerError::Unauthorized("invalid or expired code".into()));
        };

        let activity = db_auth::otp_activity_since(conn, user_id, now - self.cfg.window_secs)?;
        if activity.failed_attempts >= self.cfg.max_failures_per_window {
            warn!(user_id, failures = activity.failed_attempts, "otp verify locked out");
            return Err(ServerError::TooManyRequests(
                "too many login attempts, try again later".into(),
            ));
        }

        match db_auth::check_otp(conn, user_id, &hash_token(code), now, self.cfg.max_attempts)? {
            OtpCheck::Accepted => {}
            OtpCheck::Rejected { remaining } => {
                warn!(user_id, remaining, "otp rejected");
                return Err(ServerError::Unauthorized(format!(
                    "incorrect code, {remaining} attempts left"
                )));
            }
            OtpCheck::NoLiveCode => {
                warn!(user_id, "otp verify without live code");
                return Err(ServerError::Unauthorized("invalid or expired code".into()));
            }
        }

        conn.execute(
            "update users set last_login_at = ? where id = ?",
            params![now, user_id],
        )
        .map_err(|e| ServerError::DbError(format!("update last_login_at failed: {e}")))?;

        Ok(user_id)
    }
}
