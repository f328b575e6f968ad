// src/db/auth.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::auth::token::hashes_equal;
use crate::errors::ServerError;

/// The parts of a live OTP row the check needs.
#[derive(Debug, Clone)]
struct LiveOtp {
    id: i64,
    code_hash: Vec<u8>,
    attempts: i64,
}

/// Codes issued and wrong guesses made by one user since some instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpActivity {
    pub codes_issued: i64,
    pub failed_attempts: i64,
}

/// Outcome of checking a code against the latest live OTP for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpCheck {
    Accepted,
    /// Wrong code; `remaining` guesses are left on the live OTP.
    Rejected { remaining: i64 },
    /// No unused, unexpired OTP with guesses left.
    NoLiveCode,
}

/// Insert a user if they don't exist, then return the user id.
/// Phone should already be normalized by caller.
pub fn get_or_create_user(conn: &Connection, phone: &str, now: i64) -> Result<i64, ServerError> {
    conn.execute(
        "insert or ignore into users (phone, created_at) values (?, ?)",
        params![phone, now],
    )
    .map_err(|e| ServerError::DbError(format!("insert user failed: {e}")))?;

    let id: i64 = conn
        .query_row(
            "select id from users where phone = ?",
            params![phone],
            |row| row.get(0),
        )
        .map_err(|e| ServerError::DbError(format!("select user id failed: {e}")))?;

    Ok(id)
}

pub fn find_user_by_phone(conn: &Connection, phone: &str) -> Result<Option<i64>, ServerError> {
    conn.query_row(
        "select id from users where phone = ?",
        params![phone],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user by phone failed: {e}")))
}

/// Insert an OTP row (code_hash should be SHA-256 bytes).
pub fn insert_otp(
    conn: &Connection,
    user_id: i64,
    code_hash: &[u8],
    created_at: i64,
    expires_at: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "insert into otp_codes (user_id, code_hash, created_at, expires_at) values (?, ?, ?, ?)",
        params![user_id, code_hash, created_at, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("insert otp failed: {e}")))?;
    Ok(())
}

/// Count codes issued to a user since `since`, and the wrong guesses made
/// against them. Guesses follow the code they were made on.
pub fn otp_activity_since(
    conn: &Connection,
    user_id: i64,
    since: i64,
) -> Result<OtpActivity, ServerError> {
    conn.query_row(
        "select count(*), coalesce(sum(attempts), 0)
         from otp_codes
         where user_id = ? and created_at > ?",
        params![user_id, since],
        |r| {
            Ok(OtpActivity {
                codes_issued: r.get(0)?,
                failed_attempts: r.get(1)?,
            })
        },
    )
    .map_err(|e| ServerError::DbError(format!("count otp activity failed: {e}")))
}

/// Drop a user's codes that are both dead and older than `before`.
/// Rows inside the rate-limit window are kept so they still count.
pub fn purge_stale_otps(
    conn: &Connection,
    user_id: i64,
    before: i64,
    now: i64,
) -> Result<usize, ServerError> {
    conn.execute(
        "delete from otp_codes
         where user_id = ? and created_at <= ?
           and (used_at is not null or expires_at <= ?)",
        params![user_id, before, now],
    )
    .map_err(|e| ServerError::DbError(format!("purge otp codes failed: {e}")))
}

fn latest_live_otp(
    conn: &Connection,
    user_id: i64,
    now: i64,
    max_attempts: i64,
) -> Result<Option<LiveOtp>, ServerError> {
    conn.query_row(
        "select id, code_hash, attempts
         from otp_codes
         where user_id = ? and used_at is null and expires_at > ? and attempts < ?
         order by id desc
         limit 1",
        params![user_id, now, max_attempts],
        |r| {
            Ok(LiveOtp {
                id: r.get(0)?,
                code_hash: r.get(1)?,
                attempts: r.get(2)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select otp failed: {e}")))
}

/// Check a code hash against the newest live OTP of a user.
/// - only the newest unused, unexpired code with attempts left counts
/// - a miss burns one attempt
/// - a hit marks the code used
///
/// Runs in a transaction so a code can only be accepted once.
pub fn check_otp(
    conn: &mut Connection,
    user_id: i64,
    code_hash: &[u8],
    now: i64,
    max_attempts: i64,
) -> Result<OtpCheck, ServerError> {
    let tx = conn
        .transaction()
        .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))?;

    let Some(otp) = latest_live_otp(&tx, user_id, now, max_attempts)? else {
        tx.rollback().ok();
        return Ok(OtpCheck::NoLiveCode);
    };

    if !hashes_equal(&otp.code_hash, code_hash) {
        tx.execute(
            "update otp_codes set attempts = attempts + 1 where id = ?",
            params![otp.id],
        )
        .map_err(|e| ServerError::DbError(format!("update otp attempts failed: {e}")))?;
        tx.commit()
            .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;
        return Ok(OtpCheck::Rejected {
            remaining: (max_attempts - otp.attempts - 1).max(0),
        });
    }

    // Guard used_at IS NULL so only one verifier wins.
    let updated = tx
        .execute(
            "update otp_codes set used_at = ? where id = ? and used_at is null",
            params![now, otp.id],
        )
        .map_err(|e| ServerError::DbError(format!("update otp used_at failed: {e}")))?;

    if updated != 1 {
        tx.rollback().ok();
        return Ok(OtpCheck::NoLiveCode);
    }

    tx.commit()
        .map_err(|e| ServerError::DbError(format!("commit tx failed: {e}")))?;

    Ok(OtpCheck::Accepted)
}
