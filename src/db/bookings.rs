// src/db/bookings.rs
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;

use crate::domain::booking::Booking;
use crate::errors::ServerError;

/// A booking document as saved for a user, with the parsed view alongside.
#[derive(Debug, Clone)]
pub struct StoredBooking {
    pub id: i64,
    pub external_id: Option<String>,
    pub booking: Booking,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<(i64, Option<String>, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_stored((id, external_id, payload): (i64, Option<String>, String)) -> StoredBooking {
    // Rows were validated as JSON objects on insert; anything else reads as empty.
    let value: Value = serde_json::from_str(&payload).unwrap_or(Value::Null);
    StoredBooking {
        id,
        external_id,
        booking: Booking::from_value(&value),
    }
}

/// Store the raw booking document for a user. Returns the new row id.
pub fn insert_booking(
    conn: &Connection,
    user_id: i64,
    payload: &Value,
    now: i64,
) -> Result<i64, ServerError> {
    if !payload.is_object() {
        return Err(ServerError::BadRequest(
            "booking must be a json object".into(),
        ));
    }
    let external_id = Booking::from_value(payload).id;

    conn.execute(
        "insert into bookings (user_id, external_id, payload, created_at) values (?, ?, ?, ?)",
        params![user_id, external_id, payload.to_string(), now],
    )
    .map_err(|e| ServerError::DbError(format!("insert booking failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Fetch one booking, scoped to its owner.
pub fn get_booking(
    conn: &Connection,
    user_id: i64,
    id: i64,
) -> Result<Option<StoredBooking>, ServerError> {
    let row = conn
        .query_row(
            "select id, external_id, payload
             from bookings
             where id = ? and user_id = ?",
            params![id, user_id],
            from_row,
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("select booking failed: {e}")))?;

    Ok(row.map(into_stored))
}

/// All bookings of a user, newest first.
pub fn list_bookings(conn: &Connection, user_id: i64) -> Result<Vec<StoredBooking>, ServerError> {
    let mut stmt = conn
        .prepare(
            "select id, external_id, payload
             from bookings
             where user_id = ?
             order by created_at desc, id desc",
        )
        .map_err(|e| ServerError::DbError(format!("prepare list bookings failed: {e}")))?;

    let rows = stmt
        .query_map(params![user_id], from_row)
        .map_err(|e| ServerError::DbError(format!("list bookings failed: {e}")))?;

    rows.map(|r| {
        r.map(into_stored)
            .map_err(|e| ServerError::DbError(format!("read booking row failed: {e}")))
    })
    .collect()
}
