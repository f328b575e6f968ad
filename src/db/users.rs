// src/db/users.rs
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: i64,
    pub phone: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    /// Name for greetings; falls back to the phone number.
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        match format!("{first} {last}").trim() {
            "" => self.phone.clone(),
            name => name.to_string(),
        }
    }
}

pub fn get_user(conn: &Connection, user_id: i64) -> Result<Option<UserProfile>, ServerError> {
    conn.query_row(
        "select id, phone, first_name, last_name from users where id = ?",
        params![user_id],
        |r| {
            Ok(UserProfile {
                id: r.get(0)?,
                phone: r.get(1)?,
                first_name: r.get(2)?,
                last_name: r.get(3)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select user failed: {e}")))
}

/// Blank names are stored as NULL.
pub fn update_profile(
    conn: &Connection,
    user_id: i64,
    first_name: &str,
    last_name: &str,
) -> Result<(), ServerError> {
    let clean = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());

    let updated = conn
        .execute(
            "update users set first_name = ?, last_name = ? where id = ?",
            params![clean(first_name), clean(last_name), user_id],
        )
        .map_err(|e| ServerError::DbError(format!("update profile failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}
