// src/auth/sessions.rs
use crate::auth::token::{generate_token_default, hash_token};
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

pub const SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;
pub const SESSION_COOKIE: &str = "session";

/// The signed-in user, resolved from a session cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: i64,
    pub phone: String,
}

pub fn create_session(conn: &Connection, user_id: i64, now: i64) -> Result<String, ServerError> {
    let raw_token = generate_token_default();
    let hash = hash_token(&raw_token);
    let expires_at = now + SESSION_TTL_SECS;

    conn.execute(
        r#"
        insert into sessions (user_id, token_hash, created_at, expires_at)
        values (?, ?, ?, ?)
        "#,
        params![user_id, hash.as_slice(), now, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

pub fn load_user_from_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<CurrentUser>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        r#"
        select u.id, u.phone
        from sessions s
        join users u on u.id = s.user_id
        where s.token_hash = ?
          and s.expires_at > ?
          and s.revoked_at is null
        "#,
        params![hash.as_slice(), now],
        |row| {
            Ok(CurrentUser {
                id: row.get(0)?,
                phone: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

pub fn revoke_session(conn: &Connection, raw_token: &str, now: i64) -> Result<(), ServerError> {
    let hash = hash_token(raw_token);
    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(())
}

/// Delete a user's expired and revoked sessions.
pub fn purge_stale_sessions(conn: &Connection, user_id: i64, now: i64) -> Result<usize, ServerError> {
    conn.execute(
        "delete from sessions where user_id = ? and (expires_at <= ? or revoked_at is not null)",
        params![user_id, now],
    )
    .map_err(|e| ServerError::DbError(format!("purge sessions failed: {e}")))
}

/// Pull the session token out of a `Cookie` header value.
pub fn session_token_from_cookie(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::auth::get_or_create_user;
    use crate::tests::utils::schema_conn;

    #[test]
    fn session_round_trip() {
        let conn = schema_conn();
        let user_id = get_or_create_user(&conn, "919876543210", 1000).unwrap();

        let token = create_session(&conn, user_id, 1000).unwrap();
        let user = load_user_from_session(&conn, &token, 1001).unwrap();
        assert_eq!(
            user,
            Some(CurrentUser {
                id: user_id,
                phone: "919876543210".into()
            })
        );

        assert_eq!(load_user_from_session(&conn, "bogus", 1001).unwrap(), None);
    }

    #[test]
    fn sessions_expire_and_revoke() {
        let conn = schema_conn();
        let user_id = get_or_create_user(&conn, "919876543210", 1000).unwrap();

        let token = create_session(&conn, user_id, 1000).unwrap();
        assert!(load_user_from_session(&conn, &token, 1000 + SESSION_TTL_SECS)
            .unwrap()
            .is_none());

        let token = create_session(&conn, user_id, 2000).unwrap();
        revoke_session(&conn, &token, 2001).unwrap();
        assert!(load_user_from_session(&conn, &token, 2002).unwrap().is_none());
    }

    #[test]
    fn purge_removes_only_dead_sessions() {
        let conn = schema_conn();
        let user_id = get_or_create_user(&conn, "919876543210", 1000).unwrap();
        let other = get_or_create_user(&conn, "447700900123", 1000).unwrap();

        let _expired = create_session(&conn, user_id, 1000).unwrap();
        let revoked = create_session(&conn, user_id, 2000).unwrap();
        revoke_session(&conn, &revoked, 2001).unwrap();
        let live = create_session(&conn, user_id, 1000 + SESSION_TTL_SECS).unwrap();
        let _theirs = create_session(&conn, other, 1000).unwrap();

        let now = 1000 + SESSION_TTL_SECS + 1;
        assert_eq!(purge_stale_sessions(&conn, user_id, now).unwrap(), 2);
        assert!(load_user_from_session(&conn, &live, now).unwrap().is_some());

        let remaining: i64 = conn
            .query_row("select count(*) from sessions", [], |r| r.get(0))
            .unwrap();
        assert_eq!(remaining, 2);
    }

    #[test]
    fn cookie_parsing() {
        assert_eq!(session_token_from_cookie("session=abc"), Some("abc"));
        assert_eq!(
            session_token_from_cookie("theme=dark; session=abc-_1 ; other=x"),
            Some("abc-_1")
        );
        assert_eq!(session_token_from_cookie("session="), None);
        assert_eq!(session_token_from_cookie("sessionx=abc"), None);
        assert_eq!(session_token_from_cookie(""), None);
    }
}
