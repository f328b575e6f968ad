use crate::auth::otp::{IssuedOtp, OtpConfig, OtpService};
use crate::auth::sessions;
use crate::db::connection::Database;
use crate::errors::ServerError;

/// A verified login with its freshly created session.
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub user_id: i64,
    /// Raw session token for the cookie.
    pub session_token: String,
}

/// Request a login code: creates user if needed and stores the code hash.
/// Returns the raw code so the caller can deliver it.
pub fn request_login_code(
    db: &Database,
    cfg: &OtpConfig,
    phone: &str,
    now: i64,
) -> Result<IssuedOtp, ServerError> {
    let svc = OtpService::new(cfg.clone());
    db.with_conn(|conn| svc.request_code(conn, phone, now))
}

/// Verify a code and open a session for the user.
pub fn verify_login_code(
    db: &Database,
    cfg: &OtpConfig,
    phone: &str,
    code: &str,
    now: i64,
) -> Result<LoginSession, ServerError> {
    let svc = OtpService::new(cfg.clone());

    db.with_conn(|conn| {
        let user_id = svc.verify(conn, phone, code, now)?;
        sessions::purge_stale_sessions(conn, user_id, now)?;
        let session_token = sessions::create_session(conn, user_id, now)?;

        Ok(LoginSession {
            user_id,
            session_token,
        })
    })
}
