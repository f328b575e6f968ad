// src/app.rs

use tracing::{debug, warn};

use crate::auth::otp::{IssuedOtp, OtpConfig};
use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::ServerError;
use crate::notifier::{login_code_message, WhatsAppNotifier};

/// Everything a request handler needs, built once at startup.
pub struct App {
    pub db: Database,
    pub config: AppConfig,
    pub otp: OtpConfig,
    notifier: Option<WhatsAppNotifier>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let otp = OtpConfig {
            ttl_secs: config.otp_ttl_secs,
            default_country_code: config.default_country_code.clone(),
            ..OtpConfig::default()
        };

        Self {
            db: Database::new(config.database_path.clone()),
            notifier: WhatsAppNotifier::from_config(&config),
            otp,
            config,
        }
    }

    /// Send a freshly issued login code to its phone. Without a configured
    /// notifier the code only shows up in debug-level logs, which is what
    /// local development uses.
    pub fn deliver_login_code(&self, issued: &IssuedOtp) -> Result<(), ServerError> {
        let Some(notifier) = &self.notifier else {
            warn!(user_id = issued.user_id, "login code not delivered: whatsapp api not configured");
            debug!(user_id = issued.user_id, code = %issued.code, "undelivered login code");
            return Ok(());
        };

        let body = login_code_message(&issued.code, self.otp.ttl_secs);
        notifier.send_text(&issued.phone, &body).map_err(|e| {
            warn!(phone = %issued.phone, error = %e, "login code delivery failed");
            ServerError::InternalError
        })
    }
}
