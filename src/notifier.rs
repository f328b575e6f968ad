// src/notifier.rs

use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// Sends plain text messages through a WhatsApp Cloud API endpoint.
pub struct WhatsAppNotifier {
    api_url: String,
    api_token: String,
    client: Client,
}

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct TextPayload<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

impl<'a> TextPayload<'a> {
    fn new(to: &'a str, body: &'a str) -> Self {
        Self {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        }
    }
}

/// Body of the login code message.
pub fn login_code_message(code: &str, ttl_secs: i64) -> String {
    let minutes = (ttl_secs / 60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("{code} is your login code. It expires in {minutes} {unit}. Do not share it with anyone.")
}

impl WhatsAppNotifier {
    pub fn new(api_url: String, api_token: String) -> Self {
        Self {
            api_url,
            api_token,
            client: Client::new(),
        }
    }

    /// Only built when both the endpoint and the token are configured.
    pub fn from_config(cfg: &AppConfig) -> Option<Self> {
        match (&cfg.whatsapp_api_url, &cfg.whatsapp_api_token) {
            (Some(url), Some(token)) => Some(Self::new(url.clone(), token.clone())),
            _ => None,
        }
    }

    pub fn send_text(&self, to_phone: &str, body: &str) -> Result<(), NotifierError> {
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&TextPayload::new(to_phone, body))
            .send()
            .map_err(|e| NotifierError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(NotifierError::ApiError(format!(
                "send failed with {status}: {error_body}"
            )));
        }

        info!(to = to_phone, "whatsapp message sent");
        Ok(())
    }
}
