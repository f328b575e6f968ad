// src/messages/whatsapp.rs

use url::Url;

use crate::errors::ServerError;
use crate::messages::encode::encode_for_messaging_link;

pub const DEFAULT_WHATSAPP_BASE: &str = "https://wa.me";

/// Reduce a phone number to the digits-only international form wa.me expects.
/// Ten-digit local numbers (optionally with a leading trunk `0`) get the
/// default country code.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Result<String, ServerError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    let normalized = match digits.len() {
        10 => format!("{default_country_code}{digits}"),
        11 if digits.starts_with('0') => format!("{default_country_code}{}", &digits[1..]),
        11..=15 => digits,
        _ => return Err(ServerError::BadRequest("invalid phone number".into())),
    };

    Ok(normalized)
}

/// Build a chat deep link prefilled with `text`. Without a phone the link
/// opens the share picker instead of a specific chat.
pub fn whatsapp_link(base: &str, phone: Option<&str>, text: &str) -> Result<String, ServerError> {
    let base = Url::parse(base)
        .map_err(|e| ServerError::BadRequest(format!("invalid messaging base url: {e}")))?;
    let root = base.as_str().trim_end_matches('/');
    let encoded = encode_for_messaging_link(Some(text));

    Ok(match phone {
        Some(phone) => format!("{root}/{phone}?text={encoded}"),
        None => format!("{root}/?text={encoded}"),
    })
}
