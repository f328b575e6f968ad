// src/messages/encode.rs

use unicode_normalization::UnicodeNormalization;

/// Emoji that some WhatsApp clients mangle in prefilled text, and what to
/// send instead. Applied in order.
pub const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("\u{1F4C5}", "\u{2022}"),         // 📅 -> •
    ("\u{1F4B0}", "\u{20B9}"),         // 💰 -> ₹
    ("\u{1F465}", "Guests:"),          // 👥
    ("\u{1F3D6}\u{FE0F}", ""),         // 🏖️
    ("\u{2714}\u{FE0F}", ""),          // ✔️
];

/// Apply the substitution table without percent-encoding.
pub fn substitute_symbols(text: &str) -> String {
    let normalized: String = text.trim_start().nfc().collect();
    SUBSTITUTIONS
        .iter()
        .fold(normalized, |acc, (from, to)| acc.replace(from, to))
}

/// Prepare message text for the `text=` parameter of a messaging deep link.
pub fn encode_for_messaging_link(text: Option<&str>) -> String {
    match text {
        None | Some("") => String::new(),
        Some(text) => urlencoding::encode(&substitute_symbols(text)).into_owned(),
    }
}
