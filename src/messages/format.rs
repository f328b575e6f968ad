// src/messages/format.rs

use crate::domain::booking::parse_instant;

/// Locale used for long-form dates in outgoing messages.
///
/// Both currently render `DD Month YYYY`; they stay separate so the two
/// templates can diverge without touching each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLocale {
    India,
    British,
}

/// Format a booking date as e.g. `10 January 2025`.
/// Returns `None` when the input is not a date we understand.
pub fn format_long_date(raw: &str, locale: DateLocale) -> Option<String> {
    let instant = parse_instant(raw)?;
    let pattern = match locale {
        DateLocale::India => "%d %B %Y",
        DateLocale::British => "%d %B %Y",
    };
    Some(instant.date_naive().format(pattern).to_string())
}

/// Indian digit grouping: the last three digits, then pairs (`12,34,567`).
/// At most two fraction digits are kept (rupees and paise), without
/// trailing zeros.
pub fn format_indian_amount(amount: f64) -> String {
    if !amount.is_finite() {
        return "0".to_string();
    }

    // Work on the decimal text so amounts past u64 keep every digit.
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let is_zero = whole.bytes().all(|b| b == b'0') && fraction.is_empty();

    let mut out = String::new();
    if amount < 0.0 && !is_zero {
        out.push('-');
    }
    out.push_str(&group_indian(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
