// src/messages/templates.rs

use crate::domain::booking::Booking;
use crate::messages::format::{format_indian_amount, format_long_date, DateLocale};

const MISSING_DATE: &str = "-";

fn date_or_dash(raw: Option<&str>, locale: DateLocale) -> String {
    raw.and_then(|r| format_long_date(r, locale))
        .unwrap_or_else(|| MISSING_DATE.to_string())
}

/// Booking confirmation sent to the guest ahead of the stay.
pub fn build_booking_reminder_message(booking: &Booking) -> String {
    let property = booking.property_name().unwrap_or("our resort");
    let check_in = date_or_dash(booking.check_in.as_deref(), DateLocale::India);
    let check_out = date_or_dash(booking.check_out.as_deref(), DateLocale::India);
    let guests = booking.guest_count();
    let amount = format_indian_amount(booking.amount());

    let message = format!(
        r#"
🏖️ Booking Confirmed!

Thank you for choosing {property}. We are delighted to host you.

📅 Check-in: {check_in}
📅 Check-out: {check_out}
👥 {guests}
💰 Total Amount: ₹{amount}

✔️ Please carry a valid photo ID for every guest at check-in.

We look forward to welcoming you!
"#
    );

    message.trim().to_string()
}

/// Notice sent after a booking has been cancelled.
pub fn build_cancellation_message(booking: &Booking) -> String {
    let first = booking.guest_first_name().unwrap_or("");
    let last = booking.guest_last_name().unwrap_or("");
    let full_name = format!("{first} {last}");
    let full_name = match full_name.trim() {
        "" => "Guest",
        name => name,
    };
    let property = booking.property_name().unwrap_or("our property");
    let check_in = date_or_dash(booking.check_in.as_deref(), DateLocale::British);
    let check_out = date_or_dash(booking.check_out.as_deref(), DateLocale::British);

    let message = format!(
        r#"
Dear {full_name},

Your booking at {property} for the stay from {check_in} to {check_out} has been cancelled.

If a refund applies, it will be credited to your original payment method within 5-7 business days.

We hope to host you another time.
"#
    );

    message.trim().to_string()
}
