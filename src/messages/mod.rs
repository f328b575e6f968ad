pub mod encode;
pub mod format;
pub mod templates;
pub mod whatsapp;

pub use encode::encode_for_messaging_link;
pub use templates::{build_booking_reminder_message, build_cancellation_message};
pub use whatsapp::{normalize_phone, whatsapp_link};
