pub mod account;
pub mod booking_detail;
pub mod bookings;
pub mod error;
pub mod home;
pub mod invoice;
pub mod login;

pub use account::account_page;
pub use booking_detail::{booking_detail_page, BookingDetailVm};
pub use bookings::{bookings_page, BookingRow};
pub use error::error_page;
pub use home::home_page;
pub use invoice::{invoice_page, InvoiceVm};
pub use login::login_page;
