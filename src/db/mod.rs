pub mod auth;
pub mod bookings;
pub mod connection;
pub mod otp_auth;
pub mod users;

pub use connection::{init_db, Database};
