pub mod booking;
pub mod permissions;
