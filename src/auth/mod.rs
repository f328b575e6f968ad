pub mod otp;
pub mod sessions;
pub mod token;
