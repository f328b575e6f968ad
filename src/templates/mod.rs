pub mod components;
pub mod layouts;
pub mod pages;

// Re-exports for convenience
pub use components::{booking_card, card, facet_badge, phone_form};
pub use layouts::desktop::desktop_layout;
