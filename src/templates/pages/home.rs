// templates/pages/home.rs

use crate::templates::{card, desktop_layout};
use maud::{html, Markup};

pub fn home_page(signed_in: bool) -> Markup {
    desktop_layout(
        "Home",
        signed_in,
        html! {
            main class="container" {
                h1 { "Your stays, in one place" }

                @if signed_in {
                    a class="btn primary" href="/bookings" { "View my bookings" }
                } @else {
                    a class="btn primary" href="/login" { "Sign in with your phone" }
                }

                (card("Booking updates on WhatsApp", html! {
                    p { "Send your confirmation or cancellation details to any chat with one tap." }
                }))
            }
        },
    )
}
