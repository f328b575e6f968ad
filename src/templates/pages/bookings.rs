use crate::domain::booking::Booking;
use crate::domain::permissions::BookingFacets;
use crate::templates::{booking_card, desktop_layout};
use maud::{html, Markup};

pub struct BookingRow {
    pub id: i64,
    pub booking: Booking,
    pub facets: BookingFacets,
}

pub fn bookings_page(rows: &[BookingRow]) -> Markup {
    desktop_layout(
        "My bookings",
        true,
        html! {
            main class="container" {
                h1 { "My bookings" }

                @if rows.is_empty() {
                    p class="empty" { "You have no bookings yet." }
                } @else {
                    section class="booking-list" {
                        @for row in rows {
                            (booking_card(row.id, &row.booking, &row.facets))
                        }
                    }
                }
            }
        },
    )
}
