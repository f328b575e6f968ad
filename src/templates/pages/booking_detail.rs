use crate::domain::booking::Booking;
use crate::domain::permissions::BookingFacets;
use crate::geo::Coordinates;
use crate::messages::format::format_indian_amount;
use crate::templates::components::stay_dates;
use crate::templates::{desktop_layout, facet_badge};
use maud::{html, Markup};

pub struct BookingDetailVm {
    pub id: i64,
    pub booking: Booking,
    pub facets: BookingFacets,
    /// Confirmation deep link; only offered for live, paid bookings.
    pub reminder_link: Option<String>,
    /// Cancellation notice deep link; only offered once cancelled.
    pub cancellation_link: Option<String>,
    pub coordinates: Option<Coordinates>,
}

pub fn booking_detail_page(vm: &BookingDetailVm) -> Markup {
    let booking = &vm.booking;
    let title = booking.property_name().unwrap_or("Booking");

    desktop_layout(
        title,
        true,
        html! {
            main class="container" {
                h1 { (title) " " (facet_badge(&vm.facets)) }

                section class="card" {
                    dl {
                        dt { "Stay" } dd { (stay_dates(booking)) }
                        dt { "Guests" } dd { (booking.guest_count()) }
                        dt { "Total" } dd { "₹" (format_indian_amount(booking.amount())) }
                        @if let Some(status) = &booking.status {
                            dt { "Status" } dd { (status) }
                        }
                    }
                }

                @if let Some(c) = vm.coordinates {
                    section class="card" {
                        h3 { "Location" }
                        a href=(format!("https://www.google.com/maps?q={},{}", c.lat, c.lng)) target="_blank" {
                            (format!("{:.5}, {:.5}", c.lat, c.lng))
                        }
                    }
                }

                section class="card actions" {
                    h3 { "Share" }
                    ul {
                        @if let Some(link) = &vm.reminder_link {
                            li { a href=(link) target="_blank" rel="noopener" { "Send confirmation on WhatsApp" } }
                        }
                        @if let Some(link) = &vm.cancellation_link {
                            li { a href=(link) target="_blank" rel="noopener" { "Send cancellation notice on WhatsApp" } }
                        }
                        @if vm.facets.can_view_invoice {
                            li { a href=(format!("/bookings/{}/invoice", vm.id)) { "View invoice" } }
                        }
                    }
                }

                @if vm.facets.can_rate {
                    section class="card" id="rate" {
                        h3 { "How was your stay?" }
                        p { "Your feedback helps other travellers." }
                    }
                }
            }
        },
    )
}
