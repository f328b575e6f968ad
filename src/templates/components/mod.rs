use maud::{html, Markup};

use crate::domain::booking::Booking;
use crate::domain::permissions::BookingFacets;
use crate::messages::format::{format_indian_amount, format_long_date, DateLocale};

pub mod phone_form;

pub use phone_form::{code_form, phone_form};

pub fn card(title: &str, body: Markup) -> Markup {
    html! {
        div class="card" {
            h2 { (title) }
            div class="card-body" {
                (body)
            }
        }
    }
}

pub fn facet_badge(facets: &BookingFacets) -> Markup {
    let class = if facets.is_cancelled {
        "badge badge-cancelled"
    } else if facets.is_completed {
        "badge badge-completed"
    } else if facets.is_paid {
        "badge badge-paid"
    } else {
        "badge badge-pending"
    };
    html! {
        span class=(class) { (facets.label()) }
    }
}

pub fn stay_dates(booking: &Booking) -> Markup {
    let date = |raw: Option<&str>| {
        raw.and_then(|r| format_long_date(r, DateLocale::India))
            .unwrap_or_else(|| "-".to_string())
    };
    html! {
        span class="stay-dates" {
            (date(booking.check_in.as_deref())) " → " (date(booking.check_out.as_deref()))
        }
    }
}

/// One row of the bookings list. Actions only render when the facets allow them.
pub fn booking_card(id: i64, booking: &Booking, facets: &BookingFacets) -> Markup {
    html! {
        article class="card booking" id=(format!("booking-{id}")) {
            header {
                h3 { a href=(format!("/bookings/{id}")) { (booking.property_name().unwrap_or("Property")) } }
                (facet_badge(facets))
            }
            p { (stay_dates(booking)) }
            p { (booking.guest_count()) " guests · ₹" (format_indian_amount(booking.amount())) }
            ul class="actions" {
                @if facets.can_view_invoice {
                    li { a href=(format!("/bookings/{id}/invoice")) { "View invoice" } }
                }
                @if facets.can_rate {
                    li { a href=(format!("/bookings/{id}#rate")) { "Rate your stay" } }
                }
            }
        }
    }
}
