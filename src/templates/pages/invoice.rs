use crate::domain::booking::Booking;
use crate::messages::format::{format_indian_amount, format_long_date, DateLocale};
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub struct InvoiceVm {
    pub id: i64,
    pub booking: Booking,
    pub billed_to: String,
}

pub fn invoice_page(vm: &InvoiceVm) -> Markup {
    let booking = &vm.booking;
    let date = |raw: Option<&str>| {
        raw.and_then(|r| format_long_date(r, DateLocale::India))
            .unwrap_or_else(|| "-".to_string())
    };
    let number = booking
        .id
        .clone()
        .unwrap_or_else(|| format!("BK-{:06}", vm.id));

    desktop_layout(
        "Invoice",
        true,
        html! {
            main class="container invoice" {
                h1 { "Invoice " (number) }
                p { "Billed to " strong { (vm.billed_to) } }

                table {
                    tbody {
                        tr { th { "Property" } td { (booking.property_name().unwrap_or("-")) } }
                        tr { th { "Check-in" } td { (date(booking.check_in.as_deref())) } }
                        tr { th { "Check-out" } td { (date(booking.check_out.as_deref())) } }
                        tr { th { "Guests" } td { (booking.guest_count()) } }
                        @if let Some(payment_id) = &booking.payment_id {
                            tr { th { "Payment reference" } td { (payment_id) } }
                        }
                        tr class="total" { th { "Amount paid" } td { "₹" (format_indian_amount(booking.amount())) } }
                    }
                }

                button type="button" onclick="window.print()" { "Print" }
            }
        },
    )
}
