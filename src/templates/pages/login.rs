use crate::templates::{desktop_layout, phone_form};
use maud::{html, Markup};

pub fn login_page() -> Markup {
    desktop_layout(
        "Sign in",
        false,
        html! {
            main class="container narrow" {
                h1 { "Sign in" }
                p class="lead" {
                    "Enter your mobile number and we’ll send you a one-time code."
                }

                (phone_form())
            }
        },
    )
}
