use maud::{html, Markup};

pub fn phone_form() -> Markup {
    html! {
        div class="phone-cta-wrapper" {
            form
                method="post"
                action="/auth/request-otp"
                hx-post="/auth/request-otp"
                hx-target="#auth-result"
                hx-swap="innerHTML"
                hx-disabled-elt="button"
                class="phone-cta"
            {
                label class="sr-only" for="phone" { "Mobile number" }
                input
                    type="tel"
                    id="phone"
                    name="phone"
                    placeholder="98765 43210"
                    autocomplete="tel"
                    required;

                button type="submit" class="primary" {
                    span class="btn-text" { "Send code" }
                    span class="spinner" aria-hidden="true" {}
                }

                p class="microcopy" {
                    "We’ll send a one-time code to your WhatsApp. No password needed."
                }
            }

            div id="auth-result" {}
        }
    }
}

/// Code entry, swapped in after a code was issued for `phone`.
pub fn code_form(phone: &str) -> Markup {
    html! {
        div class="text-center py-8 px-4 fade-in" {
            h3 class="text-lg leading-6 font-medium text-gray-900" { "Enter your code" }
            p class="text-sm text-gray-500" {
                "We sent a login code to "
                strong class="text-gray-900" { "+" (phone) }
                "."
            }

            form method="post" action="/auth/verify-otp" class="code-entry" {
                input type="hidden" name="phone" value=(phone);
                label class="sr-only" for="code" { "Login code" }
                input
                    type="text"
                    id="code"
                    name="code"
                    inputmode="numeric"
                    autocomplete="one-time-code"
                    pattern="[0-9]*"
                    required;
                button type="submit" class="primary" { "Verify" }
            }

            div class="mt-6" {
                a href="/login" class="text-sm font-medium text-blue-600 hover:text-blue-500" {
                    "Use a different number"
                }
            }
        }
    }
}
