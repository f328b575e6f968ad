use maud::{html, Markup, DOCTYPE};

pub fn desktop_layout(title: &str, signed_in: bool, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " · Stays" }
                link rel="icon" href="/static/favicon/favicon.ico";
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx.js" defer {};
            }
            body {
              header class="flex items-center justify-between px-6 py-3 shadow" {
                  a href="/" class="brand" { span class="brand-mark" { "◐" } }
                  h3 { "Stays" }
                  nav {
                      ul {
                          li { a href="/" { "Home" } }
                          @if signed_in {
                              li { a href="/bookings" { "My bookings" } }
                              li { a href="/account" { "Account" } }
                          }
                      }
                  }

                  @if signed_in {
                      form method="post" action="/auth/logout" class="inline" {
                          button type="submit" class="text-base font-medium" { "Log out" }
                      }
                  } @else {
                      a href="/login" class="text-base font-medium hover:text-blue-600" { "Login" }
                  }
              }
                (content)
                footer class="px-6 py-4 text-sm" {
                    "Questions about a stay? Reply to your booking message on WhatsApp."
                }
            }
        }
    }
}
