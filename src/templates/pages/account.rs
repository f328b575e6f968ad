use crate::db::users::UserProfile;
use crate::templates::desktop_layout;
use maud::{html, Markup};

pub fn account_page(profile: &UserProfile) -> Markup {
    desktop_layout(
        "Account",
        true,
        html! {
            main class="container narrow" {
                h1 { "Account" }
                p { "Signed in as " strong { (profile.display_name()) } }

                form method="post" action="/account" class="card" {
                    label for="first_name" { "First name" }
                    input type="text" id="first_name" name="first_name"
                        value=(profile.first_name.as_deref().unwrap_or(""));

                    label for="last_name" { "Last name" }
                    input type="text" id="last_name" name="last_name"
                        value=(profile.last_name.as_deref().unwrap_or(""));

                    p class="microcopy" { "Phone: +" (profile.phone) }
                    button type="submit" class="primary" { "Save" }
                }
            }
        },
    )
}
