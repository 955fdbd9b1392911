//! The navigation bar shown on every page.

use maud::{Markup, html};

use crate::endpoints;

const NAV_LINK_STYLE: &str = "px-3 py-2 rounded text-sm font-medium \
    text-gray-700 dark:text-gray-300 hover:bg-gray-100 dark:hover:bg-gray-700";

const NAV_LINK_ACTIVE_STYLE: &str = "px-3 py-2 rounded text-sm font-medium \
    bg-blue-100 text-blue-700 dark:bg-blue-900 dark:text-blue-300";

/// Renders the navigation bar, highlighting `current_route`.
pub fn nav_bar(current_route: &str) -> Markup {
    let links = [
        (endpoints::DASHBOARD_VIEW, "Dashboard"),
        (endpoints::REPORTS_VIEW, "Reports"),
    ];

    html! {
        nav class="w-full bg-white dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700 mb-4"
        {
            div class="max-w-screen-xl mx-auto px-4 py-3 flex items-center gap-4"
            {
                span class="text-lg font-bold text-gray-900 dark:text-white" { "Pharmalytics" }

                @for (route, label) in links {
                    a
                        href=(route)
                        class=(if *route == *current_route { NAV_LINK_ACTIVE_STYLE } else { NAV_LINK_STYLE })
                    {
                        (label)
                    }
                }
            }
        }
    }
}
