//! The page displayed for an internal server error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::html::base;

/// Renders a 500 page with a `description` headline and a suggested `fix`.
pub fn render_internal_server_error(description: &str, fix: &str) -> Response {
    let content = html! {
        div class="flex flex-col items-center px-6 py-16 mx-auto text-center text-gray-900 dark:text-white"
        {
            h1 class="mb-4 text-7xl font-extrabold text-blue-600 dark:text-blue-500" { "500" }
            h2 class="mb-4 text-2xl font-bold" { (description) }
            p class="text-gray-700 dark:text-gray-300" { (fix) }
        }
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        base("Internal Server Error", &[], &content),
    )
        .into_response()
}
