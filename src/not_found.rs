//! The 404 page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{endpoints, html::base};

/// Fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Builds the 404 response directly, for use from error conversions.
pub fn get_404_not_found_response() -> Response {
    let content = html! {
        div class="flex flex-col items-center px-6 py-16 mx-auto text-center text-gray-900 dark:text-white"
        {
            h1 class="mb-4 text-7xl font-extrabold text-blue-600 dark:text-blue-500" { "404" }
            p class="mb-4 text-xl" { "That page does not exist." }
            a
                href=(endpoints::DASHBOARD_VIEW)
                class="text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400 underline"
            {
                "Back to the dashboard"
            }
        }
    };

    (StatusCode::NOT_FOUND, base("Not Found", &[], &content)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::get_404_not_found;

    #[tokio::test]
    async fn responds_with_not_found_status() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
