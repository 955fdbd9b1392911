//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    api::{get_health, get_metrics, get_sales_data, post_refresh},
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    reports::get_reports_page,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::ROOT,
            get(|| async { Redirect::to(endpoints::DASHBOARD_VIEW) }),
        )
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::SALES_DATA_API, get(get_sales_data))
        .route(endpoints::METRICS_API, get(get_metrics))
        .route(endpoints::HEALTH_API, get(get_health))
        .route(endpoints::REFRESH_API, post(post_refresh))
        .fallback(get_404_not_found)
        .with_state(state)
}
