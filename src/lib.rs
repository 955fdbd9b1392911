//! Pharmalytics is a web app for exploring pharmacy sales performance.
//!
//! It loads a flat CSV of sales transactions into memory and serves
//! server-rendered pages with filterable revenue metrics, trend charts,
//! ranking tables, and period comparisons, plus a small JSON API. All
//! metrics are derived by a pure aggregation engine that recomputes from
//! the full record array whenever the filters change.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod api;
mod app_state;
mod classify;
mod comparison;
mod dashboard;
mod dataset;
mod endpoints;
mod filter;
mod html;
mod ingest;
mod internal_server_error;
mod navigation;
mod not_found;
mod record;
mod reports;
mod routing;

pub use aggregation::{
    DailyReportRow, DayStats, EngineOptions, EntityStats, MetricsResult, MonthlySeries,
    PaymentMethods, SeriesLine, Summary, TopDay, aggregate,
};
pub use app_state::AppState;
pub use classify::{Classification, CountPolicy, ReturnConvention};
pub use comparison::{
    CompareDimension, Comparison, EntitySeries, PeriodRow, PharmacistGrowthRow,
    YearPairComparison, compare_pharmacists_between_years, growth_rate, select_comparison,
};
pub use dataset::{Dataset, FilterOptions};
pub use filter::{FilterState, Selection};
pub use ingest::{load_records_from_path, parse_records};
pub use record::{Quarter, TransactionRecord};
pub use routing::build_router;

use crate::{
    internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Aggregation itself never fails on data shape: malformed rows are dropped
/// at ingestion and empty subsets produce zero-valued defaults. These
/// variants cover the load path and the web layer.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The sales CSV could not be read or parsed at all.
    #[error("could not parse the sales CSV: {0}")]
    InvalidCsv(String),

    /// The sales CSV is missing a column the dashboard cannot work without.
    #[error("the sales CSV is missing the required column {0}")]
    MissingColumn(String),

    /// Could not acquire the dataset lock.
    #[error("could not acquire the dataset lock")]
    DatasetLockError,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidCsv(reason) => render_internal_server_error(
                "Could Not Load Sales Data",
                &format!("The sales CSV could not be parsed: {reason}"),
            ),
            Error::MissingColumn(column) => render_internal_server_error(
                "Could Not Load Sales Data",
                &format!(
                    "The sales CSV is missing the required column \"{column}\". \
                    Check that the export includes the standard headers."
                ),
            ),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(
                    "Something Went Wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
            }
        }
    }
}

impl Error {
    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
