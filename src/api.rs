//! The JSON API: raw records, computed metrics, health, and data refresh.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    aggregation::aggregate,
    filter::{FilterState, Selection},
    ingest::load_records_from_path,
    record::TransactionRecord,
};

/// Filter parameters accepted by the metrics endpoint, as repeated keys.
#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    /// Selected years.
    #[serde(default)]
    pub year: Vec<String>,
    /// Selected quarters, e.g. `Q1-2024`.
    #[serde(default)]
    pub quarter: Vec<String>,
    /// Selected months, 1 through 12.
    #[serde(default)]
    pub month: Vec<String>,
    /// Selected locations.
    #[serde(default)]
    pub location: Vec<String>,
    /// Selected pharmacist grouping keys.
    #[serde(default)]
    pub pharmacist: Vec<String>,
    /// Selected days of the month.
    #[serde(default)]
    pub day: Vec<String>,
}

impl MetricsQuery {
    fn into_filter_state(self) -> FilterState {
        FilterState {
            years: Selection::from_params(&self.year),
            quarters: Selection::from_params(&self.quarter),
            months: Selection::from_params(&self.month),
            locations: Selection::from_params(&self.location),
            pharmacists: Selection::from_params(&self.pharmacist),
            days: Selection::from_params(&self.day),
        }
    }
}

/// Returns the canonical record array as JSON.
pub async fn get_sales_data(State(state): State<AppState>) -> Response {
    let dataset = match state.read_dataset() {
        Ok(dataset) => dataset,
        Err(error) => return json_error(error),
    };

    let records: Vec<TransactionRecord> = dataset.records().to_vec();
    Json(records).into_response()
}

/// Computes and returns the metrics for the supplied filters.
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Response {
    let dataset = match state.read_dataset() {
        Ok(dataset) => dataset,
        Err(error) => return json_error(error),
    };

    let filters = query.into_filter_state();
    let metrics = aggregate(dataset.records(), &filters, state.engine_options);

    Json(metrics).into_response()
}

/// Liveness check with the current dataset size and version.
pub async fn get_health(State(state): State<AppState>) -> Response {
    let dataset = match state.read_dataset() {
        Ok(dataset) => dataset,
        Err(error) => return json_error(error),
    };

    Json(json!({
        "status": "healthy",
        "records": dataset.records().len(),
        "datasetVersion": dataset.version(),
    }))
    .into_response()
}

/// Reloads the sales CSV from disk and swaps the dataset wholesale.
pub async fn post_refresh(State(state): State<AppState>) -> Response {
    let records = match load_records_from_path(&state.csv_path) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!("refresh failed: {error}");
            return json_error(error);
        }
    };

    let mut dataset = match state.dataset.write() {
        Ok(dataset) => dataset,
        Err(error) => {
            tracing::error!("could not acquire dataset lock: {error}");
            return json_error(Error::DatasetLockError);
        }
    };

    dataset.replace(records);
    tracing::info!(
        "dataset refreshed: {} records, version {}",
        dataset.records().len(),
        dataset.version()
    );

    Json(json!({
        "records": dataset.records().len(),
        "datasetVersion": dataset.version(),
    }))
    .into_response()
}

fn json_error(error: Error) -> Response {
    (
        error.status_code(),
        Json(json!({ "error": error.to_string() })),
    )
        .into_response()
}
