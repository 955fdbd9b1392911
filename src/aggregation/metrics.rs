//! The aggregation engine's single entry point.
//!
//! [aggregate] filters the dataset once, runs every reducer over the subset,
//! and packs the results into a [MetricsResult]. It is a pure function of
//! its inputs: calling it twice with the same records and filters yields an
//! identical result.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
    classify::{CountPolicy, ReturnConvention},
    comparison::{Comparison, select_comparison},
    filter::FilterState,
    record::{TransactionRecord, UNKNOWN_LABEL},
};

use super::{
    daily::{TopDay, aggregate_by_day, top_day_by_sales, top_day_by_transactions},
    payment::{PaymentMethods, aggregate_payment_methods},
    ranking::{EntityStats, rank_locations, rank_pharmacists},
    series::{MonthlySeries, monthly_series},
    summary::summarize,
};

/// How many pharmacists the ranking table shows.
pub const TOP_PHARMACISTS_TABLE: usize = 10;
/// How many pharmacists the ranking chart shows.
pub const TOP_PHARMACISTS_CHART: usize = 5;
/// How many locations the revenue-by-location table shows.
pub const TOP_LOCATIONS: usize = 8;

/// Engine configuration: which return convention the data uses and how the
/// flat summary counts transactions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// How returns are encoded in the dataset.
    pub convention: ReturnConvention,
    /// How `total_transactions` combines sales and returns.
    pub count_policy: CountPolicy,
}

/// Everything the dashboard displays for one filter state.
///
/// Every field is present with zero/empty defaults when the filtered subset
/// is empty; aggregation never fails on data shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    /// Net revenue over the filtered subset.
    pub total_revenue: f64,
    /// Transaction count per the configured [CountPolicy].
    pub total_transactions: i64,
    /// Gross sales divided by sale-transaction count.
    pub average_order_value: f64,
    /// Net revenue divided by the number of distinct days.
    pub average_daily_revenue: f64,
    /// Number of distinct calendar days present.
    pub unique_days: usize,
    /// Distinct pharmacists (excluding "Unknown").
    pub active_pharmacists: usize,
    /// Distinct locations (excluding "Unknown").
    pub unique_locations: usize,
    /// Pharmacists ranked by net revenue, top ten.
    pub top_pharmacists: Vec<EntityStats>,
    /// Trend chart data; shape depends on the year/month filters.
    pub monthly_series: MonthlySeries,
    /// Locations ranked by net revenue, top eight.
    pub revenue_by_location: Vec<EntityStats>,
    /// Cash/credit revenue split.
    pub payment_methods: PaymentMethods,
    /// The comparison table the filter combination calls for, if any.
    pub comparison: Option<Comparison>,
    /// The day with the highest net revenue.
    pub top_day_sales: TopDay,
    /// The day with the most transactions.
    pub top_day_transactions: TopDay,
    /// Gross sales over the filtered subset.
    pub gross_sales: f64,
    /// Return magnitude over the filtered subset.
    pub total_returns: f64,
    /// Number of sale transactions.
    pub sales_transaction_count: usize,
    /// Number of return transactions.
    pub return_transaction_count: usize,
    /// Net revenue as a percentage of gross sales.
    pub net_sales_rate: f64,
}

/// Runs the full aggregation for `filters` over `records`.
///
/// The comparison selector re-slices `records` independently per comparison
/// axis, so this takes the whole dataset rather than a pre-filtered subset.
pub fn aggregate(
    records: &[TransactionRecord],
    filters: &FilterState,
    options: EngineOptions,
) -> MetricsResult {
    let filtered = filters.apply(records);

    let summary = summarize(&filtered, options.convention, options.count_policy);

    let days = aggregate_by_day(&filtered, options.convention);
    let unique_days = days.len();
    let average_daily_revenue = if unique_days > 0 {
        summary.total_revenue / unique_days as f64
    } else {
        0.0
    };

    let mut top_pharmacists = rank_pharmacists(&filtered, options.convention);
    top_pharmacists.truncate(TOP_PHARMACISTS_TABLE);

    let mut revenue_by_location = rank_locations(&filtered, options.convention);
    revenue_by_location.truncate(TOP_LOCATIONS);

    MetricsResult {
        total_revenue: summary.total_revenue,
        total_transactions: summary.total_transactions,
        average_order_value: summary.average_order_value,
        average_daily_revenue,
        unique_days,
        active_pharmacists: count_distinct(&filtered, |record| &record.pharmacist),
        unique_locations: count_distinct(&filtered, |record| &record.location),
        top_pharmacists,
        monthly_series: monthly_series(&filtered, filters, options.convention),
        revenue_by_location,
        payment_methods: aggregate_payment_methods(&filtered, options.convention),
        comparison: select_comparison(records, filters, options.convention),
        top_day_sales: top_day_by_sales(&days),
        top_day_transactions: top_day_by_transactions(&days),
        gross_sales: summary.gross_sales,
        total_returns: summary.total_returns,
        sales_transaction_count: summary.sales_transactions,
        return_transaction_count: summary.return_transactions,
        net_sales_rate: summary.net_sales_rate,
    }
}

fn count_distinct<'a>(
    records: &[&'a TransactionRecord],
    key: impl Fn(&'a TransactionRecord) -> &'a str,
) -> usize {
    records
        .iter()
        .map(|record| key(record))
        .filter(|name| *name != UNKNOWN_LABEL)
        .collect::<HashSet<_>>()
        .len()
}
