//! Metric cards for the dashboard overview.

use maud::{Markup, html};

use crate::{
    aggregation::MetricsResult,
    html::{CARD_STYLE, format_count, format_count_compact, format_currency_compact},
};

/// Renders the grid of headline metric cards.
pub fn metric_cards_view(metrics: &MetricsResult, filter_summary: &str) -> Markup {
    let returns_share = if metrics.gross_sales > 0.0 {
        metrics.total_returns / metrics.gross_sales * 100.0
    } else {
        0.0
    };

    html! {
        section class="w-full mx-auto mb-6"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (card(
                    "Total Revenue",
                    &format_currency_compact(metrics.total_revenue),
                    filter_summary,
                ))

                (card(
                    "Total Transactions",
                    &format_count_compact(metrics.total_transactions),
                    filter_summary,
                ))

                (card(
                    "Average Order Value",
                    &format_currency_compact(metrics.average_order_value),
                    filter_summary,
                ))

                (card(
                    "Average Daily Revenue",
                    &format_currency_compact(metrics.average_daily_revenue),
                    &format!("{} active days", metrics.unique_days),
                ))

                (card(
                    "Top Day Sales",
                    &format_currency_compact(metrics.top_day_sales.value),
                    &format!(
                        "{}, {}",
                        metrics.top_day_sales.day_name, metrics.top_day_sales.date_label
                    ),
                ))

                (card(
                    "Top Day Transactions",
                    &format_count_compact(metrics.top_day_transactions.value as i64),
                    &format!(
                        "{}, {}",
                        metrics.top_day_transactions.day_name,
                        metrics.top_day_transactions.date_label
                    ),
                ))

                (card(
                    "Returns Summary",
                    &format_currency_compact(metrics.total_returns),
                    &format!(
                        "{} returns ({:.1}%)",
                        format_count(metrics.return_transaction_count as i64),
                        returns_share
                    ),
                ))

                (card(
                    "Active Pharmacists",
                    &format_count(metrics.active_pharmacists as i64),
                    filter_summary,
                ))
            }
        }
    }
}

fn card(title: &str, value: &str, note: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-sm font-semibold text-gray-600 dark:text-gray-400 mb-2" { (title) }
            div class="text-3xl font-bold mb-1" { (value) }
            div class="text-sm text-gray-600 dark:text-gray-400" { (note) }
        }
    }
}
