//! The reports page: the daily sales table and the pharmacist performance
//! report with its comparison tables.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::{DailyReportRow, EntityStats, daily_report, rank_pharmacists},
    comparison::{Comparison, EntitySeries, PeriodRow, select_comparison},
    dataset::FilterOptions,
    endpoints,
    filter::{FilterState, Selection},
    html::{
        AMOUNT_NEGATIVE_STYLE, CARD_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        amount_color_class, base, format_count, format_number, growth_rate_cell,
    },
    navigation::nav_bar,
    record::Quarter,
};

/// Multi-select filter values from the reports page's query string.
#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
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

impl ReportsQuery {
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

/// Display the reports page for the filters in the query string.
pub async fn get_reports_page(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> Result<Response, Error> {
    let dataset = state.read_dataset()?;
    let records = dataset.records();
    let convention = state.engine_options.convention;

    let filters = query.into_filter_state();
    let filtered = filters.apply(records);

    let daily_rows = daily_report(&filtered, convention);
    let rankings = rank_pharmacists(&filtered, convention);
    let comparison = select_comparison(records, &filters, convention);

    let options = dataset.filter_options();

    Ok(reports_view(&daily_rows, &rankings, comparison.as_ref(), &filters, &options).into_response())
}

fn reports_view(
    daily_rows: &[DailyReportRow],
    rankings: &[EntityStats],
    comparison: Option<&Comparison>,
    filters: &FilterState,
    options: &FilterOptions,
) -> Markup {
    let content = html!(
        (nav_bar(endpoints::REPORTS_VIEW))

        div class="flex flex-col items-center px-2 lg:px-6 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
        {
            (filter_form(filters, options))

            @if let Some(comparison) = comparison {
                (comparison_view(comparison))
            }

            (daily_report_table(daily_rows))

            (pharmacist_rankings_table(rankings))
        }
    );

    base("Reports", &[], &content)
}

/// Renders whichever comparison tables the filter combination called for.
fn comparison_view(comparison: &Comparison) -> Markup {
    match comparison {
        Comparison::EntitySeries(series) => entity_series_view(series),
        Comparison::YearOverYear { rows } => {
            period_table("Year Comparison", "Year", rows)
        }
        Comparison::FilterValues { dimension, rows } => period_table(
            &format!("{} Comparison", dimension.label()),
            dimension.label(),
            rows,
        ),
    }
}

fn entity_series_view(series: &EntitySeries) -> Markup {
    html!(
        @if !series.yearly.is_empty() {
            (period_table(
                &format!("Year Comparison ({})", series.entity),
                "Year",
                &series.yearly,
            ))
        }
        @if !series.quarterly.is_empty() {
            (period_table(
                &format!("Quarter Comparison ({})", series.entity),
                "Quarter",
                &series.quarterly,
            ))
        }
        @if !series.monthly.is_empty() {
            (period_table(
                &format!("Month Comparison ({})", series.entity),
                "Month",
                &series.monthly,
            ))
        }
    )
}

/// A comparison table of net revenue, net transactions, and growth per row.
fn period_table(title: &str, label_header: &str, rows: &[PeriodRow]) -> Markup {
    // Purely categorical rows (pharmacists, locations) carry no growth
    // rates at all; leave the column out for them.
    let show_growth = rows.iter().any(|row| row.growth_rate.is_some());

    html!(
        div class=(format!("{CARD_STYLE} w-full mb-6"))
        {
            h3 class="text-xl font-semibold mb-4" { (title) }

            table class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { (label_header) }
                        th class=(TABLE_CELL_STYLE) { "Net Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Net Trans" }
                        @if show_growth {
                            th class=(TABLE_CELL_STYLE) { "Growth Rate %" }
                        }
                    }
                }
                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(format!("{TABLE_CELL_STYLE} font-semibold")) { (row.label) }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_color_class(row.net_revenue)))
                            {
                                (format_number(row.net_revenue))
                            }
                            td class=(TABLE_CELL_STYLE) { (format_count(row.net_transactions)) }
                            @if show_growth {
                                td class=(TABLE_CELL_STYLE) { (growth_rate_cell(row.growth_rate)) }
                            }
                        }
                    }
                }
            }
        }
    )
}

/// The daily sales and transactions table with a totals row.
fn daily_report_table(rows: &[DailyReportRow]) -> Markup {
    let total_gross: f64 = rows.iter().map(|row| row.gross_sales).sum();
    let total_gross_transactions: usize = rows.iter().map(|row| row.gross_transactions).sum();
    let total_returns: f64 = rows.iter().map(|row| row.returns_value).sum();
    let total_returns_count: usize = rows.iter().map(|row| row.returns_count).sum();
    let total_net: f64 = rows.iter().map(|row| row.net_revenue).sum();
    let total_net_transactions: i64 = rows.iter().map(|row| row.net_transactions).sum();

    html!(
        div class=(format!("{CARD_STYLE} w-full mb-6"))
        {
            h3 class="text-xl font-semibold mb-4" { "Daily Sales and Transactions" }

            table class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Day" }
                        th class=(TABLE_CELL_STYLE) { "Gross Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Gross Trans" }
                        th class=(TABLE_CELL_STYLE) { "Returns Value" }
                        th class=(TABLE_CELL_STYLE) { "Returns Count" }
                        th class=(TABLE_CELL_STYLE) { "Net Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Net Trans" }
                    }
                }
                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                (row.date.day())
                                " "
                                span class="text-gray-400 text-xs"
                                {
                                    "(" (short_weekday(row.date)) ", " (row.date.month() as u8) "/" (row.date.year()) ")"
                                }
                            }
                            td class=(TABLE_CELL_STYLE) { (format_number(row.gross_sales)) }
                            td class=(TABLE_CELL_STYLE) { (format_count(row.gross_transactions as i64)) }
                            td class=(format!("{TABLE_CELL_STYLE} {AMOUNT_NEGATIVE_STYLE}"))
                            {
                                (format_number(-row.returns_value))
                            }
                            td class=(TABLE_CELL_STYLE) { (format_count(row.returns_count as i64)) }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_color_class(row.net_revenue)))
                            {
                                (format_number(row.net_revenue))
                            }
                            td class=(TABLE_CELL_STYLE) { (format_count(row.net_transactions)) }
                        }
                    }

                    tr class=(format!("{TABLE_ROW_STYLE} font-bold"))
                    {
                        td class=(TABLE_CELL_STYLE) { "Total" }
                        td class=(TABLE_CELL_STYLE) { (format_number(total_gross)) }
                        td class=(TABLE_CELL_STYLE) { (format_count(total_gross_transactions as i64)) }
                        td class=(format!("{TABLE_CELL_STYLE} {AMOUNT_NEGATIVE_STYLE}"))
                        {
                            (format_number(-total_returns))
                        }
                        td class=(TABLE_CELL_STYLE) { (format_count(total_returns_count as i64)) }
                        td class=(TABLE_CELL_STYLE) { (format_number(total_net)) }
                        td class=(TABLE_CELL_STYLE) { (format_count(total_net_transactions)) }
                    }
                }
            }
        }
    )
}

/// The full pharmacist rankings with gross, returns, and net columns.
fn pharmacist_rankings_table(rankings: &[EntityStats]) -> Markup {
    html!(
        div class=(format!("{CARD_STYLE} w-full mb-6"))
        {
            h3 class="text-xl font-semibold mb-1" { "Pharmacist Rankings" }
            div class="text-sm text-gray-600 dark:text-gray-400 mb-4"
            {
                "Performance based on net revenue and transactions"
            }

            table class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Rank" }
                        th class=(TABLE_CELL_STYLE) { "Pharmacist Name" }
                        th class=(TABLE_CELL_STYLE) { "Gross Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Gross Trans" }
                        th class=(TABLE_CELL_STYLE) { "Returns Value" }
                        th class=(TABLE_CELL_STYLE) { "Returns Count" }
                        th class=(TABLE_CELL_STYLE) { "Net Revenue" }
                        th class=(TABLE_CELL_STYLE) { "Net Trans" }
                    }
                }
                tbody
                {
                    @for (index, pharmacist) in rankings.iter().enumerate() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (index + 1) }
                            td class=(format!("{TABLE_CELL_STYLE} font-semibold")) { (pharmacist.name) }
                            td class=(TABLE_CELL_STYLE) { (format_number(pharmacist.gross_revenue)) }
                            td class=(TABLE_CELL_STYLE) { (format_count(pharmacist.gross_transactions as i64)) }
                            td class=(format!("{TABLE_CELL_STYLE} {AMOUNT_NEGATIVE_STYLE}"))
                            {
                                (format_number(-pharmacist.returns_value))
                            }
                            td class=(TABLE_CELL_STYLE) { (format_count(pharmacist.returns_count as i64)) }
                            td class=(format!("{TABLE_CELL_STYLE} {}", amount_color_class(pharmacist.net_revenue)))
                            {
                                (format_number(pharmacist.net_revenue))
                            }
                            td class=(TABLE_CELL_STYLE) { (format_count(pharmacist.net_transactions)) }
                        }
                    }
                }
            }
        }
    )
}

fn short_weekday(date: time::Date) -> String {
    let weekday = date.weekday().to_string();
    weekday[..3].to_owned()
}

/// Renders the six-dimension filter controls as a GET form.
fn filter_form(filters: &FilterState, options: &FilterOptions) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class="w-full bg-gray-50 dark:bg-gray-800 p-4 rounded-lg mb-6 flex flex-wrap gap-4 items-end"
        {
            (select_control("year", "Years", "All Years", &options.years.iter().map(i32::to_string).collect::<Vec<_>>(), &stringify_selection(&filters.years)))
            (select_control("quarter", "Quarters", "All Quarters", &options.quarters.iter().map(Quarter::to_string).collect::<Vec<_>>(), &stringify_selection(&filters.quarters)))
            (select_control("month", "Months", "All Months", &options.months.iter().map(u8::to_string).collect::<Vec<_>>(), &stringify_selection(&filters.months)))
            (select_control("location", "Locations", "All Locations", &options.locations, &stringify_selection(&filters.locations)))
            (select_control("pharmacist", "Pharmacists", "All Pharmacists", &options.pharmacists, &stringify_selection(&filters.pharmacists)))
            (select_control("day", "Days", "All Days", &options.days.iter().map(u8::to_string).collect::<Vec<_>>(), &stringify_selection(&filters.days)))

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 text-white rounded text-sm"
            {
                "Apply Filters"
            }

            a
                href=(endpoints::REPORTS_VIEW)
                class="text-blue-600 hover:text-blue-500 dark:text-blue-500 underline text-sm"
            {
                "Clear Filters"
            }
        }
    )
}

fn stringify_selection<T: ToString>(selection: &Selection<T>) -> Option<Vec<String>> {
    match selection {
        Selection::All => None,
        Selection::Only(values) => Some(values.iter().map(T::to_string).collect()),
    }
}

fn select_control(
    name: &str,
    label: &str,
    all_label: &str,
    values: &[String],
    selected: &Option<Vec<String>>,
) -> Markup {
    html!(
        div
        {
            label class="block mb-1 text-sm font-medium" for=(name) { (label) }
            select multiple name=(name) id=(name) class="rounded border-gray-300 dark:bg-gray-700 text-sm"
            {
                option value="all" selected[selected.is_none()] { (all_label) }
                @for value in values {
                    option
                        value=(value)
                        selected[selected.as_ref().is_some_and(|chosen| chosen.contains(value))]
                    {
                        (value)
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use axum_extra::extract::Query;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        AppState, aggregation::EngineOptions, dataset::Dataset, record::TransactionRecord,
    };

    use super::{ReportsQuery, get_reports_page};

    fn record(
        date: time::Date,
        net_amount: f64,
        location: &str,
        pharmacist: &str,
    ) -> TransactionRecord {
        TransactionRecord {
            date,
            net_amount,
            cash_revenue: net_amount.max(0.0),
            credit_revenue: 0.0,
            location: location.to_owned(),
            pharmacist: pharmacist.to_owned(),
            invoice_number: None,
        }
    }

    fn test_state() -> AppState {
        AppState::new(
            Dataset::new(vec![
                record(date!(2024 - 03 - 05), 100.0, "Main Branch", "Jane Mary"),
                record(date!(2024 - 03 - 05), -20.0, "Main Branch", "Jane Mary"),
                record(date!(2024 - 07 - 01), 80.0, "North Branch", "John Smith"),
                record(date!(2025 - 03 - 09), 150.0, "Main Branch", "Jane Mary"),
            ]),
            EngineOptions::default(),
            "sales.csv".into(),
        )
    }

    async fn page_text(response: Response<Body>) -> String {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        let html = Html::parse_document(&text);
        html.root_element().text().collect()
    }

    #[tokio::test]
    async fn reports_page_shows_daily_and_ranking_tables() {
        let response = get_reports_page(State(test_state()), Query(ReportsQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let text = page_text(response).await;
        assert!(text.contains("Daily Sales and Transactions"));
        assert!(text.contains("Pharmacist Rankings"));
        assert!(text.contains("Jane Mary"));
        assert!(text.contains("Total"));
    }

    #[tokio::test]
    async fn month_filter_across_all_years_adds_the_year_comparison() {
        let query = ReportsQuery {
            month: vec!["3".to_owned()],
            ..ReportsQuery::default()
        };

        let response = get_reports_page(State(test_state()), Query(query))
            .await
            .unwrap();

        let text = page_text(response).await;
        assert!(text.contains("Year Comparison"));
    }

    #[tokio::test]
    async fn single_pharmacist_adds_the_entity_comparison_tables() {
        let query = ReportsQuery {
            pharmacist: vec!["Jane Mary".to_owned()],
            ..ReportsQuery::default()
        };

        let response = get_reports_page(State(test_state()), Query(query))
            .await
            .unwrap();

        let text = page_text(response).await;
        assert!(text.contains("Year Comparison (Jane Mary)"));
        assert!(text.contains("Quarter Comparison (Jane Mary)"));
        assert!(text.contains("Month Comparison (Jane Mary)"));
    }

    #[tokio::test]
    async fn no_comparison_without_qualifying_filters() {
        let response = get_reports_page(State(test_state()), Query(ReportsQuery::default()))
            .await
            .unwrap();

        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        let html = Html::parse_document(&text);

        let heading_selector = Selector::parse("h3").unwrap();
        let headings: Vec<String> = html
            .select(&heading_selector)
            .map(|heading| heading.text().collect())
            .collect();

        assert!(!headings.iter().any(|heading| heading.contains("Comparison")));
    }

    #[tokio::test]
    async fn filter_form_lists_the_dataset_options() {
        let response = get_reports_page(State(test_state()), Query(ReportsQuery::default()))
            .await
            .unwrap();

        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();
        let html = Html::parse_document(&text);

        let option_selector = Selector::parse("select[name='quarter'] option").unwrap();
        let options: Vec<String> = html
            .select(&option_selector)
            .map(|option| option.text().collect())
            .collect();

        assert!(options.contains(&"All Quarters".to_owned()));
        assert!(options.contains(&"Q1-2024".to_owned()));
        assert!(options.contains(&"Q3-2024".to_owned()));
    }
}
