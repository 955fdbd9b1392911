//! Dashboard HTTP handler and page rendering.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    aggregation::{MetricsResult, TOP_PHARMACISTS_CHART, aggregate},
    comparison::{YearPairComparison, compare_pharmacists_between_years},
    dashboard::{
        cards::metric_cards_view,
        charts::{
            DashboardChart, charts_script, charts_view, payment_methods_chart,
            pharmacist_comparison_chart, revenue_trend_chart, top_pharmacists_chart,
        },
        tables::{
            pharmacist_year_comparison_table, revenue_by_location_table, top_pharmacists_table,
        },
    },
    dataset::FilterOptions,
    endpoints,
    filter::{FilterState, Selection},
    html::{HeadElement, base},
    navigation::nav_bar,
};

/// Multi-select filter values from the dashboard's query string.
///
/// Each dimension arrives as repeated keys (`?year=2024&year=2025`); the
/// value `all` is the ALL sentinel the multi-selects submit by default.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Selected years.
    #[serde(default)]
    pub year: Vec<String>,
    /// Selected months, 1 through 12.
    #[serde(default)]
    pub month: Vec<String>,
    /// Selected locations.
    #[serde(default)]
    pub location: Vec<String>,
}

impl DashboardQuery {
    fn into_filter_state(self) -> FilterState {
        FilterState {
            years: Selection::from_params(&self.year),
            months: Selection::from_params(&self.month),
            locations: Selection::from_params(&self.location),
            ..FilterState::default()
        }
    }
}

/// Display the dashboard overview for the filters in the query string.
pub async fn get_dashboard_page(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let dataset = state.read_dataset()?;
    let records = dataset.records();

    let filters = query.into_filter_state();
    let metrics = aggregate(records, &filters, state.engine_options);

    // When comparing all years within specific months, the pharmacist
    // rankings become a two-year growth comparison.
    let year_pair = if filters.years.is_all() && !filters.months.is_all() {
        compare_pharmacists_between_years(records, &filters, state.engine_options.convention)
    } else {
        None
    };

    let options = dataset.filter_options();

    if records.is_empty() {
        return Ok(dashboard_no_data_view().into_response());
    }

    Ok(dashboard_view(&metrics, year_pair.as_ref(), &filters, &options).into_response())
}

/// A short description of the active filters, shown under the metric cards.
fn filter_summary(filters: &FilterState) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Selection::Only(years) = &filters.years {
        parts.push(match years.as_slice() {
            [year] => year.to_string(),
            years => format!("{} years", years.len()),
        });
    }

    if let Selection::Only(months) = &filters.months {
        parts.push(match months.as_slice() {
            [month] => crate::aggregation::month_label(*month).to_owned(),
            months => format!("{} months", months.len()),
        });
    }

    if let Selection::Only(locations) = &filters.locations {
        parts.push(match locations.as_slice() {
            [location] => location.clone(),
            locations => format!("{} locations", locations.len()),
        });
    }

    if parts.is_empty() {
        "All Time".to_owned()
    } else {
        parts.join(", ")
    }
}

fn dashboard_view(
    metrics: &MetricsResult,
    year_pair: Option<&YearPairComparison>,
    filters: &FilterState,
    options: &FilterOptions,
) -> Markup {
    let pharmacists_chart = match year_pair {
        Some(comparison) => pharmacist_comparison_chart(comparison),
        None => top_pharmacists_chart(&metrics.top_pharmacists, TOP_PHARMACISTS_CHART),
    };

    let charts = [
        DashboardChart {
            id: "revenue-trend-chart",
            options: revenue_trend_chart(&metrics.monthly_series).to_string(),
        },
        DashboardChart {
            id: "top-pharmacists-chart",
            options: pharmacists_chart.to_string(),
        },
        DashboardChart {
            id: "payment-methods-chart",
            options: payment_methods_chart(&metrics.payment_methods).to_string(),
        },
    ];

    let content = html!(
        (nav_bar(endpoints::DASHBOARD_VIEW))

        div class="flex flex-col items-center px-2 lg:px-6 mx-auto max-w-screen-xl text-gray-900 dark:text-white"
        {
            (filter_form(filters, options))

            (metric_cards_view(metrics, &filter_summary(filters)))

            (charts_view(&charts))

            section class="w-full mx-auto mb-8"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    (revenue_by_location_table(&metrics.revenue_by_location, metrics.total_revenue))

                    @match year_pair {
                        Some(comparison) => {
                            (pharmacist_year_comparison_table(comparison))
                        }
                        None => {
                            (top_pharmacists_table(&metrics.top_pharmacists, metrics.total_revenue))
                        }
                    }
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(
            "https://cdn.jsdelivr.net/npm/echarts@5.5.0/dist/echarts.min.js".to_owned(),
        ),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

fn dashboard_no_data_view() -> Markup {
    let content = html!(
        (nav_bar(endpoints::DASHBOARD_VIEW))

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p
            {
                "Metrics will show up here once the sales CSV has records. \
                Check the data file and refresh via " code { "POST /api/refresh" } "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the filter controls as a GET form that reloads the page.
fn filter_form(filters: &FilterState, options: &FilterOptions) -> Markup {
    let month_names = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];

    html!(
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="w-full bg-gray-50 dark:bg-gray-800 p-4 rounded-lg mb-6 flex flex-wrap gap-4 items-end"
        {
            div
            {
                label class="block mb-1 text-sm font-medium" for="year" { "Years" }
                select multiple name="year" id="year" class="rounded border-gray-300 dark:bg-gray-700 text-sm"
                {
                    option value="all" selected[filters.years.is_all()] { "All Years" }
                    @for year in &options.years {
                        option value=(year) selected[filters.years.matches(year) && !filters.years.is_all()] { (year) }
                    }
                }
            }

            div
            {
                label class="block mb-1 text-sm font-medium" for="month" { "Months" }
                select multiple name="month" id="month" class="rounded border-gray-300 dark:bg-gray-700 text-sm"
                {
                    option value="all" selected[filters.months.is_all()] { "All Months" }
                    @for month in &options.months {
                        option
                            value=(month)
                            selected[filters.months.matches(month) && !filters.months.is_all()]
                        {
                            (month_names[*month as usize - 1])
                        }
                    }
                }
            }

            div
            {
                label class="block mb-1 text-sm font-medium" for="location" { "Locations" }
                select multiple name="location" id="location" class="rounded border-gray-300 dark:bg-gray-700 text-sm"
                {
                    option value="all" selected[filters.locations.is_all()] { "All Locations" }
                    @for location in &options.locations {
                        option
                            value=(location)
                            selected[filters.locations.matches(location) && !filters.locations.is_all()]
                        {
                            (location)
                        }
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 text-white rounded text-sm"
            {
                "Apply Filters"
            }

            a
                href=(endpoints::DASHBOARD_VIEW)
                class="text-blue-600 hover:text-blue-500 dark:text-blue-500 underline text-sm"
            {
                "Clear All Filters"
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
        AppState,
        aggregation::EngineOptions,
        dataset::Dataset,
        filter::{FilterState, Selection},
        record::TransactionRecord,
    };

    use super::{DashboardQuery, filter_summary, get_dashboard_page};

    fn record(date: time::Date, net_amount: f64) -> TransactionRecord {
        TransactionRecord {
            date,
            net_amount,
            cash_revenue: net_amount.max(0.0),
            credit_revenue: 0.0,
            location: "Main Branch".to_owned(),
            pharmacist: "Jane Mary".to_owned(),
            invoice_number: None,
        }
    }

    fn test_state(records: Vec<TransactionRecord>) -> AppState {
        AppState::new(
            Dataset::new(records),
            EngineOptions::default(),
            "sales.csv".into(),
        )
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{}", chart_id)).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{}' not found",
            chart_id
        );
    }

    #[tokio::test]
    async fn dashboard_page_loads_with_charts_and_tables() {
        let state = test_state(vec![
            record(date!(2024 - 01 - 05), 100.0),
            record(date!(2024 - 01 - 06), -20.0),
            record(date!(2025 - 02 - 10), 250.0),
        ]);

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;

        assert_chart_exists(&html, "revenue-trend-chart");
        assert_chart_exists(&html, "top-pharmacists-chart");
        assert_chart_exists(&html, "payment-methods-chart");

        let table_selector = Selector::parse("table").unwrap();
        assert!(html.select(&table_selector).next().is_some());
    }

    #[tokio::test]
    async fn dashboard_prompts_when_no_data_is_loaded() {
        let state = test_state(vec![]);

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        let text: String = html.root_element().text().collect();
        assert!(text.contains("Nothing here yet"));
    }

    #[tokio::test]
    async fn dashboard_switches_to_year_comparison_for_month_filters() {
        let state = test_state(vec![
            record(date!(2024 - 03 - 05), 100.0),
            record(date!(2025 - 03 - 06), 150.0),
        ]);

        let query = DashboardQuery {
            month: vec!["3".to_owned()],
            ..DashboardQuery::default()
        };

        let response = get_dashboard_page(State(state), Query(query)).await.unwrap();
        let html = parse_html(response).await;

        let text: String = html.root_element().text().collect();
        assert!(
            text.contains("2024 Revenue"),
            "expected the two-year pharmacist comparison table, got: {text}"
        );
    }

    #[test]
    fn filter_summary_describes_the_selection() {
        assert_eq!(filter_summary(&FilterState::default()), "All Time");

        let filters = FilterState {
            years: Selection::Only(vec![2024]),
            months: Selection::Only(vec![3, 4]),
            locations: Selection::Only(vec!["Main Branch".to_owned()]),
            ..FilterState::default()
        };

        assert_eq!(filter_summary(&filters), "2024, 2 months, Main Branch");
    }

    #[test]
    fn query_deserializes_repeated_keys() {
        let query: DashboardQuery =
            serde_html_form::from_str("year=2024&year=2025&month=all").unwrap();

        assert_eq!(query.year, vec!["2024", "2025"]);
        assert_eq!(query.month, vec!["all"]);
        assert!(query.location.is_empty());
    }
}
