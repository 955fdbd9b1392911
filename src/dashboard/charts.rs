//! Chart generation for the dashboard.
//!
//! Each chart is generated as JSON configuration for the ECharts library
//! and rendered with a container div plus JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Line, Pie, bar::Bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{EntityStats, MonthlySeries, PaymentMethods},
    comparison::YearPairComparison,
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
pub fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// The revenue trend chart; its shape follows the monthly-series selection.
pub fn revenue_trend_chart(series: &MonthlySeries) -> Chart {
    let mut chart = Chart::new()
        .title(Title::new().text("Revenue Trend"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(series.labels.clone()),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for line in &series.lines {
        chart = chart.series(Line::new().name(line.name.clone()).data(line.values.clone()));
    }

    chart
}

/// Bar chart of the top pharmacists by net revenue.
pub fn top_pharmacists_chart(pharmacists: &[EntityStats], limit: usize) -> Chart {
    let top = &pharmacists[..limit.min(pharmacists.len())];

    let labels: Vec<String> = top.iter().map(|entity| first_name(&entity.name)).collect();
    let values: Vec<f64> = top.iter().map(|entity| entity.net_revenue).collect();

    Chart::new()
        .title(Title::new().text("Top Performing Pharmacists"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Net Revenue").data(values))
}

/// Grouped bar chart comparing each pharmacist's revenue across the two
/// reference years.
pub fn pharmacist_comparison_chart(comparison: &YearPairComparison) -> Chart {
    let top = &comparison.rows[..comparison.rows.len().min(5)];

    let labels: Vec<String> = top.iter().map(|row| first_name(&row.name)).collect();
    let first_values: Vec<f64> = top.iter().map(|row| row.revenue_first).collect();
    let second_values: Vec<f64> = top.iter().map(|row| row.revenue_second).collect();

    Chart::new()
        .title(Title::new().text("Top Performing Pharmacists - Year Comparison"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name(comparison.first_year.to_string())
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(first_values),
        )
        .series(
            Bar::new()
                .name(comparison.second_year.to_string())
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(second_values),
        )
}

/// Doughnut chart of the cash/credit revenue split.
pub fn payment_methods_chart(methods: &PaymentMethods) -> Chart {
    Chart::new()
        .title(Title::new().text("Payment Methods"))
        .tooltip(Tooltip::new().value_formatter(currency_formatter()))
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Payment Methods")
                .radius(vec!["45%", "70%"])
                .data(vec![(methods.cash, "Cash"), (methods.credit, "Credit")]),
        )
}

/// The first token of a pharmacist grouping key, for compact axis labels.
fn first_name(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or("Unknown")
        .to_owned()
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
