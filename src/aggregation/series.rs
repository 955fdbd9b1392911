//! Monthly-series shapes for the revenue trend chart.
//!
//! Which shape the chart takes depends on the year and month filters: a
//! Jan-Dec series per year, a year-comparison axis, or a single collapsed
//! "Selected Period" point. The branching here mirrors the filter semantics
//! of the original dashboard and must stay in sync with the comparison
//! selector's rules.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::{
    classify::ReturnConvention,
    filter::{FilterState, Selection},
    record::TransactionRecord,
};

/// One line (or bar group) of the trend chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesLine {
    /// Display name, usually a year.
    pub name: String,
    /// One value per axis label.
    pub values: Vec<f64>,
}

/// The trend chart data: a categorical axis and one series per group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    /// Axis labels: month names, years, or "Selected Period".
    pub labels: Vec<String>,
    /// The series, aligned with `labels`.
    pub lines: Vec<SeriesLine>,
}

/// Three-letter month name for a 1-based month number.
pub(crate) fn month_label(month: u8) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        _ => "Dec",
    }
}

/// Builds the trend chart data for the filtered subset.
///
/// Shape selection:
/// - specific years and months: one "Selected Period" point per selected
///   year;
/// - specific years only: a Jan-Dec series per selected year;
/// - specific months only: a year comparison — years on the axis for a
///   single month, the selected months on the axis otherwise;
/// - no year/month filters: a Jan-Dec series for every year present.
pub fn monthly_series(
    records: &[&TransactionRecord],
    filters: &FilterState,
    convention: ReturnConvention,
) -> MonthlySeries {
    let mut totals: HashMap<(i32, u8), f64> = HashMap::new();

    for record in records {
        *totals.entry((record.year(), record.month())).or_insert(0.0) +=
            convention.classify(record).net();
    }

    let years_present: Vec<i32> = records
        .iter()
        .map(|record| record.year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    match (&filters.years, &filters.months) {
        (Selection::Only(years), Selection::Only(months)) => MonthlySeries {
            labels: vec!["Selected Period".to_owned()],
            lines: years
                .iter()
                .map(|&year| SeriesLine {
                    name: year.to_string(),
                    values: vec![
                        months
                            .iter()
                            .map(|&month| totals.get(&(year, month)).copied().unwrap_or(0.0))
                            .sum(),
                    ],
                })
                .collect(),
        },
        (Selection::Only(years), Selection::All) => MonthlySeries {
            labels: full_year_labels(),
            lines: years
                .iter()
                .map(|&year| year_line(year, &totals))
                .collect(),
        },
        (Selection::All, Selection::Only(months)) if months.len() == 1 => {
            let month = months[0];

            MonthlySeries {
                labels: years_present.iter().map(i32::to_string).collect(),
                lines: vec![SeriesLine {
                    name: month_label(month).to_owned(),
                    values: years_present
                        .iter()
                        .map(|&year| totals.get(&(year, month)).copied().unwrap_or(0.0))
                        .collect(),
                }],
            }
        }
        (Selection::All, Selection::Only(months)) => MonthlySeries {
            labels: months
                .iter()
                .map(|&month| month_label(month).to_owned())
                .collect(),
            lines: years_present
                .iter()
                .map(|&year| SeriesLine {
                    name: year.to_string(),
                    values: months
                        .iter()
                        .map(|&month| totals.get(&(year, month)).copied().unwrap_or(0.0))
                        .collect(),
                })
                .collect(),
        },
        (Selection::All, Selection::All) => MonthlySeries {
            labels: full_year_labels(),
            lines: years_present
                .iter()
                .map(|&year| year_line(year, &totals))
                .collect(),
        },
    }
}

fn full_year_labels() -> Vec<String> {
    (1..=12).map(|month| month_label(month).to_owned()).collect()
}

fn year_line(year: i32, totals: &HashMap<(i32, u8), f64>) -> SeriesLine {
    SeriesLine {
        name: year.to_string(),
        values: (1..=12)
            .map(|month| totals.get(&(year, month)).copied().unwrap_or(0.0))
            .collect(),
    }
}
