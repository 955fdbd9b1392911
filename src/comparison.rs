//! Comparison view selection.
//!
//! Depending on which filter dimensions are the ALL sentinel and which hold
//! explicit values, the reports page shows one of three comparison shapes:
//! a per-entity time series, a year-over-year table, or a table comparing
//! the selected values of one filter dimension. The decision table here is
//! evaluated in priority order and the first matching rule wins.

use serde::Serialize;

use crate::{
    aggregation::month_label,
    classify::ReturnConvention,
    filter::FilterState,
    record::{Quarter, TransactionRecord},
};

/// One row of a comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRow {
    /// Row label: a year, a quarter, a month name, or an entity name.
    pub label: String,
    /// Net revenue for the row's slice.
    pub net_revenue: f64,
    /// Net transactions (sales minus returns) for the row's slice.
    pub net_transactions: i64,
    /// Growth vs. the previous row; `None` for the first row of an ordered
    /// series and for unordered (categorical) rows.
    pub growth_rate: Option<f64>,
}

/// Which dimension a filter-value comparison iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CompareDimension {
    /// Comparing selected pharmacists.
    Pharmacist,
    /// Comparing selected locations.
    Location,
    /// Comparing selected quarters.
    Quarter,
    /// Comparing selected months.
    Month,
}

impl CompareDimension {
    /// The column heading for this dimension.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pharmacist => "Pharmacist",
            Self::Location => "Location",
            Self::Quarter => "Quarter",
            Self::Month => "Month",
        }
    }
}

/// A pharmacist's or location's performance over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySeries {
    /// The entity's grouping key.
    pub entity: String,
    /// One row per year present, chronological.
    pub yearly: Vec<PeriodRow>,
    /// One row per quarter present, chronological.
    pub quarterly: Vec<PeriodRow>,
    /// One row per calendar month present (merged across years),
    /// in month order.
    pub monthly: Vec<PeriodRow>,
}

/// The comparison view the current filter combination calls for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Comparison {
    /// A single selected pharmacist or location, tracked over time.
    EntitySeries(EntitySeries),
    /// One row per calendar year, all non-year filters applied.
    YearOverYear {
        /// The year rows, chronological.
        rows: Vec<PeriodRow>,
    },
    /// One row per selected value of one multi-valued dimension.
    FilterValues {
        /// The dimension being compared.
        dimension: CompareDimension,
        /// The value rows; chronological for month/quarter, selection
        /// order otherwise.
        rows: Vec<PeriodRow>,
    },
}

/// Picks and computes the comparison view for the current filters.
///
/// Takes the full dataset because the year-over-year rule deliberately
/// ignores the year filter when slicing.
pub fn select_comparison(
    records: &[TransactionRecord],
    filters: &FilterState,
    convention: ReturnConvention,
) -> Option<Comparison> {
    if let Some(pharmacist) = filters.pharmacists.as_single() {
        return Some(Comparison::EntitySeries(entity_series(
            records, filters, pharmacist, convention,
        )));
    }

    if let Some(location) = filters.locations.as_single() {
        return Some(Comparison::EntitySeries(entity_series(
            records, filters, location, convention,
        )));
    }

    let non_year_filter_active = !filters.quarters.is_all()
        || !filters.months.is_all()
        || !filters.locations.is_all()
        || !filters.pharmacists.is_all();

    if filters.years.is_all() && non_year_filter_active {
        return Some(Comparison::YearOverYear {
            rows: year_over_year(records, filters, convention),
        });
    }

    if let Some(&year) = filters.years.as_single() {
        if let Some(comparison) = filter_value_comparison(records, filters, year, convention) {
            return Some(comparison);
        }
    }

    None
}

/// Uniform growth-rate formula for ordered series.
///
/// Guards the division: a zero previous value resolves to 100 for growth
/// into positive territory and 0 otherwise, never NaN or infinity.
pub fn growth_rate(previous: f64, current: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous.abs() * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

fn annotate_growth(rows: &mut [PeriodRow]) {
    for index in (1..rows.len()).rev() {
        rows[index].growth_rate = Some(growth_rate(
            rows[index - 1].net_revenue,
            rows[index].net_revenue,
        ));
    }

    if let Some(first) = rows.first_mut() {
        first.growth_rate = None;
    }
}

/// Sums net revenue and net transactions over one comparison slice.
fn slice_totals<'a>(
    records: impl Iterator<Item = &'a TransactionRecord>,
    convention: ReturnConvention,
) -> (f64, i64) {
    let mut net_revenue = 0.0;
    let mut net_transactions = 0i64;

    for record in records {
        let classification = convention.classify(record);
        net_revenue += classification.net();
        net_transactions += if classification.is_return { -1 } else { 1 };
    }

    (net_revenue, net_transactions)
}

fn entity_series(
    records: &[TransactionRecord],
    filters: &FilterState,
    entity: &str,
    convention: ReturnConvention,
) -> EntitySeries {
    let subset = filters.apply(records);

    let mut years: Vec<i32> = subset.iter().map(|record| record.year()).collect();
    years.sort_unstable();
    years.dedup();

    let mut yearly: Vec<PeriodRow> = years
        .into_iter()
        .map(|year| {
            let (net_revenue, net_transactions) = slice_totals(
                subset.iter().copied().filter(|record| record.year() == year),
                convention,
            );
            PeriodRow {
                label: year.to_string(),
                net_revenue,
                net_transactions,
                growth_rate: None,
            }
        })
        .collect();
    annotate_growth(&mut yearly);

    let mut quarters: Vec<Quarter> = subset.iter().map(|record| record.quarter()).collect();
    quarters.sort_unstable();
    quarters.dedup();

    let mut quarterly: Vec<PeriodRow> = quarters
        .into_iter()
        .map(|quarter| {
            let (net_revenue, net_transactions) = slice_totals(
                subset
                    .iter()
                    .copied()
                    .filter(|record| record.quarter() == quarter),
                convention,
            );
            PeriodRow {
                label: quarter.to_string(),
                net_revenue,
                net_transactions,
                growth_rate: None,
            }
        })
        .collect();
    annotate_growth(&mut quarterly);

    let mut months: Vec<u8> = subset.iter().map(|record| record.month()).collect();
    months.sort_unstable();
    months.dedup();

    let mut monthly: Vec<PeriodRow> = months
        .into_iter()
        .map(|month| {
            let (net_revenue, net_transactions) = slice_totals(
                subset
                    .iter()
                    .copied()
                    .filter(|record| record.month() == month),
                convention,
            );
            PeriodRow {
                label: month_label(month).to_owned(),
                net_revenue,
                net_transactions,
                growth_rate: None,
            }
        })
        .collect();
    annotate_growth(&mut monthly);

    EntitySeries {
        entity: entity.to_owned(),
        yearly,
        quarterly,
        monthly,
    }
}

fn year_over_year(
    records: &[TransactionRecord],
    filters: &FilterState,
    convention: ReturnConvention,
) -> Vec<PeriodRow> {
    let base = filters.without_years();

    let mut years: Vec<i32> = records.iter().map(TransactionRecord::year).collect();
    years.sort_unstable();
    years.dedup();

    let mut rows: Vec<PeriodRow> = years
        .into_iter()
        .map(|year| {
            let (net_revenue, net_transactions) = slice_totals(
                records
                    .iter()
                    .filter(|record| record.year() == year && base.matches(record)),
                convention,
            );
            PeriodRow {
                label: year.to_string(),
                net_revenue,
                net_transactions,
                growth_rate: None,
            }
        })
        .collect();

    annotate_growth(&mut rows);
    rows
}

fn filter_value_comparison(
    records: &[TransactionRecord],
    filters: &FilterState,
    year: i32,
    convention: ReturnConvention,
) -> Option<Comparison> {
    // Highest-priority multi-valued dimension wins; the slice applies only
    // the year and that one dimension.
    if let Some(pharmacists) = filters.pharmacists.as_multi() {
        let rows = pharmacists
            .iter()
            .map(|pharmacist| {
                value_row(records, year, pharmacist.clone(), convention, |record| {
                    record.pharmacist == *pharmacist
                })
            })
            .collect();

        return Some(Comparison::FilterValues {
            dimension: CompareDimension::Pharmacist,
            rows,
        });
    }

    if let Some(locations) = filters.locations.as_multi() {
        let rows = locations
            .iter()
            .map(|location| {
                value_row(records, year, location.clone(), convention, |record| {
                    record.location == *location
                })
            })
            .collect();

        return Some(Comparison::FilterValues {
            dimension: CompareDimension::Location,
            rows,
        });
    }

    if let Some(quarters) = filters.quarters.as_multi() {
        let mut quarters: Vec<Quarter> = quarters.to_vec();
        quarters.sort_unstable();

        let mut rows: Vec<PeriodRow> = quarters
            .into_iter()
            .map(|quarter| {
                value_row(records, year, quarter.to_string(), convention, |record| {
                    record.quarter() == quarter
                })
            })
            .collect();
        annotate_growth(&mut rows);

        return Some(Comparison::FilterValues {
            dimension: CompareDimension::Quarter,
            rows,
        });
    }

    if let Some(months) = filters.months.as_multi() {
        let mut months: Vec<u8> = months.to_vec();
        months.sort_unstable();

        let mut rows: Vec<PeriodRow> = months
            .into_iter()
            .map(|month| {
                value_row(
                    records,
                    year,
                    month_label(month).to_owned(),
                    convention,
                    |record| record.month() == month,
                )
            })
            .collect();
        annotate_growth(&mut rows);

        return Some(Comparison::FilterValues {
            dimension: CompareDimension::Month,
            rows,
        });
    }

    None
}

fn value_row(
    records: &[TransactionRecord],
    year: i32,
    label: String,
    convention: ReturnConvention,
    matches: impl Fn(&TransactionRecord) -> bool,
) -> PeriodRow {
    let (net_revenue, net_transactions) = slice_totals(
        records
            .iter()
            .filter(|record| record.year() == year && matches(record)),
        convention,
    );

    PeriodRow {
        label,
        net_revenue,
        net_transactions,
        growth_rate: None,
    }
}

/// One pharmacist's revenue across two reference years.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PharmacistGrowthRow {
    /// The pharmacist grouping key.
    pub name: String,
    /// Net revenue in the earlier year.
    pub revenue_first: f64,
    /// Net revenue in the later year.
    pub revenue_second: f64,
    /// Absolute revenue change between the two years.
    pub growth: f64,
    /// Relative change, via [growth_rate].
    pub growth_rate: f64,
}

/// The "compare all pharmacists across two years" ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPairComparison {
    /// The earlier reference year.
    pub first_year: i32,
    /// The later reference year.
    pub second_year: i32,
    /// Rows sorted by combined two-year revenue, highest first.
    pub rows: Vec<PharmacistGrowthRow>,
}

/// Compares every pharmacist's revenue between the two most recent years in
/// the dataset, applying all non-year filters.
///
/// Returns `None` when fewer than two years are present.
pub fn compare_pharmacists_between_years(
    records: &[TransactionRecord],
    filters: &FilterState,
    convention: ReturnConvention,
) -> Option<YearPairComparison> {
    let mut years: Vec<i32> = records.iter().map(TransactionRecord::year).collect();
    years.sort_unstable();
    years.dedup();

    let [.., first_year, second_year] = years[..] else {
        return None;
    };

    let base = filters.without_years();

    let revenue_by_pharmacist = |year: i32| {
        let mut totals: Vec<(String, f64)> = Vec::new();

        for record in records
            .iter()
            .filter(|record| record.year() == year && base.matches(record))
        {
            let net = convention.classify(record).net();
            match totals
                .iter_mut()
                .find(|(name, _)| *name == record.pharmacist)
            {
                Some((_, total)) => *total += net,
                None => totals.push((record.pharmacist.clone(), net)),
            }
        }

        totals
    };

    let first = revenue_by_pharmacist(first_year);
    let second = revenue_by_pharmacist(second_year);

    let mut names: Vec<String> = first.iter().map(|(name, _)| name.clone()).collect();
    for (name, _) in &second {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }

    let lookup = |totals: &[(String, f64)], name: &str| {
        totals
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, total)| *total)
            .unwrap_or(0.0)
    };

    let mut rows: Vec<PharmacistGrowthRow> = names
        .into_iter()
        .map(|name| {
            let revenue_first = lookup(&first, &name);
            let revenue_second = lookup(&second, &name);

            PharmacistGrowthRow {
                growth: revenue_second - revenue_first,
                growth_rate: growth_rate(revenue_first, revenue_second),
                name,
                revenue_first,
                revenue_second,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        (b.revenue_first + b.revenue_second).total_cmp(&(a.revenue_first + a.revenue_second))
    });

    Some(YearPairComparison {
        first_year,
        second_year,
        rows,
    })
}
