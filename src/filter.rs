//! Filter state for the dashboard and reports pages.
//!
//! Each filter dimension is either the ALL sentinel (matches every value) or
//! an explicit list of selected values. The distinction matters: an empty
//! explicit list matches nothing. All supplied dimensions are ANDed into a
//! single per-record predicate.

use std::{fmt::Debug, str::FromStr};

use crate::record::{Quarter, TransactionRecord};

/// The value the filter UI submits for the ALL sentinel.
pub const ALL_SENTINEL: &str = "all";

/// A single filter dimension: everything, or an explicit selection.
///
/// Explicit selections preserve the order values were supplied in, which
/// the filter-value comparison table uses as its row order.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection<T> {
    /// Matches every value.
    All,
    /// Matches only the listed values. An empty list matches nothing.
    Only(Vec<T>),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this dimension.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(values) => values.contains(value),
        }
    }

    /// Whether this dimension is the ALL sentinel.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The selected value when exactly one is selected, `None` otherwise.
    pub fn as_single(&self) -> Option<&T> {
        match self {
            Self::Only(values) if values.len() == 1 => values.first(),
            _ => None,
        }
    }

    /// The selected values when more than one is selected, `None` otherwise.
    pub fn as_multi(&self) -> Option<&[T]> {
        match self {
            Self::Only(values) if values.len() > 1 => Some(values),
            _ => None,
        }
    }
}

impl<T> Selection<T>
where
    T: FromStr,
    T::Err: Debug,
{
    /// Builds a selection from raw filter-form values.
    ///
    /// No values or any occurrence of `"all"` yields [Selection::All],
    /// matching how the multi-select widgets submit their state. Values
    /// that fail to parse are skipped.
    pub fn from_params(values: &[String]) -> Self {
        if values.is_empty() || values.iter().any(|value| value == ALL_SENTINEL) {
            return Self::All;
        }

        let parsed = values
            .iter()
            .filter_map(|value| match value.parse::<T>() {
                Ok(parsed) => Some(parsed),
                Err(error) => {
                    tracing::debug!("skipping unparseable filter value {value:?}: {error:?}");
                    None
                }
            })
            .collect();

        Self::Only(parsed)
    }
}

/// The complete filter state passed into every aggregation call.
///
/// This is a plain value object: handlers build one per request from query
/// parameters and there is no ambient filter context anywhere else.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Selected calendar years.
    pub years: Selection<i32>,
    /// Selected months, 1 through 12.
    pub months: Selection<u8>,
    /// Selected location names.
    pub locations: Selection<String>,
    /// Selected pharmacist grouping keys.
    pub pharmacists: Selection<String>,
    /// Selected quarters.
    pub quarters: Selection<Quarter>,
    /// Selected days of the month, 1 through 31.
    pub days: Selection<u8>,
}

impl FilterState {
    /// Whether `record` passes every dimension of this filter.
    ///
    /// Quarter and day are derived from the record's date before comparison;
    /// they are not stored fields.
    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.years.matches(&record.year())
            && self.months.matches(&record.month())
            && self.locations.matches(&record.location)
            && self.pharmacists.matches(&record.pharmacist)
            && self.quarters.matches(&record.quarter())
            && self.days.matches(&record.day())
    }

    /// The records that pass this filter, in dataset order.
    pub fn apply<'a>(&self, records: &'a [TransactionRecord]) -> Vec<&'a TransactionRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    /// A copy of this filter with the year dimension reset to ALL, used by
    /// the year-over-year comparison which slices by year itself.
    pub fn without_years(&self) -> Self {
        Self {
            years: Selection::All,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::record::{Quarter, TransactionRecord};

    use super::{FilterState, Selection};

    fn record(date: time::Date, location: &str, pharmacist: &str) -> TransactionRecord {
        TransactionRecord {
            date,
            net_amount: 100.0,
            cash_revenue: 100.0,
            credit_revenue: 0.0,
            location: location.to_owned(),
            pharmacist: pharmacist.to_owned(),
            invoice_number: None,
        }
    }

    #[test]
    fn all_matches_every_value() {
        let selection: Selection<i32> = Selection::All;

        assert!(selection.matches(&2024));
        assert!(selection.matches(&1999));
    }

    #[test]
    fn empty_explicit_selection_matches_nothing() {
        let selection: Selection<i32> = Selection::Only(vec![]);

        assert!(!selection.matches(&2024));
    }

    #[test]
    fn explicit_selection_matches_only_listed_values() {
        let selection = Selection::Only(vec![2024, 2025]);

        assert!(selection.matches(&2024));
        assert!(!selection.matches(&2023));
    }

    #[test]
    fn from_params_treats_all_sentinel_as_all() {
        let selection: Selection<i32> =
            Selection::from_params(&["all".to_owned(), "2024".to_owned()]);

        assert!(selection.is_all());
    }

    #[test]
    fn from_params_treats_no_values_as_all() {
        let selection: Selection<i32> = Selection::from_params(&[]);

        assert!(selection.is_all());
    }

    #[test]
    fn from_params_parses_and_preserves_order() {
        let selection: Selection<u8> =
            Selection::from_params(&["3".to_owned(), "1".to_owned(), "7".to_owned()]);

        assert_eq!(selection, Selection::Only(vec![3, 1, 7]));
    }

    #[test]
    fn from_params_skips_unparseable_values() {
        let selection: Selection<u8> =
            Selection::from_params(&["3".to_owned(), "March".to_owned()]);

        assert_eq!(selection, Selection::Only(vec![3]));
    }

    #[test]
    fn as_single_and_as_multi_inspect_selection_size() {
        let single = Selection::Only(vec!["Jane Mary".to_owned()]);
        assert_eq!(single.as_single(), Some(&"Jane Mary".to_owned()));
        assert!(single.as_multi().is_none());

        let multi = Selection::Only(vec!["Jane Mary".to_owned(), "John Smith".to_owned()]);
        assert!(multi.as_single().is_none());
        assert_eq!(multi.as_multi().map(<[String]>::len), Some(2));

        let all: Selection<String> = Selection::All;
        assert!(all.as_single().is_none());
        assert!(all.as_multi().is_none());
    }

    #[test]
    fn filter_dimensions_are_anded() {
        let records = vec![
            record(date!(2024 - 03 - 05), "Main Branch", "Jane Mary"),
            record(date!(2024 - 03 - 05), "North Branch", "Jane Mary"),
            record(date!(2025 - 03 - 05), "Main Branch", "Jane Mary"),
        ];

        let filters = FilterState {
            years: Selection::Only(vec![2024]),
            locations: Selection::Only(vec!["Main Branch".to_owned()]),
            ..FilterState::default()
        };

        let matched = filters.apply(&records);

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].location, "Main Branch");
        assert_eq!(matched[0].year(), 2024);
    }

    #[test]
    fn quarter_and_day_filters_derive_from_the_date() {
        let records = vec![
            record(date!(2024 - 02 - 14), "Main Branch", "Jane Mary"),
            record(date!(2024 - 05 - 14), "Main Branch", "Jane Mary"),
            record(date!(2024 - 05 - 20), "Main Branch", "Jane Mary"),
        ];

        let filters = FilterState {
            quarters: Selection::Only(vec![Quarter {
                year: 2024,
                number: 2,
            }]),
            days: Selection::Only(vec![14]),
            ..FilterState::default()
        };

        let matched = filters.apply(&records);

        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].date, date!(2024 - 05 - 14));
    }

    #[test]
    fn without_years_resets_only_the_year_dimension() {
        let filters = FilterState {
            years: Selection::Only(vec![2024]),
            months: Selection::Only(vec![3]),
            ..FilterState::default()
        };

        let relaxed = filters.without_years();

        assert!(relaxed.years.is_all());
        assert_eq!(relaxed.months, Selection::Only(vec![3]));
    }
}
