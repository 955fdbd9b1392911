//! The in-memory dataset and the filter options derived from it.
//!
//! The record array is loaded once at startup (or on explicit refresh) and
//! replaced wholesale; nothing mutates individual records. Aggregations run
//! against a read lock for the duration of one request.

use std::collections::BTreeSet;

use crate::record::{Quarter, TransactionRecord, UNKNOWN_LABEL};

/// The full sales dataset for one session.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<TransactionRecord>,
    version: u64,
}

impl Dataset {
    /// Wraps an initial record array.
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self {
            records,
            version: 1,
        }
    }

    /// All records, in load order.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// Replaces the dataset wholesale with a freshly loaded record array.
    pub fn replace(&mut self, records: Vec<TransactionRecord>) {
        self.records = records;
        self.version += 1;
    }

    /// Monotonic counter, bumped on every [Dataset::replace].
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The distinct values available for each filter dropdown.
    pub fn filter_options(&self) -> FilterOptions {
        let mut years = BTreeSet::new();
        let mut months = BTreeSet::new();
        let mut locations = BTreeSet::new();
        let mut pharmacists = BTreeSet::new();
        let mut quarters = BTreeSet::new();
        let mut days = BTreeSet::new();

        for record in &self.records {
            years.insert(record.year());
            months.insert(record.month());
            quarters.insert(record.quarter());
            days.insert(record.day());

            if record.location != UNKNOWN_LABEL {
                locations.insert(record.location.clone());
            }
            if record.pharmacist != UNKNOWN_LABEL {
                pharmacists.insert(record.pharmacist.clone());
            }
        }

        FilterOptions {
            years: years.into_iter().collect(),
            months: months.into_iter().collect(),
            locations: locations.into_iter().collect(),
            pharmacists: pharmacists.into_iter().collect(),
            quarters: quarters.into_iter().collect(),
            days: days.into_iter().collect(),
        }
    }
}

/// Sorted distinct values for the filter dropdowns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Calendar years present in the data.
    pub years: Vec<i32>,
    /// Months present, 1 through 12.
    pub months: Vec<u8>,
    /// Location names, alphabetical, excluding "Unknown".
    pub locations: Vec<String>,
    /// Pharmacist grouping keys, alphabetical, excluding "Unknown".
    pub pharmacists: Vec<String>,
    /// Quarters present, chronological.
    pub quarters: Vec<Quarter>,
    /// Days of the month present.
    pub days: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::record::TransactionRecord;

    use super::Dataset;

    fn record(date: time::Date, location: &str, pharmacist: &str) -> TransactionRecord {
        TransactionRecord {
            date,
            net_amount: 10.0,
            cash_revenue: 10.0,
            credit_revenue: 0.0,
            location: location.to_owned(),
            pharmacist: pharmacist.to_owned(),
            invoice_number: None,
        }
    }

    #[test]
    fn filter_options_are_sorted_and_distinct() {
        let dataset = Dataset::new(vec![
            record(date!(2025 - 03 - 02), "North Branch", "John Smith"),
            record(date!(2024 - 01 - 15), "Main Branch", "Jane Mary"),
            record(date!(2024 - 01 - 15), "Main Branch", "Jane Mary"),
        ]);

        let options = dataset.filter_options();

        assert_eq!(options.years, vec![2024, 2025]);
        assert_eq!(options.months, vec![1, 3]);
        assert_eq!(options.locations, vec!["Main Branch", "North Branch"]);
        assert_eq!(options.pharmacists, vec!["Jane Mary", "John Smith"]);
        assert_eq!(options.quarters.len(), 2);
        assert_eq!(options.quarters[0].to_string(), "Q1-2024");
        assert_eq!(options.days, vec![2, 15]);
    }

    #[test]
    fn unknown_entities_are_left_out_of_the_dropdowns() {
        let dataset = Dataset::new(vec![record(date!(2024 - 01 - 15), "Unknown", "Unknown")]);

        let options = dataset.filter_options();

        assert!(options.locations.is_empty());
        assert!(options.pharmacists.is_empty());
    }

    #[test]
    fn replace_swaps_the_records_and_bumps_the_version() {
        let mut dataset = Dataset::new(vec![record(date!(2024 - 01 - 15), "A", "Jane Mary")]);
        assert_eq!(dataset.version(), 1);

        dataset.replace(vec![
            record(date!(2025 - 02 - 01), "B", "John Smith"),
            record(date!(2025 - 02 - 02), "B", "John Smith"),
        ]);

        assert_eq!(dataset.records().len(), 2);
        assert_eq!(dataset.version(), 2);
    }
}
