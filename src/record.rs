//! The canonical sales transaction record and its derived identities.
//!
//! Upstream exports are messy: header names vary between feeds
//! (`PharmacistName` vs `PHARMACISTNAME`), names carry trailing titles, and
//! locations can be blank. All of that is normalized once, at ingestion, so
//! the aggregation code only ever sees this canonical shape.

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

/// Label used when a record has no location or pharmacist.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// A single sales transaction, normalized from the upstream CSV export.
///
/// The record is immutable for the lifetime of a dashboard session: a data
/// refresh replaces the whole dataset rather than patching rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Calendar date of the transaction. Time of day is not retained.
    pub date: Date,

    /// The revenue amount as stored by the upstream source. Under the signed
    /// return convention a negative amount denotes an already-netted return;
    /// under the legacy invoice-suffix convention amounts are positive and
    /// returns are flagged via [TransactionRecord::invoice_number].
    #[serde(rename = "netRevenueAmount")]
    pub net_amount: f64,

    /// Portion of the amount paid in cash.
    pub cash_revenue: f64,

    /// Portion of the amount paid by card.
    pub credit_revenue: f64,

    /// Name of the dispensing location, or [UNKNOWN_LABEL].
    #[serde(rename = "locationName")]
    pub location: String,

    /// The pharmacist grouping key: the first two whitespace-separated
    /// tokens of the full name (see [pharmacist_key]), or [UNKNOWN_LABEL].
    #[serde(rename = "pharmacistName")]
    pub pharmacist: String,

    /// Invoice number, only meaningful under the legacy return convention
    /// where a `-R` marker denotes a return.
    pub invoice_number: Option<String>,
}

impl TransactionRecord {
    /// The calendar year of the transaction.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// The calendar month of the transaction, 1 through 12.
    pub fn month(&self) -> u8 {
        self.date.month() as u8
    }

    /// The day of the month, 1 through 31.
    pub fn day(&self) -> u8 {
        self.date.day()
    }

    /// The quarter the transaction falls in.
    pub fn quarter(&self) -> Quarter {
        Quarter::of(self.date)
    }
}

/// Normalizes a pharmacist's full name into the grouping key used for
/// filtering and ranking: the first two whitespace-separated tokens.
///
/// Pharmacy exports append titles and extra given names inconsistently, so
/// "Jane Mary Doe" and "Jane Mary" refer to the same person and both group
/// under `"Jane Mary"`. Empty or whitespace-only names map to
/// [UNKNOWN_LABEL].
pub fn pharmacist_key(full_name: &str) -> String {
    let tokens: Vec<&str> = full_name.split_whitespace().take(2).collect();

    if tokens.is_empty() {
        UNKNOWN_LABEL.to_owned()
    } else {
        tokens.join(" ")
    }
}

/// Normalizes a location name, mapping empty values to [UNKNOWN_LABEL].
pub fn location_key(location: &str) -> String {
    let trimmed = location.trim();

    if trimmed.is_empty() {
        UNKNOWN_LABEL.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// A calendar quarter, identified as `Q{n}-{year}` and ordered
/// chronologically (year first, then quarter number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Quarter {
    /// The calendar year.
    pub year: i32,
    /// The quarter number, 1 through 4.
    pub number: u8,
}

impl Quarter {
    /// The quarter containing `date`: `Q{ceil(month / 3)}-{year}`.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            number: (date.month() as u8).div_ceil(3),
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{}", self.number, self.year)
    }
}

impl Ord for Quarter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then(self.number.cmp(&other.number))
    }
}

impl PartialOrd for Quarter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Quarter {
    type Err = String;

    /// Parses the `Q{n}-{year}` form used by the filter UI, e.g. `Q2-2024`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rest = text
            .strip_prefix('Q')
            .ok_or_else(|| format!("quarter \"{text}\" does not start with 'Q'"))?;

        let (number, year) = rest
            .split_once('-')
            .ok_or_else(|| format!("quarter \"{text}\" is missing the '-' separator"))?;

        let number: u8 = number
            .parse()
            .map_err(|_| format!("invalid quarter number in \"{text}\""))?;

        if !(1..=4).contains(&number) {
            return Err(format!("quarter number {number} is out of range 1-4"));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in \"{text}\""))?;

        Ok(Self { year, number })
    }
}

impl From<Quarter> for String {
    fn from(quarter: Quarter) -> Self {
        quarter.to_string()
    }
}

impl TryFrom<String> for Quarter {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}
