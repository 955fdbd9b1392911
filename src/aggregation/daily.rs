//! Per-calendar-day aggregation: day statistics, top-day lookups, and the
//! day-by-day report rows.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{classify::ReturnConvention, record::TransactionRecord};

/// Aggregated figures for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    /// The calendar day.
    pub date: Date,
    /// Net revenue for the day.
    pub revenue: f64,
    /// Gross sales for the day.
    pub gross_sales: f64,
    /// Return magnitude for the day.
    pub returns: f64,
    /// All transactions, sales and returns.
    pub transactions: usize,
    /// Sale transactions only.
    pub sales_transactions: usize,
    /// Return transactions only.
    pub return_transactions: usize,
}

/// Groups records by calendar day.
///
/// Days are emitted in the order they are first encountered, which is what
/// the top-day lookups use to break ties.
pub fn aggregate_by_day(
    records: &[&TransactionRecord],
    convention: ReturnConvention,
) -> Vec<DayStats> {
    let mut days: Vec<DayStats> = Vec::new();
    let mut index_by_date: HashMap<Date, usize> = HashMap::new();

    for record in records {
        let index = *index_by_date.entry(record.date).or_insert_with(|| {
            days.push(DayStats {
                date: record.date,
                revenue: 0.0,
                gross_sales: 0.0,
                returns: 0.0,
                transactions: 0,
                sales_transactions: 0,
                return_transactions: 0,
            });
            days.len() - 1
        });

        let day = &mut days[index];
        let classification = convention.classify(record);

        if classification.is_return {
            day.returns += classification.returns;
            day.return_transactions += 1;
        } else {
            day.gross_sales += classification.gross;
            day.sales_transactions += 1;
        }

        day.revenue += classification.net();
        day.transactions += 1;
    }

    days
}

/// A highlighted day, as shown on the "Top Day" metric cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDay {
    /// The winning figure: net revenue, or transaction count as a number.
    pub value: f64,
    /// Weekday name, e.g. "Monday", or "N/A" for the sentinel.
    pub day_name: String,
    /// Short date, e.g. "Jan 1, 2024", or "N/A" for the sentinel.
    pub date_label: String,
}

impl TopDay {
    /// The sentinel returned when no day beats a zero baseline.
    pub fn none() -> Self {
        Self {
            value: 0.0,
            day_name: "N/A".to_owned(),
            date_label: "N/A".to_owned(),
        }
    }

    fn for_day(day: &DayStats, value: f64) -> Self {
        Self {
            value,
            day_name: day.date.weekday().to_string(),
            date_label: format_short_date(day.date),
        }
    }
}

/// The day with the highest net revenue.
///
/// The fold starts from the zero-valued sentinel and only a strictly greater
/// day replaces the current best, so ties keep the first day encountered and
/// a subset where every day nets at or below zero keeps the sentinel.
pub fn top_day_by_sales(days: &[DayStats]) -> TopDay {
    days.iter().fold(TopDay::none(), |best, day| {
        if day.revenue > best.value {
            TopDay::for_day(day, day.revenue)
        } else {
            best
        }
    })
}

/// The day with the most transactions, with the same tie-breaking rule as
/// [top_day_by_sales].
pub fn top_day_by_transactions(days: &[DayStats]) -> TopDay {
    days.iter().fold(TopDay::none(), |best, day| {
        if day.transactions as f64 > best.value {
            TopDay::for_day(day, day.transactions as f64)
        } else {
            best
        }
    })
}

/// One row of the daily report table: a calendar day with its gross,
/// returns, and net figures side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportRow {
    /// The calendar day.
    pub date: Date,
    /// Gross revenue for the day.
    pub gross_sales: f64,
    /// Number of sale transactions.
    pub gross_transactions: usize,
    /// Return magnitude for the day.
    pub returns_value: f64,
    /// Number of return transactions.
    pub returns_count: usize,
    /// Gross revenue minus return magnitude.
    pub net_revenue: f64,
    /// Sale transactions minus return transactions.
    pub net_transactions: i64,
}

/// Builds the daily report rows, one per calendar day present, in
/// chronological order.
pub fn daily_report(
    records: &[&TransactionRecord],
    convention: ReturnConvention,
) -> Vec<DailyReportRow> {
    let mut days = aggregate_by_day(records, convention);
    days.sort_by_key(|day| day.date);

    days.into_iter()
        .map(|day| DailyReportRow {
            date: day.date,
            gross_sales: day.gross_sales,
            gross_transactions: day.sales_transactions,
            returns_value: day.returns,
            returns_count: day.return_transactions,
            net_revenue: day.revenue,
            net_transactions: day.sales_transactions as i64 - day.return_transactions as i64,
        })
        .collect()
}

/// Formats a date as e.g. "Jan 1, 2024" for the metric cards.
fn format_short_date(date: Date) -> String {
    use time::Month;

    let month = match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    };

    format!("{} {}, {}", month, date.day(), date.year())
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{classify::ReturnConvention, record::TransactionRecord};

    use super::{
        TopDay, aggregate_by_day, daily_report, top_day_by_sales, top_day_by_transactions,
    };

    fn record(date: time::Date, net_amount: f64) -> TransactionRecord {
        TransactionRecord {
            date,
            net_amount,
            cash_revenue: 0.0,
            credit_revenue: 0.0,
            location: "A".to_owned(),
            pharmacist: "Jane Mary".to_owned(),
            invoice_number: None,
        }
    }

    #[test]
    fn groups_records_by_calendar_day() {
        let records = vec![
            record(date!(2024 - 01 - 01), 100.0),
            record(date!(2024 - 01 - 01), -20.0),
            record(date!(2024 - 01 - 02), 50.0),
        ];
        let refs: Vec<_> = records.iter().collect();

        let days = aggregate_by_day(&refs, ReturnConvention::Signed);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date!(2024 - 01 - 01));
        assert_eq!(days[0].revenue, 80.0);
        assert_eq!(days[0].gross_sales, 100.0);
        assert_eq!(days[0].returns, 20.0);
        assert_eq!(days[0].transactions, 2);
        assert_eq!(days[0].sales_transactions, 1);
        assert_eq!(days[0].return_transactions, 1);
        assert_eq!(days[1].revenue, 50.0);
    }

    #[test]
    fn day_transaction_counts_sum_to_the_record_count() {
        let records = vec![
            record(date!(2024 - 01 - 01), 100.0),
            record(date!(2024 - 01 - 01), -20.0),
            record(date!(2024 - 01 - 02), 50.0),
            record(date!(2024 - 02 - 15), 10.0),
        ];
        let refs: Vec<_> = records.iter().collect();

        let days = aggregate_by_day(&refs, ReturnConvention::Signed);

        let total: usize = days.iter().map(|day| day.transactions).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn top_day_by_sales_picks_the_highest_net_revenue() {
        let records = vec![
            record(date!(2024 - 01 - 01), 100.0),
            record(date!(2024 - 01 - 02), 150.0),
            record(date!(2024 - 01 - 02), -30.0),
            record(date!(2024 - 01 - 03), 90.0),
        ];
        let refs: Vec<_> = records.iter().collect();
        let days = aggregate_by_day(&refs, ReturnConvention::Signed);

        let top = top_day_by_sales(&days);

        assert_eq!(top.value, 120.0);
        assert_eq!(top.date_label, "Jan 2, 2024");
        assert_eq!(top.day_name, "Tuesday");
        assert!(days.iter().all(|day| day.revenue <= top.value));
    }

    #[test]
    fn top_day_ties_keep_the_first_day_encountered() {
        let records = vec![
            record(date!(2024 - 01 - 05), 100.0),
            record(date!(2024 - 01 - 02), 100.0),
        ];
        let refs: Vec<_> = records.iter().collect();
        let days = aggregate_by_day(&refs, ReturnConvention::Signed);

        let top = top_day_by_sales(&days);

        // Jan 5 appears first in the data, so it wins the tie.
        assert_eq!(top.date_label, "Jan 5, 2024");
    }

    #[test]
    fn top_day_of_empty_subset_is_the_sentinel() {
        assert_eq!(top_day_by_sales(&[]), TopDay::none());
        assert_eq!(top_day_by_transactions(&[]), TopDay::none());
    }

    #[test]
    fn top_day_by_transactions_counts_returns_too() {
        let records = vec![
            record(date!(2024 - 01 - 01), 500.0),
            record(date!(2024 - 01 - 02), 10.0),
            record(date!(2024 - 01 - 02), -5.0),
            record(date!(2024 - 01 - 02), 20.0),
        ];
        let refs: Vec<_> = records.iter().collect();
        let days = aggregate_by_day(&refs, ReturnConvention::Signed);

        let top = top_day_by_transactions(&days);

        assert_eq!(top.value, 3.0);
        assert_eq!(top.date_label, "Jan 2, 2024");
    }

    #[test]
    fn daily_report_rows_are_chronological_with_net_columns() {
        let records = vec![
            record(date!(2024 - 01 - 15), 200.0),
            record(date!(2024 - 01 - 02), 100.0),
            record(date!(2024 - 01 - 02), -25.0),
        ];
        let refs: Vec<_> = records.iter().collect();

        let rows = daily_report(&refs, ReturnConvention::Signed);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, date!(2024 - 01 - 02));
        assert_eq!(rows[0].gross_sales, 100.0);
        assert_eq!(rows[0].returns_value, 25.0);
        assert_eq!(rows[0].net_revenue, 75.0);
        assert_eq!(rows[0].net_transactions, 0);
        assert_eq!(rows[1].date, date!(2024 - 01 - 15));
        assert_eq!(rows[1].net_transactions, 1);
    }
}
