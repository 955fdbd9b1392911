//! Flat summary totals over a filtered record subset.

use serde::Serialize;

use crate::{
    classify::{CountPolicy, ReturnConvention},
    record::TransactionRecord,
};

/// Revenue and transaction totals for one filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Net revenue: gross sales minus return magnitudes.
    pub total_revenue: f64,
    /// Sum of sale-transaction amounts, excluding returns.
    pub gross_sales: f64,
    /// Sum of return magnitudes (non-negative).
    pub total_returns: f64,
    /// Number of sale transactions.
    pub sales_transactions: usize,
    /// Number of return transactions.
    pub return_transactions: usize,
    /// Combined transaction count per the configured [CountPolicy].
    pub total_transactions: i64,
    /// Gross sales divided by sale-transaction count; 0 with no sales.
    pub average_order_value: f64,
    /// Net revenue as a percentage of gross sales; 100 with no gross sales.
    pub net_sales_rate: f64,
}

impl Summary {
    /// The empty summary: all zeroes except the net sales rate, which
    /// defaults to 100 (nothing was returned).
    pub fn empty(policy: CountPolicy) -> Self {
        Self {
            total_revenue: 0.0,
            gross_sales: 0.0,
            total_returns: 0.0,
            sales_transactions: 0,
            return_transactions: 0,
            total_transactions: policy.total(0, 0),
            average_order_value: 0.0,
            net_sales_rate: 100.0,
        }
    }
}

/// Computes the flat summary for `records` in a single pass.
pub fn summarize(
    records: &[&TransactionRecord],
    convention: ReturnConvention,
    policy: CountPolicy,
) -> Summary {
    let mut gross_sales = 0.0;
    let mut total_returns = 0.0;
    let mut sales_transactions = 0;
    let mut return_transactions = 0;

    for record in records {
        let classification = convention.classify(record);

        if classification.is_return {
            total_returns += classification.returns;
            return_transactions += 1;
        } else {
            gross_sales += classification.gross;
            sales_transactions += 1;
        }
    }

    let total_revenue = gross_sales - total_returns;

    let average_order_value = if sales_transactions > 0 {
        gross_sales / sales_transactions as f64
    } else {
        0.0
    };

    let net_sales_rate = if gross_sales > 0.0 {
        total_revenue / gross_sales * 100.0
    } else {
        100.0
    };

    Summary {
        total_revenue,
        gross_sales,
        total_returns,
        sales_transactions,
        return_transactions,
        total_transactions: policy.total(sales_transactions, return_transactions),
        average_order_value,
        net_sales_rate,
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        classify::{CountPolicy, ReturnConvention},
        record::TransactionRecord,
    };

    use super::{Summary, summarize};

    fn record(net_amount: f64) -> TransactionRecord {
        TransactionRecord {
            date: date!(2024 - 01 - 10),
            net_amount,
            cash_revenue: 0.0,
            credit_revenue: 0.0,
            location: "A".to_owned(),
            pharmacist: "Jane Mary".to_owned(),
            invoice_number: None,
        }
    }

    #[test]
    fn nets_returns_against_gross_sales() {
        let records = vec![record(100.0), record(-20.0)];
        let refs: Vec<_> = records.iter().collect();

        let summary = summarize(&refs, ReturnConvention::Signed, CountPolicy::GrossAll);

        assert_eq!(summary.gross_sales, 100.0);
        assert_eq!(summary.total_returns, 20.0);
        assert_eq!(summary.total_revenue, 80.0);
        assert_eq!(summary.sales_transactions, 1);
        assert_eq!(summary.return_transactions, 1);
        assert_eq!(summary.net_sales_rate, 80.0);
    }

    #[test]
    fn count_policy_controls_total_transactions() {
        let records = vec![record(100.0), record(50.0), record(-20.0)];
        let refs: Vec<_> = records.iter().collect();

        let gross = summarize(&refs, ReturnConvention::Signed, CountPolicy::GrossAll);
        assert_eq!(gross.total_transactions, 3);

        let net = summarize(&refs, ReturnConvention::Signed, CountPolicy::NetOfReturns);
        assert_eq!(net.total_transactions, 1);

        let sales = summarize(&refs, ReturnConvention::Signed, CountPolicy::SalesOnly);
        assert_eq!(sales.total_transactions, 2);
    }

    #[test]
    fn average_order_value_uses_gross_sales_over_sales_count() {
        let records = vec![record(100.0), record(50.0), record(-30.0)];
        let refs: Vec<_> = records.iter().collect();

        let summary = summarize(&refs, ReturnConvention::Signed, CountPolicy::GrossAll);

        assert_eq!(summary.average_order_value, 75.0);
    }

    #[test]
    fn empty_input_produces_documented_defaults() {
        let summary = summarize(&[], ReturnConvention::Signed, CountPolicy::GrossAll);

        assert_eq!(summary, Summary::empty(CountPolicy::GrossAll));
        assert_eq!(summary.average_order_value, 0.0);
        assert_eq!(summary.net_sales_rate, 100.0);
    }

    #[test]
    fn returns_only_subset_does_not_divide_by_zero() {
        let records = vec![record(-10.0), record(-5.0)];
        let refs: Vec<_> = records.iter().collect();

        let summary = summarize(&refs, ReturnConvention::Signed, CountPolicy::GrossAll);

        assert_eq!(summary.total_revenue, -15.0);
        assert_eq!(summary.average_order_value, 0.0);
        assert_eq!(summary.net_sales_rate, 100.0);
    }

    #[test]
    fn gross_minus_returns_equals_total_revenue() {
        let records = vec![record(100.0), record(-20.0), record(42.5), record(-1.25)];
        let refs: Vec<_> = records.iter().collect();

        let summary = summarize(&refs, ReturnConvention::Signed, CountPolicy::GrossAll);

        assert!((summary.gross_sales - summary.total_returns - summary.total_revenue).abs() < 1e-9);
    }
}
