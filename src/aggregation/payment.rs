//! Payment-method split across the filtered subset.

use serde::Serialize;

use crate::{classify::ReturnConvention, record::TransactionRecord};

/// Revenue split by payment method.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PaymentMethods {
    /// Revenue paid in cash.
    pub cash: f64,
    /// Revenue paid by card.
    pub credit: f64,
}

/// Sums the cash and credit revenue over `records`.
///
/// A return record's payment contributions are subtracted rather than added:
/// the refund went back out through the same payment method. This differs
/// from the revenue side, where return amounts already carry their sign
/// through [ReturnConvention::classify].
pub fn aggregate_payment_methods(
    records: &[&TransactionRecord],
    convention: ReturnConvention,
) -> PaymentMethods {
    let mut methods = PaymentMethods::default();

    for record in records {
        let sign = if convention.classify(record).is_return {
            -1.0
        } else {
            1.0
        };

        methods.cash += sign * record.cash_revenue;
        methods.credit += sign * record.credit_revenue;
    }

    methods
}
