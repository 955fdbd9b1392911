//! Pharmacist and location leaderboards.

use std::collections::HashMap;

use serde::Serialize;

use crate::{classify::ReturnConvention, record::TransactionRecord};

/// Aggregated performance figures for one pharmacist or location.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStats {
    /// The grouping key: pharmacist name or location name.
    pub name: String,
    /// Gross revenue from sale transactions.
    pub gross_revenue: f64,
    /// Number of sale transactions.
    pub gross_transactions: usize,
    /// Return magnitude.
    pub returns_value: f64,
    /// Number of return transactions.
    pub returns_count: usize,
    /// Gross revenue minus return magnitude.
    pub net_revenue: f64,
    /// Sale transactions minus return transactions.
    pub net_transactions: i64,
}

/// Ranks pharmacists by net revenue, highest first.
///
/// The sort is stable, so pharmacists with equal net revenue keep the order
/// in which they first appear in the data.
pub fn rank_pharmacists(
    records: &[&TransactionRecord],
    convention: ReturnConvention,
) -> Vec<EntityStats> {
    rank_by(records, convention, |record| &record.pharmacist)
}

/// Ranks locations by net revenue, highest first, with the same tie rule as
/// [rank_pharmacists].
pub fn rank_locations(
    records: &[&TransactionRecord],
    convention: ReturnConvention,
) -> Vec<EntityStats> {
    rank_by(records, convention, |record| &record.location)
}

fn rank_by<'a>(
    records: &[&'a TransactionRecord],
    convention: ReturnConvention,
    key: impl Fn(&'a TransactionRecord) -> &'a str,
) -> Vec<EntityStats> {
    let mut entities: Vec<EntityStats> = Vec::new();
    let mut index_by_name: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let name = key(record);
        let index = *index_by_name.entry(name).or_insert_with(|| {
            entities.push(EntityStats {
                name: name.to_owned(),
                gross_revenue: 0.0,
                gross_transactions: 0,
                returns_value: 0.0,
                returns_count: 0,
                net_revenue: 0.0,
                net_transactions: 0,
            });
            entities.len() - 1
        });

        let entity = &mut entities[index];
        let classification = convention.classify(record);

        if classification.is_return {
            entity.returns_value += classification.returns;
            entity.returns_count += 1;
        } else {
            entity.gross_revenue += classification.gross;
            entity.gross_transactions += 1;
        }

        entity.net_revenue += classification.net();
        entity.net_transactions = entity.gross_transactions as i64 - entity.returns_count as i64;
    }

    entities.sort_by(|a, b| b.net_revenue.total_cmp(&a.net_revenue));
    entities
}
