//! Store performance: revenue, rentals and average ticket per store

use super::{SectionInputs, NO_DATA};
use crate::error::Result;
use crate::formatter::{store_label, ResultFormatter};
use crate::frame::{f64_values, flag_values, i64_values, key_at, str_values};
use crate::join_resolver::{full_name, JoinResolver, STORE_MATCHED};
use crate::report::{SectionOutcome, SectionResult, StorePerformance, StorePerformanceRow};
use crate::schema::{fact, store};
use polars::prelude::*;
use tracing::debug;

const REVENUE: &str = "revenue";
const RENTALS: &str = "rentals";
const TXNS: &str = "txns";

/// `revenue / txns`, or `None` for a store without transactions.
pub fn avg_ticket(revenue: f64, txns: i64) -> Option<f64> {
    if txns > 0 {
        Some(revenue / txns as f64)
    } else {
        None
    }
}

pub fn compute(inputs: &SectionInputs<'_>) -> Result<SectionOutcome> {
    if !inputs.has_facts() {
        return Ok(SectionOutcome::no_data(NO_DATA));
    }

    let grouped = inputs
        .facts
        .clone()
        .lazy()
        .filter(col(fact::STORE_KEY).is_not_null())
        .group_by_stable([col(fact::STORE_KEY)])
        .agg([
            col(fact::PAYMENT_AMOUNT).sum().alias(REVENUE),
            col(fact::COUNT_RENTALS).sum().alias(RENTALS),
            len().alias(TXNS),
        ])
        .collect()?;

    if grouped.height() == 0 {
        return Ok(SectionOutcome::no_data(NO_DATA));
    }

    let joined = JoinResolver.attach_stores(grouped, inputs.tables.stores())?;

    let keys = i64_values(&joined, fact::STORE_KEY)?;
    let ids = i64_values(&joined, store::STORE_ID)?;
    let firsts = str_values(&joined, store::MANAGER_FIRST_NAME)?;
    let lasts = str_values(&joined, store::MANAGER_LAST_NAME)?;
    let revenue = f64_values(&joined, REVENUE)?;
    let rentals = i64_values(&joined, RENTALS)?;
    let txns = i64_values(&joined, TXNS)?;
    let matched = flag_values(&joined, STORE_MATCHED)?;

    let mut rows = Vec::with_capacity(joined.height());
    for idx in 0..joined.height() {
        let store_key = key_at(&keys, idx, fact::STORE_KEY)?;
        let manager = full_name(firsts[idx].as_deref(), lasts[idx].as_deref());
        let revenue = revenue[idx].unwrap_or(0.0);
        let txns = txns[idx].unwrap_or(0);
        rows.push(StorePerformanceRow {
            store_key,
            store_id: ids[idx],
            store_label: store_label(store_key, ids[idx], matched[idx], &manager),
            revenue,
            rentals: rentals[idx].unwrap_or(0),
            txns,
            avg_ticket: avg_ticket(revenue, txns),
        });
    }

    let rows = ResultFormatter.store_performance(rows);
    let summary = ResultFormatter.store_summary(&rows);
    debug!(
        "Store performance: {} stores, total revenue {:.2}",
        rows.len(),
        summary.total_revenue
    );

    Ok(SectionOutcome::data(SectionResult::StorePerformance(
        StorePerformance { rows, summary },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avg_ticket() {
        assert_eq!(avg_ticket(10.0, 4), Some(2.5));
        assert_eq!(avg_ticket(0.0, 0), None);
    }
}
