//! Inventory utilization: how often each physical item was rented

use super::{SectionInputs, NO_DATA};
use crate::error::Result;
use crate::formatter::ResultFormatter;
use crate::frame::{i64_values, key_at};
use crate::report::{InventoryRow, InventoryUtilization, RentalsBucket, SectionOutcome, SectionResult};
use crate::schema::fact;
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

const RENTALS: &str = "rentals";

/// Item counts per rentals value, ascending by rentals.
pub fn rentals_histogram(rows: &[InventoryRow]) -> Vec<RentalsBucket> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(row.rentals).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(rentals, items)| RentalsBucket { rentals, items })
        .collect()
}

pub fn compute(inputs: &SectionInputs<'_>) -> Result<SectionOutcome> {
    if !inputs.has_facts() {
        return Ok(SectionOutcome::no_data(NO_DATA));
    }

    let grouped = inputs
        .facts
        .clone()
        .lazy()
        .filter(col(fact::INVENTORY_ID).is_not_null())
        .group_by_stable([col(fact::INVENTORY_ID)])
        .agg([col(fact::COUNT_RENTALS).sum().alias(RENTALS)])
        .collect()?;

    if grouped.height() == 0 {
        return Ok(SectionOutcome::no_data(NO_DATA));
    }

    let ids = i64_values(&grouped, fact::INVENTORY_ID)?;
    let rentals = i64_values(&grouped, RENTALS)?;

    let mut rows = Vec::with_capacity(grouped.height());
    for idx in 0..grouped.height() {
        rows.push(InventoryRow {
            inventory_id: key_at(&ids, idx, fact::INVENTORY_ID)?,
            rentals: rentals[idx].unwrap_or(0),
        });
    }

    let item_count = rows.len();
    let avg_rentals_per_item = rows.iter().map(|r| r.rentals as f64).sum::<f64>() / item_count as f64;
    let histogram = rentals_histogram(&rows);
    let top_items = ResultFormatter.top_inventory(&rows, inputs.config.top_inventory_limit);

    debug!(
        "Inventory utilization: {} items, {:.2} rentals per item",
        item_count, avg_rentals_per_item
    );

    Ok(SectionOutcome::data(SectionResult::Inventory(InventoryUtilization {
        item_count,
        avg_rentals_per_item,
        histogram,
        top_items,
    })))
}
