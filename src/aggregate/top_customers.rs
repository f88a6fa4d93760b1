//! Top customers by revenue

use super::{SectionInputs, NO_DATA};
use crate::error::Result;
use crate::formatter::{customer_name, ResultFormatter};
use crate::frame::{f64_values, flag_values, i64_values, key_at, str_values};
use crate::join_resolver::{full_name, JoinResolver, CUSTOMER_MATCHED};
use crate::report::{SectionOutcome, SectionResult, TopCustomerRow, TopCustomers};
use crate::schema::{customer, fact};
use polars::prelude::*;
use tracing::debug;

const TOTAL_REVENUE: &str = "total_revenue";

pub fn compute(inputs: &SectionInputs<'_>) -> Result<SectionOutcome> {
    if !inputs.has_facts() {
        return Ok(SectionOutcome::no_data(NO_DATA));
    }

    let grouped = inputs
        .facts
        .clone()
        .lazy()
        .filter(col(fact::CUSTOMER_KEY).is_not_null())
        .group_by_stable([col(fact::CUSTOMER_KEY)])
        .agg([col(fact::PAYMENT_AMOUNT).sum().alias(TOTAL_REVENUE)])
        .collect()?;

    if grouped.height() == 0 {
        return Ok(SectionOutcome::no_data(NO_DATA));
    }

    let joined = JoinResolver.attach_customers(grouped, inputs.tables.customers())?;

    let keys = i64_values(&joined, fact::CUSTOMER_KEY)?;
    let ids = i64_values(&joined, customer::CUSTOMER_ID)?;
    let firsts = str_values(&joined, customer::FIRST_NAME)?;
    let lasts = str_values(&joined, customer::LAST_NAME)?;
    let revenue = f64_values(&joined, TOTAL_REVENUE)?;
    let matched = flag_values(&joined, CUSTOMER_MATCHED)?;

    let mut rows = Vec::with_capacity(joined.height());
    for idx in 0..joined.height() {
        let customer_key = key_at(&keys, idx, fact::CUSTOMER_KEY)?;
        let name = full_name(firsts[idx].as_deref(), lasts[idx].as_deref());
        rows.push(TopCustomerRow {
            customer_key,
            customer_id: ids[idx],
            customer_name: customer_name(customer_key, matched[idx], &name),
            total_revenue: revenue[idx].unwrap_or(0.0),
        });
    }

    let rows = ResultFormatter.top_customers(rows, inputs.config.top_customers_limit);
    debug!("Top customers: {} rows", rows.len());

    Ok(SectionOutcome::data(SectionResult::TopCustomers(TopCustomers { rows })))
}
