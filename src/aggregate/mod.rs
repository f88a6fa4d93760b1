//! Section aggregators
//!
//! One module per dashboard section. Each takes the already filtered facts
//! and produces a [`SectionOutcome`]: a typed result, or `NoData` with the
//! reason shown to the user. Empty input is never an error.

pub mod duration;
pub mod inventory;
pub mod monthly_category;
pub mod store_performance;
pub mod top_customers;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::report::SectionOutcome;
use crate::section::Section;
use crate::tables::RentalTables;
use polars::prelude::*;

pub const NO_DATA: &str = "No data for selected filters.";
pub const NO_DATA_OR_CATEGORIES: &str = "No data or categories unavailable for selected filters.";
pub const NO_CATEGORY_REVENUE: &str = "No category revenue found for the current filters.";
pub const NO_DURATION_DATA: &str = "No duration data available under current filters.";

/// Everything an aggregator reads
pub struct SectionInputs<'a> {
    /// Facts after the date and store filter, with a `rental_date` column
    pub facts: &'a DataFrame,
    /// `(film_key, category)` relation; empty if no category section was asked for
    pub film_categories: &'a DataFrame,
    pub tables: &'a RentalTables,
    pub config: &'a AnalyticsConfig,
}

impl SectionInputs<'_> {
    pub fn has_facts(&self) -> bool {
        self.facts.height() > 0
    }

    pub fn has_categories(&self) -> bool {
        self.film_categories.height() > 0
    }
}

/// Run the aggregator behind `section`.
pub fn compute(section: Section, inputs: &SectionInputs<'_>) -> Result<SectionOutcome> {
    match section {
        Section::TopCustomers => top_customers::compute(inputs),
        Section::MonthlyCategory => monthly_category::compute(inputs),
        Section::StorePerformance => store_performance::compute(inputs),
        Section::Inventory => inventory::compute(inputs),
        Section::DurationByCategory => duration::compute(inputs),
    }
}
