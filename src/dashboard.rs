//! Dashboard pipeline
//!
//! One request runs: fact filter, category normalization (only when a
//! requested section needs it), then each requested section's aggregator.
//! Sections are independent of each other; a section with nothing to show
//! reports `NoData` instead of failing the whole request.

use crate::aggregate::{self, SectionInputs};
use crate::category::CategoryNormalizer;
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::filter::{FactFilter, FilterParams};
use crate::report::{DashboardReport, SectionOutcome, SectionReport};
use crate::section::Section;
use crate::tables::RentalTables;
use polars::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

pub struct Dashboard {
    config: AnalyticsConfig,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default())
    }
}

impl Dashboard {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Facts in the requested window and stores, with `rental_date` attached.
    pub fn filter_facts(&self, tables: &RentalTables, params: &FilterParams) -> Result<DataFrame> {
        FactFilter::new(params).apply(tables.fact(), tables.date_lookup())
    }

    /// The `(film_key, category)` relation of the loaded film dimension.
    pub fn film_categories(&self, tables: &RentalTables) -> Result<DataFrame> {
        CategoryNormalizer::new(tables.categories()).normalize(tables.films())
    }

    /// Compute a single section over already filtered facts.
    pub fn compute_section(
        &self,
        section: Section,
        tables: &RentalTables,
        facts: &DataFrame,
        film_categories: &DataFrame,
    ) -> Result<SectionOutcome> {
        let inputs = SectionInputs {
            facts,
            film_categories,
            tables,
            config: &self.config,
        };
        aggregate::compute(section, &inputs)
    }

    /// Run every requested section for `params`.
    pub fn run(&self, tables: &RentalTables, params: &FilterParams) -> Result<DashboardReport> {
        let started = Instant::now();
        let sections = params.sections();
        info!(
            "📊 Dashboard request {}..={} stores={:?} sections={:?}",
            params.date_start(),
            params.date_end(),
            params.store_ids(),
            sections.iter().map(|s| s.id()).collect::<Vec<_>>()
        );

        let facts = self.filter_facts(tables, params)?;
        let film_categories = if sections.iter().any(|s| s.needs_categories()) {
            self.film_categories(tables)?
        } else {
            DataFrame::empty()
        };

        let mut reports = Vec::with_capacity(sections.len());
        for section in sections {
            let outcome = self.compute_section(section, tables, &facts, &film_categories)?;
            match &outcome {
                SectionOutcome::Data { .. } => debug!("Section {} computed", section),
                SectionOutcome::NoData { reason } => info!("Section {}: {}", section, reason),
            }
            reports.push(SectionReport {
                section,
                title: section.title().to_string(),
                outcome,
            });
        }

        info!(
            "✅ Dashboard computed {} sections over {} facts in {:?}",
            reports.len(),
            facts.height(),
            started.elapsed()
        );

        Ok(DashboardReport {
            params: params.clone(),
            filtered_rows: facts.height(),
            sections: reports,
        })
    }
}
