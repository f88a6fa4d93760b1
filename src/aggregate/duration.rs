//! Average rental duration by film category

use super::{SectionInputs, NO_DATA_OR_CATEGORIES, NO_DURATION_DATA};
use crate::error::Result;
use crate::formatter::ResultFormatter;
use crate::frame::{f64_values, str_values};
use crate::join_resolver::JoinResolver;
use crate::report::{CategoryDurationRow, DurationByCategory, SectionOutcome, SectionResult};
use crate::schema::{fact, film};
use polars::prelude::*;
use tracing::debug;

const AVG_RENTAL_DURATION: &str = "avg_rental_duration";

pub fn compute(inputs: &SectionInputs<'_>) -> Result<SectionOutcome> {
    if !inputs.has_facts() || !inputs.has_categories() {
        return Ok(SectionOutcome::no_data(NO_DATA_OR_CATEGORIES));
    }

    let joined = JoinResolver.attach_categories(inputs.facts, inputs.film_categories)?;

    let grouped = joined
        .lazy()
        .filter(
            col(film::CATEGORY)
                .is_not_null()
                .and(col(fact::RENTAL_DURATION).is_not_null()),
        )
        .group_by_stable([col(film::CATEGORY)])
        .agg([col(fact::RENTAL_DURATION).mean().alias(AVG_RENTAL_DURATION)])
        .collect()?;

    if grouped.height() == 0 {
        return Ok(SectionOutcome::no_data(NO_DURATION_DATA));
    }

    let categories = str_values(&grouped, film::CATEGORY)?;
    let averages = f64_values(&grouped, AVG_RENTAL_DURATION)?;

    let rows: Vec<CategoryDurationRow> = categories
        .into_iter()
        .zip(averages)
        .filter_map(|(category, avg)| {
            Some(CategoryDurationRow {
                film_category: category?,
                avg_rental_duration: avg?,
            })
        })
        .collect();

    let rows = ResultFormatter.duration_by_category(rows);
    debug!("Duration by category: {} categories", rows.len());

    Ok(SectionOutcome::data(SectionResult::DurationByCategory(
        DurationByCategory { rows },
    )))
}
