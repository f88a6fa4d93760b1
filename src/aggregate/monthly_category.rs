//! Monthly revenue by film category

use super::{SectionInputs, NO_CATEGORY_REVENUE, NO_DATA_OR_CATEGORIES};
use crate::error::Result;
use crate::formatter::ResultFormatter;
use crate::frame::{date_values, f64_values, str_values};
use crate::join_resolver::JoinResolver;
use crate::report::{MonthlyCategoryRevenue, MonthlyCategoryRow, SectionOutcome, SectionResult};
use crate::schema::{fact, film};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::debug;

const RENTAL_MONTH: &str = "rental_month";
const REVENUE: &str = "revenue";

/// First day of the month containing `day`.
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

pub fn compute(inputs: &SectionInputs<'_>) -> Result<SectionOutcome> {
    if !inputs.has_facts() || !inputs.has_categories() {
        return Ok(SectionOutcome::no_data(NO_DATA_OR_CATEGORIES));
    }

    let months: Vec<Option<NaiveDate>> = date_values(inputs.facts, fact::RENTAL_DATE)?
        .into_iter()
        .map(|day| day.map(month_start))
        .collect();
    let mut dated = inputs.facts.clone();
    dated.with_column(Series::new(RENTAL_MONTH, months))?;

    let joined = JoinResolver.attach_categories(&dated, inputs.film_categories)?;

    let grouped = joined
        .lazy()
        .filter(
            col(RENTAL_MONTH)
                .is_not_null()
                .and(col(fact::PAYMENT_AMOUNT).is_not_null())
                .and(col(film::CATEGORY).is_not_null()),
        )
        .group_by_stable([col(RENTAL_MONTH), col(film::CATEGORY)])
        .agg([col(fact::PAYMENT_AMOUNT).sum().alias(REVENUE)])
        .collect()?;

    if grouped.height() == 0 {
        return Ok(SectionOutcome::no_data(NO_CATEGORY_REVENUE));
    }

    let months = date_values(&grouped, RENTAL_MONTH)?;
    let categories = str_values(&grouped, film::CATEGORY)?;
    let revenue = f64_values(&grouped, REVENUE)?;

    let rows: Vec<MonthlyCategoryRow> = months
        .into_iter()
        .zip(categories)
        .zip(revenue)
        .filter_map(|((month, category), revenue)| {
            Some(MonthlyCategoryRow {
                rental_month: month?,
                film_category: category?,
                revenue: revenue.unwrap_or(0.0),
            })
        })
        .collect();

    let rows = ResultFormatter.monthly_category(rows);
    let trend = ResultFormatter.category_trend(&rows);
    debug!(
        "Monthly category revenue: {} rows over {} months and {} categories",
        rows.len(),
        trend.months.len(),
        trend.categories.len()
    );

    Ok(SectionOutcome::data(SectionResult::MonthlyCategory(
        MonthlyCategoryRevenue { rows, trend },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_start() {
        let day = NaiveDate::from_ymd_opt(2005, 7, 31).unwrap();
        assert_eq!(month_start(day), NaiveDate::from_ymd_opt(2005, 7, 1).unwrap());
    }
}
