//! Star schema input tables
//!
//! [`RentalTables`] is what the data-access collaborator hands over: the fact
//! table plus the customer, store, film and date dimensions, validated and
//! type-coerced once. Everything downstream reads these tables and never
//! mutates them.

use crate::category::CategoryMapping;
use crate::error::{RentalError, Result};
use crate::frame::{date_values, f64_values, i64_values};
use crate::schema::{self, customer, date, fact, film, store};
use chrono::NaiveDate;
use itertools::Itertools;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Translation of fact date keys into calendar dates
#[derive(Debug, Clone, Default)]
pub struct DateLookup {
    by_key: HashMap<i64, NaiveDate>,
}

impl DateLookup {
    /// Build the lookup from the date dimension. Rows with a null key or an
    /// unparseable date are left out, so facts pointing at them stay
    /// unresolved.
    pub fn from_frame(dates: &DataFrame) -> Result<Self> {
        if dates.height() == 0 {
            return Ok(Self::default());
        }
        let keys = i64_values(dates, date::DATE_KEY)?;
        let days = date_values(dates, date::CALENDAR_DATE)?;

        let mut by_key = HashMap::with_capacity(keys.len());
        let mut duplicates = 0usize;
        for (key, day) in keys.into_iter().zip(days) {
            if let (Some(key), Some(day)) = (key, day) {
                if by_key.insert(key, day).is_some() {
                    duplicates += 1;
                }
            }
        }
        if duplicates > 0 {
            warn!(
                "{} duplicate date_key rows in date dimension; keeping the last row for each key",
                duplicates
            );
        }
        Ok(Self { by_key })
    }

    pub fn resolve(&self, date_key: i64) -> Option<NaiveDate> {
        self.by_key.get(&date_key).copied()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Earliest and latest calendar dates known to the lookup.
    pub fn bounds(&self) -> Option<DateBounds> {
        let min = self.by_key.values().min().copied()?;
        let max = self.by_key.values().max().copied()?;
        Some(DateBounds { min, max })
    }
}

/// Calendar span of the date dimension, the default dashboard range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    pub fn from_dates(dates: &DataFrame) -> Result<Option<Self>> {
        Ok(DateLookup::from_frame(dates)?.bounds())
    }
}

/// Validated input tables for one or more dashboard computations
#[derive(Debug, Clone)]
pub struct RentalTables {
    fact: DataFrame,
    customers: DataFrame,
    stores: DataFrame,
    films: DataFrame,
    dates: DataFrame,
    date_lookup: DateLookup,
    categories: CategoryMapping,
}

impl RentalTables {
    /// Validate and coerce the star schema.
    ///
    /// Fails on missing required columns and on negative payment amounts.
    /// A dimension given as a column-less frame is treated as empty.
    pub fn new(
        fact: DataFrame,
        customers: DataFrame,
        stores: DataFrame,
        films: DataFrame,
        dates: DataFrame,
        categories: CategoryMapping,
    ) -> Result<Self> {
        let fact = schema::coerce_table(fact, fact::TABLE, schema::FACT_COLUMNS, schema::FACT_OPTIONAL_COLUMNS)?;
        let customers = schema::coerce_table(customers, customer::TABLE, schema::CUSTOMER_COLUMNS, &[])?;
        let stores = schema::coerce_table(stores, store::TABLE, schema::STORE_COLUMNS, &[])?;
        let films = schema::coerce_table(films, film::TABLE, schema::FILM_COLUMNS, &[])?;
        let dates = schema::coerce_table(dates, date::TABLE, schema::DATE_COLUMNS, &[])?;

        if let Some(bad) = f64_values(&fact, fact::PAYMENT_AMOUNT)?
            .into_iter()
            .flatten()
            .find(|amount| *amount < 0.0)
        {
            return Err(RentalError::InvalidInput(format!(
                "payment_amount must be non-negative, found {}",
                bad
            )));
        }

        let date_lookup = DateLookup::from_frame(&dates)?;

        debug!(
            "Loaded star schema: {} facts, {} customers, {} stores, {} films ({} category flags), {} dates",
            fact.height(),
            customers.height(),
            stores.height(),
            films.height(),
            categories.len(),
            date_lookup.len()
        );

        Ok(Self {
            fact,
            customers,
            stores,
            films,
            dates,
            date_lookup,
            categories,
        })
    }

    /// Like [`RentalTables::new`], deriving the category mapping from the film
    /// dimension's columns using `prefix`.
    pub fn with_category_prefix(
        fact: DataFrame,
        customers: DataFrame,
        stores: DataFrame,
        films: DataFrame,
        dates: DataFrame,
        prefix: &str,
    ) -> Result<Self> {
        let categories = CategoryMapping::from_frame(&films, prefix);
        Self::new(fact, customers, stores, films, dates, categories)
    }

    pub fn fact(&self) -> &DataFrame {
        &self.fact
    }

    pub fn customers(&self) -> &DataFrame {
        &self.customers
    }

    pub fn stores(&self) -> &DataFrame {
        &self.stores
    }

    pub fn films(&self) -> &DataFrame {
        &self.films
    }

    pub fn dates(&self) -> &DataFrame {
        &self.dates
    }

    pub fn date_lookup(&self) -> &DateLookup {
        &self.date_lookup
    }

    pub fn categories(&self) -> &CategoryMapping {
        &self.categories
    }

    pub fn date_bounds(&self) -> Option<DateBounds> {
        self.date_lookup.bounds()
    }

    /// Distinct store ids for the store selector, ascending.
    pub fn store_choices(&self) -> Result<Vec<i64>> {
        store_choices(&self.stores)
    }
}

/// Distinct, non-null `store_id`s of the store dimension, ascending.
pub fn store_choices(stores: &DataFrame) -> Result<Vec<i64>> {
    if stores.height() == 0 {
        return Ok(Vec::new());
    }
    Ok(i64_values(stores, store::STORE_ID)?
        .into_iter()
        .flatten()
        .sorted()
        .dedup()
        .collect())
}
