//! Fact Filter
//!
//! Restricts the fact table to an inclusive calendar window and, optionally, a
//! set of stores. The rental date key is resolved through the date dimension
//! on the way; a fact whose key does not resolve cannot be in range and is
//! dropped.

use crate::error::{RentalError, Result};
use crate::frame::i64_values;
use crate::schema::fact;
use crate::section::Section;
use crate::tables::DateLookup;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Parameters of one dashboard request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFilterParams")]
pub struct FilterParams {
    date_start: NaiveDate,
    date_end: NaiveDate,
    /// Matched against the fact's `store_key`; empty means every store
    store_ids: BTreeSet<i64>,
    sections: Vec<Section>,
}

impl FilterParams {
    /// Both bounds are inclusive. A reversed range is a caller error.
    pub fn new(date_start: NaiveDate, date_end: NaiveDate) -> Result<Self> {
        if date_start > date_end {
            return Err(RentalError::MalformedFilterRange {
                start: date_start,
                end: date_end,
            });
        }
        Ok(Self {
            date_start,
            date_end,
            store_ids: BTreeSet::new(),
            sections: Vec::new(),
        })
    }

    pub fn with_stores(mut self, store_ids: impl IntoIterator<Item = i64>) -> Self {
        self.store_ids = store_ids.into_iter().collect();
        self
    }

    pub fn with_sections(mut self, sections: impl IntoIterator<Item = Section>) -> Self {
        self.sections = sections.into_iter().collect();
        self
    }

    pub fn date_start(&self) -> NaiveDate {
        self.date_start
    }

    pub fn date_end(&self) -> NaiveDate {
        self.date_end
    }

    pub fn store_ids(&self) -> &BTreeSet<i64> {
        &self.store_ids
    }

    /// Requested sections in request order, duplicates removed. Falls back to
    /// [`Section::DEFAULT_SELECTION`] when none were named.
    pub fn sections(&self) -> Vec<Section> {
        if self.sections.is_empty() {
            return Section::DEFAULT_SELECTION.to_vec();
        }
        let mut out: Vec<Section> = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            if !out.contains(section) {
                out.push(*section);
            }
        }
        out
    }

    pub fn contains_date(&self, day: NaiveDate) -> bool {
        self.date_start <= day && day <= self.date_end
    }

    pub fn allows_store(&self, store_key: Option<i64>) -> bool {
        if self.store_ids.is_empty() {
            return true;
        }
        store_key.map_or(false, |key| self.store_ids.contains(&key))
    }
}

/// Wire shape of [`FilterParams`]; deserialization goes through
/// [`FilterParams::new`] so a reversed range is rejected there too.
#[derive(Deserialize)]
struct RawFilterParams {
    date_start: NaiveDate,
    date_end: NaiveDate,
    #[serde(default)]
    store_ids: BTreeSet<i64>,
    #[serde(default)]
    sections: Vec<Section>,
}

impl TryFrom<RawFilterParams> for FilterParams {
    type Error = RentalError;

    fn try_from(raw: RawFilterParams) -> Result<Self> {
        Ok(FilterParams::new(raw.date_start, raw.date_end)?
            .with_stores(raw.store_ids)
            .with_sections(raw.sections))
    }
}

/// Stable filter over the fact table
pub struct FactFilter<'a> {
    params: &'a FilterParams,
}

impl<'a> FactFilter<'a> {
    pub fn new(params: &'a FilterParams) -> Self {
        Self { params }
    }

    /// Keep the facts whose resolved rental date lies in the window and whose
    /// store is selected. The result carries an extra `rental_date` column and
    /// keeps the input row order.
    pub fn apply(&self, facts: &DataFrame, dates: &DateLookup) -> Result<DataFrame> {
        let date_keys = i64_values(facts, fact::RENTAL_DATE_KEY)?;
        let store_keys = i64_values(facts, fact::STORE_KEY)?;

        let resolved: Vec<Option<NaiveDate>> = date_keys
            .iter()
            .map(|key| key.and_then(|k| dates.resolve(k)))
            .collect();

        let unresolved = resolved.iter().filter(|d| d.is_none()).count();
        if unresolved > 0 {
            warn!("Dropping {} fact rows whose rental date key does not resolve", unresolved);
        }

        let mask: Vec<bool> = resolved
            .iter()
            .zip(store_keys.iter())
            .map(|(day, store_key)| match day {
                Some(day) => self.params.contains_date(*day) && self.params.allows_store(*store_key),
                None => false,
            })
            .collect();

        let mut with_dates = facts.clone();
        with_dates.with_column(Series::new(fact::RENTAL_DATE, resolved))?;
        let filtered = with_dates.filter(&BooleanChunked::from_slice("mask", &mask))?;

        debug!(
            "Fact filter {}..={} stores={:?}: {} -> {} rows",
            self.params.date_start,
            self.params.date_end,
            self.params.store_ids,
            facts.height(),
            filtered.height()
        );

        Ok(filtered)
    }
}
