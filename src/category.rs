//! Category Normalizer
//!
//! The film dimension encodes category membership as one boolean-ish flag
//! column per category. This module turns that wide encoding into a
//! normalized `(film_key, category)` relation.
//!
//! The set of flag columns is resolved once, when the tables are loaded, into a
//! [`CategoryMapping`]. Normalization then only consults that mapping.

use crate::error::Result;
use crate::frame::i64_values;
use crate::schema::film;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// One category flag column of the film dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryField {
    /// Column name in the film dimension
    pub column: String,

    /// Display name of the category
    pub category: String,
}

/// Explicit list of category flag columns, fixed at load time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    fields: Vec<CategoryField>,
}

impl CategoryMapping {
    /// Pin an explicit mapping of `(column, category)` pairs.
    pub fn new<C, N>(pairs: impl IntoIterator<Item = (C, N)>) -> Self
    where
        C: Into<String>,
        N: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(column, category)| CategoryField {
                    column: column.into(),
                    category: category.into(),
                })
                .collect(),
        }
    }

    /// Derive the mapping from the film dimension's column names.
    ///
    /// Columns whose name starts with `prefix` (ASCII case-insensitive) are
    /// category flags; the category name is the title-cased remainder.
    pub fn from_columns<S: AsRef<str>>(columns: &[S], prefix: &str) -> Self {
        let prefix_len = prefix.len();
        let fields = columns
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| c.len() > prefix_len && c.is_char_boundary(prefix_len))
            .filter(|c| c[..prefix_len].eq_ignore_ascii_case(prefix))
            .map(|c| CategoryField {
                column: c.to_string(),
                category: title_case(&c[prefix_len..]),
            })
            .collect();
        Self { fields }
    }

    /// Derive the mapping from a film dimension frame.
    pub fn from_frame(films: &DataFrame, prefix: &str) -> Self {
        Self::from_columns(&films.get_column_names(), prefix)
    }

    pub fn fields(&self) -> &[CategoryField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Whether a raw flag value means "member of this category".
///
/// Exhaustive: `true`, the integer 1 (any width), and the strings `"1"` and
/// `"true"` in any letter case are truthy. Everything else, floats and null
/// included, is not.
pub fn is_truthy(value: &AnyValue) -> bool {
    match value {
        AnyValue::Boolean(b) => *b,
        AnyValue::Int8(v) => *v == 1,
        AnyValue::Int16(v) => *v == 1,
        AnyValue::Int32(v) => *v == 1,
        AnyValue::Int64(v) => *v == 1,
        AnyValue::UInt8(v) => *v == 1,
        AnyValue::UInt16(v) => *v == 1,
        AnyValue::UInt32(v) => *v == 1,
        AnyValue::UInt64(v) => *v == 1,
        AnyValue::String(s) => is_truthy_str(s),
        _ => false,
    }
}

fn is_truthy_str(s: &str) -> bool {
    s == "1" || s.eq_ignore_ascii_case("true")
}

/// Title-case a flag suffix: `ACTION` → `Action`, `SCI_FI` → `Sci_Fi`,
/// `SCI-FI` → `Sci-Fi`. Every non-letter, underscore included, is kept and
/// starts a new word.
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_word_start = true;
    for ch in raw.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out.trim().to_string()
}

/// Converts the wide film dimension into the `(film_key, category)` relation.
pub struct CategoryNormalizer<'a> {
    mapping: &'a CategoryMapping,
}

impl<'a> CategoryNormalizer<'a> {
    pub fn new(mapping: &'a CategoryMapping) -> Self {
        Self { mapping }
    }

    /// Normalize `films` into a two-column frame (`film_key`, `category`).
    ///
    /// Returns an empty relation when there are no films or no mapped flag
    /// columns; mapped columns absent from `films` are skipped.
    pub fn normalize(&self, films: &DataFrame) -> Result<DataFrame> {
        if films.height() == 0 || self.mapping.is_empty() || films.column(film::FILM_KEY).is_err() {
            return empty_relation();
        }

        let film_keys = i64_values(films, film::FILM_KEY)?;
        let flags: Vec<(&CategoryField, &Series)> = self
            .mapping
            .fields()
            .iter()
            .filter_map(|field| films.column(&field.column).ok().map(|s| (field, s)))
            .collect();

        let mut seen: HashSet<(i64, &str)> = HashSet::new();
        let mut out_keys: Vec<i64> = Vec::new();
        let mut out_categories: Vec<&str> = Vec::new();

        for (row_idx, film_key) in film_keys.iter().enumerate() {
            let Some(film_key) = *film_key else {
                continue;
            };
            for (field, series) in &flags {
                let value = series.get(row_idx)?;
                if is_truthy(&value) && seen.insert((film_key, field.category.as_str())) {
                    out_keys.push(film_key);
                    out_categories.push(field.category.as_str());
                }
            }
        }

        debug!(
            "Normalized {} films x {} category flags into {} memberships",
            films.height(),
            flags.len(),
            out_keys.len()
        );

        Ok(DataFrame::new(vec![
            Series::new(film::FILM_KEY, out_keys),
            Series::new(film::CATEGORY, out_categories),
        ])?)
    }
}

fn empty_relation() -> Result<DataFrame> {
    Ok(DataFrame::new(vec![
        Series::new_empty(film::FILM_KEY, &DataType::Int64),
        Series::new_empty(film::CATEGORY, &DataType::String),
    ])?)
}
