//! Star schema column names and input coercion
//!
//! The data-access side hands over one fact table and four dimensions. Column
//! names are fixed here; types are coerced once on load so every join and
//! group-by downstream works on Int64 surrogate keys and Float64 measures.

use crate::error::{RentalError, Result};
use polars::prelude::*;

pub mod fact {
    pub const TABLE: &str = "fact_rental";
    pub const RENTAL_ID: &str = "rental_id";
    pub const CUSTOMER_KEY: &str = "customer_key";
    pub const STAFF_KEY: &str = "staff_key";
    pub const FILM_KEY: &str = "film_key";
    pub const STORE_KEY: &str = "store_key";
    pub const INVENTORY_ID: &str = "inventory_id";
    pub const RENTAL_DATE_KEY: &str = "rental_date_key";
    pub const RETURN_DATE_KEY: &str = "return_date_key";
    pub const COUNT_RENTALS: &str = "count_rentals";
    pub const COUNT_RETURNS: &str = "count_returns";
    pub const RENTAL_DURATION: &str = "rental_duration";
    pub const PAYMENT_AMOUNT: &str = "payment_amount";
    /// Added by the fact filter once the date key is resolved
    pub const RENTAL_DATE: &str = "rental_date";
}

pub mod customer {
    pub const TABLE: &str = "dim_customer";
    pub const CUSTOMER_KEY: &str = "customer_key";
    pub const CUSTOMER_ID: &str = "customer_id";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
}

pub mod store {
    pub const TABLE: &str = "dim_store";
    pub const STORE_KEY: &str = "store_key";
    pub const STORE_ID: &str = "store_id";
    pub const MANAGER_FIRST_NAME: &str = "manager_first_name";
    pub const MANAGER_LAST_NAME: &str = "manager_last_name";
}

pub mod film {
    pub const TABLE: &str = "dim_film";
    pub const FILM_KEY: &str = "film_key";
    /// Column of the normalized (film, category) relation
    pub const CATEGORY: &str = "category";
}

pub mod date {
    pub const TABLE: &str = "dim_date";
    pub const DATE_KEY: &str = "date_key";
    pub const CALENDAR_DATE: &str = "calendar_date";
}

/// Expected type of an input column after coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Key,
    Count,
    Measure,
    Text,
    /// Left as delivered; interpreted by the consumer.
    Raw,
}

impl ColumnKind {
    fn target(self) -> Option<DataType> {
        match self {
            ColumnKind::Key | ColumnKind::Count => Some(DataType::Int64),
            ColumnKind::Measure => Some(DataType::Float64),
            ColumnKind::Text => Some(DataType::String),
            ColumnKind::Raw => None,
        }
    }
}

pub const FACT_COLUMNS: &[(&str, ColumnKind)] = &[
    (fact::RENTAL_ID, ColumnKind::Key),
    (fact::CUSTOMER_KEY, ColumnKind::Key),
    (fact::FILM_KEY, ColumnKind::Key),
    (fact::STORE_KEY, ColumnKind::Key),
    (fact::INVENTORY_ID, ColumnKind::Key),
    (fact::RENTAL_DATE_KEY, ColumnKind::Key),
    (fact::COUNT_RENTALS, ColumnKind::Count),
    (fact::RENTAL_DURATION, ColumnKind::Measure),
    (fact::PAYMENT_AMOUNT, ColumnKind::Measure),
];

/// Carried through when present, never required.
pub const FACT_OPTIONAL_COLUMNS: &[(&str, ColumnKind)] = &[
    (fact::STAFF_KEY, ColumnKind::Key),
    (fact::RETURN_DATE_KEY, ColumnKind::Key),
    (fact::COUNT_RETURNS, ColumnKind::Count),
];

pub const CUSTOMER_COLUMNS: &[(&str, ColumnKind)] = &[
    (customer::CUSTOMER_KEY, ColumnKind::Key),
    (customer::CUSTOMER_ID, ColumnKind::Key),
    (customer::FIRST_NAME, ColumnKind::Text),
    (customer::LAST_NAME, ColumnKind::Text),
];

pub const STORE_COLUMNS: &[(&str, ColumnKind)] = &[
    (store::STORE_KEY, ColumnKind::Key),
    (store::STORE_ID, ColumnKind::Key),
    (store::MANAGER_FIRST_NAME, ColumnKind::Text),
    (store::MANAGER_LAST_NAME, ColumnKind::Text),
];

pub const FILM_COLUMNS: &[(&str, ColumnKind)] = &[(film::FILM_KEY, ColumnKind::Key)];

pub const DATE_COLUMNS: &[(&str, ColumnKind)] = &[
    (date::DATE_KEY, ColumnKind::Key),
    (date::CALENDAR_DATE, ColumnKind::Raw),
];

/// Fail with `MissingColumn` for the first required column `df` lacks.
pub fn require_columns(df: &DataFrame, table: &str, columns: &[(&str, ColumnKind)]) -> Result<()> {
    let present = df.get_column_names();
    for (name, _) in columns {
        if !present.iter().any(|c| c == name) {
            return Err(RentalError::MissingColumn {
                table: table.to_string(),
                column: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Validate and cast a table to the expected column types.
///
/// A dimension delivered with no rows and no columns is accepted as an empty
/// lookup: joins against it resolve nothing rather than failing.
pub fn coerce_table(
    df: DataFrame,
    table: &str,
    required: &[(&str, ColumnKind)],
    optional: &[(&str, ColumnKind)],
) -> Result<DataFrame> {
    if df.width() == 0 {
        return Ok(empty_table(required));
    }
    require_columns(&df, table, required)?;

    let present: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    let casts: Vec<Expr> = required
        .iter()
        .chain(optional.iter())
        .filter(|(name, _)| present.iter().any(|p| p == name))
        .filter_map(|(name, kind)| kind.target().map(|dtype| col(name).cast(dtype)))
        .collect();

    if casts.is_empty() {
        return Ok(df);
    }

    Ok(df.lazy().with_columns(casts).collect()?)
}

/// Zero-row table with the given columns, used for missing dimensions.
pub fn empty_table(columns: &[(&str, ColumnKind)]) -> DataFrame {
    let series: Vec<Series> = columns
        .iter()
        .map(|(name, kind)| {
            let dtype = kind.target().unwrap_or(DataType::String);
            Series::new_empty(name, &dtype)
        })
        .collect();
    DataFrame::new(series).unwrap_or_else(|_| DataFrame::empty())
}
