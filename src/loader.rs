//! CSV export loader
//!
//! Reads a star schema exported as one CSV per table from a directory:
//! `fact_rental.csv`, `dim_customer.csv`, `dim_store.csv`, `dim_film.csv`
//! and `dim_date.csv`. Headers are lower-cased so exports from warehouses
//! with upper-case identifiers load unchanged.

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::schema::{customer, date, fact, film, store};
use crate::tables::RentalTables;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load all five tables from `dir` and validate them.
pub fn load_tables(dir: &Path, config: &AnalyticsConfig) -> Result<RentalTables> {
    info!("📂 Loading star schema from {}", dir.display());

    let fact = read_table(dir, fact::TABLE)?;
    let customers = read_table(dir, customer::TABLE)?;
    let stores = read_table(dir, store::TABLE)?;
    let films = read_table(dir, film::TABLE)?;
    let mut dates = read_table(dir, date::TABLE)?;

    // Some exports name the calendar column plain "date"
    if dates.column(date::CALENDAR_DATE).is_err() && dates.column("date").is_ok() {
        dates.rename("date", date::CALENDAR_DATE)?;
    }

    RentalTables::with_category_prefix(fact, customers, stores, films, dates, &config.category_prefix)
}

pub fn table_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("{}.csv", table))
}

/// Read `<dir>/<table>.csv` with lower-cased column names.
pub fn read_table(dir: &Path, table: &str) -> Result<DataFrame> {
    let path = table_path(dir, table);
    if !path.is_file() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )
        .into());
    }

    let mut df = LazyCsvReader::new(&path)
        .with_has_header(true)
        .finish()?
        .collect()?;

    let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    for name in names {
        let lowered = name.trim().to_ascii_lowercase();
        if lowered != name {
            df.rename(&name, &lowered)?;
        }
    }

    info!("✅ Loaded {}: {} rows, {} columns", table, df.height(), df.width());
    Ok(df)
}
