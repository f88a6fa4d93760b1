use chrono::NaiveDate;
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalError {
    #[error("Malformed filter range: start {start} is after end {end}")]
    MalformedFilterRange { start: NaiveDate, end: NaiveDate },

    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, RentalError>;
