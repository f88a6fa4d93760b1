//! Column extraction helpers
//!
//! Aggregations run through polars; the rows they produce are read back into
//! plain Rust values here so labels, sorting and summaries stay typed.

use crate::error::{RentalError, Result};
use chrono::NaiveDate;
use polars::prelude::*;

pub fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let series = df.column(name)?.cast(&DataType::Int64)?;
    let values = series.i64()?.into_iter().collect();
    Ok(values)
}

pub fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values = series.f64()?.into_iter().collect();
    Ok(values)
}

pub fn str_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df.column(name)?.cast(&DataType::String)?;
    let values = series
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(values)
}

/// Presence flags of a join marker column; null reads as `false`.
pub fn flag_values(df: &DataFrame, name: &str) -> Result<Vec<bool>> {
    let series = df.column(name)?.cast(&DataType::Boolean)?;
    let values = series.bool()?.into_iter().map(|v| v.unwrap_or(false)).collect();
    Ok(values)
}

/// Read a calendar date column delivered either as `Date` or as ISO strings.
///
/// Strings that do not parse as `YYYY-MM-DD` become null; other dtypes are
/// rejected.
pub fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    let series = df.column(name)?;
    match series.dtype() {
        DataType::Date => Ok(series.date()?.as_date_iter().collect()),
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
            .collect()),
        DataType::Datetime(_, _) => {
            let as_date = series.cast(&DataType::Date)?;
            let values = as_date.date()?.as_date_iter().collect();
            Ok(values)
        }
        other => Err(RentalError::InvalidInput(format!(
            "column '{}' has type {} but a calendar date was expected",
            name, other
        ))),
    }
}

/// Required (non-null) key at `idx`, used after null keys were filtered out.
pub fn key_at(values: &[Option<i64>], idx: usize, column: &str) -> Result<i64> {
    values
        .get(idx)
        .copied()
        .flatten()
        .ok_or_else(|| RentalError::InvalidInput(format!("null or missing '{}' at row {}", column, idx)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_values_from_strings() {
        let df = df![
            "calendar_date" => ["2005-05-24", "not a date", "2005-06-01"]
        ]
        .unwrap();

        let dates = date_values(&df, "calendar_date").unwrap();
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2005, 5, 24));
        assert_eq!(dates[1], None);
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2005, 6, 1));
    }

    #[test]
    fn test_date_values_from_date_column() {
        let day = NaiveDate::from_ymd_opt(2005, 7, 8).unwrap();
        let df = DataFrame::new(vec![Series::new("calendar_date", vec![Some(day), None])]).unwrap();

        let dates = date_values(&df, "calendar_date").unwrap();
        assert_eq!(dates, vec![Some(day), None]);
    }

    #[test]
    fn test_date_values_rejects_numbers() {
        let df = df!["calendar_date" => [1.5f64, 2.5]].unwrap();
        assert!(matches!(
            date_values(&df, "calendar_date"),
            Err(RentalError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_numeric_values_cast() {
        let df = df![
            "k" => [1i32, 2, 3],
            "v" => [Some(1.5f64), None, Some(3.0)]
        ]
        .unwrap();

        assert_eq!(i64_values(&df, "k").unwrap(), vec![Some(1), Some(2), Some(3)]);
        assert_eq!(f64_values(&df, "v").unwrap(), vec![Some(1.5), None, Some(3.0)]);
        assert_eq!(key_at(&[Some(7), None], 0, "k").unwrap(), 7);
        assert!(key_at(&[Some(7), None], 1, "k").is_err());
    }

    #[test]
    fn test_flag_values_null_is_false() {
        let df = df!["matched" => [Some(true), None]].unwrap();
        assert_eq!(flag_values(&df, "matched").unwrap(), vec![true, false]);
    }
}
