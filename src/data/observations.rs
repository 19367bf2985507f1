//! Observation Table Module
//! Normalizes the raw export (timestamp parsing, month column, numeric casts)
//! and applies the range-based cleaning. Read-only after startup.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;

use super::schema::{ValidRange, MONTH_COL, RAW_TIMESTAMP_COL, TIMESTAMP_COL};

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column not found: {0}")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Accepted textual timestamp layouts, tried in order.
const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a timestamp leniently; anything unrecognised is missing.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// In-memory sensor readings, one row per timestamp.
#[derive(Debug, Clone)]
pub struct ObservationTable {
    df: DataFrame,
}

impl ObservationTable {
    /// Normalize a freshly loaded DataFrame.
    ///
    /// `SoftwareVersion` is renamed to `Fecha` and parsed into epoch seconds
    /// (unparseable values become null), `Mes` is derived from it and every
    /// numeric column is widened to Float64.
    pub fn from_raw(mut df: DataFrame) -> Result<Self, TableError> {
        if df.get_column_index(RAW_TIMESTAMP_COL).is_some() {
            df.rename(RAW_TIMESTAMP_COL, TIMESTAMP_COL.into())?;
        }

        let numeric: Vec<String> = df
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != TIMESTAMP_COL && is_numeric(c.dtype()))
            .map(|c| c.name().to_string())
            .collect();
        for name in numeric {
            let widened = df.column(&name)?.cast(&DataType::Float64)?;
            df.with_column(widened)?;
        }

        if df.get_column_index(TIMESTAMP_COL).is_some() {
            let text = df.column(TIMESTAMP_COL)?.cast(&DataType::String)?;
            let parsed: Vec<Option<NaiveDateTime>> = text
                .str()?
                .into_iter()
                .map(|v| v.and_then(parse_timestamp))
                .collect();

            let seconds: Vec<Option<f64>> = parsed
                .iter()
                .map(|dt| dt.map(|dt| dt.and_utc().timestamp() as f64))
                .collect();
            let months: Vec<Option<i32>> = parsed
                .iter()
                .map(|dt| dt.map(|dt| dt.month() as i32))
                .collect();

            let unparsed = seconds.iter().filter(|s| s.is_none()).count();
            if unparsed > 0 {
                log::warn!("{} timestamps could not be parsed", unparsed);
            }

            df.with_column(Column::new(TIMESTAMP_COL.into(), seconds))?;
            df.with_column(Column::new(MONTH_COL.into(), months))?;
        } else {
            log::warn!("No {} column, time axes will be empty", TIMESTAMP_COL);
        }

        Ok(Self { df })
    }

    /// Replace out-of-range and NaN readings with nulls.
    /// Columns that are not present are skipped.
    pub fn apply_valid_ranges(&mut self, ranges: &[ValidRange]) -> Result<(), TableError> {
        for range in ranges {
            for &name in range.columns {
                if !self.has_column(name) {
                    log::warn!("Range cleaning skipped, column {} not found", name);
                    continue;
                }
                let values = self.df.column(name)?.cast(&DataType::Float64)?;
                let before = values.null_count();
                let cleaned: Vec<Option<f64>> = values
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| range.contains(*x)))
                    .collect();
                let cleaned = Column::new(name.into(), cleaned);
                log::debug!(
                    "{}: {} readings outside [{}, {}]",
                    name,
                    cleaned.null_count() - before,
                    range.min,
                    range.max
                );
                self.df.with_column(cleaned)?;
            }
        }
        Ok(())
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_index(name).is_some()
    }

    /// Numeric column names, excluding the timestamp.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|c| c.name().as_str() != TIMESTAMP_COL && is_numeric(c.dtype()))
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Values of a numeric column; nulls and NaN come back as `None`.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let column = self
            .df
            .column(name)
            .map_err(|_| TableError::MissingColumn(name.to_string()))?;
        let values = column.cast(&DataType::Float64)?;
        let values = values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// Timestamps in epoch seconds, or all `None` without a timestamp column.
    pub fn timestamps(&self) -> Vec<Option<f64>> {
        self.values(TIMESTAMP_COL)
            .unwrap_or_else(|_| vec![None; self.height()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{PRESSURE, VALID_RANGES, WIND_SPEED_60};

    fn raw_table() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                RAW_TIMESTAMP_COL.into(),
                vec![
                    Some("2021-03-01 00:00:00"),
                    Some("no es fecha"),
                    Some("2021-04-15 10:30"),
                ],
            ),
            Column::new(WIND_SPEED_60.into(), vec![Some(2.0), Some(12.5), Some(31.0)]),
            Column::new(PRESSURE.into(), vec![Some(1000i64), None, Some(990)]),
        ])
        .unwrap()
    }

    #[test]
    fn renames_and_parses_timestamps() {
        let table = ObservationTable::from_raw(raw_table()).unwrap();
        assert!(table.has_column(TIMESTAMP_COL));
        assert!(!table.has_column(RAW_TIMESTAMP_COL));

        let ts = table.timestamps();
        assert_eq!(ts[0], Some(1_614_556_800.0));
        assert_eq!(ts[1], None);
        assert!(ts[2].is_some());

        let months = table.values(MONTH_COL).unwrap();
        assert_eq!(months, vec![Some(3.0), None, Some(4.0)]);
    }

    #[test]
    fn integer_columns_are_widened() {
        let table = ObservationTable::from_raw(raw_table()).unwrap();
        let dtype = table.dataframe().column(PRESSURE).unwrap().dtype().clone();
        assert_eq!(dtype, DataType::Float64);
        assert!(table.numeric_columns().contains(&PRESSURE.to_string()));
        assert!(!table.numeric_columns().contains(&TIMESTAMP_COL.to_string()));
    }

    #[test]
    fn range_cleaning_nulls_out_of_range_values() {
        let mut table = ObservationTable::from_raw(raw_table()).unwrap();
        table.apply_valid_ranges(&VALID_RANGES).unwrap();

        assert_eq!(table.values(WIND_SPEED_60).unwrap(), vec![None, Some(12.5), None]);
        assert_eq!(table.values(PRESSURE).unwrap(), vec![Some(1000.0), None, Some(990.0)]);
        assert_eq!(table.height(), 3);
    }

    #[test]
    fn missing_column_is_reported() {
        let table = ObservationTable::from_raw(raw_table()).unwrap();
        let err = table.values("Humedad").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn(c) if c == "Humedad"));
    }

    #[test]
    fn parses_day_first_dates() {
        let dt = parse_timestamp("15/04/2021 10:30").unwrap();
        assert_eq!(dt.month(), 4);
        assert!(parse_timestamp("").is_none());
    }
}
