//! Spreadsheet Loader Module
//! Reads the meteorological export into a raw Polars DataFrame.
//! Excel/ODS workbooks go through calamine, CSV through Polars directly.

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

use super::schema::{RAW_TIMESTAMP_COL, TIMESTAMP_COL};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Failed to build table: {0}")]
    Polars(#[from] PolarsError),
    #[error("Workbook has no sheets")]
    NoSheet,
    #[error("Sheet has no header row")]
    EmptySheet,
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

/// Format used when a spreadsheet date cell is turned into text.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Load a spreadsheet, dispatching on the file extension.
pub fn load_spreadsheet(path: &Path) -> Result<DataFrame, LoaderError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let df = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path)?,
        "csv" => load_csv(path)?,
        other => return Err(LoaderError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
    let path_str = path.to_string_lossy().to_string();

    // Use lazy evaluation for memory efficiency, then collect
    let df = LazyCsvReader::new(&path_str)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    Ok(df)
}

/// Read the first worksheet. The first row is the header.
fn load_workbook(path: &Path) -> Result<DataFrame, LoaderError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook.worksheet_range_at(0).ok_or(LoaderError::NoSheet)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(LoaderError::EmptySheet)?;
    let names = dedupe_names(
        header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell_to_text(cell) {
                Some(name) if !name.trim().is_empty() => name.trim().to_string(),
                _ => format!("column_{}", i),
            })
            .collect(),
    );

    let mut cells: Vec<Vec<Data>> = vec![Vec::new(); names.len()];
    for row in rows {
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(row.get(i).cloned().unwrap_or(Data::Empty));
        }
    }

    let columns = names
        .iter()
        .zip(cells.iter())
        .map(|(name, values)| build_column(name, values))
        .collect::<Vec<_>>();

    Ok(DataFrame::new(columns)?)
}

/// Repeated header names get a `.1`, `.2`, ... suffix, skipping any
/// suffixed name already taken.
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut seen: HashMap<String, usize> = HashMap::new();

    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return name;
            }
            let mut suffix = *count - 1;
            let mut candidate = format!("{}.{}", name, suffix);
            while taken.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}.{}", name, suffix);
            }
            log::warn!("Duplicate column {} renamed to {}", name, candidate);
            *count = suffix + 1;
            taken.insert(candidate.clone());
            candidate
        })
        .collect()
}

/// Numeric columns become Float64, everything else (including the
/// timestamp column and any column holding date cells) becomes text.
fn build_column(name: &str, values: &[Data]) -> Column {
    let is_timestamp = name == RAW_TIMESTAMP_COL || name == TIMESTAMP_COL;
    let has_dates = values
        .iter()
        .any(|v| matches!(v, Data::DateTime(_) | Data::DateTimeIso(_)));

    if is_timestamp || has_dates {
        let text: Vec<Option<String>> = values.iter().map(cell_to_datetime_text).collect();
        return Column::new(name.into(), text);
    }

    let numeric: Vec<Option<f64>> = values.iter().map(cell_to_f64).collect();
    let all_numeric = values
        .iter()
        .zip(numeric.iter())
        .all(|(cell, num)| num.is_some() || is_blank(cell));

    if all_numeric {
        Column::new(name.into(), numeric)
    } else {
        let text: Vec<Option<String>> = values.iter().map(cell_to_text).collect();
        Column::new(name.into(), text)
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Int(i) => Some(*i as f64),
        Data::Float(f) => Some(*f),
        Data::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    }
}

fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::DateTime(dt) => Some(format_serial(dt.as_f64())),
        Data::Empty | Data::Error(_) => None,
    }
}

/// Bare numbers in a date column are Excel serial days.
fn cell_to_datetime_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Int(i) => Some(format_serial(*i as f64)),
        Data::Float(f) => Some(format_serial(*f)),
        other => cell_to_text(other),
    }
}

fn format_serial(serial: f64) -> String {
    excel_serial_to_datetime(serial)
        .map(|dt| dt.format(DATETIME_FORMAT).to_string())
        .unwrap_or_default()
}

/// Convert an Excel serial day number (1900 date system) to a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(TimeDelta::try_milliseconds(millis)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn excel_serial_conversion() {
        // 2020-01-01 12:00 is serial 43831.5
        let dt = excel_serial_to_datetime(43831.5).unwrap();
        assert_eq!(dt.format(DATETIME_FORMAT).to_string(), "2020-01-01 12:00:00");
        assert!(excel_serial_to_datetime(f64::NAN).is_none());
    }

    #[test]
    fn numeric_cells_build_float_column() {
        let cells = vec![Data::Float(1.5), Data::Empty, Data::Int(3)];
        let column = build_column("Presion", &cells);
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 1);
    }

    #[test]
    fn mixed_cells_build_text_column() {
        let cells = vec![Data::Float(1.5), Data::String("n/a".into())];
        let column = build_column("Notas", &cells);
        assert_eq!(column.dtype(), &DataType::String);
    }

    #[test]
    fn timestamp_column_is_text() {
        let cells = vec![Data::Float(43831.0), Data::String("2020-01-02 00:10:00".into())];
        let column = build_column(RAW_TIMESTAMP_COL, &cells);
        assert_eq!(column.dtype(), &DataType::String);
        let ca = column.str().unwrap();
        assert_eq!(ca.get(0), Some("2020-01-01 00:00:00"));
    }

    #[test]
    fn duplicate_headers_get_numbered() {
        let names = ["Fecha", "Temp", "Temp", "Temp.2", "Temp"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dedupe_names(names),
            ["Fecha", "Temp", "Temp.1", "Temp.2", "Temp.3"]
        );
    }

    #[test]
    fn deduped_columns_build_a_frame() {
        let names = dedupe_names(vec!["Presion".into(), "Presion".into()]);
        let cells = [Data::Float(1000.5), Data::Empty];
        let columns = names.iter().map(|n| build_column(n, &cells)).collect::<Vec<_>>();
        let df = DataFrame::new(columns).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.column("Presion.1").unwrap().null_count(), 1);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_spreadsheet(Path::new("datos.parquet")).unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedExtension(ext) if ext == "parquet"));
    }

    #[test]
    fn loads_csv_export() {
        let path = std::env::temp_dir().join(format!("vientos_loader_{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "SoftwareVersion,WindSpeed60,Presion").unwrap();
        writeln!(file, "2020-01-01 00:00:00,5.5,1001.2").unwrap();
        writeln!(file, "2020-01-01 00:10:00,6.1,1001.4").unwrap();
        drop(file);

        let df = load_spreadsheet(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
    }
}
