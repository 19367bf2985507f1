//! Export Module
//! Saves figures (PNG image or JSON chart object) and tables (CSV).

use crate::charts::{Figure, RenderError, StaticChartRenderer};
use crate::views::TableData;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to draw chart: {0}")]
    Render(#[from] RenderError),
    #[error("Failed to serialize chart: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to write CSV: {0}")]
    Polars(#[from] PolarsError),
}

pub struct Exporter;

impl Exporter {
    pub fn figure_png(fig: &Figure, path: &Path) -> Result<(), ExportError> {
        StaticChartRenderer::render_png(fig, path)?;
        log::info!("Chart {} saved to {}", fig.id, path.display());
        Ok(())
    }

    pub fn figure_json(fig: &Figure, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, fig.to_json()?)?;
        log::info!("Chart {} saved to {}", fig.id, path.display());
        Ok(())
    }

    /// Write a displayed table as CSV, header row first.
    pub fn table_csv(table: &TableData, path: &Path) -> Result<(), ExportError> {
        let columns = table
            .columns
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let values: Vec<&str> = table
                    .rows
                    .iter()
                    .map(|row| row.get(c).map(String::as_str).unwrap_or(""))
                    .collect();
                Column::new(name.as_str().into(), values)
            })
            .collect::<Vec<_>>();
        let mut df = DataFrame::new(columns)?;

        let mut file = File::create(path)?;
        CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;
        log::info!("Table with {} rows saved to {}", df.height(), path.display());
        Ok(())
    }
}
