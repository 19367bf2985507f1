//! Data module - spreadsheet loading and the observation table

mod loader;
mod observations;
pub mod schema;

pub use loader::{load_spreadsheet, LoaderError};
pub use observations::{ObservationTable, TableError};

use std::path::Path;

/// Load, normalize and clean the dataset in one go.
pub fn load_observations(path: &Path) -> anyhow::Result<ObservationTable> {
    let raw = load_spreadsheet(path)?;
    let mut table = ObservationTable::from_raw(raw)?;
    table.apply_valid_ranges(&schema::VALID_RANGES)?;
    log::debug!(
        "Observation table ready: {} rows, {} columns",
        table.height(),
        table.dataframe().width()
    );
    Ok(table)
}
