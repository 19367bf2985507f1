//! Stats module - descriptive statistics, decomposition, missing data

mod calculator;
mod decompose;
mod missing;

pub use calculator::{ColumnStats, StatsCalculator, SUMMARY_ROWS};
pub use decompose::{seasonal_decompose, DecomposeError, Decomposition};
pub use missing::{missing_percentages, MissingRatio};
