//! Command-line and environment configuration.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "De vientos y datos - wind energy EDA dashboard", long_about = None)]
pub struct DashboardConfig {
    /// Spreadsheet with the meteorological readings
    #[arg(short, long, env = "VIENTOS_DATA", default_value = "eda.xlsx", value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    /// Directory holding the page images
    #[arg(long, env = "VIENTOS_ASSETS", default_value = "assets", value_hint = ValueHint::DirPath)]
    pub assets: PathBuf,

    /// Page shown at startup
    #[arg(long, default_value = "/")]
    pub route: String,

    /// Seasonal period for the decomposition
    #[arg(long, default_value_t = crate::charts::DEFAULT_PERIOD, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..))]
    pub period: usize,
}
