//! De vientos y datos - Wind energy EDA dashboard
//!
//! Explores ten-minute meteorological readings from a coastal wind
//! measurement mast and presents pre-computed regression results.

mod charts;
mod config;
mod data;
mod export;
mod gui;
mod stats;
mod views;

use clap::Parser;
use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = DashboardConfig::parse();
    log::info!("Starting dashboard with data from {}", config.data.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("De vientos y datos"),
        ..Default::default()
    };

    eframe::run_native(
        "De vientos y datos",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start the dashboard: {}", e))
}
