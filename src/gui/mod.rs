//! GUI module - User interface components

mod app;
mod assets;
mod nav_panel;
mod page_view;

pub use app::DashboardApp;
