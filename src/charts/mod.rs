//! Charts module - chart specifications, builders and rendering

mod builders;
mod figure;
mod plotter;
mod renderer;

pub use builders::{ChartBuilder, ChartError, DEFAULT_PERIOD};
pub use figure::{AxisKind, BarMode, Figure, Panel, PanelKind, Rgb, Trace, TraceStyle};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};

#[cfg(test)]
pub(crate) use builders::tests::sample_table;
