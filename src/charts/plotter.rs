//! Chart Plotter Module
//! Draws a [`Figure`] interactively using egui_plot.

use super::figure::{AxisKind, BarMode, Figure, Panel, PanelKind, Rgb, Trace, TraceStyle};
use super::figure::color_scale;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, PlotUi, Points};
use std::ops::RangeInclusive;

/// Number of colour bins when markers are coloured by value.
const COLOR_BINS: usize = 8;
/// Polar panels are drawn square at most this tall.
const POLAR_MAX_HEIGHT: f32 = 380.0;

pub fn to_color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

/// Format an epoch-seconds axis value as a date.
pub fn format_date(seconds: f64) -> String {
    if !seconds.is_finite() {
        return String::new();
    }
    chrono::DateTime::from_timestamp(seconds as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Creates interactive charts from figure specifications.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw every panel of a figure in its grid.
    pub fn draw_figure(ui: &mut egui::Ui, fig: &Figure) {
        ui.vertical(|ui| {
            if let Some(width) = fig.width {
                ui.set_max_width(width.min(ui.available_width()));
            }

            if let Some(title) = &fig.title {
                ui.label(RichText::new(title).size(16.0).strong());
                ui.add_space(6.0);
            }

            let cols = fig.cols.max(1);
            let plot_height = (fig.row_height() - 30.0).max(120.0);

            for row in 0..fig.rows {
                let first = row * cols;
                if first >= fig.panels.len() {
                    break;
                }
                ui.columns(cols, |columns| {
                    for (c, column_ui) in columns.iter_mut().enumerate() {
                        let idx = first + c;
                        if let Some(panel) = fig.panels.get(idx) {
                            Self::draw_panel(column_ui, fig, idx, panel, plot_height);
                        }
                    }
                });
                ui.add_space(8.0);
            }

            if fig.show_legend {
                Self::draw_scale_legend(ui, fig);
            }
        });
    }

    fn draw_panel(ui: &mut egui::Ui, fig: &Figure, idx: usize, panel: &Panel, height: f32) {
        if !panel.title.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(&panel.title).size(13.0).strong());
            });
        }
        match panel.kind {
            PanelKind::Cartesian => Self::draw_cartesian(ui, fig, idx, panel, height),
            PanelKind::Polar => Self::draw_polar(ui, fig, idx, height.min(POLAR_MAX_HEIGHT)),
        }
    }

    fn draw_cartesian(ui: &mut egui::Ui, fig: &Figure, idx: usize, panel: &Panel, height: f32) {
        let mut plot = Plot::new(format!("{}_{}", fig.id, idx))
            .height(height)
            .allow_zoom(true)
            .allow_drag(true)
            .allow_scroll(false);

        if fig.show_legend {
            plot = plot.legend(Legend::default());
        }
        if let Some(label) = &panel.x_label {
            plot = plot.x_axis_label(label.clone());
        }
        if let Some(label) = &panel.y_label {
            plot = plot.y_axis_label(label.clone());
        }

        match panel.x_axis {
            AxisKind::DateTime => {
                plot = plot.x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
                    format_date(mark.value)
                });
            }
            AxisKind::Category => {
                let labels = panel.categories.clone();
                plot = plot
                    .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                        let idx = mark.value.round();
                        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                            return String::new();
                        }
                        labels.get(idx as usize).cloned().unwrap_or_default()
                    })
                    .include_y(0.0)
                    .include_y(100.0);
            }
            AxisKind::Linear => {}
        }

        plot.show(ui, |plot_ui| {
            let mut charts: Vec<BarChart> = Vec::new();
            for trace in fig.traces_in(idx) {
                match &trace.style {
                    TraceStyle::Line { width } => Self::draw_line(plot_ui, trace, *width),
                    TraceStyle::Markers { size, .. } => {
                        let points: Vec<[f64; 2]> = trace.finite_points().copied().collect();
                        plot_ui.points(
                            Points::new(PlotPoints::from(points))
                                .radius(size / 2.0)
                                .color(to_color32(trace.color))
                                .name(&trace.name),
                        );
                    }
                    TraceStyle::Bar => {
                        let bars: Vec<Bar> = trace
                            .finite_points()
                            .map(|p| Bar::new(p[0], p[1]).width(0.6))
                            .collect();
                        let mut chart = BarChart::new(bars)
                            .color(to_color32(trace.color))
                            .name(&trace.name);
                        if fig.bar_mode == BarMode::Stack && !charts.is_empty() {
                            let below: Vec<&BarChart> = charts.iter().collect();
                            chart = chart.stack_on(&below);
                        }
                        charts.push(chart);
                    }
                }
            }
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
    }

    /// Lines are broken at missing readings.
    fn draw_line(plot_ui: &mut PlotUi, trace: &Trace, width: f32) {
        let color = to_color32(trace.color);
        for (i, segment) in trace.segments().into_iter().enumerate() {
            let mut line = Line::new(PlotPoints::from(segment.to_vec()))
                .color(color)
                .width(width);
            // Only the first segment carries the legend entry.
            if i == 0 {
                line = line.name(&trace.name);
            }
            plot_ui.line(line);
        }
    }

    /// Polar scatter on a square plot: theta is measured clockwise from
    /// north, radius rings are drawn every quarter of the maximum.
    fn draw_polar(ui: &mut egui::Ui, fig: &Figure, idx: usize, height: f32) {
        let traces: Vec<&Trace> = fig.traces_in(idx).collect();
        let r_max = traces
            .iter()
            .copied()
            .flat_map(|t| t.finite_points())
            .map(|p| p[0])
            .fold(0.0f64, f64::max);
        let r_min = traces
            .iter()
            .copied()
            .flat_map(|t| t.finite_points())
            .map(|p| p[0])
            .fold(f64::INFINITY, f64::min);

        Plot::new(format!("{}_{}", fig.id, idx))
            .height(height)
            .width(height)
            .data_aspect(1.0)
            .show_axes([false, false])
            .show_grid(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                if r_max > 0.0 {
                    Self::draw_polar_grid(plot_ui, r_max);
                }
                for trace in traces {
                    match &trace.style {
                        TraceStyle::Markers {
                            size,
                            color_scale: Some(scale),
                            ..
                        } => {
                            let mut bins: Vec<Vec<[f64; 2]>> = vec![Vec::new(); COLOR_BINS];
                            for p in trace.finite_points() {
                                let t = if r_max > r_min {
                                    (p[0] - r_min) / (r_max - r_min)
                                } else {
                                    0.5
                                };
                                let bin = ((t * COLOR_BINS as f64) as usize).min(COLOR_BINS - 1);
                                bins[bin].push(polar_to_xy(p[0], p[1]));
                            }
                            for (b, points) in bins.into_iter().enumerate() {
                                if points.is_empty() {
                                    continue;
                                }
                                let t = (b as f64 + 0.5) / COLOR_BINS as f64;
                                plot_ui.points(
                                    Points::new(PlotPoints::from(points))
                                        .radius(size / 2.0)
                                        .color(to_color32(color_scale(scale, t)))
                                        .name(&trace.name),
                                );
                            }
                        }
                        TraceStyle::Markers { size, .. } => {
                            let points: Vec<[f64; 2]> = trace
                                .finite_points()
                                .map(|p| polar_to_xy(p[0], p[1]))
                                .collect();
                            plot_ui.points(
                                Points::new(PlotPoints::from(points))
                                    .radius(size / 2.0)
                                    .color(to_color32(trace.color))
                                    .name(&trace.name),
                            );
                        }
                        _ => {
                            let points: Vec<[f64; 2]> = trace
                                .finite_points()
                                .map(|p| polar_to_xy(p[0], p[1]))
                                .collect();
                            plot_ui.line(
                                Line::new(PlotPoints::from(points)).color(to_color32(trace.color)),
                            );
                        }
                    }
                }
            });
    }

    fn draw_polar_grid(plot_ui: &mut PlotUi, r_max: f64) {
        let ring_color = Color32::from_gray(170);
        for k in 1..=4 {
            let r = r_max * k as f64 / 4.0;
            let ring: Vec<[f64; 2]> = (0..=72)
                .map(|i| polar_to_xy(r, i as f64 * 5.0))
                .collect();
            plot_ui.line(Line::new(PlotPoints::from(ring)).color(ring_color).width(0.5));
        }
        for deg in (0..360).step_by(45) {
            let spoke = vec![[0.0, 0.0], polar_to_xy(r_max, deg as f64)];
            plot_ui.line(Line::new(PlotPoints::from(spoke)).color(ring_color).width(0.5));
        }
    }

    /// Gradient strip for traces coloured by value.
    fn draw_scale_legend(ui: &mut egui::Ui, fig: &Figure) {
        let scale = fig.traces.iter().find_map(|t| match &t.style {
            TraceStyle::Markers {
                color_scale: Some(scale),
                show_scale: true,
                ..
            } => Some(scale.clone()),
            _ => None,
        });
        let Some(scale) = scale else {
            return;
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new("Velocidad (m/s)").size(11.0));
            for i in 0..24 {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, 12.0), egui::Sense::hover());
                let color = color_scale(&scale, i as f64 / 23.0);
                ui.painter().rect_filled(rect, 0.0, to_color32(color));
            }
        });
    }
}

/// Clockwise-from-north polar coordinates to plot coordinates.
pub fn polar_to_xy(r: f64, theta_deg: f64) -> [f64; 2] {
    let theta = theta_deg.to_radians();
    [r * theta.sin(), r * theta.cos()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_is_clockwise_from_north() {
        let [x, y] = polar_to_xy(2.0, 0.0);
        assert!(x.abs() < 1e-12 && (y - 2.0).abs() < 1e-12);
        let [x, y] = polar_to_xy(2.0, 90.0);
        assert!((x - 2.0).abs() < 1e-12 && y.abs() < 1e-12);
    }

    #[test]
    fn date_axis_labels() {
        assert_eq!(format_date(1_614_556_800.0), "2021-03-01");
        assert_eq!(format_date(f64::NAN), "");
    }
}
