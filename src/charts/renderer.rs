//! Static Chart Renderer
//! Draws a [`Figure`] into a PNG with plotters, panel grid and legend
//! included, so exported images match the interactive view.

use super::figure::{AxisKind, BarMode, Figure, Panel, PanelKind, Rgb, Trace, TraceStyle};
use super::figure::color_scale;
use super::plotter::{format_date, polar_to_xy};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error as StdError;
use std::path::Path;
use thiserror::Error;

/// Fallback pixel width for figures without a fixed width.
const DEFAULT_WIDTH: u32 = 1000;
const FONT: &str = "sans-serif";

type DrawResult<T> = Result<T, Box<dyn StdError + Send + Sync>>;

/// A plotters drawing or encoding failure.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct RenderError(#[from] Box<dyn StdError + Send + Sync>);

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Data bounds of one panel as (x_min, x_max, y_min, y_max).
fn panel_bounds(fig: &Figure, idx: usize, panel: &Panel) -> (f64, f64, f64, f64) {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    let mut stack_top: Vec<f64> = Vec::new();

    for trace in fig.traces_in(idx) {
        for (i, p) in trace.finite_points().enumerate() {
            x = (x.0.min(p[0]), x.1.max(p[0]));
            let top = if matches!(trace.style, TraceStyle::Bar) && fig.bar_mode == BarMode::Stack {
                if stack_top.len() <= i {
                    stack_top.resize(i + 1, 0.0);
                }
                stack_top[i] += p[1];
                stack_top[i]
            } else {
                p[1]
            };
            y = (y.0.min(top).min(p[1]), y.1.max(top));
        }
    }

    if panel.x_axis == AxisKind::Category {
        x = (-0.5, panel.categories.len().max(1) as f64 - 0.5);
        y = (0.0f64.min(y.0), y.1.max(0.0));
    }
    if !x.0.is_finite() || !x.1.is_finite() {
        x = (0.0, 1.0);
    }
    if !y.0.is_finite() || !y.1.is_finite() {
        y = (0.0, 1.0);
    }
    if x.0 == x.1 {
        x = (x.0 - 1.0, x.1 + 1.0);
    }
    if y.0 == y.1 {
        y = (y.0 - 1.0, y.1 + 1.0);
    }
    let pad = (y.1 - y.0) * 0.05;
    (x.0, x.1, y.0 - pad, y.1 + pad)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the figure at its own size (or [`DEFAULT_WIDTH`]) to a PNG file.
    pub fn render_png(fig: &Figure, path: &Path) -> Result<(), RenderError> {
        let width = fig.width.map(|w| w as u32).unwrap_or(DEFAULT_WIDTH);
        let height = fig.height.max(200.0) as u32;
        Ok(Self::draw(fig, path, (width, height))?)
    }

    fn draw(fig: &Figure, path: &Path, size: (u32, u32)) -> DrawResult<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let root = match &fig.title {
            Some(title) => root.titled(title, (FONT, 24))?,
            None => root,
        };

        let areas = root.split_evenly((fig.rows.max(1), fig.cols.max(1)));
        for (idx, panel) in fig.panels.iter().enumerate() {
            let Some(area) = areas.get(idx) else {
                break;
            };
            match panel.kind {
                PanelKind::Cartesian => Self::draw_cartesian(area, fig, idx, panel)?,
                PanelKind::Polar => Self::draw_polar(area, fig, idx, panel)?,
            }
        }

        root.present()?;
        Ok(())
    }

    fn draw_cartesian(
        area: &DrawingArea<BitMapBackend, Shift>,
        fig: &Figure,
        idx: usize,
        panel: &Panel,
    ) -> DrawResult<()> {
        let (x_min, x_max, y_min, y_max) = panel_bounds(fig, idx, panel);
        let rotated = panel.x_tick_angle != 0;

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.title, (FONT, 16))
            .margin(10)
            .x_label_area_size(if rotated { 120 } else { 30 })
            .y_label_area_size(55)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let categories = panel.categories.clone();
        let formatter: Box<dyn Fn(&f64) -> String> = match panel.x_axis {
            AxisKind::DateTime => Box::new(|v: &f64| format_date(*v)),
            AxisKind::Category => Box::new(move |v: &f64| {
                let i = v.round();
                if (v - i).abs() > 1e-6 || i < 0.0 {
                    return String::new();
                }
                categories.get(i as usize).cloned().unwrap_or_default()
            }),
            AxisKind::Linear => Box::new(|v: &f64| format!("{:.1}", v)),
        };

        let label_style = if rotated {
            TextStyle::from((FONT, 12).into_font())
                .transform(FontTransform::Rotate270)
                .pos(Pos::new(HPos::Right, VPos::Center))
        } else {
            TextStyle::from((FONT, 12).into_font())
        };

        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(formatter.as_ref())
            .x_label_style(label_style)
            .light_line_style(WHITE.mix(0.0));
        if panel.x_axis == AxisKind::Category {
            mesh.x_labels(panel.categories.len().max(1));
        }
        if let Some(label) = &panel.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &panel.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw()?;

        let mut stack_base: Vec<f64> = Vec::new();
        let mut labelled = false;
        for trace in fig.traces_in(idx) {
            let color = rgb(trace.color);
            match &trace.style {
                TraceStyle::Line { width } => {
                    let stroke = color.stroke_width(width.round().max(1.0) as u32);
                    for (i, segment) in trace.segments().into_iter().enumerate() {
                        let series = chart.draw_series(LineSeries::new(
                            segment.iter().map(|p| (p[0], p[1])),
                            stroke,
                        ))?;
                        if i == 0 {
                            series
                                .label(trace.name.as_str())
                                .legend(move |(x, y)| {
                                    PathElement::new(vec![(x, y), (x + 20, y)], color)
                                });
                            labelled = true;
                        }
                    }
                }
                TraceStyle::Markers { size, .. } => {
                    chart
                        .draw_series(trace.finite_points().map(|p| {
                            Circle::new((p[0], p[1]), (size / 2.0) as u32, color.filled())
                        }))?
                        .label(trace.name.as_str())
                        .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
                    labelled = true;
                }
                TraceStyle::Bar => {
                    let stacked = fig.bar_mode == BarMode::Stack;
                    let bars: Vec<Rectangle<(f64, f64)>> = trace
                        .finite_points()
                        .enumerate()
                        .map(|(i, p)| {
                            if stack_base.len() <= i {
                                stack_base.resize(i + 1, 0.0);
                            }
                            let base = if stacked { stack_base[i] } else { 0.0 };
                            if stacked {
                                stack_base[i] += p[1];
                            }
                            Rectangle::new([(p[0] - 0.3, base), (p[0] + 0.3, base + p[1])], color.filled())
                        })
                        .collect();
                    chart
                        .draw_series(bars)?
                        .label(trace.name.as_str())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled())
                        });
                    labelled = true;
                }
            }
        }

        if fig.show_legend && labelled {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }
        Ok(())
    }

    fn draw_polar(
        area: &DrawingArea<BitMapBackend, Shift>,
        fig: &Figure,
        idx: usize,
        panel: &Panel,
    ) -> DrawResult<()> {
        let traces: Vec<&Trace> = fig.traces_in(idx).collect();
        let radii = || traces.iter().copied().flat_map(|t| t.finite_points()).map(|p| p[0]);
        let r_max = radii().fold(0.0f64, f64::max).max(1.0);
        let r_min = radii().fold(f64::INFINITY, f64::min);
        let extent = r_max * 1.05;

        let (w, h) = area.dim_in_pixel();
        let side = w.min(h);
        let square = area.margin(
            (h - side) / 2,
            (h - side) / 2,
            (w - side) / 2,
            (w - side) / 2,
        );

        let mut chart = ChartBuilder::on(&square)
            .caption(&panel.title, (FONT, 16))
            .margin(10)
            .build_cartesian_2d(-extent..extent, -extent..extent)?;

        let grid = RGBColor(190, 190, 190);
        for k in 1..=4 {
            let r = r_max * k as f64 / 4.0;
            chart.draw_series(LineSeries::new(
                (0..=72).map(|i| {
                    let [x, y] = polar_to_xy(r, i as f64 * 5.0);
                    (x, y)
                }),
                &grid,
            ))?;
        }
        for deg in (0..360).step_by(45) {
            let [x, y] = polar_to_xy(r_max, deg as f64);
            chart.draw_series(LineSeries::new(vec![(0.0, 0.0), (x, y)], &grid))?;
        }

        for trace in traces {
            let TraceStyle::Markers {
                size, color_scale: scale, ..
            } = &trace.style
            else {
                continue;
            };
            let radius = (size / 2.0) as u32;
            chart.draw_series(trace.finite_points().map(|p| {
                let color = match scale {
                    Some(scale) if r_max > r_min => {
                        rgb(color_scale(scale, (p[0] - r_min) / (r_max - r_min)))
                    }
                    _ => rgb(trace.color),
                };
                let [x, y] = polar_to_xy(p[0], p[1]);
                Circle::new((x, y), radius, color.mix(0.8).filled())
            }))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::Trace;

    #[test]
    fn stacked_bar_bounds_cover_the_sum() {
        let mut panel = Panel::cartesian("", AxisKind::Category);
        panel.categories = vec!["a".into(), "b".into()];
        let mut fig = Figure::grid("f", 1, 1, vec![panel.clone()]);
        fig.bar_mode = BarMode::Stack;
        for (name, values) in [("lo", [30.0, 10.0]), ("hi", [70.0, 90.0])] {
            fig.add_trace(Trace {
                name: name.to_string(),
                panel: 0,
                color: Rgb(0, 0, 0),
                style: TraceStyle::Bar,
                points: vec![[0.0, values[0]], [1.0, values[1]]],
            });
        }

        let (x_min, x_max, y_min, y_max) = panel_bounds(&fig, 0, &panel);
        assert_eq!((x_min, x_max), (-0.5, 1.5));
        assert!(y_min <= 0.0);
        assert!(y_max >= 100.0);
    }

    #[test]
    fn empty_panel_has_unit_bounds() {
        let panel = Panel::cartesian("", AxisKind::Linear);
        let fig = Figure::grid("f", 1, 1, vec![panel.clone()]);
        let (x_min, x_max, y_min, y_max) = panel_bounds(&fig, 0, &panel);
        assert_eq!((x_min, x_max), (0.0, 1.0));
        assert!(y_min < 0.0 && y_max > 1.0);
    }
}
