//! Figure Module
//! Backend-agnostic chart specification produced by the chart builders and
//! consumed by the interactive plotter and the static renderer.

use serde::Serialize;

/// Plain RGB colour, convertible to egui and plotters colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// From a `0xRRGGBB` literal.
    pub const fn hex(code: u32) -> Self {
        Rgb((code >> 16) as u8, (code >> 8) as u8, code as u8)
    }

    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Sequential "Blues" scale (light to dark), nine evenly spaced stops.
pub const BLUES: [Rgb; 9] = [
    Rgb::hex(0xf7fbff),
    Rgb::hex(0xdeebf7),
    Rgb::hex(0xc6dbef),
    Rgb::hex(0x9ecae1),
    Rgb::hex(0x6baed6),
    Rgb::hex(0x4292c6),
    Rgb::hex(0x2171b5),
    Rgb::hex(0x08519c),
    Rgb::hex(0x08306b),
];

/// Map `t` in [0, 1] onto a piecewise-linear colour scale.
pub fn color_scale(scale: &[Rgb], t: f64) -> Rgb {
    if scale.is_empty() {
        return Rgb(0, 0, 0);
    }
    if scale.len() == 1 || t.is_nan() {
        return scale[0];
    }
    let pos = t.clamp(0.0, 1.0) * (scale.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(scale.len() - 1);
    scale[lower].lerp(scale[upper], pos - lower as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisKind {
    Linear,
    /// Values are seconds since the Unix epoch.
    DateTime,
    /// Values are indices into the panel's category labels.
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelKind {
    Cartesian,
    /// Points are `[r, theta_degrees]`, theta clockwise from north.
    Polar,
}

/// One subplot cell.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub title: String,
    pub kind: PanelKind,
    pub x_axis: AxisKind,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub categories: Vec<String>,
    /// Tick label rotation in degrees, for long category names.
    pub x_tick_angle: i32,
}

impl Panel {
    pub fn cartesian(title: impl Into<String>, x_axis: AxisKind) -> Self {
        Self {
            title: title.into(),
            kind: PanelKind::Cartesian,
            x_axis,
            x_label: None,
            y_label: None,
            categories: Vec::new(),
            x_tick_angle: 0,
        }
    }

    pub fn polar(title: impl Into<String>) -> Self {
        Self {
            kind: PanelKind::Polar,
            ..Self::cartesian(title, AxisKind::Linear)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum TraceStyle {
    Line {
        width: f32,
    },
    Markers {
        size: f32,
        /// Colour each marker by its radius over this scale.
        color_scale: Option<Vec<Rgb>>,
        show_scale: bool,
    },
    Bar,
}

/// One plotted series. `NaN` in `y` (or `r`) marks a gap.
#[derive(Debug, Clone, Serialize)]
pub struct Trace {
    pub name: String,
    pub panel: usize,
    pub color: Rgb,
    pub style: TraceStyle,
    pub points: Vec<[f64; 2]>,
}

impl Trace {
    pub fn line(name: impl Into<String>, panel: usize, color: Rgb, points: Vec<[f64; 2]>) -> Self {
        Self {
            name: name.into(),
            panel,
            color,
            style: TraceStyle::Line { width: 1.5 },
            points,
        }
    }

    /// Maximal runs of consecutive finite points.
    pub fn segments(&self) -> Vec<&[[f64; 2]]> {
        self.points
            .split(|p| !p[0].is_finite() || !p[1].is_finite())
            .filter(|run| !run.is_empty())
            .collect()
    }

    pub fn finite_points(&self) -> impl Iterator<Item = &[f64; 2]> {
        self.points
            .iter()
            .filter(|p| p[0].is_finite() && p[1].is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarMode {
    Group,
    Stack,
}

/// A complete chart: a grid of panels and the traces drawn on them.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub id: String,
    pub title: Option<String>,
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
    pub traces: Vec<Trace>,
    pub width: Option<f32>,
    pub height: f32,
    pub show_legend: bool,
    pub bar_mode: BarMode,
}

impl Figure {
    /// `rows x cols` grid; panels fill row by row.
    pub fn grid(id: impl Into<String>, rows: usize, cols: usize, panels: Vec<Panel>) -> Self {
        Self {
            id: id.into(),
            title: None,
            rows,
            cols,
            panels,
            traces: Vec::new(),
            width: None,
            height: 450.0,
            show_legend: true,
            bar_mode: BarMode::Group,
        }
    }

    pub fn add_trace(&mut self, trace: Trace) {
        self.traces.push(trace);
    }

    pub fn trace_count(&self) -> usize {
        self.traces.len()
    }

    pub fn traces_in(&self, panel: usize) -> impl Iterator<Item = &Trace> {
        self.traces.iter().filter(move |t| t.panel == panel)
    }

    /// Height of one grid row when the figure is laid out at full size.
    pub fn row_height(&self) -> f32 {
        self.height / self.rows.max(1) as f32
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_split_on_gaps() {
        let trace = Trace::line(
            "t",
            0,
            Rgb(0, 0, 0),
            vec![
                [0.0, 1.0],
                [1.0, 2.0],
                [2.0, f64::NAN],
                [3.0, 4.0],
                [f64::NAN, 5.0],
                [f64::NAN, f64::NAN],
                [6.0, 7.0],
            ],
        );
        let segments = trace.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1], &[[3.0, 4.0]]);
        assert_eq!(trace.finite_points().count(), 4);
    }

    #[test]
    fn color_scale_endpoints() {
        assert_eq!(color_scale(&BLUES, 0.0), BLUES[0]);
        assert_eq!(color_scale(&BLUES, 1.0), BLUES[8]);
        assert_eq!(color_scale(&BLUES, 2.0), BLUES[8]);
        assert_eq!(color_scale(&BLUES, 0.25), BLUES[2]);
    }

    #[test]
    fn blues_runs_from_near_white_to_navy() {
        assert_eq!(BLUES[0], Rgb(0xf7, 0xfb, 0xff));
        assert_eq!(BLUES[BLUES.len() - 1], Rgb(0x08, 0x30, 0x6b));
        assert_eq!(color_scale(&BLUES, 0.5), Rgb::hex(0x6baed6));
    }

    #[test]
    fn hex_colours() {
        assert_eq!(Rgb::hex(0x1E90FF), Rgb(30, 144, 255));
    }

    #[test]
    fn serializes_to_json() {
        let mut fig = Figure::grid("f", 1, 1, vec![Panel::cartesian("p", AxisKind::Linear)]);
        fig.add_trace(Trace::line("a", 0, Rgb(1, 2, 3), vec![[0.0, 1.0]]));
        let json = fig.to_json().unwrap();
        assert!(json.contains("\"name\": \"a\""));
        assert_eq!(fig.traces_in(0).count(), 1);
    }
}
