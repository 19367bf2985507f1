//! Chart Builders
//! Pure functions turning the observation table into figures.
//! Columns, titles, colours and sizes are fixed per chart.

use super::figure::{AxisKind, BarMode, Figure, Panel, Rgb, Trace, TraceStyle, BLUES};
use crate::data::schema::*;
use crate::data::{ObservationTable, TableError};
use crate::stats::{missing_percentages, seasonal_decompose, DecomposeError};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("{variable}: {source}")]
    Decompose {
        variable: String,
        source: DecomposeError,
    },
}

/// Default seasonal period (observations per cycle).
pub const DEFAULT_PERIOD: usize = 12;

/// Colour cycle used when a chart does not pick its own colours.
pub const DEFAULT_CYCLE: [Rgb; 10] = [
    Rgb::hex(0x636efa),
    Rgb::hex(0xef553b),
    Rgb::hex(0x00cc96),
    Rgb::hex(0xab63fa),
    Rgb::hex(0xffa15a),
    Rgb::hex(0x19d3f3),
    Rgb::hex(0xff6692),
    Rgb::hex(0xb6e880),
    Rgb::hex(0xff97ff),
    Rgb::hex(0xfecb52),
];

const DECOMPOSITION_PANELS: [&str; 4] = ["Original", "Tendencia", "Estacionalidad", "Residuos"];
const DECOMPOSITION_TRACES: [&str; 4] = ["Serie Original", "Tendencia", "Estacionalidad", "Residuos"];

/// Pair two aligned columns into plot points, `None` becoming `NaN`.
fn paired_points(x: &[Option<f64>], y: &[Option<f64>]) -> Vec<[f64; 2]> {
    x.iter()
        .zip(y.iter())
        .map(|(x, y)| [x.unwrap_or(f64::NAN), y.unwrap_or(f64::NAN)])
        .collect()
}

pub struct ChartBuilder;

impl ChartBuilder {
    /// Wind speed at 100 m and 80 m (both sensors) over time, 2 x 2 grid.
    pub fn wind_speed_figure(table: &ObservationTable) -> Result<Figure, ChartError> {
        let series = [
            (WIND_SPEED_100_1, "WindSpeed 100m (Sensor 1)", Rgb::hex(0x1E90FF)),
            (WIND_SPEED_100_2, "WindSpeed 100m (Sensor 2)", Rgb::hex(0x4682B4)),
            (WIND_SPEED_80_1, "WindSpeed 80m (Sensor 1)", Rgb::hex(0x3CB371)),
            (WIND_SPEED_80_2, "WindSpeed 80m (Sensor 2)", Rgb::hex(0x66CDAA)),
        ];

        let panels = series
            .iter()
            .map(|(_, title, _)| Panel::cartesian(*title, AxisKind::DateTime))
            .collect();
        let mut fig = Figure::grid("wind-speed-subplots", 2, 2, panels);
        fig.height = 800.0;
        fig.width = Some(1200.0);

        let time = table.timestamps();
        for (panel, (column, _, color)) in series.iter().enumerate() {
            let values = table.values(column)?;
            fig.add_trace(Trace::line(
                *column,
                panel,
                *color,
                paired_points(&time, &values),
            ));
        }
        Ok(fig)
    }

    /// Speed against direction at 100 m, 80 m and 60 m.
    pub fn polar_scatter_figure(table: &ObservationTable) -> Result<Figure, ChartError> {
        let series = [
            (WIND_SPEED_100_1, WIND_DIRECTION_100, "Velocidad y Dirección a 100m", "Velocidad a 100m"),
            (WIND_SPEED_80_1, WIND_DIRECTION_80, "Velocidad y Dirección a 80m", "Velocidad a 80m"),
            (WIND_SPEED_60, WIND_DIRECTION_60, "Velocidad y Dirección a 60m", "Velocidad a 60m"),
        ];

        let panels = series
            .iter()
            .map(|(_, _, title, _)| Panel::polar(*title))
            .collect();
        let mut fig = Figure::grid("windrose-graph", 2, 2, panels);
        fig.height = 800.0;
        fig.width = Some(1000.0);

        for (panel, (speed, direction, _, name)) in series.iter().enumerate() {
            let r = table.values(speed)?;
            let theta = table.values(direction)?;
            fig.add_trace(Trace {
                name: name.to_string(),
                panel,
                color: BLUES[6],
                style: TraceStyle::Markers {
                    size: 10.0,
                    color_scale: Some(BLUES.to_vec()),
                    show_scale: panel == 0,
                },
                points: paired_points(&r, &theta),
            });
        }
        Ok(fig)
    }

    /// Average temperature at 100 m and at 21 m, one row each.
    pub fn temperature_figure(table: &ObservationTable) -> Result<Figure, ChartError> {
        let series = [
            (TEMPERATURE_100, "Temperatura AVG a 100 m", "Temp 100m", Rgb::hex(0x4682B4)),
            (TEMPERATURE_21, "Temperatura AVG a 20 m", "Temp 20m", Rgb::hex(0x3CB371)),
        ];

        let panels = series
            .iter()
            .map(|(_, title, _, _)| Panel::cartesian(*title, AxisKind::DateTime))
            .collect();
        let mut fig = Figure::grid("temperature-graphs", 2, 1, panels);
        fig.title = Some("Gráficos de Temperatura a Diferentes Alturas".to_string());
        fig.height = 800.0;
        fig.width = Some(1000.0);
        fig.show_legend = false;

        let time = table.timestamps();
        for (panel, (column, _, name, color)) in series.iter().enumerate() {
            let values = table.values(column)?;
            fig.add_trace(Trace::line(*name, panel, *color, paired_points(&time, &values)));
        }
        Ok(fig)
    }

    /// Additive decomposition of every wind speed series, four rows per
    /// variable. Missing readings are dropped before decomposing; each kept
    /// reading stays on its own timestamp.
    pub fn seasonal_decomposition_figure(
        table: &ObservationTable,
        period: usize,
    ) -> Result<Figure, ChartError> {
        let time = table.timestamps();
        let columns = WIND_SPEED_COLS
            .iter()
            .map(|name| Ok((*name, table.values(name)?)))
            .collect::<Result<Vec<_>, TableError>>()?;

        let decompositions = columns
            .par_iter()
            .map(|(name, values)| {
                let (x, y): (Vec<f64>, Vec<f64>) = time
                    .iter()
                    .zip(values.iter())
                    .filter_map(|(t, v)| v.map(|v| (t.unwrap_or(f64::NAN), v)))
                    .unzip();
                let decomposition =
                    seasonal_decompose(&y, period).map_err(|source| ChartError::Decompose {
                        variable: name.to_string(),
                        source,
                    })?;
                Ok((*name, x, decomposition))
            })
            .collect::<Result<Vec<_>, ChartError>>()?;

        let panels = WIND_SPEED_COLS
            .iter()
            .flat_map(|var| {
                DECOMPOSITION_PANELS
                    .iter()
                    .map(move |c| Panel::cartesian(format!("{} - {}", var, c), AxisKind::DateTime))
            })
            .collect();
        let mut fig = Figure::grid(
            "seasonal-decompose-wind",
            WIND_SPEED_COLS.len() * 4,
            1,
            panels,
        );
        fig.height = 1000.0 * WIND_SPEED_COLS.len() as f32;
        fig.show_legend = false;

        for (var_idx, (name, x, d)) in decompositions.iter().enumerate() {
            let components = [&d.observed, &d.trend, &d.seasonal, &d.resid];
            for (c, (values, label)) in components.iter().zip(DECOMPOSITION_TRACES).enumerate() {
                let panel = var_idx * 4 + c;
                let points = x.iter().zip(values.iter()).map(|(&x, &y)| [x, y]).collect();
                fig.add_trace(Trace::line(
                    format!("{} - {}", name, label),
                    panel,
                    DEFAULT_CYCLE[panel % DEFAULT_CYCLE.len()],
                    points,
                ));
            }
        }
        Ok(fig)
    }

    /// Stacked missing / present percentages, most incomplete variable first.
    pub fn missing_data_figure(table: &ObservationTable) -> Result<Figure, ChartError> {
        let ratios = missing_percentages(table, &MISSING_DATA_COLS)?;

        let mut panel = Panel::cartesian("", AxisKind::Category);
        panel.categories = ratios.iter().map(|r| r.column.clone()).collect();
        panel.x_label = Some("Variables del Dataset".to_string());
        panel.y_label = Some("Porcentaje de Valores".to_string());
        panel.x_tick_angle = -90;

        let mut fig = Figure::grid("missing-data-graph", 1, 1, vec![panel]);
        fig.height = 600.0;
        fig.bar_mode = BarMode::Stack;

        let bars = |values: Vec<f64>| -> Vec<[f64; 2]> {
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| [i as f64, v])
                .collect()
        };
        fig.add_trace(Trace {
            name: "Faltante".to_string(),
            panel: 0,
            color: Rgb::hex(0x08306b),
            style: TraceStyle::Bar,
            points: bars(ratios.iter().map(|r| r.missing_pct).collect()),
        });
        fig.add_trace(Trace {
            name: "No Faltante".to_string(),
            panel: 0,
            color: Rgb::hex(0xc6dbef),
            style: TraceStyle::Bar,
            points: bars(ratios.iter().map(|r| r.present_pct()).collect()),
        });
        Ok(fig)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use polars::prelude::*;

    /// A synthetic three-day, 10-minute export with every charted column.
    pub(crate) fn sample_table(rows: usize) -> ObservationTable {
        table_from(sample_frame(rows))
    }

    fn table_from(df: DataFrame) -> ObservationTable {
        let mut table = ObservationTable::from_raw(df).unwrap();
        table.apply_valid_ranges(&VALID_RANGES).unwrap();
        table
    }

    fn sample_frame(rows: usize) -> DataFrame {
        let start = 1_600_000_000i64;
        let stamps: Vec<String> = (0..rows)
            .map(|i| {
                chrono::DateTime::from_timestamp(start + i as i64 * 600, 0)
                    .unwrap()
                    .naive_utc()
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .collect();
        let wave = |base: f64, amp: f64| -> Vec<Option<f64>> {
            (0..rows)
                .map(|i| Some(base + amp * ((i % 12) as f64 / 12.0 * std::f64::consts::TAU).sin()))
                .collect()
        };

        let mut columns = vec![Column::new(RAW_TIMESTAMP_COL.into(), stamps)];
        for name in WIND_SPEED_COLS {
            columns.push(Column::new(name.into(), wave(10.0, 3.0)));
        }
        for name in [WIND_DIRECTION_100, WIND_DIRECTION_80, WIND_DIRECTION_60] {
            columns.push(Column::new(name.into(), wave(180.0, 90.0)));
        }
        columns.push(Column::new(PRESSURE.into(), wave(1010.0, 5.0)));
        columns.push(Column::new(HUMIDITY.into(), wave(75.0, 10.0)));
        // Every fourth reading out of range so the missing chart has data.
        let temp100: Vec<Option<f64>> = (0..rows)
            .map(|i| Some(if i % 4 == 0 { 99.0 } else { 27.0 }))
            .collect();
        columns.push(Column::new(TEMPERATURE_100.into(), temp100));
        columns.push(Column::new(TEMPERATURE_21.into(), wave(25.0, 3.0)));

        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn trace_counts_match_plotted_series() {
        let table = sample_table(72);
        assert_eq!(ChartBuilder::wind_speed_figure(&table).unwrap().trace_count(), 4);
        assert_eq!(ChartBuilder::polar_scatter_figure(&table).unwrap().trace_count(), 3);
        assert_eq!(ChartBuilder::temperature_figure(&table).unwrap().trace_count(), 2);
        assert_eq!(
            ChartBuilder::seasonal_decomposition_figure(&table, DEFAULT_PERIOD)
                .unwrap()
                .trace_count(),
            20
        );
        assert_eq!(ChartBuilder::missing_data_figure(&table).unwrap().trace_count(), 2);
    }

    #[test]
    fn builders_do_not_mutate_the_table() {
        let table = sample_table(48);
        let before = table.dataframe().clone();
        ChartBuilder::wind_speed_figure(&table).unwrap();
        ChartBuilder::seasonal_decomposition_figure(&table, DEFAULT_PERIOD).unwrap();
        ChartBuilder::missing_data_figure(&table).unwrap();
        assert!(table.dataframe().equals_missing(&before));
    }

    #[test]
    fn seasonal_figure_layout() {
        let table = sample_table(48);
        let fig = ChartBuilder::seasonal_decomposition_figure(&table, DEFAULT_PERIOD).unwrap();
        assert_eq!(fig.rows, 20);
        assert_eq!(fig.panels.len(), 20);
        assert_eq!(fig.height, 5000.0);
        assert!(!fig.show_legend);
        assert_eq!(fig.panels[1].title, "WindSpeed100m_1 - Tendencia");
        assert_eq!(fig.traces[0].name, "WindSpeed100m_1 - Serie Original");
        assert!(fig.traces.iter().all(|t| t.points.len() == 48));
    }

    #[test]
    fn seasonal_figure_drops_gaps_and_keeps_timestamps() {
        let rows = 60;
        let mut df = sample_frame(rows);
        // Rows 5..10 are out of range and become nulls when cleaned.
        let speeds: Vec<Option<f64>> = (0..rows)
            .map(|i| Some(if (5..10).contains(&i) { 99.0 } else { 8.0 + (i % 12) as f64 / 4.0 }))
            .collect();
        df.with_column(Column::new(WIND_SPEED_60.into(), speeds)).unwrap();
        let table = table_from(df);
        let stamps = table.timestamps();

        let fig = ChartBuilder::seasonal_decomposition_figure(&table, DEFAULT_PERIOD).unwrap();
        let original = fig
            .traces
            .iter()
            .find(|t| t.name == format!("{} - Serie Original", WIND_SPEED_60))
            .unwrap();

        assert_eq!(original.points.len(), rows - 5);
        assert_eq!(Some(original.points[4][0]), stamps[4]);
        assert_eq!(Some(original.points[5][0]), stamps[10]);
        assert_eq!(Some(original.points[rows - 6][0]), stamps[rows - 1]);
        assert_eq!(original.points[5][1], 8.0 + 10.0 / 4.0);

        // Series without gaps keep every reading.
        let full = &fig.traces[0];
        assert_eq!(full.points.len(), rows);
    }

    #[test]
    fn seasonal_figure_needs_two_periods() {
        let table = sample_table(20);
        let err = ChartBuilder::seasonal_decomposition_figure(&table, DEFAULT_PERIOD).unwrap_err();
        assert!(matches!(err, ChartError::Decompose { .. }));
    }

    #[test]
    fn missing_chart_puts_incomplete_variable_first() {
        let table = sample_table(40);
        let fig = ChartBuilder::missing_data_figure(&table).unwrap();
        let panel = &fig.panels[0];
        assert_eq!(panel.categories.len(), MISSING_DATA_COLS.len());
        assert_eq!(panel.categories[0], TEMPERATURE_100);
        assert_eq!(fig.traces[0].points[0], [0.0, 25.0]);
        assert_eq!(fig.bar_mode, BarMode::Stack);
        for (missing, present) in fig.traces[0].points.iter().zip(&fig.traces[1].points) {
            assert!((missing[1] + present[1] - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn missing_column_fails_builder() {
        let df = DataFrame::new(vec![Column::new(WIND_SPEED_60.into(), vec![5.0, 6.0])]).unwrap();
        let table = ObservationTable::from_raw(df).unwrap();
        let err = ChartBuilder::temperature_figure(&table).unwrap_err();
        assert!(matches!(err, ChartError::Table(TableError::MissingColumn(_))));
    }
}
