//! Statistics Calculator Module
//! Descriptive statistics per column (count, mean, std, min, quartiles, max).

use crate::data::{ObservationTable, TableError};
use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Row labels of the summary table, in display order.
pub const SUMMARY_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Summary statistics for a single column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl ColumnStats {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }

    /// Value for one of [`SUMMARY_ROWS`].
    pub fn get(&self, row: &str) -> Option<f64> {
        match row {
            "count" => Some(self.count as f64),
            "mean" => Some(self.mean),
            "std" => Some(self.std),
            "min" => Some(self.min),
            "25%" => Some(self.p25),
            "50%" => Some(self.median),
            "75%" => Some(self.p75),
            "max" => Some(self.max),
            _ => None,
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    /// Standard deviation uses the sample (n - 1) estimator.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::empty(column);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnStats {
            column: column.to_string(),
            count: n,
            mean: values.iter().mean(),
            std: values.iter().std_dev(),
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Describe every numeric column of the table, in column order.
    pub fn describe(table: &ObservationTable) -> Result<Vec<ColumnStats>, TableError> {
        table
            .numeric_columns()
            .par_iter()
            .map(|name| {
                let values: Vec<f64> = table.values(name)?.into_iter().flatten().collect();
                Ok(Self::compute_descriptive_stats(name, &values))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn descriptive_stats_use_linear_quartiles() {
        let stats = StatsCalculator::compute_descriptive_stats("x", &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.std - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert!((stats.p25 - 1.75).abs() < 1e-12);
        assert!((stats.median - 2.5).abs() < 1e-12);
        assert!((stats.p75 - 3.25).abs() < 1e-12);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn empty_column_is_all_nan() {
        let stats = StatsCalculator::compute_descriptive_stats("x", &[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert_eq!(stats.get("count"), Some(0.0));
        assert_eq!(stats.get("skew"), None);
    }

    #[test]
    fn describe_skips_nulls_and_keeps_column_order() {
        let df = DataFrame::new(vec![
            Column::new("b".into(), vec![Some(1.0), None, Some(3.0)]),
            Column::new("a".into(), vec![Some(10.0), Some(20.0), Some(30.0)]),
        ])
        .unwrap();
        let table = ObservationTable::from_raw(df).unwrap();
        let stats = StatsCalculator::describe(&table).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].column, "b");
        assert_eq!(stats[0].count, 2);
        assert!((stats[0].mean - 2.0).abs() < 1e-12);
        assert_eq!(stats[1].column, "a");
        assert_eq!(stats[1].max, 30.0);
    }
}
