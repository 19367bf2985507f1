//! Missing-data ratios per variable.

use crate::data::{ObservationTable, TableError};

#[derive(Debug, Clone, PartialEq)]
pub struct MissingRatio {
    pub column: String,
    /// Share of missing readings, 0-100.
    pub missing_pct: f64,
}

impl MissingRatio {
    pub fn present_pct(&self) -> f64 {
        100.0 - self.missing_pct
    }
}

/// Missing percentage of each column, highest first.
pub fn missing_percentages(
    table: &ObservationTable,
    columns: &[&str],
) -> Result<Vec<MissingRatio>, TableError> {
    let rows = table.height();
    let mut ratios = columns
        .iter()
        .map(|&name| {
            let missing = table.values(name)?.iter().filter(|v| v.is_none()).count();
            let missing_pct = if rows == 0 {
                0.0
            } else {
                missing as f64 / rows as f64 * 100.0
            };
            Ok(MissingRatio {
                column: name.to_string(),
                missing_pct,
            })
        })
        .collect::<Result<Vec<_>, TableError>>()?;

    ratios.sort_by(|a, b| {
        b.missing_pct
            .partial_cmp(&a.missing_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(ratios)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn sorted_by_missing_share() {
        let df = DataFrame::new(vec![
            Column::new("full".into(), vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Column::new("half".into(), vec![Some(1.0), None, Some(3.0), None]),
            Column::new("most".into(), vec![None, None, None, Some(f64::NAN)]),
        ])
        .unwrap();
        let table = ObservationTable::from_raw(df).unwrap();
        let ratios = missing_percentages(&table, &["full", "half", "most"]).unwrap();

        let order: Vec<&str> = ratios.iter().map(|r| r.column.as_str()).collect();
        assert_eq!(order, vec!["most", "half", "full"]);
        assert_eq!(ratios[0].missing_pct, 100.0);
        assert_eq!(ratios[1].missing_pct, 50.0);
        assert_eq!(ratios[1].present_pct(), 50.0);
        assert_eq!(ratios[2].missing_pct, 0.0);
    }

    #[test]
    fn unknown_column_is_an_error() {
        let df = DataFrame::new(vec![Column::new("a".into(), vec![1.0, 2.0])]).unwrap();
        let table = ObservationTable::from_raw(df).unwrap();
        assert!(missing_percentages(&table, &["b"]).is_err());
    }
}
