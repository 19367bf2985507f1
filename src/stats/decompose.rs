//! Seasonal Decomposition Module
//! Classical additive decomposition: centred moving-average trend,
//! per-position seasonal means and residuals.

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DecomposeError {
    #[error("Period must be at least 2, got {0}")]
    InvalidPeriod(usize),
    #[error("Need at least {required} observations for period {period}, got {got}")]
    TooShort {
        period: usize,
        required: usize,
        got: usize,
    },
}

/// Result of an additive decomposition. Trend and residual are NaN where
/// the moving-average window does not fit.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub observed: Vec<f64>,
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub resid: Vec<f64>,
}

/// Centred moving-average weights. Even periods use the 2 x period filter
/// (half weights at both ends).
fn trend_filter(period: usize) -> Vec<f64> {
    let p = period as f64;
    if period % 2 == 0 {
        let mut weights = vec![1.0 / p; period + 1];
        weights[0] = 0.5 / p;
        weights[period] = 0.5 / p;
        weights
    } else {
        vec![1.0 / p; period]
    }
}

fn nan_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Decompose a gap-free series as `observed = trend + seasonal + resid`.
pub fn seasonal_decompose(series: &[f64], period: usize) -> Result<Decomposition, DecomposeError> {
    if period < 2 {
        return Err(DecomposeError::InvalidPeriod(period));
    }
    let n = series.len();
    if n < 2 * period {
        return Err(DecomposeError::TooShort {
            period,
            required: 2 * period,
            got: n,
        });
    }

    let weights = trend_filter(period);
    let half = weights.len() / 2;
    let trend: Vec<f64> = (0..n)
        .map(|i| {
            if i < half || i + half >= n {
                f64::NAN
            } else {
                weights
                    .iter()
                    .enumerate()
                    .map(|(k, w)| w * series[i + k - half])
                    .sum()
            }
        })
        .collect();

    let detrended: Vec<f64> = series.iter().zip(&trend).map(|(x, t)| x - t).collect();

    let mut period_averages: Vec<f64> = (0..period)
        .map(|offset| nan_mean(detrended.iter().skip(offset).step_by(period).copied()))
        .collect();
    let centre = nan_mean(period_averages.iter().copied());
    for avg in &mut period_averages {
        *avg -= centre;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| period_averages[i % period]).collect();
    let resid: Vec<f64> = detrended
        .iter()
        .zip(&seasonal)
        .map(|(d, s)| d - s)
        .collect();

    Ok(Decomposition {
        observed: series.to_vec(),
        trend,
        seasonal,
        resid,
    })
}
