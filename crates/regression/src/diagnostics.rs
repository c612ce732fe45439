//! Residual diagnostics behind the 4-panel chart: residuals vs fitted,
//! normal Q-Q, scale-location, and the residual histogram.

use crate::ols::OlsFit;
use mmm_core::{MmmError, MmmResult};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

pub const HISTOGRAM_BINS: usize = 30;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ResidualPoint {
    pub fitted: f64,
    pub residual: f64,
    pub sqrt_abs_residual: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QqPoint {
    pub theoretical: f64,
    pub sample: f64,
    /// Standardized reference line `mean + sd * theoretical`.
    pub reference: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidualDiagnostics {
    pub points: Vec<ResidualPoint>,
    pub qq: Vec<QqPoint>,
    pub histogram: Vec<HistogramBin>,
}

impl ResidualDiagnostics {
    pub fn from_fit(fit: &OlsFit) -> MmmResult<Self> {
        let points = fit
            .fitted()
            .iter()
            .zip(fit.residuals())
            .map(|(&fitted, &residual)| ResidualPoint {
                fitted,
                residual,
                sqrt_abs_residual: residual.abs().sqrt(),
            })
            .collect();
        Ok(Self {
            points,
            qq: qq_points(fit.residuals())?,
            histogram: histogram(fit.residuals(), HISTOGRAM_BINS),
        })
    }
}

/// Sorted sample against standard normal quantiles at `i / (n + 1)`.
pub fn qq_points(values: &[f64]) -> MmmResult<Vec<QqPoint>> {
    let n = values.len();
    if n < 2 {
        return Err(MmmError::InsufficientData {
            required: 1,
            actual: n,
        });
    }
    let standard = Normal::new(0.0, 1.0).map_err(|e| MmmError::Distribution(e.to_string()))?;
    let mean = values.iter().sum::<f64>() / n as f64;
    let sd = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt();

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted
        .into_iter()
        .enumerate()
        .map(|(i, sample)| {
            let theoretical = standard.inverse_cdf((i + 1) as f64 / (n + 1) as f64);
            QqPoint {
                theoretical,
                sample,
                reference: mean + sd * theoretical,
            }
        })
        .collect())
}

/// Equal-width bins over `[min, max]`; the last bin includes `max`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
            count,
        })
        .collect()
}
