//! Variance inflation factors.

use crate::design::DesignMatrix;
use crate::ols::OlsFit;
use mmm_core::MmmResult;
use serde::Serialize;
use tracing::debug;

/// VIF above this is reported as moderate multicollinearity.
pub const MODERATE_VIF: f64 = 4.0;
/// VIF above this is reported as severe multicollinearity.
pub const SEVERE_VIF: f64 = 10.0;

#[derive(Debug, Clone, Serialize)]
pub struct VifEntry {
    pub variable: String,
    pub vif: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollinearityLevel {
    Acceptable,
    Moderate,
    Severe,
}

impl CollinearityLevel {
    pub fn from_max_vif(max_vif: f64) -> Self {
        if max_vif > SEVERE_VIF {
            Self::Severe
        } else if max_vif > MODERATE_VIF {
            Self::Moderate
        } else {
            Self::Acceptable
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VifReport {
    pub entries: Vec<VifEntry>,
    pub max_vif: f64,
    pub level: CollinearityLevel,
}

/// `1 / (1 - R²_j)` for every non-constant column, where `R²_j` comes from
/// regressing column j on the remaining columns of the same matrix. Without an
/// intercept that R² is uncentered.
pub fn variance_inflation(design: &DesignMatrix) -> MmmResult<VifReport> {
    let start = usize::from(design.has_intercept());
    let mut entries = Vec::with_capacity(design.n_params() - start);

    for j in start..design.n_params() {
        let variable = design.names()[j].clone();
        let vif = if design.n_params() == 1 {
            1.0
        } else {
            let (others, column) = design.without_column(j)?;
            let aux = OlsFit::fit(&others, &column)?;
            1.0 / (1.0 - aux.r_squared())
        };
        debug!(variable = %variable, vif, "VIF computed");
        entries.push(VifEntry { variable, vif });
    }

    let max_vif = entries.iter().map(|e| e.vif).fold(f64::NEG_INFINITY, f64::max);
    Ok(VifReport {
        entries,
        max_vif,
        level: CollinearityLevel::from_max_vif(max_vif),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::tests::toy_dataset;
    use crate::design::{AnalysisFrame, ModelSpec};

    #[test]
    fn test_orthogonal_regressor_has_unit_vif() {
        // Columns of a Hadamard matrix are mutually orthogonal.
        let columns = vec![
            vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0],
            vec![1.0, 1.0, -1.0, -1.0, 1.0, 1.0, -1.0, -1.0],
            vec![1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0],
        ];
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let design = DesignMatrix::from_columns(names, &columns, false).unwrap();
        let report = variance_inflation(&design).unwrap();
        assert_eq!(report.entries.len(), 3);
        for entry in &report.entries {
            assert!((entry.vif - 1.0).abs() < 1e-12, "{}: {}", entry.variable, entry.vif);
        }
        assert_eq!(report.level, CollinearityLevel::Acceptable);
    }

    #[test]
    fn test_near_collinear_columns_are_severe() {
        let a: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let b: Vec<f64> = a
            .iter()
            .enumerate()
            .map(|(i, v)| 2.0 * v + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let c: Vec<f64> = (0..30).map(|i| ((i * 7) % 5) as f64).collect();
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let design = DesignMatrix::from_columns(names, &[a, b, c], false).unwrap();
        let report = variance_inflation(&design).unwrap();
        assert!(report.max_vif > SEVERE_VIF);
        assert_eq!(report.level, CollinearityLevel::Severe);
    }

    #[test]
    fn test_levels() {
        assert_eq!(CollinearityLevel::from_max_vif(3.9), CollinearityLevel::Acceptable);
        assert_eq!(CollinearityLevel::from_max_vif(4.0), CollinearityLevel::Acceptable);
        assert_eq!(CollinearityLevel::from_max_vif(4.5), CollinearityLevel::Moderate);
        assert_eq!(CollinearityLevel::from_max_vif(10.5), CollinearityLevel::Severe);
    }

    #[test]
    fn test_base_design_vif_is_finite() {
        let frame = AnalysisFrame::from_dataset(&toy_dataset(80)).unwrap();
        let design = frame.design_of(&ModelSpec::Base.regressors(), false).unwrap();
        let report = variance_inflation(&design).unwrap();
        assert_eq!(report.entries.len(), 10);
        assert_eq!(report.entries[0].variable, "log(lag_sales)");
        assert!(report.entries.iter().all(|e| e.vif.is_finite() && e.vif >= 1.0));
    }
}
