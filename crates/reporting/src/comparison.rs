//! Side-by-side fit statistics and the model selection policy.

use mmm_regression::{ModelSpec, OlsFit};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Serialize)]
pub struct ModelComparisonRow {
    pub model: ModelSpec,
    pub name: String,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub aic: f64,
    pub bic: f64,
}

impl ModelComparisonRow {
    pub fn new(model: ModelSpec, fit: &OlsFit) -> Self {
        Self {
            model,
            name: model.name().to_string(),
            r_squared: fit.r_squared(),
            adj_r_squared: fit.adj_r_squared(),
            aic: fit.aic(),
            bic: fit.bic(),
        }
    }
}

pub fn compare_models<'a>(
    fits: impl IntoIterator<Item = (ModelSpec, &'a OlsFit)>,
) -> Vec<ModelComparisonRow> {
    fits.into_iter()
        .map(|(spec, fit)| ModelComparisonRow::new(spec, fit))
        .collect()
}

/// Which fitted model the rest of the analysis is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Always the Full Model, whatever the statistics say.
    #[default]
    AlwaysFull,
    /// Highest adjusted R².
    BestAdjustedRSquared,
}

impl SelectionPolicy {
    pub fn select(&self, rows: &[ModelComparisonRow]) -> ModelSpec {
        let best = rows
            .iter()
            .max_by(|a, b| a.adj_r_squared.total_cmp(&b.adj_r_squared));
        match self {
            SelectionPolicy::BestAdjustedRSquared => best.map_or(ModelSpec::Full, |r| r.model),
            SelectionPolicy::AlwaysFull => {
                let full = rows.iter().find(|r| r.model == ModelSpec::Full);
                if let (Some(full), Some(best)) = (full, best) {
                    if best.adj_r_squared > full.adj_r_squared {
                        warn!(
                            selected = full.name.as_str(),
                            better = best.name.as_str(),
                            full_adj_r_squared = full.adj_r_squared,
                            better_adj_r_squared = best.adj_r_squared,
                            "Selected model does not have the highest adjusted R²"
                        );
                    }
                }
                ModelSpec::Full
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(model: ModelSpec, adj_r_squared: f64) -> ModelComparisonRow {
        ModelComparisonRow {
            model,
            name: model.name().to_string(),
            r_squared: adj_r_squared + 0.01,
            adj_r_squared,
            aic: -100.0,
            bic: -90.0,
        }
    }

    #[test]
    fn test_always_full_ignores_statistics() {
        let rows = vec![
            row(ModelSpec::Base, 0.90),
            row(ModelSpec::Interaction, 0.85),
            row(ModelSpec::Full, 0.80),
        ];
        assert_eq!(SelectionPolicy::AlwaysFull.select(&rows), ModelSpec::Full);
        assert_eq!(SelectionPolicy::default().select(&rows), ModelSpec::Full);
        assert_eq!(
            SelectionPolicy::BestAdjustedRSquared.select(&rows),
            ModelSpec::Base
        );
    }

    #[test]
    fn test_rows_follow_fits() {
        let fits = crate::tests::fitted_models();
        let rows = compare_models(ModelSpec::ALL.iter().map(|s| (*s, &fits[s])));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Base Model");
        assert_eq!(rows[2].name, "Full Model");
        for r in &rows {
            assert_eq!(r.r_squared, fits[&r.model].r_squared());
            assert_eq!(r.bic, fits[&r.model].bic());
        }
    }
}
