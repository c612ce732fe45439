//! The analysis pipeline: fit the nested models on a weekly dataset and derive
//! every reported figure from the selected one.

use crate::comparison::{compare_models, ModelComparisonRow, SelectionPolicy};
use crate::elasticity::{
    channel_elasticities, coefficient_recovery, ChannelElasticity, CoefficientRecovery, KeyEffects,
};
use crate::exploratory::ExploratoryReport;
use crate::roi::{marginal_roi, rank_by_roi, BudgetRecommendation, ChannelRoi};
use mmm_core::{MarketingDataset, MmmError, MmmResult, ModelConfig};
use mmm_regression::{
    render_summary, variance_inflation, AnalysisFrame, CollinearityLevel, ModelSpec, OlsFit,
    ResidualDiagnostics, VifReport,
};
use serde::Serialize;
use tracing::{debug, info, warn};

pub const DEPENDENT_LABEL: &str = "log(sales)";

#[derive(Debug, Clone, Serialize)]
pub struct FittedModel {
    pub spec: ModelSpec,
    pub fit: OlsFit,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub exploratory: ExploratoryReport,
    pub models: Vec<FittedModel>,
    /// Collinearity among the base regressors, constant excluded.
    pub vif: VifReport,
    pub comparison: Vec<ModelComparisonRow>,
    pub selected: ModelSpec,
    pub elasticities: Vec<ChannelElasticity>,
    pub key_effects: KeyEffects,
    /// Selected-model estimates against the generating coefficients.
    pub recovery: Vec<CoefficientRecovery>,
    /// Channel order.
    pub roi: Vec<ChannelRoi>,
    /// Best to worst.
    pub roi_ranking: Vec<ChannelRoi>,
    pub recommendation: Option<BudgetRecommendation>,
    pub diagnostics: ResidualDiagnostics,
    pub summary: String,
}

impl AnalysisReport {
    pub fn fit(&self, spec: ModelSpec) -> Option<&OlsFit> {
        self.models.iter().find(|m| m.spec == spec).map(|m| &m.fit)
    }

    pub fn selected_fit(&self) -> MmmResult<&OlsFit> {
        self.fit(self.selected).ok_or_else(|| {
            MmmError::InvalidData(format!("{} was not fitted", self.selected.name()))
        })
    }
}

#[derive(Debug, Clone)]
pub struct Analyzer<'a> {
    model: &'a ModelConfig,
    policy: SelectionPolicy,
}

impl<'a> Analyzer<'a> {
    pub fn new(model: &'a ModelConfig, policy: SelectionPolicy) -> Self {
        Self { model, policy }
    }

    pub fn analyze(&self, dataset: &MarketingDataset) -> MmmResult<AnalysisReport> {
        let exploratory = ExploratoryReport::from_dataset(dataset)?;
        let overview = &exploratory.overview;
        info!(
            start = %overview.start,
            end = %overview.end,
            weeks = overview.weeks,
            total_sales = overview.total_sales,
            average_sales = overview.average_sales,
            analysis_weeks = overview.analysis_weeks,
            "Dataset overview"
        );

        let frame = AnalysisFrame::from_dataset(dataset)?;
        let response = frame.response();

        let mut models = Vec::with_capacity(ModelSpec::ALL.len());
        for spec in ModelSpec::ALL {
            let design = frame.design(spec)?;
            let fit = OlsFit::fit(&design, &response)?;
            info!(
                model = spec.name(),
                params = fit.n_params(),
                r_squared = fit.r_squared(),
                adj_r_squared = fit.adj_r_squared(),
                aic = fit.aic(),
                bic = fit.bic(),
                "Model fitted"
            );
            models.push(FittedModel { spec, fit });
        }

        let base_design = frame.design_of(&ModelSpec::Base.regressors(), false)?;
        let vif = variance_inflation(&base_design)?;
        match vif.level {
            CollinearityLevel::Severe => {
                warn!(max_vif = vif.max_vif, "High multicollinearity detected")
            }
            CollinearityLevel::Moderate => {
                info!(max_vif = vif.max_vif, "Moderate multicollinearity present")
            }
            CollinearityLevel::Acceptable => {
                info!(max_vif = vif.max_vif, "No serious multicollinearity")
            }
        }

        let comparison = compare_models(models.iter().map(|m| (m.spec, &m.fit)));
        let selected = self.policy.select(&comparison);
        let fit = &models
            .iter()
            .find(|m| m.spec == selected)
            .ok_or_else(|| MmmError::InvalidData(format!("{} was not fitted", selected.name())))?
            .fit;
        info!(
            model = selected.name(),
            adj_r_squared = fit.adj_r_squared(),
            "Model selected"
        );

        let elasticities = channel_elasticities(fit)?;
        for e in &elasticities {
            info!(channel = %e.channel, elasticity = e.elasticity, "{}", e.interpretation);
        }
        let key_effects = KeyEffects::from_fit(fit)?;
        debug!(?key_effects, "Key effects");

        let recovery = coefficient_recovery(fit, &self.model.sales);
        let missed = recovery.iter().filter(|r| !r.inside_ci).count();
        for r in recovery.iter().filter(|r| !r.inside_ci) {
            debug!(
                term = %r.term,
                estimate = r.estimate,
                generating = r.generating,
                "Outside 95% CI"
            );
        }
        info!(terms = recovery.len(), outside_ci = missed, "Coefficient recovery");

        let roi = marginal_roi(&elasticities, &frame);
        let roi_ranking = rank_by_roi(&roi);
        for (rank, r) in roi_ranking.iter().enumerate() {
            info!(rank = rank + 1, channel = %r.channel, roi_ratio = r.roi_ratio, "ROI ranking");
        }
        let recommendation = BudgetRecommendation::from_ranking(&roi_ranking);
        if let Some(rec) = &recommendation {
            info!(
                top = %rec.top_channel,
                increase = ?rec.increase,
                reduce = ?rec.reduce,
                "Budget recommendation"
            );
        }

        let diagnostics = ResidualDiagnostics::from_fit(fit)?;
        let summary = render_summary(fit, DEPENDENT_LABEL);

        Ok(AnalysisReport {
            exploratory,
            models,
            vif,
            comparison,
            selected,
            elasticities,
            key_effects,
            recovery,
            roi,
            roi_ranking,
            recommendation,
            diagnostics,
            summary,
        })
    }
}

/// Analyze `dataset` with the default selection policy.
pub fn run_analysis(
    model: &ModelConfig,
    dataset: &MarketingDataset,
) -> MmmResult<AnalysisReport> {
    Analyzer::new(model, SelectionPolicy::default()).analyze(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::reference_dataset;

    fn analyze_reference() -> AnalysisReport {
        run_analysis(&ModelConfig::default(), &reference_dataset()).unwrap()
    }

    #[test]
    fn test_reference_analysis() {
        let report = analyze_reference();
        assert_eq!(report.models.len(), 3);
        assert_eq!(report.selected, ModelSpec::Full);
        for m in &report.models {
            let r2 = m.fit.r_squared();
            assert!(r2.is_finite() && (0.0..=1.0).contains(&r2), "{}: {}", m.spec.name(), r2);
            assert_eq!(m.fit.n_obs(), 155);
        }

        let base = report.fit(ModelSpec::Base).unwrap().r_squared();
        let interaction = report.fit(ModelSpec::Interaction).unwrap().r_squared();
        let full = report.fit(ModelSpec::Full).unwrap().r_squared();
        assert!(full >= interaction - 1e-12);
        assert!(interaction >= base - 1e-12);

        assert_eq!(report.vif.entries.len(), 10);
        assert_eq!(report.elasticities.len(), 5);
        assert_eq!(report.roi_ranking.len(), 5);
        assert!(report
            .roi_ranking
            .windows(2)
            .all(|w| w[0].roi_ratio >= w[1].roi_ratio));
        let rec = report.recommendation.as_ref().unwrap();
        assert_eq!(rec.top_channel, report.roi_ranking[0].channel);
        assert_eq!(report.diagnostics.points.len(), 155);
        assert!(report.summary.contains("log(digital)"));
        assert_eq!(report.recovery.len(), 11);
    }

    #[test]
    fn test_selected_fit_is_full() {
        let report = analyze_reference();
        let fit = report.selected_fit().unwrap();
        assert_eq!(fit.n_params(), 15);
        assert_eq!(
            report.elasticities[1].elasticity,
            fit.coefficient("log(digital)").unwrap().estimate
        );
    }
}
