//! Marketing-mix reporting: elasticities, marginal ROI, model comparison,
//! exploratory statistics, and results export.

pub mod analysis;
pub mod comparison;
pub mod elasticity;
pub mod exploratory;
pub mod export;
pub mod roi;

pub use analysis::{run_analysis, AnalysisReport, Analyzer, FittedModel};
pub use comparison::{ModelComparisonRow, SelectionPolicy};
pub use elasticity::{ChannelElasticity, CoefficientRecovery, KeyEffects};
pub use exploratory::ExploratoryReport;
pub use export::ResultsWriter;
pub use roi::{BudgetRecommendation, ChannelRoi};

#[cfg(test)]
pub(crate) mod tests {
    use mmm_core::{MarketingDataset, ModelConfig};
    use mmm_generator::SeriesGenerator;
    use mmm_regression::{AnalysisFrame, ModelSpec, OlsFit};
    use std::collections::HashMap;

    /// Seed 42, 156 weeks.
    pub(crate) fn reference_dataset() -> MarketingDataset {
        let model = ModelConfig::default();
        SeriesGenerator::new(&model, 42, 156).generate().unwrap()
    }

    pub(crate) fn reference_frame() -> AnalysisFrame {
        AnalysisFrame::from_dataset(&reference_dataset()).unwrap()
    }

    pub(crate) fn fitted_models() -> HashMap<ModelSpec, OlsFit> {
        let frame = reference_frame();
        let y = frame.response();
        ModelSpec::ALL
            .into_iter()
            .map(|spec| (spec, OlsFit::fit(&frame.design(spec).unwrap(), &y).unwrap()))
            .collect()
    }
}
