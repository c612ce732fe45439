//! Marginal ROI per channel and the budget reallocation hints derived from it.

use crate::elasticity::ChannelElasticity;
use mmm_core::Channel;
use mmm_regression::AnalysisFrame;
use serde::Serialize;
use std::cmp::Ordering;

/// Marginal return of one channel, spend in thousands.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelRoi {
    pub channel: Channel,
    pub elasticity: f64,
    pub avg_spend: f64,
    /// Additional sales from a 1K increase in spend.
    pub marginal_sales_per_1k: f64,
    pub roi_ratio: f64,
}

/// `elasticity · mean(sales) / mean(spend)` over the lagged sample.
pub fn marginal_roi(elasticities: &[ChannelElasticity], frame: &AnalysisFrame) -> Vec<ChannelRoi> {
    let avg_sales = frame.mean_sales();
    elasticities
        .iter()
        .map(|e| {
            let avg_spend = frame.mean_spend(e.channel);
            let marginal = e.elasticity * avg_sales / avg_spend;
            ChannelRoi {
                channel: e.channel,
                elasticity: e.elasticity,
                avg_spend,
                marginal_sales_per_1k: marginal,
                roi_ratio: marginal,
            }
        })
        .collect()
}

/// Channels ordered best to worst by ROI. Ties keep channel order.
pub fn rank_by_roi(rois: &[ChannelRoi]) -> Vec<ChannelRoi> {
    let mut ranked = rois.to_vec();
    ranked.sort_by(|a, b| match b.roi_ratio.total_cmp(&a.roi_ratio) {
        Ordering::Equal => a.channel.cmp(&b.channel),
        other => other,
    });
    ranked
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetRecommendation {
    pub top_channel: Channel,
    pub increase: Vec<Channel>,
    pub reduce: Vec<Channel>,
}

impl BudgetRecommendation {
    /// Top channel, the best two to grow and the worst two to cut, from a
    /// ranking produced by [`rank_by_roi`]. `None` for an empty ranking.
    pub fn from_ranking(ranked: &[ChannelRoi]) -> Option<Self> {
        let top_channel = ranked.first()?.channel;
        let increase = ranked.iter().take(2).map(|r| r.channel).collect();
        let reduce = ranked[ranked.len().saturating_sub(2)..]
            .iter()
            .map(|r| r.channel)
            .collect();
        Some(Self {
            top_channel,
            increase,
            reduce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::reference_frame;

    fn roi(channel: Channel, roi_ratio: f64) -> ChannelRoi {
        ChannelRoi {
            channel,
            elasticity: 0.1,
            avg_spend: 10.0,
            marginal_sales_per_1k: roi_ratio,
            roi_ratio,
        }
    }

    #[test]
    fn test_roi_formula() {
        let frame = reference_frame();
        let elasticities: Vec<ChannelElasticity> = Channel::ALL
            .into_iter()
            .map(|c| ChannelElasticity::new(c, 0.1))
            .collect();
        let rois = marginal_roi(&elasticities, &frame);
        assert_eq!(rois.len(), 5);
        for r in &rois {
            let expected = 0.1 * frame.mean_sales() / frame.mean_spend(r.channel);
            assert!((r.roi_ratio - expected).abs() < 1e-9);
            assert_eq!(r.roi_ratio, r.marginal_sales_per_1k);
        }
        // Email has the smallest mean spend, so equal elasticities favor it.
        assert_eq!(rank_by_roi(&rois)[0].channel, Channel::Email);
    }

    #[test]
    fn test_ranking_and_recommendation() {
        let rois = vec![
            roi(Channel::Tv, 3.0),
            roi(Channel::Digital, 9.0),
            roi(Channel::Social, -1.0),
            roi(Channel::Email, 12.0),
            roi(Channel::Sem, 5.0),
        ];
        let ranked = rank_by_roi(&rois);
        let order: Vec<Channel> = ranked.iter().map(|r| r.channel).collect();
        assert_eq!(
            order,
            vec![Channel::Email, Channel::Digital, Channel::Sem, Channel::Tv, Channel::Social]
        );

        let rec = BudgetRecommendation::from_ranking(&ranked).unwrap();
        assert_eq!(rec.top_channel, Channel::Email);
        assert_eq!(rec.increase, vec![Channel::Email, Channel::Digital]);
        assert_eq!(rec.reduce, vec![Channel::Tv, Channel::Social]);
    }

    #[test]
    fn test_empty_ranking() {
        assert!(BudgetRecommendation::from_ranking(&[]).is_none());
    }
}
