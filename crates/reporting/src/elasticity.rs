//! Channel elasticities and the other headline effects of a fitted log-log
//! model.

use mmm_core::model::SalesCoefficients;
use mmm_core::{Channel, MmmResult};
use mmm_regression::{OlsFit, Regressor};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ChannelElasticity {
    pub channel: Channel,
    pub elasticity: f64,
    pub interpretation: String,
}

impl ChannelElasticity {
    pub fn new(channel: Channel, elasticity: f64) -> Self {
        Self {
            channel,
            elasticity,
            interpretation: interpret(channel, elasticity),
        }
    }
}

/// `1% ↑ in <Channel> → <100·e>% ↑ in sales`. The figure is the elasticity
/// scaled by 100, and the arrow is always ↑ whatever the sign.
pub fn interpret(channel: Channel, elasticity: f64) -> String {
    format!(
        "1% ↑ in {} → {:.2}% ↑ in sales",
        channel.display_name(),
        elasticity * 100.0
    )
}

/// The `log(<channel>)` coefficient of every channel, in channel order.
pub fn channel_elasticities(fit: &OlsFit) -> MmmResult<Vec<ChannelElasticity>> {
    Channel::ALL
        .into_iter()
        .map(|channel| {
            let coefficient = fit.coefficient(Regressor::LogSpend(channel).label())?;
            Ok(ChannelElasticity::new(channel, coefficient.estimate))
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DigitalHolidayEffect {
    pub interaction: f64,
    /// `β_digital + β_interaction`
    pub holiday_elasticity: f64,
    /// `holiday_elasticity / β_digital - 1`
    pub relative_gain: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyEffects {
    pub momentum: f64,
    /// Percent change in this week's sales for a 10% rise in last week's.
    pub momentum_per_10pct: f64,
    pub promotion: f64,
    pub promotion_uplift_pct: f64,
    pub holiday: Option<f64>,
    pub holiday_uplift_pct: Option<f64>,
    pub digital_holiday: Option<DigitalHolidayEffect>,
}

impl KeyEffects {
    /// Read the effects off `fit`. Holiday terms are `None` for models that do
    /// not carry them.
    pub fn from_fit(fit: &OlsFit) -> MmmResult<Self> {
        let momentum = fit.coefficient(Regressor::LogLagSales.label())?.estimate;
        let promotion = fit.coefficient(Regressor::Promotion.label())?.estimate;
        let holiday = fit
            .coefficient(Regressor::Holiday.label())
            .ok()
            .map(|c| c.estimate);

        let digital_holiday = match fit.coefficient(Regressor::DigitalHoliday.label()) {
            Ok(interaction) => {
                let digital = fit
                    .coefficient(Regressor::LogSpend(Channel::Digital).label())?
                    .estimate;
                let holiday_elasticity = digital + interaction.estimate;
                Some(DigitalHolidayEffect {
                    interaction: interaction.estimate,
                    holiday_elasticity,
                    relative_gain: holiday_elasticity / digital - 1.0,
                })
            }
            Err(_) => None,
        };

        Ok(Self {
            momentum,
            momentum_per_10pct: momentum * 10.0,
            promotion,
            promotion_uplift_pct: uplift_pct(promotion),
            holiday,
            holiday_uplift_pct: holiday.map(uplift_pct),
            digital_holiday,
        })
    }
}

/// Percent uplift of a dummy coefficient in a log-sales model.
pub fn uplift_pct(coefficient: f64) -> f64 {
    (coefficient.exp() - 1.0) * 100.0
}

/// An estimated coefficient next to the value that generated the data.
#[derive(Debug, Clone, Serialize)]
pub struct CoefficientRecovery {
    pub term: String,
    pub estimate: f64,
    pub generating: f64,
    pub inside_ci: bool,
}

/// Compare every generating coefficient that `fit` carries a term for.
/// Terms the model omits are skipped.
pub fn coefficient_recovery(
    fit: &OlsFit,
    sales: &SalesCoefficients,
) -> Vec<CoefficientRecovery> {
    let mut truth = vec![
        (Regressor::LogLagSales, sales.lag),
        (Regressor::Promotion, sales.promotion),
        (Regressor::Holiday, sales.holiday),
        (Regressor::DigitalHoliday, sales.holiday_digital_boost),
        (Regressor::Competitor, sales.competitor),
        (Regressor::Economic, sales.economic),
    ];
    truth.extend(
        Channel::ALL
            .into_iter()
            .map(|c| (Regressor::LogSpend(c), *sales.channels.get(c))),
    );

    truth
        .into_iter()
        .filter_map(|(regressor, generating)| {
            let c = fit.coefficient(regressor.label()).ok()?;
            Some(CoefficientRecovery {
                term: c.name.clone(),
                estimate: c.estimate,
                generating,
                inside_ci: (c.conf_low..=c.conf_high).contains(&generating),
            })
        })
        .collect()
}
