//! Constants of the synthetic data-generating process.
//!
//! A single [`ModelConfig`] is built once at startup and passed by reference
//! into the generator and the analyzer. `ModelConfig::default()` is the
//! reference parameterisation.

use crate::types::{Channel, ChannelMap};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    /// Date of week 1.
    pub start_date: NaiveDate,
    pub holidays: HolidayWeeks,
    pub seasonality: Seasonality,
    pub channels: ChannelMap<ChannelSpec>,
    pub promotion: PromotionSpec,
    pub competitor: IndexSpec,
    pub economic: IndexSpec,
    pub sales: SalesCoefficients,
}

/// Fixed holiday week numbers, recurring every 52 weeks.
#[derive(Debug, Clone, Serialize)]
pub struct HolidayWeeks {
    pub black_friday: Vec<u32>,
    pub cyber_monday: Vec<u32>,
    pub christmas: Vec<u32>,
    pub new_year: Vec<u32>,
}

impl HolidayWeeks {
    /// Union of all holiday lists.
    pub fn week_set(&self) -> HashSet<u32> {
        self.black_friday
            .iter()
            .chain(&self.cyber_monday)
            .chain(&self.christmas)
            .chain(&self.new_year)
            .copied()
            .collect()
    }
}

/// `multiplier = 1 + q4_uplift * is_q4 + q1_uplift * is_q1`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Seasonality {
    pub q4_uplift: f64,
    pub q1_uplift: f64,
}

impl Seasonality {
    pub fn multiplier(&self, quarter: u32) -> f64 {
        let q4 = if quarter == 4 { 1.0 } else { 0.0 };
        let q1 = if quarter == 1 { 1.0 } else { 0.0 };
        1.0 + self.q4_uplift * q4 + self.q1_uplift * q1
    }
}

/// Spend process of one channel:
/// `max(floor, (mean + trend*week + N(0, sd)) * scale * seasonal + holiday * N(holiday_mean, holiday_sd))`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChannelSpec {
    pub base_mean: f64,
    pub base_sd: f64,
    pub trend_per_week: f64,
    pub scale: f64,
    /// Whether the quarter seasonal multiplier applies.
    pub seasonal: bool,
    pub holiday_mean: f64,
    pub holiday_sd: f64,
    pub floor: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromotionSpec {
    pub base_probability: f64,
    pub q4_uplift: f64,
}

impl PromotionSpec {
    pub fn probability(&self, quarter: u32) -> f64 {
        if quarter == 4 {
            self.base_probability + self.q4_uplift
        } else {
            self.base_probability
        }
    }
}

/// Exogenous index: `clip(level + trend*week + N(0, sd), min, max)`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IndexSpec {
    pub level: f64,
    pub trend_per_week: f64,
    pub sd: f64,
    pub min: f64,
    pub max: f64,
}

/// True coefficients of the log-sales recurrence.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SalesCoefficients {
    pub intercept: f64,
    pub lag: f64,
    pub channels: ChannelMap<f64>,
    pub promotion: f64,
    pub holiday: f64,
    pub competitor: f64,
    pub economic: f64,
    pub noise_sd: f64,
    /// Multiplier on `holiday * ln(digital)` applied after exponentiation.
    pub holiday_digital_boost: f64,
}

/// First week of the generated calendar.
pub const START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2021, 1, 1) {
    Some(date) => date,
    None => panic!("invalid start date"),
};

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            start_date: START_DATE,
            holidays: HolidayWeeks {
                black_friday: vec![47, 99, 151],
                cyber_monday: vec![48, 100, 152],
                christmas: vec![51, 52, 103, 104, 155, 156],
                new_year: vec![1, 53, 105],
            },
            seasonality: Seasonality {
                q4_uplift: 0.3,
                q1_uplift: 0.1,
            },
            channels: ChannelMap {
                tv: ChannelSpec {
                    base_mean: 15.0,
                    base_sd: 3.0,
                    trend_per_week: 0.0,
                    scale: 1.0,
                    seasonal: true,
                    holiday_mean: 5.0,
                    holiday_sd: 1.0,
                    floor: 2.0,
                },
                digital: ChannelSpec {
                    base_mean: 20.0,
                    base_sd: 5.0,
                    trend_per_week: 0.0,
                    scale: 1.0,
                    seasonal: true,
                    holiday_mean: 8.0,
                    holiday_sd: 2.0,
                    floor: 3.0,
                },
                social: ChannelSpec {
                    base_mean: 5.0,
                    base_sd: 2.0,
                    trend_per_week: 0.05,
                    scale: 1.0,
                    seasonal: true,
                    holiday_mean: 10.0,
                    holiday_sd: 2.0,
                    floor: 1.0,
                },
                email: ChannelSpec {
                    base_mean: 3.0,
                    base_sd: 0.8,
                    trend_per_week: 0.0,
                    scale: 1.0,
                    seasonal: false,
                    holiday_mean: 2.0,
                    holiday_sd: 0.5,
                    floor: 0.5,
                },
                sem: ChannelSpec {
                    base_mean: 12.0,
                    base_sd: 2.5,
                    trend_per_week: 0.0,
                    scale: 1.1,
                    seasonal: true,
                    holiday_mean: 5.0,
                    holiday_sd: 1.0,
                    floor: 2.0,
                },
            },
            promotion: PromotionSpec {
                base_probability: 0.15,
                q4_uplift: 0.25,
            },
            competitor: IndexSpec {
                level: 50.0,
                trend_per_week: 0.0,
                sd: 10.0,
                min: 20.0,
                max: 80.0,
            },
            economic: IndexSpec {
                level: 100.0,
                trend_per_week: 0.03,
                sd: 5.0,
                min: 80.0,
                max: 120.0,
            },
            sales: SalesCoefficients {
                intercept: 4.5,
                lag: 0.30,
                channels: ChannelMap {
                    tv: 0.08,
                    digital: 0.12,
                    social: 0.10,
                    email: 0.06,
                    sem: 0.09,
                },
                promotion: 0.15,
                holiday: 0.20,
                competitor: -0.003,
                economic: 0.004,
                noise_sd: 0.08,
                holiday_digital_boost: 0.15,
            },
        }
    }
}

impl ModelConfig {
    pub fn channel(&self, channel: Channel) -> &ChannelSpec {
        self.channels.get(channel)
    }
}
