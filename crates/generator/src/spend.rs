//! Marketing spend channels.

use crate::calendar::Calendar;
use crate::sampling::draw_normal;
use mmm_core::model::{ChannelSpec, Seasonality};
use mmm_core::MmmResult;
use rand::Rng;

/// Simulate one channel's weekly spend.
///
/// The baseline draws for every week come first, then the holiday draws for
/// every week (holiday noise is drawn even for non-holiday weeks so the random
/// stream does not depend on the calendar). The floor clamps the final value.
pub fn simulate_channel<R: Rng + ?Sized>(
    spec: &ChannelSpec,
    seasonality: &Seasonality,
    calendar: &Calendar,
    rng: &mut R,
) -> MmmResult<Vec<f64>> {
    let n = calendar.len();
    let baseline = draw_normal(rng, spec.base_mean, spec.base_sd, n)?;
    let holiday_noise = draw_normal(rng, spec.holiday_mean, spec.holiday_sd, n)?;

    let spend = calendar
        .weeks()
        .iter()
        .zip(baseline)
        .zip(holiday_noise)
        .map(|((week, base), boost)| {
            let base = base + spec.trend_per_week * week.week as f64;
            let multiplier = if spec.seasonal {
                seasonality.multiplier(week.quarter)
            } else {
                1.0
            };
            let holiday = if week.holiday { 1.0 } else { 0.0 };
            spec.floor.max(base * spec.scale * multiplier + holiday * boost)
        })
        .collect();
    Ok(spend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmm_core::ModelConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_floor_applies_after_holiday_boost() {
        let config = ModelConfig::default();
        let calendar = Calendar::build(&config, 156).unwrap();
        // Baseline far below zero: only the floor can keep values positive,
        // even in holiday weeks where the boost is added.
        let spec = ChannelSpec {
            base_mean: -100.0,
            base_sd: 1.0,
            trend_per_week: 0.0,
            scale: 1.0,
            seasonal: true,
            holiday_mean: 5.0,
            holiday_sd: 1.0,
            floor: 2.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let spend = simulate_channel(&spec, &config.seasonality, &calendar, &mut rng).unwrap();
        assert!(spend.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_holiday_boost_only_on_holiday_weeks() {
        let config = ModelConfig::default();
        let calendar = Calendar::build(&config, 156).unwrap();
        let spec = ChannelSpec {
            base_mean: 10.0,
            base_sd: 0.0,
            trend_per_week: 0.0,
            scale: 1.0,
            seasonal: false,
            holiday_mean: 4.0,
            holiday_sd: 0.0,
            floor: 0.5,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let spend = simulate_channel(&spec, &config.seasonality, &calendar, &mut rng).unwrap();
        for (week, value) in calendar.weeks().iter().zip(&spend) {
            let expected = if week.holiday { 14.0 } else { 10.0 };
            assert_eq!(*value, expected, "week {}", week.week);
        }
    }

    #[test]
    fn test_trend_and_scale() {
        let config = ModelConfig::default();
        let calendar = Calendar::build(&config, 10).unwrap();
        let spec = ChannelSpec {
            base_mean: 5.0,
            base_sd: 0.0,
            trend_per_week: 0.5,
            scale: 2.0,
            seasonal: true,
            holiday_mean: 0.0,
            holiday_sd: 0.0,
            floor: 0.1,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let spend = simulate_channel(&spec, &config.seasonality, &calendar, &mut rng).unwrap();
        // Week 2 is in Q1 (multiplier 1.1) and not a holiday.
        assert!((spend[1] - (5.0 + 0.5 * 2.0) * 2.0 * 1.1).abs() < 1e-12);
    }
}
