//! Exogenous indices and the promotion calendar.

use crate::calendar::Calendar;
use crate::sampling::draw_normal;
use mmm_core::model::{IndexSpec, PromotionSpec};
use mmm_core::{MmmError, MmmResult};
use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

/// `clip(level + trend*week + N(0, sd), min, max)` for every week.
pub fn simulate_index<R: Rng + ?Sized>(
    spec: &IndexSpec,
    calendar: &Calendar,
    rng: &mut R,
) -> MmmResult<Vec<f64>> {
    let noise = draw_normal(rng, 0.0, spec.sd, calendar.len())?;
    Ok(calendar
        .weeks()
        .iter()
        .zip(noise)
        .map(|(week, e)| {
            (spec.level + spec.trend_per_week * week.week as f64 + e).clamp(spec.min, spec.max)
        })
        .collect())
}

/// One Bernoulli draw per week with a quarter-dependent probability.
pub fn simulate_promotions<R: Rng + ?Sized>(
    spec: &PromotionSpec,
    calendar: &Calendar,
    rng: &mut R,
) -> MmmResult<Vec<bool>> {
    calendar
        .weeks()
        .iter()
        .map(|week| {
            let p = spec.probability(week.quarter);
            let dist = Bernoulli::new(p)
                .map_err(|e| MmmError::Distribution(format!("Bernoulli({}): {}", p, e)))?;
            Ok(dist.sample(rng))
        })
        .collect()
}
