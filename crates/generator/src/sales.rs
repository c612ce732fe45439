//! The autoregressive log-sales recurrence.
//!
//! Each week's log-sales depends on the previous week's, so the path is built
//! as an ordered fold; weeks cannot be computed independently.

use crate::sampling::normal;
use mmm_core::model::SalesCoefficients;
use mmm_core::{checked_ln, Channel, ChannelMap, MmmError, MmmResult};
use rand::Rng;
use rand_distr::Distribution;

/// Contemporaneous inputs of the recurrence for one week.
#[derive(Debug, Clone, Copy)]
pub struct WeekDrivers {
    pub week: u32,
    pub spend: ChannelMap<f64>,
    pub promotion: bool,
    pub holiday: bool,
    pub competitor: f64,
    pub economic: f64,
}

/// Generated sales path with the injected noise kept for inspection.
#[derive(Debug, Clone)]
pub struct SalesPath {
    /// Log-sales before the holiday×digital boost; this is what the lag term sees.
    pub log_sales: Vec<f64>,
    pub noise: Vec<f64>,
    pub sales: Vec<f64>,
}

/// One step of the recurrence. `previous` is `None` for the first week, which
/// has no lag term.
pub fn log_sales_step(
    coef: &SalesCoefficients,
    previous: Option<f64>,
    drivers: &WeekDrivers,
    noise: f64,
) -> MmmResult<f64> {
    let mut value = coef.intercept;
    if let Some(prev) = previous {
        value += coef.lag * prev;
    }
    for channel in Channel::ALL {
        let spend = checked_ln(*drivers.spend.get(channel), channel.column(), drivers.week)?;
        value += coef.channels.get(channel) * spend;
    }
    value += coef.promotion * indicator(drivers.promotion)
        + coef.holiday * indicator(drivers.holiday)
        + coef.competitor * drivers.competitor
        + coef.economic * drivers.economic
        + noise;
    Ok(value)
}

/// Run the recurrence over `drivers` in week order, drawing one noise term per week.
pub fn simulate_sales<R: Rng + ?Sized>(
    coef: &SalesCoefficients,
    drivers: &[WeekDrivers],
    rng: &mut R,
) -> MmmResult<SalesPath> {
    let noise_dist = normal(0.0, coef.noise_sd)?;
    let mut log_sales = Vec::with_capacity(drivers.len());
    let mut noise = Vec::with_capacity(drivers.len());

    drivers.iter().try_fold(None, |previous, week| {
        let eps = noise_dist.sample(rng);
        let value = log_sales_step(coef, previous, week, eps)?;
        log_sales.push(value);
        noise.push(eps);
        Ok::<_, MmmError>(Some(value))
    })?;

    let sales = log_sales
        .iter()
        .zip(drivers)
        .map(|(&log_value, week)| {
            let boost = if week.holiday {
                let digital =
                    checked_ln(week.spend.digital, Channel::Digital.column(), week.week)?;
                coef.holiday_digital_boost * digital
            } else {
                0.0
            };
            Ok(log_value.exp() * boost.exp())
        })
        .collect::<MmmResult<Vec<_>>>()?;

    Ok(SalesPath {
        log_sales,
        noise,
        sales,
    })
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mmm_core::ModelConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn drivers(n: u32) -> Vec<WeekDrivers> {
        (1..=n)
            .map(|week| WeekDrivers {
                week,
                spend: ChannelMap::from_fn(|c| 5.0 + c.index() as f64 + week as f64 * 0.1),
                promotion: week % 3 == 0,
                holiday: week % 5 == 0,
                competitor: 50.0,
                economic: 100.0,
            })
            .collect()
    }

    #[test]
    fn test_first_week_has_no_lag_term() {
        let coef = ModelConfig::default().sales;
        let week = drivers(1)[0];
        let without = log_sales_step(&coef, None, &week, 0.0).unwrap();
        let with_zero_lag = log_sales_step(&coef, Some(0.0), &week, 0.0).unwrap();
        assert_eq!(without, with_zero_lag);
        let with_lag = log_sales_step(&coef, Some(10.0), &week, 0.0).unwrap();
        assert!((with_lag - without - coef.lag * 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_markov_property() {
        let coef = ModelConfig::default().sales;
        let inputs = drivers(30);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let path = simulate_sales(&coef, &inputs, &mut rng).unwrap();

        for t in 1..inputs.len() {
            let previous = Some(path.log_sales[t - 1]);
            let replay = log_sales_step(&coef, previous, &inputs[t], path.noise[t]).unwrap();
            assert_eq!(replay, path.log_sales[t], "week {}", t + 1);
        }
        let first = log_sales_step(&coef, None, &inputs[0], path.noise[0]).unwrap();
        assert_eq!(first, path.log_sales[0]);
    }

    #[test]
    fn test_holiday_digital_boost() {
        let coef = ModelConfig::default().sales;
        let inputs = drivers(10);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let path = simulate_sales(&coef, &inputs, &mut rng).unwrap();
        for (t, week) in inputs.iter().enumerate() {
            let expected = if week.holiday {
                (path.log_sales[t] + 0.15 * week.spend.digital.ln()).exp()
            } else {
                path.log_sales[t].exp()
            };
            assert!((path.sales[t] - expected).abs() / expected < 1e-12);
            assert!(path.sales[t] > 0.0);
        }
    }

    #[test]
    fn test_non_positive_spend_fails_loudly() {
        let coef = ModelConfig::default().sales;
        let mut inputs = drivers(5);
        inputs[2].spend.email = 0.0;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        match simulate_sales(&coef, &inputs, &mut rng) {
            Err(MmmError::NonPositiveLog { column, week, .. }) => {
                assert_eq!(column, "email_spend");
                assert_eq!(week, 3);
            }
            other => panic!("expected NonPositiveLog, got {:?}", other.map(|p| p.sales)),
        }
    }
}
