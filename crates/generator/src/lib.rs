//! Synthetic weekly marketing-mix series: calendar, channel spend, exogenous
//! indices, promotions, and autoregressive sales.

pub mod calendar;
pub mod exogenous;
pub mod sales;
mod sampling;
pub mod spend;

pub use calendar::{Calendar, CalendarWeek};
pub use sales::{log_sales_step, SalesPath, WeekDrivers};

use mmm_core::{Channel, ChannelMap, MarketingDataset, MmmError, MmmResult, ModelConfig, WeeklyRecord};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

/// Every generated component, before it is flattened into a dataset.
#[derive(Debug, Clone)]
pub struct SyntheticSeries {
    pub calendar: Calendar,
    pub spend: ChannelMap<Vec<f64>>,
    pub promotion: Vec<bool>,
    pub competitor: Vec<f64>,
    pub economic: Vec<f64>,
    pub sales: SalesPath,
}

impl SyntheticSeries {
    /// Recurrence inputs of week `index` (0-based), `None` past the end.
    pub fn drivers(&self, index: usize) -> Option<WeekDrivers> {
        week_drivers(
            &self.calendar,
            &self.spend,
            &self.promotion,
            &self.competitor,
            &self.economic,
            index,
        )
    }

    pub fn into_dataset(self) -> MmmResult<MarketingDataset> {
        let records = self
            .calendar
            .weeks()
            .iter()
            .enumerate()
            .map(|(i, week)| WeeklyRecord {
                week: week.week,
                date: week.date,
                year: week.year,
                quarter: week.quarter,
                month: week.month,
                sales: self.sales.sales[i],
                tv_spend: self.spend.tv[i],
                digital_spend: self.spend.digital[i],
                social_spend: self.spend.social[i],
                email_spend: self.spend.email[i],
                sem_spend: self.spend.sem[i],
                promotion: self.promotion[i],
                holiday: week.holiday,
                competitor_index: self.competitor[i],
                economic_index: self.economic[i],
            })
            .collect();
        MarketingDataset::new(records)
    }
}

fn week_drivers(
    calendar: &Calendar,
    spend: &ChannelMap<Vec<f64>>,
    promotion: &[bool],
    competitor: &[f64],
    economic: &[f64],
    index: usize,
) -> Option<WeekDrivers> {
    let week = calendar.weeks().get(index)?;
    if Channel::ALL.iter().any(|&c| spend.get(c).len() <= index) {
        return None;
    }
    Some(WeekDrivers {
        week: week.week,
        spend: ChannelMap::from_fn(|c| spend.get(c)[index]),
        promotion: *promotion.get(index)?,
        holiday: week.holiday,
        competitor: *competitor.get(index)?,
        economic: *economic.get(index)?,
    })
}

/// Deterministic generator: same model, seed and week count give the same series.
pub struct SeriesGenerator<'a> {
    model: &'a ModelConfig,
    seed: u64,
    n_weeks: usize,
}

impl<'a> SeriesGenerator<'a> {
    pub fn new(model: &'a ModelConfig, seed: u64, n_weeks: usize) -> Self {
        Self {
            model,
            seed,
            n_weeks,
        }
    }

    /// Generate every component. Random draws happen in a fixed order:
    /// channels (baseline then holiday noise, tv → sem), promotions,
    /// competitor, economic, then one sales noise term per week.
    pub fn generate_series(&self) -> MmmResult<SyntheticSeries> {
        if self.n_weeks == 0 {
            return Err(MmmError::InvalidData("week count must be positive".to_string()));
        }
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let calendar = Calendar::build(self.model, self.n_weeks)?;

        let mut channel_spend = Vec::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            let series = spend::simulate_channel(
                self.model.channel(channel),
                &self.model.seasonality,
                &calendar,
                &mut rng,
            )?;
            debug!(channel = %channel, weeks = series.len(), "Channel spend simulated");
            channel_spend.push(series);
        }
        let spend = ChannelMap::from_fn(|c| std::mem::take(&mut channel_spend[c.index()]));

        let promotion = exogenous::simulate_promotions(&self.model.promotion, &calendar, &mut rng)?;
        let competitor = exogenous::simulate_index(&self.model.competitor, &calendar, &mut rng)?;
        let economic = exogenous::simulate_index(&self.model.economic, &calendar, &mut rng)?;

        let drivers = (0..calendar.weeks().len())
            .map(|i| week_drivers(&calendar, &spend, &promotion, &competitor, &economic, i))
            .collect::<Option<Vec<WeekDrivers>>>()
            .ok_or_else(|| {
                MmmError::InvalidData("component series length mismatch".to_string())
            })?;
        let sales = sales::simulate_sales(&self.model.sales, &drivers, &mut rng)?;

        Ok(SyntheticSeries {
            calendar,
            spend,
            promotion,
            competitor,
            economic,
            sales,
        })
    }

    /// Generate the weekly dataset and log a short summary of it.
    pub fn generate(&self) -> MmmResult<MarketingDataset> {
        let dataset = self.generate_series()?.into_dataset()?;
        let sales = dataset.sales();
        let total: f64 = sales.iter().sum();
        if let Some((start, end)) = dataset.date_range() {
            info!(
                seed = self.seed,
                weeks = dataset.len(),
                start = %start,
                end = %end,
                total_sales = total,
                average_sales = total / dataset.len() as f64,
                holiday_weeks = dataset.holiday_weeks(),
                "Marketing mix data generated"
            );
        }
        Ok(dataset)
    }
}
