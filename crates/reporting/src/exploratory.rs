//! Descriptive statistics of the raw weekly data: overview, per-column
//! summaries, grouped box statistics and quadratic spend/sales trends.

use chrono::NaiveDate;
use mmm_core::{Channel, MarketingDataset, MmmError, MmmResult, WeeklyRecord};
use mmm_regression::{DesignMatrix, OlsFit};
use ndarray::Array1;
use serde::Serialize;

pub const TREND_POINTS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct DatasetOverview {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub weeks: usize,
    pub total_sales: f64,
    pub average_sales: f64,
    /// Sample size of the models, one week shorter than the data.
    pub analysis_weeks: usize,
}

impl DatasetOverview {
    pub fn from_dataset(dataset: &MarketingDataset) -> MmmResult<Self> {
        let (start, end) = dataset
            .date_range()
            .ok_or_else(|| MmmError::InvalidData("dataset is empty".to_string()))?;
        let total_sales: f64 = dataset.sales().iter().sum();
        Ok(Self {
            start,
            end,
            weeks: dataset.len(),
            total_sales,
            average_sales: total_sales / dataset.len() as f64,
            analysis_weeks: dataset.len().saturating_sub(1),
        })
    }
}

/// Count, mean, sample standard deviation and five-number summary.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn describe(column: &str, values: &[f64]) -> MmmResult<Self> {
        let n = values.len();
        if n == 0 {
            return Err(MmmError::InvalidData(format!("column `{}` is empty", column)));
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };
        Ok(Self {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted[n - 1],
        })
    }
}

/// Summaries of sales and every spend channel.
pub fn describe_dataset(dataset: &MarketingDataset) -> MmmResult<Vec<ColumnSummary>> {
    let mut summaries = vec![ColumnSummary::describe("sales", &dataset.sales())?];
    for channel in Channel::ALL {
        summaries.push(ColumnSummary::describe(channel.column(), &dataset.spend(channel))?);
    }
    Ok(summaries)
}

/// Quantile of ascending `sorted` with linear interpolation between order
/// statistics.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (pos - lower as f64)
}

/// Boxplot statistics with whiskers at the most extreme points within
/// 1.5 IQR of the box.
#[derive(Debug, Clone, Serialize)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when the group is empty.
    pub fn from_values(group: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            group: group.to_string(),
            count: sorted.len(),
            q1,
            median: quantile_sorted(&sorted, 0.5),
            q3,
            lower_whisker,
            upper_whisker,
            outliers: sorted
                .iter()
                .copied()
                .filter(|v| !(low_fence..=high_fence).contains(v))
                .collect(),
        })
    }
}

/// Sales box statistics split on a weekly flag, the `false` group first.
pub fn split_box_stats(
    dataset: &MarketingDataset,
    flag: impl Fn(&WeeklyRecord) -> bool,
    labels: (&str, &str),
) -> Vec<BoxStats> {
    let (on, off): (Vec<_>, Vec<_>) = dataset.records().iter().partition(|r| flag(r));
    let off: Vec<f64> = off.iter().map(|r| r.sales).collect();
    let on: Vec<f64> = on.iter().map(|r| r.sales).collect();
    [BoxStats::from_values(labels.0, &off), BoxStats::from_values(labels.1, &on)]
        .into_iter()
        .flatten()
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
}

/// Least-squares quadratic `y = c0 + c1 x + c2 x²` evaluated on an even grid
/// over the observed range of `x`.
#[derive(Debug, Clone, Serialize)]
pub struct QuadraticTrend {
    pub spend_column: String,
    pub coefficients: [f64; 3],
    pub curve: Vec<TrendPoint>,
}

impl QuadraticTrend {
    pub fn fit(spend_column: &str, x: &[f64], y: &[f64], points: usize) -> MmmResult<Self> {
        let squares: Vec<f64> = x.iter().map(|v| v * v).collect();
        let design = DesignMatrix::from_columns(
            vec!["x".to_string(), "x^2".to_string()],
            &[x.to_vec(), squares],
            true,
        )?;
        let fit = OlsFit::fit(&design, &Array1::from(y.to_vec()))?;
        let params = fit.params();
        let coefficients = [params[0], params[1], params[2]];

        let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let step = if points > 1 { (hi - lo) / (points - 1) as f64 } else { 0.0 };
        let curve = (0..points)
            .map(|i| {
                let x = if i + 1 == points { hi } else { lo + step * i as f64 };
                TrendPoint {
                    x,
                    y: coefficients[0] + coefficients[1] * x + coefficients[2] * x * x,
                }
            })
            .collect();
        Ok(Self {
            spend_column: spend_column.to_string(),
            coefficients,
            curve,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExploratoryReport {
    pub overview: DatasetOverview,
    pub summaries: Vec<ColumnSummary>,
    pub promotion_box: Vec<BoxStats>,
    pub holiday_box: Vec<BoxStats>,
    pub digital_trend: QuadraticTrend,
    pub tv_trend: QuadraticTrend,
}

impl ExploratoryReport {
    pub fn from_dataset(dataset: &MarketingDataset) -> MmmResult<Self> {
        let sales = dataset.sales();
        Ok(Self {
            overview: DatasetOverview::from_dataset(dataset)?,
            summaries: describe_dataset(dataset)?,
            promotion_box: split_box_stats(dataset, |r| r.promotion, ("No Promotion", "With Promotion")),
            holiday_box: split_box_stats(dataset, |r| r.holiday, ("Non-Holiday", "Holiday")),
            digital_trend: QuadraticTrend::fit(
                Channel::Digital.column(),
                &dataset.spend(Channel::Digital),
                &sales,
                TREND_POINTS,
            )?,
            tv_trend: QuadraticTrend::fit(
                Channel::Tv.column(),
                &dataset.spend(Channel::Tv),
                &sales,
                TREND_POINTS,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_quantiles() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(quantile_sorted(&sorted, 0.25), 1.75);
        assert_eq!(quantile_sorted(&sorted, 0.5), 2.5);
        assert_eq!(quantile_sorted(&sorted, 1.0), 4.0);
    }

    #[test]
    fn test_describe() {
        let s = ColumnSummary::describe("sales", &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert!((s.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!((s.min, s.median, s.max), (1.0, 2.5, 4.0));
        assert!(ColumnSummary::describe("empty", &[]).is_err());
    }

    #[test]
    fn test_box_whiskers_and_outliers() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 40.0];
        let stats = BoxStats::from_values("g", &values).unwrap();
        assert_eq!(stats.q1, 11.5);
        assert_eq!(stats.q3, 14.5);
        assert_eq!(stats.lower_whisker, 10.0);
        assert_eq!(stats.upper_whisker, 15.0);
        assert_eq!(stats.outliers, vec![40.0]);
        assert!(BoxStats::from_values("g", &[]).is_none());
    }

    #[test]
    fn test_quadratic_trend_recovers_parabola() {
        let x: Vec<f64> = (0..30).map(|i| 1.0 + i as f64 * 0.5).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 3.0 + 2.0 * v - 0.1 * v * v + if i % 2 == 0 { 1e-3 } else { -1e-3 })
            .collect();
        let trend = QuadraticTrend::fit("digital_spend", &x, &y, TREND_POINTS).unwrap();
        assert!((trend.coefficients[0] - 3.0).abs() < 1e-2);
        assert!((trend.coefficients[1] - 2.0).abs() < 1e-2);
        assert!((trend.coefficients[2] + 0.1).abs() < 1e-3);
        assert_eq!(trend.curve.len(), 100);
        assert_eq!(trend.curve[0].x, 1.0);
        assert_eq!(trend.curve[99].x, 15.5);
    }

    #[test]
    fn test_report_on_generated_data() {
        let dataset = crate::tests::reference_dataset();
        let report = ExploratoryReport::from_dataset(&dataset).unwrap();
        assert_eq!(report.overview.weeks, 156);
        assert_eq!(report.overview.analysis_weeks, 155);
        assert_eq!(report.summaries.len(), 6);
        assert_eq!(report.summaries[0].count, 156);
        let holiday_total: usize = report.holiday_box.iter().map(|b| b.count).sum();
        assert_eq!(holiday_total, 156);
        assert_eq!(report.holiday_box[1].count, 15);
        assert_eq!(report.holiday_box[1].group, "Holiday");
    }
}
