//! Writes an [`AnalysisReport`] to disk: result tables, the model summary,
//! the JSON report, and one CSV of plotting data per chart.

use crate::analysis::AnalysisReport;
use crate::exploratory::{BoxStats, QuadraticTrend};
use chrono::NaiveDate;
use mmm_core::{Channel, MarketingDataset, MmmError, MmmResult};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const ELASTICITIES_FILE: &str = "elasticities.csv";
pub const ROI_FILE: &str = "roi_analysis.csv";
pub const COMPARISON_FILE: &str = "model_comparison.csv";
pub const SUMMARY_FILE: &str = "model_summary.txt";
pub const VIF_FILE: &str = "vif.csv";
pub const REPORT_FILE: &str = "analysis.json";

pub const CHART_FILES: [&str; 9] = [
    "01_sales_trend.csv",
    "02_marketing_spend.csv",
    "03_sales_vs_digital.csv",
    "04_sales_vs_tv.csv",
    "05_promotion_effect.csv",
    "06_holiday_effect.csv",
    "07_diagnostics_residuals.csv",
    "07_diagnostics_qq.csv",
    "07_diagnostics_histogram.csv",
];

#[derive(Serialize)]
struct ElasticityRow<'a> {
    #[serde(rename = "Channel")]
    channel: &'a str,
    #[serde(rename = "Elasticity")]
    elasticity: f64,
    #[serde(rename = "Interpretation")]
    interpretation: &'a str,
}

#[derive(Serialize)]
struct RoiRow<'a> {
    #[serde(rename = "Channel")]
    channel: &'a str,
    #[serde(rename = "Elasticity")]
    elasticity: f64,
    #[serde(rename = "Avg_Spend_K")]
    avg_spend: f64,
    #[serde(rename = "Marginal_Sales_per_1K")]
    marginal_sales_per_1k: f64,
    #[serde(rename = "ROI_Ratio")]
    roi_ratio: f64,
}

#[derive(Serialize)]
struct ComparisonRow<'a> {
    #[serde(rename = "Model")]
    model: &'a str,
    #[serde(rename = "R²")]
    r_squared: f64,
    #[serde(rename = "Adj. R²")]
    adj_r_squared: f64,
    #[serde(rename = "AIC")]
    aic: f64,
    #[serde(rename = "BIC")]
    bic: f64,
}

#[derive(Serialize)]
struct VifRow<'a> {
    #[serde(rename = "Variable")]
    variable: &'a str,
    #[serde(rename = "VIF")]
    vif: f64,
}

#[derive(Serialize)]
struct SalesTrendRow {
    week: u32,
    date: NaiveDate,
    sales: f64,
    holiday: u8,
}

#[derive(Serialize)]
struct SpendRow {
    date: NaiveDate,
    tv_spend: f64,
    digital_spend: f64,
    social_spend: f64,
    email_spend: f64,
    sem_spend: f64,
}

#[derive(Serialize)]
struct ScatterRow {
    series: &'static str,
    spend: f64,
    sales: f64,
}

#[derive(Serialize)]
struct BoxRow<'a> {
    group: &'a str,
    count: usize,
    q1: f64,
    median: f64,
    q3: f64,
    lower_whisker: f64,
    upper_whisker: f64,
    /// `;`-separated
    outliers: String,
}

impl<'a> From<&'a BoxStats> for BoxRow<'a> {
    fn from(stats: &'a BoxStats) -> Self {
        Self {
            group: &stats.group,
            count: stats.count,
            q1: stats.q1,
            median: stats.median,
            q3: stats.q3,
            lower_whisker: stats.lower_whisker,
            upper_whisker: stats.upper_whisker,
            outliers: stats
                .outliers
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// Output locations for one analysis run.
#[derive(Debug, Clone)]
pub struct ResultsWriter {
    results_dir: PathBuf,
    charts_dir: PathBuf,
}

impl ResultsWriter {
    pub fn new(results_dir: impl Into<PathBuf>, charts_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
            charts_dir: charts_dir.into(),
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn charts_dir(&self) -> &Path {
        &self.charts_dir
    }

    /// Write result tables and chart data. Returns every path written.
    pub fn write_all(
        &self,
        dataset: &MarketingDataset,
        report: &AnalysisReport,
    ) -> MmmResult<Vec<PathBuf>> {
        let mut written = self.write_results(report)?;
        written.extend(self.write_charts(dataset, report)?);
        info!(
            results_dir = %self.results_dir.display(),
            charts_dir = %self.charts_dir.display(),
            files = written.len(),
            "Analysis outputs written"
        );
        Ok(written)
    }

    pub fn write_results(&self, report: &AnalysisReport) -> MmmResult<Vec<PathBuf>> {
        create_dir(&self.results_dir)?;
        let dir = &self.results_dir;

        let elasticities = dir.join(ELASTICITIES_FILE);
        write_rows(
            &elasticities,
            report.elasticities.iter().map(|e| ElasticityRow {
                channel: e.channel.display_name(),
                elasticity: e.elasticity,
                interpretation: &e.interpretation,
            }),
        )?;

        let roi = dir.join(ROI_FILE);
        write_rows(
            &roi,
            report.roi.iter().map(|r| RoiRow {
                channel: r.channel.display_name(),
                elasticity: r.elasticity,
                avg_spend: r.avg_spend,
                marginal_sales_per_1k: r.marginal_sales_per_1k,
                roi_ratio: r.roi_ratio,
            }),
        )?;

        let comparison = dir.join(COMPARISON_FILE);
        write_rows(
            &comparison,
            report.comparison.iter().map(|c| ComparisonRow {
                model: &c.name,
                r_squared: c.r_squared,
                adj_r_squared: c.adj_r_squared,
                aic: c.aic,
                bic: c.bic,
            }),
        )?;

        let vif = dir.join(VIF_FILE);
        write_rows(
            &vif,
            report.vif.entries.iter().map(|v| VifRow {
                variable: &v.variable,
                vif: v.vif,
            }),
        )?;

        let summary = dir.join(SUMMARY_FILE);
        let text = format!(
            "{} SUMMARY\n{}\n\n{}",
            report.selected.name().to_uppercase(),
            "=".repeat(70),
            report.summary
        );
        fs::write(&summary, text).map_err(|e| MmmError::io(&summary, e))?;

        let json = dir.join(REPORT_FILE);
        let file = File::create(&json).map_err(|e| MmmError::io(&json, e))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, report)?;
        out.flush().map_err(|e| MmmError::io(&json, e))?;

        Ok(vec![elasticities, roi, comparison, summary, vif, json])
    }

    pub fn write_charts(
        &self,
        dataset: &MarketingDataset,
        report: &AnalysisReport,
    ) -> MmmResult<Vec<PathBuf>> {
        create_dir(&self.charts_dir)?;
        let paths: Vec<PathBuf> = CHART_FILES.iter().map(|f| self.charts_dir.join(f)).collect();
        let records = dataset.records();

        write_rows(
            &paths[0],
            records.iter().map(|r| SalesTrendRow {
                week: r.week,
                date: r.date,
                sales: r.sales,
                holiday: u8::from(r.holiday),
            }),
        )?;
        write_rows(
            &paths[1],
            records.iter().map(|r| SpendRow {
                date: r.date,
                tv_spend: r.spend(Channel::Tv),
                digital_spend: r.spend(Channel::Digital),
                social_spend: r.spend(Channel::Social),
                email_spend: r.spend(Channel::Email),
                sem_spend: r.spend(Channel::Sem),
            }),
        )?;

        let sales = dataset.sales();
        let exploratory = &report.exploratory;
        write_rows(
            &paths[2],
            scatter_rows(&dataset.spend(Channel::Digital), &sales, &exploratory.digital_trend),
        )?;
        write_rows(
            &paths[3],
            scatter_rows(&dataset.spend(Channel::Tv), &sales, &exploratory.tv_trend),
        )?;
        write_rows(&paths[4], exploratory.promotion_box.iter().map(BoxRow::from))?;
        write_rows(&paths[5], exploratory.holiday_box.iter().map(BoxRow::from))?;

        let diagnostics = &report.diagnostics;
        write_rows(&paths[6], diagnostics.points.iter())?;
        write_rows(&paths[7], diagnostics.qq.iter())?;
        write_rows(&paths[8], diagnostics.histogram.iter())?;

        Ok(paths)
    }
}

fn scatter_rows<'a>(
    spend: &'a [f64],
    sales: &'a [f64],
    trend: &'a QuadraticTrend,
) -> impl Iterator<Item = ScatterRow> + 'a {
    let observed = spend.iter().zip(sales).map(|(&spend, &sales)| ScatterRow {
        series: "observed",
        spend,
        sales,
    });
    let fitted = trend.curve.iter().map(|p| ScatterRow {
        series: "trend",
        spend: p.x,
        sales: p.y,
    });
    observed.chain(fitted)
}

fn create_dir(dir: &Path) -> MmmResult<()> {
    fs::create_dir_all(dir).map_err(|e| MmmError::io(dir, e))
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> MmmResult<()> {
    let file = File::create(path).map_err(|e| MmmError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| MmmError::io(path, e))?;
    Ok(())
}
