//! Lagged analysis sample, regressor catalogue, and the three nested model
//! specifications.

use mmm_core::{checked_ln, Channel, ChannelMap, MarketingDataset, MmmError, MmmResult};
use ndarray::{Array1, Array2};
use serde::Serialize;

pub const CONST_LABEL: &str = "const";

/// A column that can enter a design matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Regressor {
    LogLagSales,
    LogSpend(Channel),
    Promotion,
    Holiday,
    /// `log(digital) * holiday`
    DigitalHoliday,
    Competitor,
    Economic,
    Q2,
    Q3,
    Q4,
}

impl Regressor {
    pub fn label(&self) -> &'static str {
        match self {
            Regressor::LogLagSales => "log(lag_sales)",
            Regressor::LogSpend(channel) => channel.log_label(),
            Regressor::Promotion => "promotion",
            Regressor::Holiday => "holiday",
            Regressor::DigitalHoliday => "digital_holiday",
            Regressor::Competitor => "competitor",
            Regressor::Economic => "economic",
            Regressor::Q2 => "Q2",
            Regressor::Q3 => "Q3",
            Regressor::Q4 => "Q4",
        }
    }
}

/// The nested log-log specifications. Each one's regressors are a strict
/// superset of the previous one's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ModelSpec {
    Base,
    Interaction,
    Full,
}

impl ModelSpec {
    pub const ALL: [ModelSpec; 3] = [ModelSpec::Base, ModelSpec::Interaction, ModelSpec::Full];

    pub fn name(&self) -> &'static str {
        match self {
            ModelSpec::Base => "Base Model",
            ModelSpec::Interaction => "Interaction Model",
            ModelSpec::Full => "Full Model",
        }
    }

    /// Regressors in column order (the intercept is added separately).
    pub fn regressors(&self) -> Vec<Regressor> {
        let mut columns = vec![Regressor::LogLagSales];
        columns.extend(Channel::ALL.into_iter().map(Regressor::LogSpend));
        columns.push(Regressor::Promotion);
        if matches!(self, ModelSpec::Interaction | ModelSpec::Full) {
            columns.extend([Regressor::Holiday, Regressor::DigitalHoliday]);
        }
        if matches!(self, ModelSpec::Full) {
            columns.extend([Regressor::Competitor, Regressor::Economic]);
        }
        columns.extend([Regressor::Q2, Regressor::Q3, Regressor::Q4]);
        columns
    }
}

/// Named design matrix. When `intercept` is set, column 0 is the constant.
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    names: Vec<String>,
    x: Array2<f64>,
    intercept: bool,
}

impl DesignMatrix {
    /// Build from equally long columns, prepending a constant column when
    /// `intercept` is set.
    pub fn from_columns(
        names: Vec<String>,
        columns: &[Vec<f64>],
        intercept: bool,
    ) -> MmmResult<Self> {
        if names.len() != columns.len() {
            return Err(MmmError::InvalidData(format!(
                "{} names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let n = columns.first().map(Vec::len).unwrap_or(0);
        if let Some((name, col)) = names.iter().zip(columns).find(|(_, c)| c.len() != n) {
            return Err(MmmError::InvalidData(format!(
                "column `{}` has {} rows, expected {}",
                name,
                col.len(),
                n
            )));
        }

        let offset = usize::from(intercept);
        let mut x = Array2::<f64>::zeros((n, columns.len() + offset));
        if intercept {
            x.column_mut(0).fill(1.0);
        }
        for (j, col) in columns.iter().enumerate() {
            x.column_mut(j + offset).assign(&Array1::from(col.clone()));
        }

        let mut all_names = Vec::with_capacity(columns.len() + offset);
        if intercept {
            all_names.push(CONST_LABEL.to_string());
        }
        all_names.extend(names);
        Ok(Self {
            names: all_names,
            x,
            intercept,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn has_intercept(&self) -> bool {
        self.intercept
    }

    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Split off column `j`: the remaining matrix and the removed column.
    pub fn without_column(&self, j: usize) -> MmmResult<(DesignMatrix, Array1<f64>)> {
        if j >= self.n_params() || (self.intercept && j == 0) {
            return Err(MmmError::InvalidData(format!(
                "column {} cannot be removed from a {}-column design",
                j,
                self.n_params()
            )));
        }
        let keep: Vec<usize> = (0..self.n_params()).filter(|&c| c != j).collect();
        let x = self.x.select(ndarray::Axis(1), &keep);
        let names = keep.iter().map(|&c| self.names[c].clone()).collect();
        Ok((
            DesignMatrix {
                names,
                x,
                intercept: self.intercept,
            },
            self.x.column(j).to_owned(),
        ))
    }
}

/// Analysis sample: the dataset lagged by one week (the first week is dropped)
/// with logs taken of sales, lagged sales and every spend channel.
#[derive(Debug, Clone)]
pub struct AnalysisFrame {
    weeks: Vec<u32>,
    sales: Vec<f64>,
    spend: ChannelMap<Vec<f64>>,
    log_sales: Vec<f64>,
    log_lag_sales: Vec<f64>,
    log_spend: ChannelMap<Vec<f64>>,
    promotion: Vec<f64>,
    holiday: Vec<f64>,
    competitor: Vec<f64>,
    economic: Vec<f64>,
    quarter: Vec<u32>,
}

impl AnalysisFrame {
    pub fn from_dataset(dataset: &MarketingDataset) -> MmmResult<Self> {
        let records = dataset.records();
        if records.len() < 2 {
            return Err(MmmError::InsufficientData {
                required: 1,
                actual: records.len(),
            });
        }
        let current = &records[1..];

        let log_sales = current
            .iter()
            .map(|r| checked_ln(r.sales, "sales", r.week))
            .collect::<MmmResult<Vec<_>>>()?;
        let log_lag_sales = records[..records.len() - 1]
            .iter()
            .map(|r| checked_ln(r.sales, "lag_sales", r.week + 1))
            .collect::<MmmResult<Vec<_>>>()?;

        let spend = ChannelMap::from_fn(|c| current.iter().map(|r| r.spend(c)).collect::<Vec<_>>());
        let mut log_spend_cols = Vec::with_capacity(Channel::ALL.len());
        for channel in Channel::ALL {
            let col = current
                .iter()
                .map(|r| checked_ln(r.spend(channel), channel.column(), r.week))
                .collect::<MmmResult<Vec<_>>>()?;
            log_spend_cols.push(col);
        }
        let log_spend = ChannelMap::from_fn(|c| std::mem::take(&mut log_spend_cols[c.index()]));

        Ok(Self {
            weeks: current.iter().map(|r| r.week).collect(),
            sales: current.iter().map(|r| r.sales).collect(),
            spend,
            log_sales,
            log_lag_sales,
            log_spend,
            promotion: current.iter().map(|r| indicator(r.promotion)).collect(),
            holiday: current.iter().map(|r| indicator(r.holiday)).collect(),
            competitor: current.iter().map(|r| r.competitor_index).collect(),
            economic: current.iter().map(|r| r.economic_index).collect(),
            quarter: current.iter().map(|r| r.quarter).collect(),
        })
    }

    pub fn n_obs(&self) -> usize {
        self.weeks.len()
    }

    pub fn weeks(&self) -> &[u32] {
        &self.weeks
    }

    pub fn response(&self) -> Array1<f64> {
        Array1::from(self.log_sales.clone())
    }

    pub fn column(&self, regressor: Regressor) -> Vec<f64> {
        match regressor {
            Regressor::LogLagSales => self.log_lag_sales.clone(),
            Regressor::LogSpend(channel) => self.log_spend.get(channel).clone(),
            Regressor::Promotion => self.promotion.clone(),
            Regressor::Holiday => self.holiday.clone(),
            Regressor::DigitalHoliday => self
                .log_spend
                .digital
                .iter()
                .zip(&self.holiday)
                .map(|(d, h)| d * h)
                .collect(),
            Regressor::Competitor => self.competitor.clone(),
            Regressor::Economic => self.economic.clone(),
            Regressor::Q2 => self.quarter_dummy(2),
            Regressor::Q3 => self.quarter_dummy(3),
            Regressor::Q4 => self.quarter_dummy(4),
        }
    }

    /// Design matrix of `regressors`, with or without a constant.
    pub fn design_of(&self, regressors: &[Regressor], intercept: bool) -> MmmResult<DesignMatrix> {
        let names = regressors.iter().map(|r| r.label().to_string()).collect();
        let columns: Vec<Vec<f64>> = regressors.iter().map(|&r| self.column(r)).collect();
        DesignMatrix::from_columns(names, &columns, intercept)
    }

    /// Design matrix of a model specification, intercept included.
    pub fn design(&self, spec: ModelSpec) -> MmmResult<DesignMatrix> {
        self.design_of(&spec.regressors(), true)
    }

    /// Sales levels over the lagged sample.
    pub fn sales(&self) -> &[f64] {
        &self.sales
    }

    pub fn spend(&self, channel: Channel) -> &[f64] {
        self.spend.get(channel)
    }

    pub fn mean_sales(&self) -> f64 {
        mean(&self.sales)
    }

    pub fn mean_spend(&self, channel: Channel) -> f64 {
        mean(self.spend.get(channel))
    }

    fn quarter_dummy(&self, quarter: u32) -> Vec<f64> {
        self.quarter.iter().map(|&q| indicator(q == quarter)).collect()
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
