//! The weekly marketing table and its flat-file form.

use crate::error::{MmmError, MmmResult};
use crate::types::{Channel, WeeklyRecord};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info};

/// Immutable weekly dataset, one record per week in increasing week order.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketingDataset {
    records: Vec<WeeklyRecord>,
}

impl MarketingDataset {
    /// Wrap records after checking the time-axis invariant.
    pub fn new(records: Vec<WeeklyRecord>) -> MmmResult<Self> {
        validate_weeks(&records)?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &[WeeklyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sales(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.sales).collect()
    }

    pub fn spend(&self, channel: Channel) -> Vec<f64> {
        self.records.iter().map(|r| r.spend(channel)).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    pub fn holiday_weeks(&self) -> usize {
        self.records.iter().filter(|r| r.holiday).count()
    }

    /// First and last date covered.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.records.first()?.date, self.records.last()?.date))
    }

    /// Copy at file precision.
    pub fn rounded(&self) -> Self {
        Self {
            records: self.records.iter().map(WeeklyRecord::rounded).collect(),
        }
    }

    /// Write the dataset at file precision, creating parent directories.
    pub fn write_csv(&self, path: &Path) -> MmmResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MmmError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| MmmError::io(path, e))?;
        let mut writer = csv::Writer::from_writer(file);
        for record in &self.records {
            writer.serialize(record.rounded())?;
        }
        writer.flush().map_err(|e| MmmError::io(path, e))?;
        info!(path = %path.display(), rows = self.records.len(), "Dataset written");
        Ok(())
    }

    /// Load a dataset written by [`MarketingDataset::write_csv`].
    pub fn read_csv(path: &Path) -> MmmResult<Self> {
        let file = File::open(path).map_err(|e| MmmError::io(path, e))?;
        let mut reader = csv::Reader::from_reader(file);
        let records = reader
            .deserialize::<WeeklyRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        debug!(path = %path.display(), rows = records.len(), "Dataset loaded");
        Self::new(records)
    }
}

fn validate_weeks(records: &[WeeklyRecord]) -> MmmResult<()> {
    for pair in records.windows(2) {
        if pair[1].week != pair[0].week + 1 {
            return Err(MmmError::InvalidData(format!(
                "week {} follows week {}; weeks must be contiguous and increasing",
                pair[1].week, pair[0].week
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(week: u32) -> WeeklyRecord {
        WeeklyRecord {
            week,
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + chrono::Days::new(7 * (week as u64 - 1)),
            year: 2021,
            quarter: 1,
            month: 1,
            sales: 1234.5678,
            tv_spend: 15.004,
            digital_spend: 20.0,
            social_spend: 5.5,
            email_spend: 3.0,
            sem_spend: 12.0,
            promotion: week % 2 == 0,
            holiday: week == 1,
            competitor_index: 51.26,
            economic_index: 100.04,
        }
    }

    #[test]
    fn test_rejects_gaps() {
        let err = MarketingDataset::new(vec![record(1), record(3)]).unwrap_err();
        assert!(matches!(err, MmmError::InvalidData(_)));
    }

    #[test]
    fn test_csv_layout_and_precision() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.csv");
        let dataset = MarketingDataset::new(vec![record(1), record(2)]).unwrap();
        dataset.write_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "week,date,year,quarter,month,sales,tv_spend,digital_spend,social_spend,\
             email_spend,sem_spend,promotion,holiday,competitor_index,economic_index"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,2021-01-01,2021,1,1,1234.57,15.0,20.0,5.5,3.0,12.0,0,1,51.3,100.0"
        );

        let loaded = MarketingDataset::read_csv(&path).unwrap();
        assert_eq!(loaded, dataset.rounded());
        assert_eq!(loaded.records()[1].date.to_string(), "2021-01-08");
        assert!(loaded.records()[1].promotion);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarketingDataset::read_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, MmmError::Io { .. }));
    }
}
