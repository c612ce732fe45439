//! Weekly calendar and holiday indicators.

use chrono::{Datelike, Days, NaiveDate};
use mmm_core::{MmmError, MmmResult, ModelConfig};
use std::collections::HashSet;

/// Calendar fields of one week. Pure function of the week index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarWeek {
    pub week: u32,
    pub date: NaiveDate,
    pub year: i32,
    pub quarter: u32,
    pub month: u32,
    pub holiday: bool,
}

impl CalendarWeek {
    pub fn is_q4(&self) -> bool {
        self.quarter == 4
    }
}

#[derive(Debug, Clone)]
pub struct Calendar {
    weeks: Vec<CalendarWeek>,
}

impl Calendar {
    /// Weeks `1..=n_weeks`, stepping seven days from the configured start date.
    pub fn build(config: &ModelConfig, n_weeks: usize) -> MmmResult<Self> {
        let holidays: HashSet<u32> = config.holidays.week_set();
        let weeks = (0..n_weeks)
            .map(|i| {
                let date = config
                    .start_date
                    .checked_add_days(Days::new(7 * i as u64))
                    .ok_or_else(|| {
                        MmmError::Config(format!("week {} is outside the calendar range", i + 1))
                    })?;
                let week = i as u32 + 1;
                Ok(CalendarWeek {
                    week,
                    date,
                    year: date.year(),
                    quarter: quarter_of(date.month()),
                    month: date.month(),
                    holiday: holidays.contains(&week),
                })
            })
            .collect::<MmmResult<Vec<_>>>()?;
        Ok(Self { weeks })
    }

    pub fn weeks(&self) -> &[CalendarWeek] {
        &self.weeks
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

/// `ceil(month / 3)`
pub fn quarter_of(month: u32) -> u32 {
    month.div_ceil(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_of() {
        let quarters: Vec<u32> = (1..=12).map(quarter_of).collect();
        assert_eq!(quarters, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn test_build_three_years() {
        let config = ModelConfig::default();
        let calendar = Calendar::build(&config, 156).unwrap();
        assert_eq!(calendar.len(), 156);

        let first = calendar.weeks()[0];
        assert_eq!(first.week, 1);
        assert_eq!(first.date.to_string(), "2021-01-01");
        assert!(first.holiday);

        let last = calendar.weeks()[155];
        assert_eq!(last.week, 156);
        assert_eq!(last.date.to_string(), "2023-12-22");
        assert_eq!((last.year, last.quarter, last.month), (2023, 4, 12));

        for pair in calendar.weeks().windows(2) {
            assert_eq!(pair[1].week, pair[0].week + 1);
            assert_eq!((pair[1].date - pair[0].date).num_days(), 7);
        }
    }

    #[test]
    fn test_holiday_flags_match_fixed_weeks() {
        let config = ModelConfig::default();
        let set = config.holidays.week_set();
        let calendar = Calendar::build(&config, 156).unwrap();
        for week in calendar.weeks() {
            assert_eq!(week.holiday, set.contains(&week.week), "week {}", week.week);
        }
        assert_eq!(calendar.weeks().iter().filter(|w| w.holiday).count(), set.len());
    }
}
