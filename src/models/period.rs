use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity of a display period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartRange {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl ChartRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::Week => "week",
            ChartRange::Month => "month",
            ChartRange::Year => "year",
            ChartRange::All => "all",
        }
    }
}

/// Inclusive date span, calendar-aligned to a [`ChartRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date in the period, in order.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..self.num_days().max(0))
            .map(|i| self.start + Duration::days(i))
            .collect()
    }

    /// First instant of the period (start date at midnight).
    pub fn start_of_first_day(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last instant of the period (end date at 23:59:59).
    pub fn end_of_last_day(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN) + Duration::days(1) - Duration::seconds(1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
