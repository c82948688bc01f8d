//! Period navigation and per-period totals for the statistics views.

use crate::core::clock::Clock;
use crate::core::period::ChartPeriodService;
use crate::core::repository::{EntryRepository, fetch_period};
use crate::errors::{AppError, AppResult};
use crate::models::period::{ChartRange, Period};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::warn;

/// Current display period plus the range it was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodNavigator {
    service: ChartPeriodService,
    range: ChartRange,
    period: Period,
}

impl PeriodNavigator {
    /// Period of `range` around `anchor`. The `All` range spans the oldest
    /// to the newest stored entry, or just `anchor` when there are none.
    pub fn new(
        service: ChartPeriodService,
        range: ChartRange,
        anchor: NaiveDate,
        repo: &dyn EntryRepository,
    ) -> AppResult<Self> {
        let period = resolve(&service, range, anchor, repo)?;
        Ok(Self {
            service,
            range,
            period,
        })
    }

    pub fn range(&self) -> ChartRange {
        self.range
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Step forward one unit. `All` has nowhere to go and stays put.
    pub fn next(&mut self) -> AppResult<Period> {
        self.step(true)
    }

    pub fn previous(&mut self) -> AppResult<Period> {
        self.step(false)
    }

    /// Switch granularity, keeping the middle of the current period in view.
    pub fn set_range(
        &mut self,
        range: ChartRange,
        repo: &dyn EntryRepository,
    ) -> AppResult<Period> {
        let anchor = self.service.period_mid_date(&self.period);
        self.period = resolve(&self.service, range, anchor, repo)?;
        self.range = range;
        Ok(self.period)
    }

    fn step(&mut self, forward: bool) -> AppResult<Period> {
        let shifted = if forward {
            self.service.advance_period(self.range, &self.period)
        } else {
            self.service.retard_period(self.range, &self.period)
        };
        match shifted {
            Ok(p) => {
                self.period = p;
                Ok(p)
            }
            Err(AppError::PeriodForAll) => Ok(self.period),
            Err(e) => Err(e),
        }
    }
}

fn resolve(
    service: &ChartPeriodService,
    range: ChartRange,
    anchor: NaiveDate,
    repo: &dyn EntryRepository,
) -> AppResult<Period> {
    match service.generate_period(anchor, range) {
        Ok(p) => Ok(p),
        Err(AppError::PeriodForAll) => {
            let oldest = repo.fetch_oldest()?.map(|e| e.start.date());
            let newest = repo.fetch_newest()?.map(|e| e.finish.date());
            let start = oldest.unwrap_or(anchor);
            let end = newest.unwrap_or(anchor).max(start);
            Ok(Period::new(start, end))
        }
        Err(e) => Err(e),
    }
}

/// Totals for one chart bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub work_time_in_seconds: i64,
    pub overtime_in_seconds: i64,
}

impl Bucket {
    pub fn total(&self) -> i64 {
        self.work_time_in_seconds + self.overtime_in_seconds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: Period,
    pub range: ChartRange,
    pub entries: usize,
    pub work_time_in_seconds: i64,
    pub overtime_in_seconds: i64,
    pub buckets: Vec<Bucket>,
}

pub struct StatisticsService<'a> {
    repository: &'a dyn EntryRepository,
    clock: &'a dyn Clock,
}

impl<'a> StatisticsService<'a> {
    pub fn new(repository: &'a dyn EntryRepository, clock: &'a dyn Clock) -> Self {
        Self { repository, clock }
    }

    /// Bucket entries per day for week and month views, per month otherwise.
    /// Days with no entry still get an empty bucket so the chart has no gaps.
    pub fn summarize(&self, period: &Period, range: ChartRange) -> PeriodSummary {
        let entries = fetch_period(self.repository, period).unwrap_or_else(|e| {
            warn!(error = %e, "could not fetch entries for statistics");
            Vec::new()
        });

        let per_day = matches!(range, ChartRange::Week | ChartRange::Month);
        let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();

        // pre-fill up to today so future days do not show as empty bars
        let last = period.end.min(self.clock.today()).max(period.start);
        for day in Period::new(period.start, last).days() {
            let key = bucket_key(day, per_day);
            buckets.entry(key).or_insert_with(|| empty_bucket(key, per_day));
        }

        for entry in &entries {
            let key = bucket_key(entry.date(), per_day);
            let bucket = buckets
                .entry(key)
                .or_insert_with(|| empty_bucket(key, per_day));
            bucket.work_time_in_seconds += entry.work_time_in_seconds;
            bucket.overtime_in_seconds += entry.overtime_in_seconds;
        }

        PeriodSummary {
            period: *period,
            range,
            entries: entries.len(),
            work_time_in_seconds: entries.iter().map(|e| e.work_time_in_seconds).sum(),
            overtime_in_seconds: entries.iter().map(|e| e.overtime_in_seconds).sum(),
            buckets: buckets.into_values().collect(),
        }
    }
}

fn bucket_key(date: NaiveDate, per_day: bool) -> NaiveDate {
    if per_day {
        date
    } else {
        date.with_day(1).unwrap_or(date)
    }
}

fn empty_bucket(key: NaiveDate, per_day: bool) -> Bucket {
    let label = if per_day {
        key.format("%a %d").to_string()
    } else {
        key.format("%b %Y").to_string()
    };
    Bucket {
        label,
        work_time_in_seconds: 0,
        overtime_in_seconds: 0,
    }
}
