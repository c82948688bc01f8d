//! Calendar-period arithmetic for week / month / year display ranges.
//!
//! All operations are pure functions of the calendar (first weekday) and the
//! input. Month and year shifts go through chrono's calendar arithmetic so
//! month lengths and leap years are honoured.

use crate::errors::{AppError, AppResult};
use crate::models::period::{ChartRange, Period};
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPeriodService {
    first_weekday: Weekday,
}

impl Default for ChartPeriodService {
    fn default() -> Self {
        Self::new(Weekday::Mon)
    }
}

impl ChartPeriodService {
    pub fn new(first_weekday: Weekday) -> Self {
        Self { first_weekday }
    }

    /// Period of granularity `range` that contains `date`.
    pub fn generate_period(&self, date: NaiveDate, range: ChartRange) -> AppResult<Period> {
        match range {
            ChartRange::Week => {
                let offset = (date.weekday().num_days_from_monday() + 7
                    - self.first_weekday.num_days_from_monday())
                    % 7;
                let start = date - Duration::days(offset as i64);
                Ok(Period::new(start, start + Duration::days(6)))
            }
            ChartRange::Month => {
                let start = first_day_of_month(date);
                Ok(Period::new(start, last_day_of_month(date)))
            }
            ChartRange::Year => {
                let start = ymd(date.year(), 1, 1)?;
                let end = ymd(date.year(), 12, 31)?;
                Ok(Period::new(start, end))
            }
            ChartRange::All => Err(AppError::PeriodForAll),
        }
    }

    /// Shift both boundaries one unit forward.
    pub fn advance_period(&self, range: ChartRange, period: &Period) -> AppResult<Period> {
        self.shift(range, period, 1)
    }

    /// Shift both boundaries one unit back.
    pub fn retard_period(&self, range: ChartRange, period: &Period) -> AppResult<Period> {
        self.shift(range, period, -1)
    }

    /// Midpoint of the period, used to re-anchor when the range changes.
    pub fn period_mid_date(&self, period: &Period) -> NaiveDate {
        period.start + Duration::days((period.end - period.start).num_days() / 2)
    }

    fn shift(&self, range: ChartRange, period: &Period, direction: i32) -> AppResult<Period> {
        match range {
            ChartRange::Week => {
                let days = Duration::days(7 * direction as i64);
                Ok(Period::new(period.start + days, period.end + days))
            }
            ChartRange::Month => Ok(Period::new(
                shift_months(period.start, direction)?,
                shift_months(period.end, direction)?,
            )),
            ChartRange::Year => Ok(Period::new(
                shift_months(period.start, 12 * direction)?,
                shift_months(period.end, 12 * direction)?,
            )),
            ChartRange::All => Err(AppError::PeriodForAll),
        }
    }
}

/// Monday to Friday dates of the period. Public holidays are not excluded.
pub fn working_days(period: &Period) -> Vec<NaiveDate> {
    period.days().into_iter().filter(|d| is_working_day(*d)).collect()
}

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Number of Monday to Friday dates in the month containing `date`.
pub fn working_days_in_month(date: NaiveDate) -> usize {
    working_days(&Period::new(
        first_day_of_month(date),
        last_day_of_month(date),
    ))
    .len()
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_day_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next - Duration::days(1),
        None => ymd(date.year(), 12, 31).unwrap_or(date),
    }
}

/// Calendar month shift. A last-day-of-month date stays on the last day of
/// the target month (Oct 31 → Nov 30 → Oct 31); any other day is clamped
/// to the target month's length.
fn shift_months(date: NaiveDate, months: i32) -> AppResult<NaiveDate> {
    let stays_on_month_end = date == last_day_of_month(date);
    let delta = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(delta)
    } else {
        date.checked_sub_months(delta)
    }
    .ok_or_else(|| AppError::InvalidDate(format!("{} shifted by {} months", date, months)))?;

    if stays_on_month_end {
        Ok(last_day_of_month(shifted))
    } else {
        Ok(shifted)
    }
}

fn ymd(year: i32, month: u32, day: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
}
