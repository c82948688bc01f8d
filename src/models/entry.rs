use super::settings::Settings;
use crate::errors::{AppError, AppResult};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One work session: how long was worked, how much of it was overtime, and
/// the settings that were in force when it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub start: NaiveDateTime,
    pub finish: NaiveDateTime,
    pub work_time_in_seconds: i64,
    pub overtime_in_seconds: i64,
    pub maximum_overtime_allowed_in_seconds: i64,
    pub standard_worktime_in_seconds: i64,
    pub gross_pay_per_month: i64,
    pub calculated_net_pay: Option<f64>,
}

impl Entry {
    /// Build a new entry with a fresh id. Fails if the invariants do not hold.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        start: NaiveDateTime,
        finish: NaiveDateTime,
        work_time_in_seconds: i64,
        overtime_in_seconds: i64,
        maximum_overtime_allowed_in_seconds: i64,
        standard_worktime_in_seconds: i64,
        gross_pay_per_month: i64,
    ) -> AppResult<Self> {
        let entry = Self {
            id: Uuid::new_v4(),
            start,
            finish,
            work_time_in_seconds,
            overtime_in_seconds,
            maximum_overtime_allowed_in_seconds,
            standard_worktime_in_seconds,
            gross_pay_per_month,
            calculated_net_pay: None,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Entry for a manually entered interval.
    ///
    /// Elapsed time fills regular work up to the standard worktime, the rest
    /// goes to overtime up to its maximum (or nowhere if overtime is not logged).
    pub fn from_interval(
        start: NaiveDateTime,
        finish: NaiveDateTime,
        settings: &Settings,
    ) -> AppResult<Self> {
        if finish < start {
            return Err(AppError::InvalidEntry(format!(
                "finish {} is before start {}",
                finish.format(TIMESTAMP_FORMAT),
                start.format(TIMESTAMP_FORMAT)
            )));
        }

        let elapsed = (finish - start).num_seconds();
        let overtime_limit = settings.effective_overtime_limit();
        let work = elapsed.min(settings.work_time_in_seconds);
        let overtime = (elapsed - work).min(overtime_limit);

        Self::new(
            start,
            finish,
            work,
            overtime,
            overtime_limit,
            settings.work_time_in_seconds,
            settings.gross_pay_per_month,
        )
    }

    /// Synthetic entry standing in for a working day without data. It is only
    /// used for projections and never saved, so it is not validated.
    pub fn placeholder(
        day: NaiveDate,
        work_time_in_seconds: i64,
        overtime_in_seconds: i64,
        settings: &Settings,
    ) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        Self {
            id: Uuid::nil(),
            start,
            finish: start + Duration::seconds(work_time_in_seconds + overtime_in_seconds),
            work_time_in_seconds,
            overtime_in_seconds,
            maximum_overtime_allowed_in_seconds: settings.effective_overtime_limit(),
            standard_worktime_in_seconds: settings.work_time_in_seconds,
            gross_pay_per_month: settings.gross_pay_per_month,
            calculated_net_pay: None,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.finish < self.start {
            return Err(AppError::InvalidEntry("finish is before start".into()));
        }
        if self.work_time_in_seconds < 0 || self.overtime_in_seconds < 0 {
            return Err(AppError::InvalidEntry("negative duration".into()));
        }
        if self.work_time_in_seconds > self.standard_worktime_in_seconds {
            return Err(AppError::InvalidEntry(format!(
                "work time {}s exceeds the standard worktime {}s",
                self.work_time_in_seconds, self.standard_worktime_in_seconds
            )));
        }
        if self.overtime_in_seconds > self.maximum_overtime_allowed_in_seconds {
            return Err(AppError::InvalidEntry(format!(
                "overtime {}s exceeds the maximum overtime {}s",
                self.overtime_in_seconds, self.maximum_overtime_allowed_in_seconds
            )));
        }
        Ok(())
    }

    /// Calendar day the entry belongs to (its start date).
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn work_hours(&self) -> f64 {
        self.work_time_in_seconds as f64 / 3600.0
    }

    pub fn overtime_hours(&self) -> f64 {
        self.overtime_in_seconds as f64 / 3600.0
    }

    /// First eight hex digits of the id, enough to address an entry from the CLI.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}
