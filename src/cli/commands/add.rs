use crate::cli::commands::open_repository;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::net_pay::entry_net_pay;
use crate::core::repository::{EntryRepository, find_entry};
use crate::errors::{AppError, AppResult};
use crate::models::entry::{Entry, TIMESTAMP_FORMAT};
use crate::models::settings::Settings;
use crate::ui::messages::success;
use crate::utils::date;
use crate::utils::formatting::secs2readable;
use crate::utils::time::parse_time;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

fn parse_day(s: &str) -> AppResult<NaiveDate> {
    date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

fn parse_clock(s: &str) -> AppResult<NaiveTime> {
    parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))
}

/// Build an entry for `[start, finish]` under `settings`, with net pay when
/// the settings ask for it.
fn build_entry(
    start: NaiveDateTime,
    finish: NaiveDateTime,
    settings: &Settings,
    net: bool,
) -> AppResult<Entry> {
    let mut entry = Entry::from_interval(start, finish, settings)?;
    if net {
        entry.calculated_net_pay = entry_net_pay(&entry);
    }
    Ok(entry)
}

/// Move `old` to `day` with new clock times, keeping the number of days
/// between its start and its finish.
fn reanchor(
    old: &Entry,
    day: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> (NaiveDateTime, NaiveDateTime) {
    let span = (old.finish.date() - old.start.date()).num_days();
    (day.and_time(start), (day + Duration::days(span)).and_time(end))
}

/// Add a work entry for a past or current day.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { date, start, end } = cmd {
        //
        // 1. Parse date and times
        //
        let day = parse_day(date)?;
        let start = day.and_time(parse_clock(start)?);
        let finish = day.and_time(parse_clock(end)?);

        //
        // 2. Build the entry under the current settings
        //
        let entry = build_entry(
            start,
            finish,
            &cfg.settings,
            cfg.settings.is_calculating_net_pay,
        )?;

        //
        // 3. Save
        //
        let repo = open_repository(cfg)?;
        repo.save(&entry)?;

        success(format!(
            "Entry [{}] added for {}: work {}, overtime {}.",
            entry.short_id(),
            day,
            secs2readable(entry.work_time_in_seconds),
            secs2readable(entry.overtime_in_seconds)
        ));
    }

    Ok(())
}

/// Move an entry to another day or change its times.
///
/// The entry keeps the limits and gross pay it was recorded with.
pub fn handle_edit(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        date,
        start,
        end,
    } = cmd
    {
        let repo = open_repository(cfg)?;
        let old = find_entry(&*repo, id)?;

        let day = match date {
            Some(d) => parse_day(d)?,
            None => old.date(),
        };
        let start_time = match start {
            Some(t) => parse_clock(t)?,
            None => old.start.time(),
        };
        let end_time = match end {
            Some(t) => parse_clock(t)?,
            None => old.finish.time(),
        };

        let recorded = Settings {
            work_time_in_seconds: old.standard_worktime_in_seconds,
            maximum_overtime_allowed_in_seconds: old.maximum_overtime_allowed_in_seconds,
            is_logging_overtime: old.maximum_overtime_allowed_in_seconds > 0,
            gross_pay_per_month: old.gross_pay_per_month,
            ..cfg.settings.clone()
        };

        let with_net = old.calculated_net_pay.is_some() || cfg.settings.is_calculating_net_pay;
        let (start, finish) = reanchor(&old, day, start_time, end_time);
        let mut entry = build_entry(start, finish, &recorded, with_net)?;
        entry.id = old.id;

        repo.save(&entry)?;

        success(format!(
            "Entry [{}] updated: {} → {}, work {}, overtime {}.",
            entry.short_id(),
            entry.start.format(TIMESTAMP_FORMAT),
            entry.finish.format("%H:%M:%S"),
            secs2readable(entry.work_time_in_seconds),
            secs2readable(entry.overtime_in_seconds)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn overnight_entry_keeps_its_span_when_moved() {
        let old = Entry::from_interval(
            at(2023, 11, 6, 23),
            at(2023, 11, 7, 1),
            &Settings::default(),
        )
        .unwrap();
        let day = NaiveDate::from_ymd_opt(2023, 11, 9).unwrap();

        let (start, finish) = reanchor(&old, day, old.start.time(), old.finish.time());
        assert_eq!(start, at(2023, 11, 9, 23));
        assert_eq!(finish, at(2023, 11, 10, 1));

        let moved = build_entry(start, finish, &Settings::default(), false).unwrap();
        assert_eq!(moved.work_time_in_seconds, 2 * 3600);
    }

    #[test]
    fn same_day_entry_stays_on_one_day() {
        let old = Entry::from_interval(
            at(2023, 11, 6, 9),
            at(2023, 11, 6, 17),
            &Settings::default(),
        )
        .unwrap();
        let end = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

        let (start, finish) = reanchor(&old, old.date(), old.start.time(), end);
        assert_eq!(start, at(2023, 11, 6, 9));
        assert_eq!(finish, at(2023, 11, 6, 18));
    }
}
