pub mod add;
pub mod config;
pub mod del;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod pay;
pub mod session;
pub mod stats;

use crate::cli::parser::PeriodArgs;
use crate::config::Config;
use crate::core::clock::Clock;
use crate::core::period::ChartPeriodService;
use crate::core::statistics::PeriodNavigator;
use crate::db::repository::SqliteEntryRepository;
use crate::errors::{AppError, AppResult};
use crate::models::period::Period;
use crate::ui::messages::warning;
use crate::utils::date;
use std::io::{self, Write};
use std::rc::Rc;

pub(crate) fn open_repository(cfg: &Config) -> AppResult<Rc<SqliteEntryRepository>> {
    Ok(Rc::new(SqliteEntryRepository::open(&cfg.database)?))
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub(crate) fn parse_date_arg(
    value: Option<&String>,
    clock: &dyn Clock,
) -> AppResult<chrono::NaiveDate> {
    match value {
        Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string())),
        None => Ok(clock.today()),
    }
}

/// Resolve `--range/--date/--offset` into a concrete period.
pub(crate) fn resolve_period(
    args: &PeriodArgs,
    cfg: &Config,
    repo: &SqliteEntryRepository,
    clock: &dyn Clock,
) -> AppResult<Period> {
    let anchor = parse_date_arg(args.date.as_ref(), clock)?;
    let service = ChartPeriodService::new(cfg.settings.first_weekday);
    let mut nav = PeriodNavigator::new(service, args.range, anchor, repo)?;

    for _ in 0..args.offset.unsigned_abs() {
        if args.offset > 0 {
            nav.next()?;
        } else {
            nav.previous()?;
        }
    }

    Ok(nav.period())
}
