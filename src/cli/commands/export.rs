use crate::cli::commands::{open_repository, parse_date_arg};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::period::ChartPeriodService;
use crate::core::statistics::PeriodNavigator;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        date,
        force,
    } = cmd
    {
        let repo = open_repository(cfg)?;

        let period = match range {
            Some(r) => {
                let anchor = parse_date_arg(date.as_ref(), &SystemClock)?;
                let service = ChartPeriodService::new(cfg.settings.first_weekday);
                Some(PeriodNavigator::new(service, *r, anchor, &*repo)?.period())
            }
            None => None,
        };

        let written = ExportLogic::export(&*repo, *format, file, period.as_ref(), *force)?;
        if written > 0 {
            info(format!("{} entries exported as {}.", written, format.as_str()));
        }
    }

    Ok(())
}
