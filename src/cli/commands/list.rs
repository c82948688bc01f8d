use crate::cli::commands::{open_repository, resolve_period};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::pay::entry_gross_pay;
use crate::core::repository::fetch_period;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_duration, colorize_overtime};
use crate::utils::formatting::{money, secs2readable};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period } = cmd {
        let repo = open_repository(cfg)?;
        let period = resolve_period(period, cfg, &repo, &SystemClock)?;
        let entries = fetch_period(&*repo, &period)?;

        header(format!("Entries {}", period));

        if entries.is_empty() {
            info("No entries in this period.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID"),
            Column::new("Date"),
            Column::new("Start"),
            Column::new("Finish"),
            Column::new("Work"),
            Column::new("Overtime"),
            Column::new("Gross"),
            Column::new("Net"),
        ]);

        for e in &entries {
            table.add_row(vec![
                e.short_id(),
                e.start.format("%a %Y-%m-%d").to_string(),
                e.start.format("%H:%M").to_string(),
                e.finish.format("%H:%M").to_string(),
                colorize_duration(e.work_time_in_seconds, &secs2readable(e.work_time_in_seconds)),
                colorize_overtime(e.overtime_in_seconds, &secs2readable(e.overtime_in_seconds)),
                money(entry_gross_pay(e)),
                e.calculated_net_pay.map(money).unwrap_or_else(|| "-".into()),
            ]);
        }

        print!("{}", table.render());
        println!("\n{} entries", entries.len());
    }

    Ok(())
}
