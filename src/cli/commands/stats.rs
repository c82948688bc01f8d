use crate::cli::commands::{open_repository, resolve_period};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::statistics::{PeriodSummary, StatisticsService};
use crate::errors::AppResult;
use crate::ui::messages::{field, header};
use crate::utils::colors::{GREY, MAGENTA, RESET};
use crate::utils::formatting::secs2readable;

const CHART_WIDTH: usize = 40;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { period: args } = cmd {
        let repo = open_repository(cfg)?;
        let clock = SystemClock;
        let period = resolve_period(args, cfg, &repo, &clock)?;

        let summary = StatisticsService::new(&*repo, &clock).summarize(&period, args.range);
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(s: &PeriodSummary) {
    header(format!("Statistics ({}) {}", s.range.as_str(), s.period));

    field("Entries", s.entries);
    field("Work", secs2readable(s.work_time_in_seconds));
    field("Overtime", secs2readable(s.overtime_in_seconds));
    field(
        "Total",
        secs2readable(s.work_time_in_seconds + s.overtime_in_seconds),
    );
    println!();

    let max = s.buckets.iter().map(|b| b.total()).max().unwrap_or(0);
    let label_w = s.buckets.iter().map(|b| b.label.len()).max().unwrap_or(0);

    for b in &s.buckets {
        let scale = |secs: i64| -> usize {
            if max == 0 {
                0
            } else {
                ((secs as f64 / max as f64) * CHART_WIDTH as f64).round() as usize
            }
        };
        let work = scale(b.work_time_in_seconds);
        let overtime = scale(b.total()).saturating_sub(work);

        let bar = if b.total() == 0 {
            format!("{GREY}·{RESET}")
        } else {
            format!(
                "{}{MAGENTA}{}{RESET}",
                "█".repeat(work),
                "█".repeat(overtime)
            )
        };

        println!(
            "{:<label_w$} │ {} {}",
            b.label,
            bar,
            secs2readable(b.total()),
            label_w = label_w
        );
    }
}
