use crate::cli::commands::open_repository;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::notify::LogNotifier;
use crate::core::session::{Phase, TimerManager};
use crate::core::session_store::SessionStore;
use crate::core::timer::TimerService;
use crate::errors::AppResult;
use crate::models::entry::Entry;
use crate::models::timer_state::TimerState;
use crate::ui::messages::{field, header, info, success, warning};
use crate::utils::colors::{RESET, color_for_state};
use crate::utils::formatting::{progress_bar, secs2clock, secs2readable};
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

const BAR_WIDTH: usize = 30;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let repo = open_repository(cfg)?;
    let clock: Rc<dyn Clock> = Rc::new(SystemClock);
    let store = SessionStore::new(cfg.session_file());

    let mut manager = store.load(
        &cfg.settings,
        repo,
        Rc::clone(&clock),
        Box::new(LogNotifier::default()),
    );

    // the session may have run out since the last command
    if let Some(entry) = manager.last_entry() {
        info("The work session ended while paytimer was not running.");
        print_saved(entry);
    }

    match cmd {
        Commands::Start => start(&mut manager),
        Commands::Pause => pause(&mut manager),
        Commands::Resume => resume(&mut manager),
        Commands::Stop => stop(&mut manager),
        Commands::Status => print_status(&manager),
        Commands::Watch { seconds } => watch(&mut manager, *seconds)?,
        _ => {}
    }

    store.save(&mut manager)
}

fn start(manager: &mut TimerManager) {
    match manager.state() {
        TimerState::Running => warning("A work session is already running."),
        TimerState::Paused => {
            manager.resume();
            success("Work session resumed.");
        }
        TimerState::NotStarted | TimerState::Finished => {
            manager.start();
            let limit = manager.work_timer().limit();
            success(format!(
                "Work session started, regular work time {}.",
                secs2readable(limit)
            ));
        }
    }
}

fn pause(manager: &mut TimerManager) {
    if manager.state() != TimerState::Running {
        warning("No running work session to pause.");
        return;
    }
    manager.pause();
    success(format!(
        "Work session paused at {}.",
        secs2clock(manager.display_value())
    ));
}

fn resume(manager: &mut TimerManager) {
    if manager.state() != TimerState::Paused {
        warning("No paused work session to resume.");
        return;
    }
    manager.resume();
    success("Work session resumed.");
}

fn stop(manager: &mut TimerManager) {
    if !manager.state().is_active() {
        warning("No active work session to stop.");
        return;
    }
    manager.stop();
    match manager.last_entry() {
        Some(entry) => print_saved(entry),
        None => warning("The work session ended but could not be saved."),
    }
}

fn watch(manager: &mut TimerManager, seconds: Option<u64>) -> AppResult<()> {
    if manager.state() != TimerState::Running {
        warning("No running work session to watch.");
        return Ok(());
    }

    let mut elapsed = 0u64;
    let mut out = io::stdout();
    while manager.state() == TimerState::Running && seconds.is_none_or(|n| elapsed < n) {
        thread::sleep(Duration::from_secs(1));
        manager.tick();
        elapsed += 1;

        write!(out, "\r{}", live_line(manager))?;
        out.flush()?;
    }
    writeln!(out)?;

    if let Some(entry) = manager.last_entry() {
        print_saved(entry);
    }
    Ok(())
}

fn live_line(manager: &TimerManager) -> String {
    let (label, ratio) = match manager.phase() {
        Phase::Normal => ("work", manager.normal_progress()),
        Phase::Overtime => ("overtime", manager.overtime_progress()),
    };
    format!(
        "⏱  {} {} {:>3.0}% {}",
        secs2clock(manager.display_value()),
        progress_bar(ratio, BAR_WIDTH),
        ratio * 100.0,
        label
    )
}

fn timer_line(timer: &TimerService) -> String {
    format!(
        "{} / {} {} {:>3.0}%",
        secs2clock(timer.counter()),
        secs2clock(timer.limit()),
        progress_bar(timer.progress(), BAR_WIDTH),
        timer.progress() * 100.0
    )
}

fn print_status(manager: &TimerManager) {
    header("Work session");

    let state = manager.state();
    field(
        "State",
        format!("{}{}{}", color_for_state(state), state.as_str(), RESET),
    );

    if state == TimerState::NotStarted {
        return;
    }

    if let Some(started) = manager.started_at() {
        field("Started", started.format("%Y-%m-%d %H:%M:%S"));
    }
    field("Work", timer_line(manager.work_timer()));
    match manager.overtime_timer() {
        Some(ot) => field("Overtime", timer_line(ot)),
        None => field("Overtime", "not logged"),
    }
    if state.is_active() {
        let phase = match manager.phase() {
            Phase::Normal => "regular work",
            Phase::Overtime => "overtime",
        };
        field("Counting", phase);
    }
}

fn print_saved(entry: &Entry) {
    success(format!(
        "Work session saved [{}]: work {}, overtime {}.",
        entry.short_id(),
        secs2readable(entry.work_time_in_seconds),
        secs2readable(entry.overtime_in_seconds)
    ));
}
