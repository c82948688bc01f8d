use crate::cli::commands::open_repository;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::notify::LogNotifier;
use crate::core::session::TimerManager;
use crate::core::session_store::SessionStore;
use crate::core::settings::SettingsStore;
use crate::errors::AppResult;
use crate::models::settings::Settings;
use crate::ui::messages::{error, field, header, info, success, warning};
use crate::utils::date::{parse_weekday, weekday_name};
use crate::utils::formatting::secs2readable;
use crate::utils::time::parse_duration;
use std::cell::RefCell;
use std::process::Command;
use std::rc::Rc;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
        work_time,
        overtime,
        log_overtime,
        gross_pay,
        net_pay,
        first_weekday,
    } = cmd
    {
        //
        // 1. Collect the requested changes (validate everything first)
        //
        let work_time = work_time.as_deref().map(parse_duration).transpose()?;
        let overtime = overtime.as_deref().map(parse_duration).transpose()?;
        let first_weekday = first_weekday.as_deref().map(parse_weekday).transpose()?;

        let has_changes = work_time.is_some()
            || overtime.is_some()
            || log_overtime.is_some()
            || gross_pay.is_some()
            || net_pay.is_some()
            || first_weekday.is_some();

        if has_changes {
            let change = |s: &mut Settings| {
                if let Some(v) = work_time {
                    s.work_time_in_seconds = v;
                }
                if let Some(v) = overtime {
                    s.maximum_overtime_allowed_in_seconds = v;
                }
                if let Some(v) = log_overtime {
                    s.is_logging_overtime = *v;
                }
                if let Some(v) = gross_pay {
                    s.gross_pay_per_month = *v;
                }
                if let Some(v) = net_pay {
                    s.is_calculating_net_pay = *v;
                }
                if let Some(v) = first_weekday {
                    s.first_weekday = v;
                }
            };
            update_settings(cfg, change)?;
        }

        //
        // 2. Print
        //
        if *print_config {
            let current = if has_changes {
                Config {
                    database: cfg.database.clone(),
                    settings: Config::load()?.settings,
                }
            } else {
                cfg.clone()
            };
            print_config_summary(&current);
        }

        //
        // 3. Edit with an external editor
        //
        if *edit_config {
            edit_file(editor.clone());
        }
    }

    Ok(())
}

/// Persist a settings change and hand it to the stored session.
///
/// The file keeps its own `database` entry, so a `--db` override is not
/// written back.
fn update_settings<F>(cfg: &Config, change: F) -> AppResult<()>
where
    F: FnOnce(&mut Settings),
{
    let mut on_disk = Config::load()?;

    let repo = open_repository(cfg)?;
    let session = SessionStore::new(cfg.session_file());
    let manager = Rc::new(RefCell::new(session.load(
        &cfg.settings,
        repo,
        Rc::new(SystemClock),
        Box::new(LogNotifier::default()),
    )));

    let mut store = SettingsStore::new(on_disk.settings.clone());
    TimerManager::observe_settings(&manager, &mut store);

    if !store.update(change) {
        info("Configuration unchanged.");
        return Ok(());
    }

    on_disk.settings = store.get().clone();
    on_disk.save()?;
    success(format!(
        "Configuration saved to {}",
        Config::config_file().display()
    ));

    let new = store.get();
    let mut m = manager.borrow_mut();
    let limits_differ = m.work_timer().limit() != new.work_time_in_seconds
        || m.overtime_timer().map(|ot| ot.limit())
            != new
                .is_logging_overtime
                .then_some(new.maximum_overtime_allowed_in_seconds);
    if m.state().is_active() && limits_differ {
        warning("A work session is active: new time limits apply from the next session.");
    }
    session.save(&mut m)
}

fn print_config_summary(cfg: &Config) {
    let s = &cfg.settings;
    header("Configuration");
    field("Config file", Config::config_file().display());
    field("Database", &cfg.database);
    field("Work time", secs2readable(s.work_time_in_seconds));
    field(
        "Overtime",
        if s.is_logging_overtime {
            format!("up to {}", secs2readable(s.maximum_overtime_allowed_in_seconds))
        } else {
            "not logged".to_string()
        },
    );
    field("Gross pay / month", s.gross_pay_per_month);
    field(
        "Net pay",
        if s.is_calculating_net_pay { "calculated" } else { "off" },
    );
    field("First weekday", weekday_name(s.first_weekday));
}

fn edit_file(requested: Option<String>) {
    let path = Config::config_file();

    let default_editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    let editor_to_use = requested.unwrap_or_else(|| default_editor.clone());

    match Command::new(&editor_to_use).arg(&path).status() {
        Ok(s) if s.success() => {
            success(format!(
                "Configuration file edited successfully using '{}'",
                editor_to_use
            ));
        }
        Ok(_) | Err(_) => {
            warning(format!(
                "Editor '{}' not available, falling back to '{}'",
                editor_to_use, default_editor
            ));
            match Command::new(&default_editor).arg(&path).status() {
                Ok(s) if s.success() => success(format!(
                    "Configuration file edited successfully using fallback '{}'",
                    default_editor
                )),
                Ok(_) | Err(_) => error(format!(
                    "Failed to edit configuration file using fallback '{}'",
                    default_editor
                )),
            }
        }
    }
}
