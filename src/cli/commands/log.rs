use crate::cli::commands::open_repository;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;

const OP_WIDTH: usize = 60;

/// ANSI colour for each operation written by the repository and migrations.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "save" => Colour::Green,
        "del" => Colour::Red,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if !matches!(cmd, Commands::Log { print: true }) {
        return Ok(());
    }

    let repo = open_repository(cfg)?;
    let lines = load_log(&repo.pool().conn)?;

    if lines.is_empty() {
        info("The internal log is empty.");
        return Ok(());
    }

    let id_w = lines.iter().map(|l| l.id.to_string().len()).max().unwrap_or(1);
    let date_w = lines.iter().map(|l| l.date.len()).max().unwrap_or(10);

    println!("📜 Internal log:\n");

    for l in &lines {
        let color = color_for_operation(&l.operation);

        let mut visible = if l.target.is_empty() {
            l.operation.clone()
        } else {
            format!("{} ({})", l.operation, l.target)
        };
        if visible.chars().count() > OP_WIDTH {
            visible = visible.chars().take(OP_WIDTH - 3).collect::<String>() + "...";
        }
        let padding = " ".repeat(OP_WIDTH.saturating_sub(visible.chars().count()));

        // only the operation word is coloured
        let colored = match visible.split_once(' ') {
            Some((op, rest)) => format!("{} {}", color.paint(op), rest),
            None => color.paint(visible.as_str()).to_string(),
        };

        println!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            l.id,
            l.date,
            colored,
            padding,
            l.message,
            id_w = id_w,
            date_w = date_w
        );
    }

    Ok(())
}
