/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Grey for a zero duration, so empty days fade out in tables.
pub fn colorize_duration(secs: i64, text: &str) -> String {
    if secs == 0 {
        format!("{GREY}{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub fn colorize_overtime(secs: i64, text: &str) -> String {
    if secs > 0 {
        format!("{MAGENTA}{text}{RESET}")
    } else {
        colorize_duration(secs, text)
    }
}

pub fn color_for_state(state: crate::models::timer_state::TimerState) -> &'static str {
    use crate::models::timer_state::TimerState;
    match state {
        TimerState::NotStarted => GREY,
        TimerState::Running => GREEN,
        TimerState::Paused => YELLOW,
        TimerState::Finished => CYAN,
    }
}
