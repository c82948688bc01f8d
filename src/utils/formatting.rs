//! Formatting utilities used for CLI and export outputs.

/// `8h 5m` style, zero padded: `08h 05m`.
pub fn secs2readable(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let abs = secs.abs();
    format!("{}{:02}h {:02}m", sign, abs / 3600, (abs % 3600) / 60)
}

/// Stopwatch style: `HH:MM:SS`.
pub fn secs2clock(secs: i64) -> String {
    let abs = secs.max(0);
    format!("{:02}:{:02}:{:02}", abs / 3600, (abs % 3600) / 60, abs % 60)
}

pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Horizontal bar of `width` cells filled according to `ratio` (0.0..=1.0).
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_durations() {
        assert_eq!(secs2readable(8 * 3600), "08h 00m");
        assert_eq!(secs2readable(7 * 3600 + 30 * 60 + 59), "07h 30m");
        assert_eq!(secs2readable(-90 * 60), "-01h 30m");
        assert_eq!(secs2clock(3661), "01:01:01");
    }

    #[test]
    fn bars() {
        assert_eq!(progress_bar(0.5, 4), "██░░");
        assert_eq!(progress_bar(2.0, 3), "███");
        assert_eq!(progress_bar(0.0, 2), "░░");
    }
}
