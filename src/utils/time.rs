//! Time utilities: parsing clock times and human durations.

use crate::errors::{AppError, AppResult};
use chrono::NaiveTime;
use regex::Regex;

/// `HH:MM` or `HH:MM:SS`.
pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

/// Parse a duration such as `8h`, `7h30m`, `45m`, `90s` or `1h2m3s` into
/// seconds. A bare number is read as minutes.
pub fn parse_duration(input: &str) -> AppResult<i64> {
    let s = input.trim().to_lowercase();
    if let Ok(mins) = s.parse::<i64>() {
        if mins < 0 {
            return Err(AppError::InvalidDuration(input.to_string()));
        }
        return Ok(mins * 60);
    }

    let re = Regex::new(r"^(?:(\d+)h)?\s*(?:(\d+)m)?\s*(?:(\d+)s)?$")
        .map_err(|e| AppError::InvalidDuration(e.to_string()))?;
    let caps = re
        .captures(&s)
        .ok_or_else(|| AppError::InvalidDuration(input.to_string()))?;

    let part = |i: usize| -> AppResult<i64> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse::<i64>()
                .map_err(|_| AppError::InvalidDuration(input.to_string())),
            None => Ok(0),
        }
    };

    if (1..=3).all(|i| caps.get(i).is_none()) {
        return Err(AppError::InvalidDuration(input.to_string()));
    }

    Ok(part(1)? * 3600 + part(2)? * 60 + part(3)?)
}
