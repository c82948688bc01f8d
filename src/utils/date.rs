use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, Weekday};

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Accepts English names and abbreviations (`mon`, `Monday`, `sun`...).
pub fn parse_weekday(s: &str) -> AppResult<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| AppError::Config(format!("Invalid weekday '{}'", s)))
}

pub fn weekday_name(w: Weekday) -> &'static str {
    match w {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekdays() {
        assert_eq!(parse_weekday("sun").unwrap(), Weekday::Sun);
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert!(parse_weekday("someday").is_err());
        assert_eq!(weekday_name(Weekday::Sat), "saturday");
    }
}
