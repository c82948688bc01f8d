use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORK_TIME_SECONDS: i64 = 8 * 3600;
pub const DEFAULT_MAX_OVERTIME_SECONDS: i64 = 2 * 3600;

/// User settings consumed by the timer and pay engines.
///
/// Entries snapshot the limits and the pay basis at save time, so a change
/// here never rewrites history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_work_time")]
    pub work_time_in_seconds: i64,
    #[serde(default = "default_max_overtime")]
    pub maximum_overtime_allowed_in_seconds: i64,
    #[serde(default = "default_true")]
    pub is_logging_overtime: bool,
    #[serde(default)]
    pub gross_pay_per_month: i64,
    #[serde(default)]
    pub is_calculating_net_pay: bool,
    #[serde(default = "default_first_weekday")]
    pub first_weekday: Weekday,
}

fn default_work_time() -> i64 {
    DEFAULT_WORK_TIME_SECONDS
}
fn default_max_overtime() -> i64 {
    DEFAULT_MAX_OVERTIME_SECONDS
}
fn default_true() -> bool {
    true
}
fn default_first_weekday() -> Weekday {
    Weekday::Mon
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_time_in_seconds: default_work_time(),
            maximum_overtime_allowed_in_seconds: default_max_overtime(),
            is_logging_overtime: true,
            gross_pay_per_month: 0,
            is_calculating_net_pay: false,
            first_weekday: default_first_weekday(),
        }
    }
}

impl Settings {
    /// Overtime limit actually in force: zero when overtime is not logged.
    pub fn effective_overtime_limit(&self) -> i64 {
        if self.is_logging_overtime {
            self.maximum_overtime_allowed_in_seconds
        } else {
            0
        }
    }
}
