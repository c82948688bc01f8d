use super::settings::Settings;
use super::timer_state::TimerState;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Persisted image of one timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub limit: i64,
    pub counter: i64,
    pub state: TimerState,
}

/// Persisted image of a whole work session, written between two CLI
/// invocations. The gap between `backgrounded_at` and the next restore is
/// replayed through the timers as background time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: TimerState,
    pub started_at: Option<NaiveDateTime>,
    pub backgrounded_at: Option<NaiveDateTime>,
    pub work: TimerSnapshot,
    pub overtime: Option<TimerSnapshot>,
    pub settings: Settings,
    #[serde(default)]
    pub notifications_authorized: Option<bool>,
}
