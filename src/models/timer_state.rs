use serde::{Deserialize, Serialize};

/// Lifecycle of a single timer and of a whole work session.
///
/// `Finished` is terminal: a finished timer never moves again, a new
/// instance must be built instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    #[default]
    NotStarted,
    Running,
    Paused,
    Finished,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::NotStarted => "not started",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        }
    }

    /// Running or paused: a session exists and has not ended yet.
    pub fn is_active(&self) -> bool {
        matches!(self, TimerState::Running | TimerState::Paused)
    }
}
