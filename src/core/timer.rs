//! Single count-up timer advancing toward a limit.
//!
//! Transitions that make no sense for the current state are ignored. They
//! are reported at `debug` level so misuse shows up in diagnostic logs
//! without changing behaviour.

use crate::core::observer::{Observer, Subscribers};
use crate::models::snapshot::TimerSnapshot;
use crate::models::timer_state::TimerState;
use tracing::debug;

/// Published to observers after every change of counter or state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerUpdate {
    pub counter: i64,
    pub progress: f64,
    pub state: TimerState,
}

#[derive(Debug)]
pub struct TimerService {
    limit: i64,
    counter: i64,
    progress: f64,
    state: TimerState,
    ticking: bool,
    subscribers: Subscribers<TimerUpdate>,
}

impl TimerService {
    /// New timer that finishes after `limit` seconds.
    pub fn new(limit: i64) -> Self {
        Self {
            limit: limit.max(0),
            counter: 0,
            progress: 0.0,
            state: TimerState::NotStarted,
            ticking: false,
            subscribers: Subscribers::new(),
        }
    }

    /// Rebuild a timer from a persisted snapshot.
    pub fn restore(snapshot: TimerSnapshot) -> Self {
        let limit = snapshot.limit.max(0);
        let counter = snapshot.counter.clamp(0, limit);
        let mut timer = Self::new(limit);
        timer.counter = counter;
        timer.progress = ratio(counter, limit);
        timer.state = snapshot.state;
        timer.ticking = snapshot.state == TimerState::Running;
        timer
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            limit: self.limit,
            counter: self.counter,
            state: self.state,
        }
    }

    pub fn subscribe(&mut self, observer: Observer<TimerUpdate>) {
        self.subscribers.subscribe(observer);
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_time(&self) -> i64 {
        self.limit - self.counter
    }

    /// True while the tick source is scheduled.
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn start(&mut self) {
        match self.state {
            TimerState::NotStarted => {
                self.counter = 0;
                self.progress = 0.0;
                self.state = TimerState::Running;
                self.ticking = true;
                self.publish();
                // a zero limit has nothing to count
                if self.limit == 0 {
                    self.finish();
                }
            }
            TimerState::Paused => {
                self.state = TimerState::Running;
                self.ticking = true;
                self.publish();
            }
            TimerState::Running | TimerState::Finished => self.ignored("start"),
        }
    }

    pub fn pause(&mut self) {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                self.ticking = false;
                self.publish();
            }
            _ => self.ignored("pause"),
        }
    }

    pub fn stop(&mut self) {
        match self.state {
            TimerState::Running | TimerState::Paused => self.finish(),
            _ => self.ignored("stop"),
        }
    }

    /// Resume ticking and optionally account for `elapsed` seconds spent
    /// away. The added time never goes past the limit.
    pub fn resume_with(&mut self, elapsed: Option<i64>) {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.state = TimerState::Running;
                self.ticking = true;
                match elapsed {
                    Some(seconds) => self.add(seconds),
                    None => self.publish(),
                }
            }
            _ => self.ignored("resume"),
        }
    }

    /// One second from the tick source. Only counts while ticking.
    pub fn tick(&mut self) {
        if self.ticking && self.state == TimerState::Running {
            self.add(1);
        }
    }

    fn add(&mut self, seconds: i64) {
        let value = seconds.max(0).min(self.remaining_time());
        self.counter += value;
        self.progress = ratio(self.counter, self.limit);
        if self.counter >= self.limit {
            self.finish();
        } else {
            self.publish();
        }
    }

    fn finish(&mut self) {
        self.state = TimerState::Finished;
        self.ticking = false;
        self.publish();
    }

    fn publish(&self) {
        self.subscribers.notify(&TimerUpdate {
            counter: self.counter,
            progress: self.progress,
            state: self.state,
        });
    }

    fn ignored(&self, event: &str) {
        debug!(event, state = self.state.as_str(), "timer transition ignored");
    }
}

fn ratio(counter: i64, limit: i64) -> f64 {
    if limit == 0 {
        1.0
    } else {
        counter as f64 / limit as f64
    }
}
