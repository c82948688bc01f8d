//! Work session orchestration: a regular-work timer, optionally followed by
//! an overtime timer, seen from outside as one session.
//!
//! When the work timer fills up the overtime timer takes over without the
//! session leaving `Running`. Time spent suspended is replayed through the
//! timers when the session comes back to the foreground, crossing into
//! overtime if needed. The session writes exactly one entry when it ends.

use crate::core::clock::Clock;
use crate::core::net_pay::entry_net_pay;
use crate::core::notify::Notifier;
use crate::core::observer::{Observer, Subscribers};
use crate::core::repository::EntryRepository;
use crate::core::settings::SettingsStore;
use crate::core::timer::TimerService;
use crate::models::entry::Entry;
use crate::models::settings::Settings;
use crate::models::snapshot::SessionSnapshot;
use crate::models::timer_state::TimerState;
use chrono::{Duration, NaiveDateTime};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged(TimerState),
    EntrySaved(Entry),
}

/// Which timer is currently counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Normal,
    Overtime,
}

#[derive(Debug)]
enum Timers {
    WorkOnly(TimerService),
    WithOvertime {
        work: TimerService,
        overtime: TimerService,
    },
}

impl Timers {
    fn build(settings: &Settings) -> Self {
        let work = TimerService::new(settings.work_time_in_seconds);
        if settings.is_logging_overtime {
            Timers::WithOvertime {
                work,
                overtime: TimerService::new(settings.maximum_overtime_allowed_in_seconds),
            }
        } else {
            Timers::WorkOnly(work)
        }
    }

    fn work(&self) -> &TimerService {
        match self {
            Timers::WorkOnly(work) | Timers::WithOvertime { work, .. } => work,
        }
    }

    fn work_mut(&mut self) -> &mut TimerService {
        match self {
            Timers::WorkOnly(work) | Timers::WithOvertime { work, .. } => work,
        }
    }

    fn overtime(&self) -> Option<&TimerService> {
        match self {
            Timers::WorkOnly(_) => None,
            Timers::WithOvertime { overtime, .. } => Some(overtime),
        }
    }

    fn overtime_mut(&mut self) -> Option<&mut TimerService> {
        match self {
            Timers::WorkOnly(_) => None,
            Timers::WithOvertime { overtime, .. } => Some(overtime),
        }
    }

    fn phase(&self) -> Phase {
        match self.overtime() {
            Some(ot) if ot.state() != TimerState::NotStarted => Phase::Overtime,
            _ => Phase::Normal,
        }
    }

    fn active_mut(&mut self) -> &mut TimerService {
        match self {
            Timers::WithOvertime { overtime, .. } if overtime.state() != TimerState::NotStarted => {
                overtime
            }
            Timers::WorkOnly(work) | Timers::WithOvertime { work, .. } => work,
        }
    }
}

pub struct TimerManager {
    settings: Settings,
    timers: Timers,
    state: TimerState,
    started_at: Option<NaiveDateTime>,
    backgrounded_at: Option<NaiveDateTime>,
    // sub-second part of the last replayed gap, not counted yet
    carry: Duration,
    finish_at: Option<NaiveDateTime>,
    notifications_authorized: Option<bool>,
    last_entry: Option<Entry>,
    repository: Rc<dyn EntryRepository>,
    clock: Rc<dyn Clock>,
    notifier: Box<dyn Notifier>,
    subscribers: Subscribers<SessionEvent>,
}

impl TimerManager {
    pub fn new(
        settings: Settings,
        repository: Rc<dyn EntryRepository>,
        clock: Rc<dyn Clock>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            timers: Timers::build(&settings),
            settings,
            state: TimerState::NotStarted,
            started_at: None,
            backgrounded_at: None,
            carry: Duration::zero(),
            finish_at: None,
            notifications_authorized: None,
            last_entry: None,
            repository,
            clock,
            notifier,
            subscribers: Subscribers::new(),
        }
    }

    /// Rebuild a session from a snapshot. Call [`Self::enter_foreground`]
    /// afterwards to account for the time the snapshot spent on disk.
    pub fn restore(
        snapshot: SessionSnapshot,
        repository: Rc<dyn EntryRepository>,
        clock: Rc<dyn Clock>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let work = TimerService::restore(snapshot.work);
        let timers = match snapshot.overtime {
            Some(ot) => Timers::WithOvertime {
                work,
                overtime: TimerService::restore(ot),
            },
            None => Timers::WorkOnly(work),
        };

        Self {
            settings: snapshot.settings,
            timers,
            state: snapshot.state,
            started_at: snapshot.started_at,
            backgrounded_at: snapshot.backgrounded_at,
            carry: Duration::zero(),
            finish_at: None,
            notifications_authorized: snapshot.notifications_authorized,
            last_entry: None,
            repository,
            clock,
            notifier,
            subscribers: Subscribers::new(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            started_at: self.started_at,
            backgrounded_at: self.backgrounded_at,
            work: self.timers.work().snapshot(),
            overtime: self.timers.overtime().map(TimerService::snapshot),
            settings: self.settings.clone(),
            notifications_authorized: self.notifications_authorized,
        }
    }

    pub fn subscribe(&mut self, observer: Observer<SessionEvent>) {
        self.subscribers.subscribe(observer);
    }

    // ---------------------------
    // Reported values
    // ---------------------------

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.timers.phase()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        self.started_at
    }

    pub fn work_timer(&self) -> &TimerService {
        self.timers.work()
    }

    pub fn overtime_timer(&self) -> Option<&TimerService> {
        self.timers.overtime()
    }

    /// Entry written when the session last finished.
    pub fn last_entry(&self) -> Option<&Entry> {
        self.last_entry.as_ref()
    }

    /// Seconds of whichever timer is counting now.
    pub fn display_value(&self) -> i64 {
        match self.timers.overtime() {
            Some(ot) if ot.progress() > 0.0 => ot.counter(),
            _ => self.timers.work().counter(),
        }
    }

    pub fn normal_progress(&self) -> f64 {
        self.timers.work().progress()
    }

    pub fn overtime_progress(&self) -> f64 {
        self.timers.overtime().map_or(0.0, TimerService::progress)
    }

    // ---------------------------
    // User events
    // ---------------------------

    pub fn start(&mut self) {
        match self.state {
            TimerState::Running => {
                debug!("session already running, start ignored");
                return;
            }
            TimerState::Paused => {
                self.resume();
                return;
            }
            TimerState::Finished => {
                self.timers = Timers::build(&self.settings);
                self.last_entry = None;
            }
            TimerState::NotStarted => {}
        }

        if self.notifications_authorized.is_none() {
            self.notifications_authorized = Some(self.notifier.request_authorization());
        }

        self.started_at = Some(self.clock.now());
        self.backgrounded_at = None;
        self.carry = Duration::zero();
        self.timers.work_mut().start();
        self.set_state(TimerState::Running);
        info!(
            work_limit = self.timers.work().limit(),
            overtime_limit = self.timers.overtime().map_or(0, TimerService::limit),
            "work session started"
        );
        self.sync();
    }

    pub fn pause(&mut self) {
        if self.state != TimerState::Running {
            debug!(state = self.state.as_str(), "pause ignored");
            return;
        }
        self.timers.work_mut().pause();
        if let Some(ot) = self.timers.overtime_mut() {
            ot.pause();
        }
        self.carry = Duration::zero();
        self.set_state(TimerState::Paused);
    }

    pub fn resume(&mut self) {
        if self.state != TimerState::Paused {
            debug!(state = self.state.as_str(), "resume ignored");
            return;
        }
        self.timers.work_mut().resume_with(None);
        if let Some(ot) = self.timers.overtime_mut() {
            ot.resume_with(None);
        }
        self.set_state(TimerState::Running);
    }

    /// End the session now and save what has been counted so far.
    pub fn stop(&mut self) {
        if !self.state.is_active() {
            debug!(state = self.state.as_str(), "stop ignored");
            return;
        }
        self.timers.work_mut().stop();
        if let Some(ot) = self.timers.overtime_mut() {
            ot.stop();
        }
        self.finish_session();
    }

    /// One second from the tick source.
    pub fn tick(&mut self) {
        if self.state != TimerState::Running {
            return;
        }
        self.timers.active_mut().tick();
        self.sync();
    }

    // ---------------------------
    // Suspension
    // ---------------------------

    pub fn enter_background(&mut self) {
        if self.state != TimerState::Running {
            return;
        }
        // the uncounted fraction is replayed with the next gap
        self.backgrounded_at = Some(self.clock.now() - self.carry);
        self.carry = Duration::zero();

        if self.notifications_authorized == Some(true) {
            let (remaining, message) = match self.timers.phase() {
                Phase::Overtime => (
                    self.overtime_timer().map_or(0, TimerService::remaining_time),
                    "Overtime limit reached, the work session has ended",
                ),
                Phase::Normal if self.timers.overtime().is_some() => (
                    self.timers.work().remaining_time(),
                    "Regular work time is over, overtime is now being logged",
                ),
                Phase::Normal => (
                    self.timers.work().remaining_time(),
                    "Work time is over, the work session has ended",
                ),
            };
            self.notifier.schedule(Duration::seconds(remaining), message);
        }
    }

    /// Replay the time spent in the background through the timers.
    pub fn enter_foreground(&mut self) {
        self.notifier.cancel();

        let Some(at) = self.backgrounded_at.take() else {
            return;
        };
        if self.state != TimerState::Running {
            return;
        }

        let elapsed = (self.clock.now() - at).max(Duration::zero());
        let delta = elapsed.num_seconds();
        self.carry = elapsed - Duration::seconds(delta);
        debug!(delta, "reconciling background time");
        self.reconcile(at, delta);
    }

    fn reconcile(&mut self, at: NaiveDateTime, delta: i64) {
        let work_remaining = if self.timers.work().state() == TimerState::Finished {
            0
        } else {
            self.timers.work().remaining_time()
        };
        let overtime_remaining = self
            .timers
            .overtime()
            .filter(|ot| ot.state() != TimerState::Finished)
            .map_or(0, |ot| ot.remaining_time());

        // moment the session would have ended on its own while away
        let needed = work_remaining + overtime_remaining;
        if delta >= needed {
            self.finish_at = Some(at + Duration::seconds(needed));
        }

        let excess = if work_remaining > 0 {
            if delta <= work_remaining {
                self.timers.work_mut().resume_with(Some(delta));
                self.sync();
                self.finish_at = None;
                return;
            }
            self.timers.work_mut().resume_with(Some(work_remaining));
            self.sync();
            delta - work_remaining
        } else {
            delta
        };

        if self.state == TimerState::Running
            && let Some(ot) = self.timers.overtime_mut()
            && ot.state() == TimerState::Running
        {
            ot.resume_with(Some(excess));
            self.sync();
        }
        self.finish_at = None;
    }

    // ---------------------------
    // Settings
    // ---------------------------

    /// New limits are only taken while no session is active; pay settings
    /// are always taken.
    pub fn apply_settings(&mut self, settings: Settings) {
        let limits_changed = settings.work_time_in_seconds != self.settings.work_time_in_seconds
            || settings.is_logging_overtime != self.settings.is_logging_overtime
            || settings.maximum_overtime_allowed_in_seconds
                != self.settings.maximum_overtime_allowed_in_seconds;

        self.settings = settings;

        if !limits_changed {
            return;
        }
        if self.state == TimerState::NotStarted {
            self.timers = Timers::build(&self.settings);
            debug!("timers rebuilt with new limits");
        } else {
            debug!(
                state = self.state.as_str(),
                "limit change ignored until the next session"
            );
        }
    }

    /// Feed settings changes from `store` into `manager`.
    pub fn observe_settings(manager: &Rc<RefCell<TimerManager>>, store: &mut SettingsStore) {
        let weak = Rc::downgrade(manager);
        store.subscribe(Box::new(move |settings: &Settings| {
            let Some(manager) = weak.upgrade() else {
                return;
            };
            match manager.try_borrow_mut() {
                Ok(mut m) => m.apply_settings(settings.clone()),
                Err(_) => warn!("timer manager busy, settings change dropped"),
            };
        }));
    }

    // ---------------------------
    // Internals
    // ---------------------------

    /// Hand off to overtime or end the session once the timers say so.
    fn sync(&mut self) {
        if !self.state.is_active() {
            return;
        }
        if self.timers.work().state() != TimerState::Finished {
            return;
        }

        let overtime_done = match self.timers.overtime_mut() {
            None => true,
            Some(ot) => {
                if ot.state() == TimerState::NotStarted {
                    ot.start();
                    info!("regular work time completed, logging overtime");
                }
                ot.state() == TimerState::Finished
            }
        };

        if overtime_done {
            self.finish_session();
        }
    }

    fn finish_session(&mut self) {
        if self.state == TimerState::Finished {
            return;
        }
        self.set_state(TimerState::Finished);
        self.notifier.cancel();
        self.backgrounded_at = None;

        let now = self.finish_at.take().unwrap_or_else(|| self.clock.now());
        let start = self.started_at.unwrap_or(now);
        let finish = now.max(start);

        let work = self.timers.work();
        let (overtime, overtime_limit) = self
            .timers
            .overtime()
            .map_or((0, 0), |ot| (ot.counter(), ot.limit()));

        let mut entry = match Entry::new(
            start,
            finish,
            work.counter(),
            overtime,
            overtime_limit,
            work.limit(),
            self.settings.gross_pay_per_month,
        ) {
            Ok(e) => e,
            Err(e) => {
                error!(error = %e, "could not build the session entry");
                return;
            }
        };

        if self.settings.is_calculating_net_pay {
            entry.calculated_net_pay = entry_net_pay(&entry);
        }

        match self.repository.save(&entry) {
            Ok(()) => {
                info!(
                    id = %entry.id,
                    work = entry.work_time_in_seconds,
                    overtime = entry.overtime_in_seconds,
                    "work session saved"
                );
                self.subscribers
                    .notify(&SessionEvent::EntrySaved(entry.clone()));
                self.last_entry = Some(entry);
            }
            Err(e) => error!(error = %e, "could not save the session entry"),
        }
    }

    fn set_state(&mut self, state: TimerState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.subscribers.notify(&SessionEvent::StateChanged(state));
    }
}
