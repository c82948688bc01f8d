//! Keeps a [`TimerManager`] alive across CLI invocations.
//!
//! Between two commands the session is treated as backgrounded: loading
//! replays the time since the last save, saving marks the session as
//! backgrounded again.

use crate::core::clock::Clock;
use crate::core::notify::Notifier;
use crate::core::repository::EntryRepository;
use crate::core::session::TimerManager;
use crate::errors::AppResult;
use crate::models::settings::Settings;
use crate::models::snapshot::SessionSnapshot;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, warn};

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore the saved session and bring it to the foreground, or start
    /// from an idle one. An unreadable snapshot is discarded.
    pub fn load(
        &self,
        settings: &Settings,
        repository: Rc<dyn EntryRepository>,
        clock: Rc<dyn Clock>,
        notifier: Box<dyn Notifier>,
    ) -> TimerManager {
        let snapshot = match self.read() {
            Ok(s) => s,
            Err(e) => {
                warn!(
                    error = %e,
                    path = %self.path.display(),
                    "discarding unreadable session snapshot"
                );
                None
            }
        };

        let mut manager = match snapshot {
            Some(s) => TimerManager::restore(s, repository, clock, notifier),
            None => TimerManager::new(settings.clone(), repository, clock, notifier),
        };

        manager.enter_foreground();
        // idle sessions pick up new limits, active ones only pay settings
        manager.apply_settings(settings.clone());
        manager
    }

    pub fn save(&self, manager: &mut TimerManager) -> AppResult<()> {
        manager.enter_background();
        let json = serde_json::to_string_pretty(&manager.snapshot())?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "session snapshot saved");
        Ok(())
    }

    pub fn clear(&self) -> AppResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    fn read(&self) -> AppResult<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::core::notify::LogNotifier;
    use crate::core::repository::MemoryEntryRepository;
    use crate::models::timer_state::TimerState;
    use chrono::NaiveDate;

    fn clock() -> Rc<ManualClock> {
        let at = NaiveDate::from_ymd_opt(2023, 11, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Rc::new(ManualClock::new(at))
    }

    #[test]
    fn time_between_invocations_is_counted() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("db.sqlite.session.json"));
        let repo = Rc::new(MemoryEntryRepository::new());
        let clock = clock();
        let settings = Settings::default();

        let notifier = Box::new(LogNotifier::default());
        let mut m = store.load(&settings, repo.clone(), clock.clone(), notifier);
        m.start();
        store.save(&mut m).unwrap();

        clock.advance(3600);
        let notifier = Box::new(LogNotifier::default());
        let mut m = store.load(&settings, repo.clone(), clock.clone(), notifier);
        assert_eq!(m.state(), TimerState::Running);
        assert_eq!(m.work_timer().counter(), 3600);

        m.stop();
        store.save(&mut m).unwrap();
        assert_eq!(repo.len(), 1);
        assert_eq!(
            repo.fetch_newest().unwrap().unwrap().work_time_in_seconds,
            3600
        );
    }

    #[test]
    fn corrupt_snapshot_starts_idle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        fs::write(&path, "{ not json").unwrap();
        let store = SessionStore::new(&path);

        let m = store.load(
            &Settings::default(),
            Rc::new(MemoryEntryRepository::new()),
            clock(),
            Box::new(LogNotifier::default()),
        );
        assert_eq!(m.state(), TimerState::NotStarted);

        store.clear().unwrap();
        assert!(!path.exists());
    }
}
