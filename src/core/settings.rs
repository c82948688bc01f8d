use crate::core::observer::{Observer, Subscribers};
use crate::models::settings::Settings;

/// Observable holder of the current [`Settings`].
#[derive(Debug, Default)]
pub struct SettingsStore {
    value: Settings,
    subscribers: Subscribers<Settings>,
}

impl SettingsStore {
    pub fn new(value: Settings) -> Self {
        Self {
            value,
            subscribers: Subscribers::new(),
        }
    }

    pub fn get(&self) -> &Settings {
        &self.value
    }

    pub fn subscribe(&mut self, observer: Observer<Settings>) {
        self.subscribers.subscribe(observer);
    }

    /// Apply `change`; observers are notified only if something actually changed.
    pub fn update<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut Settings),
    {
        let mut next = self.value.clone();
        change(&mut next);
        if next == self.value {
            return false;
        }
        self.value = next;
        self.subscribers.notify(&self.value);
        true
    }
}
