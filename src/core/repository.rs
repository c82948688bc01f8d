//! Entry repository contract and an in-memory implementation.

use crate::core::observer::{Observer, Subscribers};
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::models::period::Period;
use chrono::NaiveDateTime;
use std::cell::RefCell;

/// Storage for entries: upsert, delete, range query and a "did change" signal.
///
/// `fetch` returns every entry whose `[start, finish]` span intersects
/// `[from, to]`; a `None` bound is unbounded. Results are ordered by start.
pub trait EntryRepository {
    fn save(&self, entry: &Entry) -> AppResult<()>;

    fn delete(&self, entry: &Entry) -> AppResult<()>;

    fn delete_all(&self) -> AppResult<()>;

    fn fetch(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
        ascending: bool,
        limit: Option<usize>,
    ) -> AppResult<Vec<Entry>>;

    fn fetch_oldest(&self) -> AppResult<Option<Entry>> {
        Ok(self.fetch(None, None, true, Some(1))?.into_iter().next())
    }

    fn fetch_newest(&self) -> AppResult<Option<Entry>> {
        Ok(self.fetch(None, None, false, Some(1))?.into_iter().next())
    }

    /// Register a callback fired after every successful write.
    fn subscribe(&self, observer: Observer<()>);
}

/// Entries intersecting a whole display period.
pub fn fetch_period(repo: &dyn EntryRepository, period: &Period) -> AppResult<Vec<Entry>> {
    repo.fetch(
        Some(period.start_of_first_day()),
        Some(period.end_of_last_day()),
        true,
        None,
    )
}

/// Look an entry up by its full id or by a unique prefix of its simple form.
pub fn find_entry(repo: &dyn EntryRepository, id_or_prefix: &str) -> AppResult<Entry> {
    let needle = id_or_prefix.trim().to_lowercase().replace('-', "");
    if needle.is_empty() {
        return Err(AppError::InvalidId(id_or_prefix.to_string()));
    }

    let mut matches: Vec<Entry> = repo
        .fetch(None, None, true, None)?
        .into_iter()
        .filter(|e| e.id.simple().to_string().starts_with(&needle))
        .collect();

    match matches.len() {
        0 => Err(AppError::EntryNotFound(id_or_prefix.to_string())),
        1 => Ok(matches.remove(0)),
        n => Err(AppError::InvalidId(format!(
            "'{}' is ambiguous ({} entries match)",
            id_or_prefix, n
        ))),
    }
}

pub(crate) fn intersects(
    entry: &Entry,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
) -> bool {
    from.is_none_or(|f| entry.finish >= f) && to.is_none_or(|t| entry.start <= t)
}

/// Repository kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryEntryRepository {
    entries: RefCell<Vec<Entry>>,
    subscribers: RefCell<Subscribers<()>>,
}

impl MemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn did_change(&self) {
        self.subscribers.borrow().notify(&());
    }
}

impl EntryRepository for MemoryEntryRepository {
    fn save(&self, entry: &Entry) -> AppResult<()> {
        entry.validate()?;
        {
            let mut entries = self.entries.borrow_mut();
            match entries.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry.clone(),
                None => entries.push(entry.clone()),
            }
        }
        self.did_change();
        Ok(())
    }

    fn delete(&self, entry: &Entry) -> AppResult<()> {
        self.entries.borrow_mut().retain(|e| e.id != entry.id);
        self.did_change();
        Ok(())
    }

    fn delete_all(&self) -> AppResult<()> {
        self.entries.borrow_mut().clear();
        self.did_change();
        Ok(())
    }

    fn fetch(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
        ascending: bool,
        limit: Option<usize>,
    ) -> AppResult<Vec<Entry>> {
        let mut out: Vec<Entry> = self
            .entries
            .borrow()
            .iter()
            .filter(|e| intersects(e, from, to))
            .cloned()
            .collect();

        out.sort_by_key(|e| e.start);
        if !ascending {
            out.reverse();
        }
        if let Some(n) = limit {
            out.truncate(n);
        }
        Ok(out)
    }

    fn subscribe(&self, observer: Observer<()>) {
        self.subscribers.borrow_mut().subscribe(observer);
    }
}
