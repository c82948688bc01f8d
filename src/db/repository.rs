//! [`EntryRepository`] backed by the SQLite database.

use crate::core::observer::{Observer, Subscribers};
use crate::core::repository::EntryRepository;
use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::utils::formatting::secs2readable;
use chrono::NaiveDateTime;
use std::cell::RefCell;
use tracing::warn;

pub struct SqliteEntryRepository {
    pool: DbPool,
    subscribers: RefCell<Subscribers<()>>,
}

impl SqliteEntryRepository {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        Self::from_pool(DbPool::new(path)?)
    }

    pub fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self {
            pool,
            subscribers: RefCell::new(Subscribers::new()),
        })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    // audit rows are best effort
    fn log(&self, operation: &str, target: &str, message: &str) {
        if let Err(e) = ttlog(&self.pool.conn, operation, target, message) {
            warn!(error = %e, operation, "failed to write internal log");
        }
    }

    fn changed(&self) {
        self.subscribers.borrow().notify(&());
    }
}

impl EntryRepository for SqliteEntryRepository {
    fn save(&self, entry: &Entry) -> AppResult<()> {
        entry.validate()?;
        queries::upsert_entry(&self.pool.conn, entry)?;
        self.log(
            "save",
            &entry.short_id(),
            &format!(
                "{} work {} overtime {}",
                entry.start.format("%Y-%m-%d %H:%M"),
                secs2readable(entry.work_time_in_seconds),
                secs2readable(entry.overtime_in_seconds)
            ),
        );
        self.changed();
        Ok(())
    }

    fn delete(&self, entry: &Entry) -> AppResult<()> {
        let n = queries::delete_entry(&self.pool.conn, &entry.id)?;
        if n == 0 {
            return Err(AppError::EntryNotFound(entry.id.to_string()));
        }
        self.log(
            "del",
            &entry.short_id(),
            &format!("Deleted entry of {}", entry.date()),
        );
        self.changed();
        Ok(())
    }

    fn delete_all(&self) -> AppResult<()> {
        let n = queries::delete_all_entries(&self.pool.conn)?;
        self.log("del", "all", &format!("Deleted all {n} entries"));
        self.changed();
        Ok(())
    }

    fn fetch(
        &self,
        from: Option<NaiveDateTime>,
        to: Option<NaiveDateTime>,
        ascending: bool,
        limit: Option<usize>,
    ) -> AppResult<Vec<Entry>> {
        Ok(queries::load_entries(
            &self.pool.conn,
            from,
            to,
            ascending,
            limit,
        )?)
    }

    fn subscribe(&self, observer: Observer<()>) {
        self.subscribers.borrow_mut().subscribe(observer);
    }
}
