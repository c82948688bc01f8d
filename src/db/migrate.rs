use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `entries` table. Timestamps are local wall-clock time,
/// `YYYY-MM-DD HH:MM:SS`, so they sort and compare as text.
fn create_entries_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id                   TEXT PRIMARY KEY,
            start_time           TEXT NOT NULL,
            finish_time          TEXT NOT NULL,
            work_time            INTEGER NOT NULL DEFAULT 0,
            overtime             INTEGER NOT NULL DEFAULT 0,
            max_overtime         INTEGER NOT NULL DEFAULT 0,
            standard_worktime    INTEGER NOT NULL DEFAULT 0,
            gross_pay_per_month  INTEGER NOT NULL DEFAULT 0,
            created_at           TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now', 'localtime'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    info!(version, "migration applied");
    Ok(())
}

fn migrate_add_entry_indexes(conn: &Connection) -> Result<()> {
    let version = "20231101_0001_entries_time_indexes";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_entries_start ON entries(start_time);
        CREATE INDEX IF NOT EXISTS idx_entries_finish ON entries(finish_time);
        "#,
    )?;

    mark_applied(conn, version, "Added start/finish indexes to entries")
}

fn migrate_add_net_pay_column(conn: &Connection) -> Result<()> {
    let version = "20231115_0002_add_net_pay";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    if !has_column(conn, "entries", "net_pay")? {
        conn.execute("ALTER TABLE entries ADD COLUMN net_pay REAL;", [])?;
    }

    mark_applied(conn, version, "Added net_pay column to entries")
}

/// Run every pending migration. Safe to call on every open.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) log table first: migrations are recorded there
    ensure_log_table(conn)?;

    // 2) base schema
    if !table_exists(conn, "entries")? {
        create_entries_table(conn)?;
        info!("created entries table");
    }

    // 3) versioned changes
    migrate_add_entry_indexes(conn)?;
    migrate_add_net_pay_column(conn)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        run_pending_migrations(&conn).unwrap();

        assert!(has_column(&conn, "entries", "net_pay").unwrap());
        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied, 2);
    }
}
