use crate::errors::AppError;
use crate::models::entry::{Entry, TIMESTAMP_FORMAT};
use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, Result, Row, params};
use uuid::Uuid;

const ENTRY_COLUMNS: &str = "id, start_time, finish_time, work_time, overtime, max_overtime, \
     standard_worktime, gross_pay_per_month, net_pay";

fn parse_timestamp(idx: usize, raw: String) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(|_| {
        let err = Box::new(AppError::InvalidDate(raw));
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, err)
    })
}

pub fn map_row(row: &Row) -> Result<Entry> {
    let id_str: String = row.get("id")?;
    let id = Uuid::parse_str(&id_str).map_err(|_| {
        let err = Box::new(AppError::InvalidId(id_str.clone()));
        rusqlite::Error::FromSqlConversionFailure(0, Type::Text, err)
    })?;

    Ok(Entry {
        id,
        start: parse_timestamp(1, row.get("start_time")?)?,
        finish: parse_timestamp(2, row.get("finish_time")?)?,
        work_time_in_seconds: row.get("work_time")?,
        overtime_in_seconds: row.get("overtime")?,
        maximum_overtime_allowed_in_seconds: row.get("max_overtime")?,
        standard_worktime_in_seconds: row.get("standard_worktime")?,
        gross_pay_per_month: row.get("gross_pay_per_month")?,
        calculated_net_pay: row.get("net_pay")?,
    })
}

/// Insert a new entry or overwrite the one with the same id.
pub fn upsert_entry(conn: &Connection, e: &Entry) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO entries
            (id, start_time, finish_time, work_time, overtime, max_overtime,
             standard_worktime, gross_pay_per_month, net_pay, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
            start_time = excluded.start_time,
            finish_time = excluded.finish_time,
            work_time = excluded.work_time,
            overtime = excluded.overtime,
            max_overtime = excluded.max_overtime,
            standard_worktime = excluded.standard_worktime,
            gross_pay_per_month = excluded.gross_pay_per_month,
            net_pay = excluded.net_pay",
    )?;

    stmt.execute(params![
        e.id.to_string(),
        e.start.format(TIMESTAMP_FORMAT).to_string(),
        e.finish.format(TIMESTAMP_FORMAT).to_string(),
        e.work_time_in_seconds,
        e.overtime_in_seconds,
        e.maximum_overtime_allowed_in_seconds,
        e.standard_worktime_in_seconds,
        e.gross_pay_per_month,
        e.calculated_net_pay,
        Local::now().to_rfc3339(),
    ])?;
    Ok(())
}

/// Returns the number of deleted rows.
pub fn delete_entry(conn: &Connection, id: &Uuid) -> Result<usize> {
    conn.execute("DELETE FROM entries WHERE id = ?1", [id.to_string()])
}

pub fn delete_all_entries(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM entries", [])
}

/// Entries whose `[start, finish]` intersects `[from, to]`, ordered by start.
pub fn load_entries(
    conn: &Connection,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
    ascending: bool,
    limit: Option<usize>,
) -> Result<Vec<Entry>> {
    let mut query = format!("SELECT {ENTRY_COLUMNS} FROM entries");
    let mut conditions = Vec::new();
    let mut args: Vec<String> = Vec::new();

    if let Some(f) = from {
        args.push(f.format(TIMESTAMP_FORMAT).to_string());
        conditions.push(format!("finish_time >= ?{}", args.len()));
    }
    if let Some(t) = to {
        args.push(t.format(TIMESTAMP_FORMAT).to_string());
        conditions.push(format!("start_time <= ?{}", args.len()));
    }

    if !conditions.is_empty() {
        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
    }

    query.push_str(if ascending {
        " ORDER BY start_time ASC"
    } else {
        " ORDER BY start_time DESC"
    });

    if let Some(n) = limit {
        query.push_str(&format!(" LIMIT {n}"));
    }

    let mut stmt = conn.prepare(&query)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
