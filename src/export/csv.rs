use crate::errors::AppResult;
use crate::export::model::EntryExport;
use std::path::Path;

/// Write rows as CSV, header included.
pub fn export_csv(rows: &[EntryExport], path: &Path) -> AppResult<()> {
    let mut wtr = ::csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    super::notify_export_success("CSV", path);
    Ok(())
}
