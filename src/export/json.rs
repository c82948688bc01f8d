use crate::errors::AppResult;
use crate::export::model::EntryExport;
use std::path::Path;

pub fn export_json(rows: &[EntryExport], path: &Path) -> AppResult<()> {
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, json)?;
    super::notify_export_success("JSON", path);
    Ok(())
}
