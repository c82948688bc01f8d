use crate::core::repository::{EntryRepository, fetch_period};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::csv::export_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::json::export_json;
use crate::export::model::EntryExport;
use crate::models::period::Period;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Export the entries of `period` (every entry when `None`) to `file`.
    /// Returns the number of rows written.
    pub fn export(
        repo: &dyn EntryRepository,
        format: ExportFormat,
        file: &str,
        period: Option<&Period>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if path.is_dir() {
            return Err(AppError::Export(format!("{file} is a directory")));
        }

        ensure_writable(path, force)?;

        let entries = match period {
            Some(p) => fetch_period(repo, p)?,
            None => repo.fetch(None, None, true, None)?,
        };

        if entries.is_empty() {
            warning("No entries found for the selected period.");
            return Ok(0);
        }

        let rows: Vec<EntryExport> = entries.iter().map(EntryExport::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repository::MemoryEntryRepository;
    use crate::models::entry::Entry;
    use crate::models::settings::Settings;
    use chrono::NaiveDate;

    fn repo_with_entries() -> MemoryEntryRepository {
        let repo = MemoryEntryRepository::new();
        let settings = Settings {
            gross_pay_per_month: 8_800,
            ..Settings::default()
        };
        for day in [6, 7, 20] {
            let date = NaiveDate::from_ymd_opt(2023, 11, day).unwrap();
            let e = Entry::from_interval(
                date.and_hms_opt(9, 0, 0).unwrap(),
                date.and_hms_opt(17, 0, 0).unwrap(),
                &settings,
            )
            .unwrap();
            repo.save(&e).unwrap();
        }
        repo
    }

    #[test]
    fn csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.csv");
        let repo = repo_with_entries();

        let n = ExportLogic::export(&repo, ExportFormat::Csv, file.to_str().unwrap(), None, false)
            .unwrap();
        assert_eq!(n, 3);

        let content = std::fs::read_to_string(&file).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("id,date,start,finish"));
        assert_eq!(lines.count(), 3);
        assert!(content.contains(",400.0,"));
    }

    #[test]
    fn json_respects_period() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.json");
        let repo = repo_with_entries();
        let week = Period::new(
            NaiveDate::from_ymd_opt(2023, 11, 6).unwrap(),
            NaiveDate::from_ymd_opt(2023, 11, 12).unwrap(),
        );

        let n = ExportLogic::export(
            &repo,
            ExportFormat::Json,
            file.to_str().unwrap(),
            Some(&week),
            false,
        )
        .unwrap();
        assert_eq!(n, 2);

        let rows: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["date"], "2023-11-06");
        assert_eq!(rows[0]["work_time_in_seconds"], 8 * 3600);
    }

    #[test]
    fn empty_selection_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("none.csv");
        let repo = MemoryEntryRepository::new();
        let n = ExportLogic::export(&repo, ExportFormat::Csv, file.to_str().unwrap(), None, false)
            .unwrap();
        assert_eq!(n, 0);
        assert!(!file.exists());
    }
}
