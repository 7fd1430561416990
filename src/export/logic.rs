// src/export/logic.rs

use crate::core::{DutyStore, Engine};
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::{DutyExport, ExportFormat};
use crate::ui::messages::warning;
use chrono::NaiveDate;
use std::path::Path;

/// High-level export of the duty schedule.
pub struct ExportLogic;

impl ExportLogic {
    /// - `format`: csv | json
    /// - `file`: absolute path of the output file
    /// - `range`: inclusive date bounds, `None` for the whole archive
    pub fn export<S: DutyStore>(
        engine: &Engine<S>,
        format: &ExportFormat,
        file: &str,
        range: Option<(NaiveDate, NaiveDate)>,
        force: bool,
    ) -> AppResult<()> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let (start, end) = match range {
            Some(bounds) => bounds,
            None => whole_archive()?,
        };

        let rows: Vec<DutyExport> = engine
            .schedule(start, end)?
            .iter()
            .map(DutyExport::from)
            .collect();

        if rows.is_empty() {
            warning("No duties found for the selected range.");
            return Ok(());
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path),
            ExportFormat::Json => export_json(&rows, path),
        }
    }
}

/// Dates are stored as `YYYY-MM-DD`, so four-digit years cover everything.
fn whole_archive() -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(1, 1, 1);
    let last = NaiveDate::from_ymd_opt(9999, 12, 31);
    first
        .zip(last)
        .ok_or_else(|| AppError::InvalidDate("archive bounds".into()))
}
