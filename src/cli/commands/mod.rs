pub mod assign;
pub mod claim;
pub mod complete;
pub mod config;
pub mod db;
pub mod ensure;
pub mod export;
pub mod forecast;
pub mod init;
pub mod log;
pub mod off_duty;
pub mod person;
pub mod queue;
pub mod schedule;
pub mod stats;
pub mod trigger;

use crate::config::Config;
use crate::core::Engine;
use crate::db::SqliteStore;
use crate::errors::AppResult;
use crate::models::DutyRecord;
use crate::utils::colors::{GREY, RESET, color_for_class};
use crate::utils::date::require_date;
use chrono::NaiveDate;

/// Open the configured database and wrap it in an engine.
pub(crate) fn open_engine(cfg: &Config) -> AppResult<Engine<SqliteStore>> {
    let store = SqliteStore::open(&cfg.database)?;
    let engine = Engine::new(store, cfg.engine_settings());
    Ok(match cfg.today {
        Some(today) => engine.with_today(today),
        None => engine,
    })
}

/// Parse an optional date argument, falling back to the engine's today.
pub(crate) fn date_or_today(
    arg: &Option<String>,
    engine: &Engine<SqliteStore>,
) -> AppResult<NaiveDate> {
    match arg {
        Some(s) => require_date(s),
        None => Ok(engine.today()),
    }
}

/// One-line, coloured description of a duty record.
pub(crate) fn describe(rec: &DutyRecord) -> String {
    let status = if rec.is_completed() {
        "done".to_string()
    } else {
        format!("{GREY}open{RESET}")
    };
    format!(
        "{} → {} [{}{}{}] {}",
        rec.date,
        rec.assignee_name,
        color_for_class(rec.class),
        rec.class.label(),
        RESET,
        status
    )
}
