//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use chrono::NaiveDate;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Persistence
    // ---------------------------
    #[error("Persistence failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    /// A duty write and its queue decrement did not land together.
    #[error("Inconsistent state: {0}")]
    Inconsistency(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid priority class: {0}")]
    InvalidClass(String),

    // ---------------------------
    // Engine errors
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No eligible person for {0}")]
    NoEligibleUser(NaiveDate),

    #[error("Could not relocate the administrative duty of {date} within {horizon} days")]
    RelocationFailed { date: NaiveDate, horizon: u32 },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;
