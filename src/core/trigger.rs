//! Time-of-day driven entry point for cron.
//!
//! Both steps are idempotent, so the trigger may fire any number of times a
//! day; each step only runs once its configured time has passed.

use crate::core::engine::Engine;
use crate::core::store::DutyStore;
use crate::errors::AppResult;
use crate::models::DutyRecord;
use chrono::{NaiveDate, NaiveTime};

#[derive(Debug, Clone, Copy)]
pub struct TriggerSchedule {
    pub assign_at: NaiveTime,
    pub complete_at: NaiveTime,
}

#[derive(Debug, Default)]
pub struct TriggerReport {
    pub ensured: Option<DutyRecord>,
    pub completed: Option<DutyRecord>,
}

pub fn run_due<S: DutyStore>(
    engine: &Engine<S>,
    schedule: TriggerSchedule,
    date: NaiveDate,
    now: NaiveTime,
) -> AppResult<TriggerReport> {
    let mut report = TriggerReport::default();

    if now >= schedule.assign_at {
        report.ensured = Some(engine.ensure_duty(date)?);
    }
    if now >= schedule.complete_at {
        report.completed = Some(engine.complete_duty(date)?);
    }

    Ok(report)
}
