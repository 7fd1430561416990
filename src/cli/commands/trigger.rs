use crate::cli::commands::{describe, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::trigger::run_due;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Trigger) {
        let engine = open_engine(cfg)?;
        let schedule = cfg.trigger_schedule()?;
        let report = run_due(&engine, schedule, engine.today(), Local::now().time())?;

        match (&report.ensured, &report.completed) {
            (_, Some(done)) => success(format!("Completed: {}", describe(done))),
            (Some(rec), None) => success(format!("Assigned: {}", describe(rec))),
            (None, None) => info(format!(
                "Nothing due before {}",
                schedule.assign_at.format("%H:%M")
            )),
        }
    }
    Ok(())
}
