use crate::cli::commands::{date_or_today, describe, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Complete { date } = cmd {
        let engine = open_engine(cfg)?;
        let date = date_or_today(date, &engine)?;
        let rec = engine.complete_duty(date)?;
        success(describe(&rec));
    }
    Ok(())
}
