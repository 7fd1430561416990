use crate::cli::commands::{describe, open_engine};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::require_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Assign { date, person } = cmd {
        let date = require_date(date)?;
        let engine = open_engine(cfg)?;
        let p = engine.resolve_person(person)?;
        let rec = engine.admin_override(date, p.id)?;
        success(describe(&rec));
    }
    Ok(())
}
