use crate::cli::commands::open_engine;
use crate::cli::parser::{Commands, OffDutyAction};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::date::require_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::OffDuty { action } = cmd else {
        return Ok(());
    };
    let engine = open_engine(cfg)?;

    match action {
        OffDutyAction::Set { person, start, end } => {
            let start = require_date(start)?;
            let end = require_date(end)?;
            let p = engine.resolve_person(person)?;
            let window = engine.set_off_duty(p.id, start, end)?;
            success(format!(
                "{} is off duty from {} to {}",
                p.name, window.start, window.end
            ));
        }
        OffDutyAction::Clear { person } => {
            let p = engine.resolve_person(person)?;
            engine.clear_off_duty(p.id)?;
            success(format!("{} is back on duty", p.name));
        }
    }

    Ok(())
}
