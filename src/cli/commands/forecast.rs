use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{GREY, RED, RESET, color_for_class};
use crate::utils::date::require_date;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Forecast { from, days } = cmd {
        let engine = open_engine(cfg)?;
        let start = match from {
            Some(s) => require_date(s)?,
            None => engine.today(),
        };

        let entries = engine.forecast(start, *days)?;

        header(format!("Forecast from {} ({} days)", start, days));
        for e in entries {
            match (&e.assignee_name, e.class) {
                (Some(name), Some(class)) => {
                    let marker = if e.projected { "" } else { " (recorded)" };
                    println!(
                        "{}  {:<20} {}{:<14}{}{GREY}{}{RESET}",
                        e.date,
                        name,
                        color_for_class(class),
                        class.label(),
                        RESET,
                        marker
                    );
                }
                _ => println!("{}  {RED}no eligible person{RESET}", e.date),
            }
        }
    }
    Ok(())
}
