use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::DutyRecord;
use crate::ui::messages::info;
use crate::utils::colors::{GREY, RESET, color_for_class};
use crate::utils::date::{current_month_bounds, month_bounds};
use chrono::Datelike;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Schedule { month, json } = cmd {
        let engine = open_engine(cfg)?;
        let (start, end) = match month {
            Some(ym) => month_bounds(ym)?,
            None => current_month_bounds(engine.today()),
        };

        let duties = engine.schedule(start, end)?;

        if *json {
            let out = serde_json::to_string_pretty(&duties)
                .map_err(|e| AppError::Export(e.to_string()))?;
            println!("{}", out);
        } else if duties.is_empty() {
            info(format!("No duties recorded from {} to {}.", start, end));
        } else {
            print_schedule(&duties);
        }
    }
    Ok(())
}

fn print_schedule(duties: &[DutyRecord]) {
    println!(
        "{:<10}  {:<3}  {:<20}  {:<14}  {}",
        "DATE", "DAY", "ASSIGNEE", "CLASS", "STATUS"
    );
    println!("{}", "-".repeat(60));

    for d in duties {
        let status = if d.is_completed() {
            "done".to_string()
        } else {
            format!("{GREY}open{RESET}")
        };
        println!(
            "{:<10}  {:<3}  {:<20}  {}{:<14}{}  {}",
            d.date,
            d.date.weekday(),
            d.assignee_name,
            color_for_class(d.class),
            d.class.label(),
            RESET,
            status
        );
    }
}
