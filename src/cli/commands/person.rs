use crate::cli::commands::open_engine;
use crate::cli::parser::{Commands, PersonAction};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::Person;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Person { action } = cmd else {
        return Ok(());
    };
    let engine = open_engine(cfg)?;

    match action {
        PersonAction::Add { name, admin } => {
            let p = engine.register_person(name, *admin)?;
            success(format!("Registered {} (id {})", p.name, p.id));
        }
        PersonAction::List { all, json } => {
            let persons = engine.list_persons(*all)?;
            if *json {
                let out = serde_json::to_string_pretty(&persons)
                    .map_err(|e| AppError::Export(e.to_string()))?;
                println!("{}", out);
            } else if persons.is_empty() {
                info("No persons registered.");
            } else {
                print_persons(&persons);
            }
        }
        PersonAction::Activate { person } => {
            let p = engine.resolve_person(person)?;
            let p = engine.set_active(p.id, true)?;
            success(format!("{} is active", p.name));
        }
        PersonAction::Deactivate { person } => {
            let p = engine.resolve_person(person)?;
            let p = engine.set_active(p.id, false)?;
            success(format!("{} is inactive", p.name));
        }
        PersonAction::Admin { person, revoke } => {
            let p = engine.resolve_person(person)?;
            let p = engine.set_admin(p.id, !*revoke)?;
            if p.is_admin {
                success(format!("{} is now an administrator", p.name));
            } else {
                success(format!("{} is no longer an administrator", p.name));
            }
        }
    }

    Ok(())
}

fn print_persons(persons: &[Person]) {
    let mut table = Table::with_headers(&[
        ("ID", 4),
        ("NAME", 20),
        ("ADMIN", 5),
        ("ACTIVE", 6),
        ("ADM.Q", 5),
        ("VOL.Q", 5),
        ("OFF DUTY", 23),
    ]);

    for p in persons {
        let off = p
            .off_duty
            .map(|w| format!("{} → {}", w.start, w.end))
            .unwrap_or_else(|| "--".to_string());
        table.add_row(vec![
            p.id.to_string(),
            p.name.clone(),
            yes_no(p.is_admin).to_string(),
            yes_no(p.is_active).to_string(),
            p.admin_queue_days.to_string(),
            p.volunteer_queue_days.to_string(),
            off,
        ]);
    }

    print!("{}", table.render());
    println!("{GREY}{} person(s){RESET}", persons.len());
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
