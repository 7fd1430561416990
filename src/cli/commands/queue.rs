use crate::cli::commands::open_engine;
use crate::cli::parser::{Commands, QueueAction};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::QueueClass;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Queue { action } = cmd else {
        return Ok(());
    };
    let engine = open_engine(cfg)?;

    match action {
        QueueAction::Add {
            person,
            class,
            days,
        } => {
            let class = QueueClass::from_code(class)?;
            let p = engine.resolve_person(person)?;
            let total = engine.add_to_queue(p.id, class, *days)?;
            success(format!(
                "{}: +{} {} day(s), {} queued",
                p.name, days, class, total
            ));
        }
        QueueAction::Show => {
            let persons = engine.list_persons(false)?;
            if persons.is_empty() {
                info("No active persons.");
                return Ok(());
            }

            let mut table = Table::with_headers(&[
                ("NAME", 20),
                ("ADMINISTRATIVE", 14),
                ("VOLUNTEER", 9),
                ("OFF DUTY", 23),
            ]);
            for p in &persons {
                table.add_row(vec![
                    p.name.clone(),
                    p.admin_queue_days.to_string(),
                    p.volunteer_queue_days.to_string(),
                    p.off_duty
                        .map(|w| format!("{} → {}", w.start, w.end))
                        .unwrap_or_else(|| "--".to_string()),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
