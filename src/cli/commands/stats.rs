use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, RESET, colorize_optional};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { person } = cmd {
        let engine = open_engine(cfg)?;
        let p = engine.resolve_person(person)?;
        let stats = engine.person_stats(p.id)?;
        let window = engine.settings().fairness_window_days;

        let next = stats
            .next_duty
            .map(|d| d.to_string())
            .unwrap_or_else(|| "--".to_string());
        let off = stats
            .person
            .off_duty
            .map(|w| format!("{} → {}", w.start, w.end))
            .unwrap_or_else(|| "--".to_string());

        println!("📊 {} (id {})\n", stats.person.name, stats.person.id);
        println!("{CYAN}• Total duties:{RESET}       {}", stats.total_duties);
        println!("{CYAN}• This month:{RESET}         {}", stats.duties_this_month);
        println!("{CYAN}• Next duty:{RESET}          {}", colorize_optional(&next));
        println!(
            "{CYAN}• Last {} days:{RESET}       {} (volunteer/fair)",
            window, stats.fairness_count
        );
        println!(
            "{CYAN}• Queues:{RESET}             {} administrative, {} volunteer",
            stats.person.admin_queue_days, stats.person.volunteer_queue_days
        );
        println!("{CYAN}• Off duty:{RESET}           {}", colorize_optional(&off));
    }
    Ok(())
}
