use crate::cli::commands::open_engine;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::utils::date::month_bounds;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        month,
        force,
    } = cmd
    {
        let range = month.as_deref().map(month_bounds).transpose()?;
        let engine = open_engine(cfg)?;
        ExportLogic::export(&engine, format, file, range, *force)?;
    }
    Ok(())
}
