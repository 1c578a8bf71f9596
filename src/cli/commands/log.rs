use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::core::projection::Action;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if matches!(cmd, Commands::Log { print: true }) {
        cfg.role.require(Action::Maintenance)?;

        let pool = DbPool::new(&cfg.database)?;
        LogLogic::print_log(&pool)?;
    }

    Ok(())
}
