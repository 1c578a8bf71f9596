use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::core::projection::Action;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        cfg.role.require(Action::Backup)?;

        let pool = DbPool::new(&cfg.database)?;
        BackupLogic::backup(&pool, cfg, file, *compress, *force)?;
    }

    Ok(())
}
