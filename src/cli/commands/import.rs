use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::projection::Action;
use crate::core::session::Session;
use crate::db::log::audit_quiet;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        cfg.role.require(Action::Import)?;

        let path = expand_tilde(file);
        let mut session = Session::open(cfg)?;

        let result = fs::read_to_string(&path)
            .map_err(Into::into)
            .and_then(|text| session.import_snapshot(&text));

        match result {
            Ok(count) => {
                success(format!(
                    "Imported {} entries and {} customers from {}",
                    count,
                    session.registry.len(),
                    path.display()
                ));
            }
            Err(e) => {
                audit_quiet(
                    &session.pool.conn,
                    "import_rejected",
                    &path.to_string_lossy(),
                    &e.to_string(),
                );
                return Err(e);
            }
        }
    }

    Ok(())
}
