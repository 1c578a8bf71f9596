use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::projection::Action;
use crate::core::session::Session;
use crate::db::log::audit_quiet;
use crate::errors::AppResult;
use crate::export::csv::write_ledger_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::{ExportFormat, notify_export_success};
use crate::ui::messages::warning;
use crate::utils::date::parse_period;
use crate::utils::path::expand_tilde;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        period,
        force,
    } = cmd
    {
        cfg.role.require(Action::Export)?;

        let path = expand_tilde(file);
        ensure_writable(&path, *force)?;

        let session = Session::open(cfg)?;

        match format {
            ExportFormat::Json => {
                if period.is_some() {
                    warning("--period is ignored for JSON: the snapshot always holds the whole ledger.");
                }
                let json = session.export_snapshot().to_json()?;
                fs::write(&path, json)?;
            }
            ExportFormat::Csv => {
                let bounds = period.as_deref().map(parse_period).transpose()?;
                let rows = write_ledger_csv(&path, &session.ledger, bounds)?;
                if rows == 0 {
                    warning("No entries found for the selected range.");
                }
            }
        }

        audit_quiet(
            &session.pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!("{} export", format.as_str()),
        );
        notify_export_success(&format.as_str().to_uppercase(), &path);
    }

    Ok(())
}
