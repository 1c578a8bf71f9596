use crate::cli::commands::date_arg;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attachments::AttachmentStore;
use crate::core::projection::Action;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::export::fs_utils::confirm;
use crate::models::transaction::TransactionRecord;
use crate::ui::messages::{info, success, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { date, id, yes } = cmd {
        let d = date_arg(date)?;

        match id {
            Some(id) => {
                cfg.role.require(Action::DeleteEntry)?;

                if !*yes {
                    warning(format!("Delete entry {} on {}? This cannot be undone.", id, d));
                    if !confirm("Confirm")? {
                        info("Operation cancelled.");
                        return Ok(());
                    }
                }

                let mut session = Session::open(cfg)?;
                let removed = session.remove_transaction(d, id)?;
                success(format!("Entry {} on {} has been deleted.", id, d));
                release_bills(cfg, &session, &[removed]);
            }
            None => {
                cfg.role.require(Action::ClearDate)?;

                if !*yes {
                    warning(format!("Delete ALL entries for {}? This cannot be undone.", d));
                    if !confirm("Confirm")? {
                        info("Operation cancelled.");
                        return Ok(());
                    }
                }

                let mut session = Session::open(cfg)?;
                let removed = session.clear_date(d)?;
                if removed.is_empty() {
                    info(format!("No entries for {}.", d));
                } else {
                    success(format!("{} entries for {} have been deleted.", removed.len(), d));
                    release_bills(cfg, &session, &removed);
                }
            }
        }
    }

    Ok(())
}

/// Drop attached bills nothing points to any more. The entries are already
/// gone, so a failure here is only reported.
fn release_bills(cfg: &Config, session: &Session, removed: &[TransactionRecord]) {
    let store = AttachmentStore::new(cfg.attachments_path());
    if let Err(e) = store.release_unreferenced(&session.ledger, removed) {
        warning(format!("Attached bill not removed: {}", e));
    }
}
