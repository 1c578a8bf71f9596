use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attachments::AttachmentStore;
use crate::core::projection::{Action, Field};
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Bill { id, ttl_minutes } = cmd {
        cfg.role.require(Action::ViewEntries)?;
        if !cfg.role.sees(Field::Document) {
            return Err(AppError::PermissionDenied {
                role: cfg.role.to_string(),
                action: "open attached bills".to_string(),
            });
        }

        let session = Session::open(cfg)?;
        let record = session
            .ledger
            .find(id)
            .ok_or_else(|| AppError::Validation(format!("no entry with id {id}")))?;

        match record.income().and_then(|d| d.document.as_deref()) {
            Some(path) => {
                let store = AttachmentStore::new(cfg.attachments_path());
                println!("{}", store.access_url(path, *ttl_minutes)?);
            }
            None => info(format!("Entry {} has no attached bill.", id)),
        }
    }

    Ok(())
}
