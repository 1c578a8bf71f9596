use crate::cli::commands::date_arg;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::attachments::AttachmentStore;
use crate::core::projection::Action;
use crate::core::session::{CustomerInput, Session, TransactionDraft};
use crate::errors::AppResult;
use rust_decimal::Decimal;
use crate::models::customer::customer_key;
use crate::models::transaction::TransactionKind;
use crate::ui::messages::{info, success, warning};

fn action_for(kind: TransactionKind) -> Action {
    match kind {
        TransactionKind::Income => Action::AddIncome,
        TransactionKind::Expense => Action::AddExpense,
        TransactionKind::MonthlyIncome | TransactionKind::MonthlyExpense => Action::AddMonthly,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        date,
        kind,
        amount,
        note,
        customer,
        contact,
        channel,
        vehicle,
        registration,
        service,
        km,
        bill,
        discount,
    } = cmd
    {
        cfg.role.require(action_for(*kind))?;
        let d = date_arg(date)?;

        if *amount <= Decimal::ZERO {
            warning("Amount must be greater than zero: nothing was saved.");
            return Ok(());
        }

        let mut session = Session::open(cfg)?;
        let store = AttachmentStore::new(cfg.attachments_path());

        let mut draft = TransactionDraft::new(*kind, *amount, d);
        draft.note = note.clone();

        if *kind == TransactionKind::Income {
            draft.customer = customer.as_ref().map(|name| CustomerInput {
                name: name.clone(),
                contact: contact.clone().unwrap_or_default(),
                channel: channel.clone(),
            });
            draft.vehicle = vehicle.clone();
            draft.registration = registration.clone();
            draft.service_type = service.clone();
            draft.distance_km = *km;
            draft.discount = *discount;

            if let Some(path) = bill {
                let owner = match (customer, contact) {
                    (Some(n), Some(c)) => customer_key(n, c),
                    _ => "shop".to_string(),
                };

                match store.upload_file(path, &owner) {
                    Ok(stored) => draft.document = Some(stored),
                    Err(e) => warning(format!(
                        "Bill not attached ({}); the entry is saved without it.",
                        e
                    )),
                }
            }
        } else if customer.is_some() || service.is_some() || km.is_some() || bill.is_some() {
            warning("Customer, service and bill details only apply to income entries; ignored.");
        }

        let uploaded = draft.document.clone();

        let sub = match session.submit_transaction(draft) {
            Ok(Some(sub)) => sub,
            Ok(None) => {
                discard_upload(&store, uploaded.as_deref());
                warning("Amount must be greater than zero: nothing was saved.");
                return Ok(());
            }
            Err(e) => {
                discard_upload(&store, uploaded.as_deref());
                return Err(e);
            }
        };

        success(format!("Entry {} saved on {}", sub.id, sub.date));

        if let Some(res) = &sub.resolution {
            if res.is_new {
                info(format!("New customer registered with code {}", res.code));
            } else {
                info(format!("Returning customer {}", res.code));
            }

            if sub.offer_discount && discount.is_none() {
                info(format!(
                    "Offer the new-customer discount, then record it with `customer discount {} --state given|not-given`",
                    res.code
                ));
            }
        }

        if sub.decision_ignored {
            warning("This customer has no open discount entitlement; the decision was ignored.");
        }
    }

    Ok(())
}

/// A bill copied for an entry that was not saved.
fn discard_upload(store: &AttachmentStore, path: Option<&str>) {
    if let Some(p) = path
        && let Err(e) = store.remove(p)
    {
        warning(format!("Could not remove unused bill {}: {}", p, e));
    }
}
