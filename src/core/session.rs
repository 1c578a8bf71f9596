//! One CLI invocation: load the stores from SQLite, apply one command,
//! flush the mutation.

use crate::config::Config;
use crate::core::ledger::Ledger;
use crate::core::registry::{CustomerRegistry, Resolution, should_offer_discount};
use crate::core::scheduler::{DEFAULT_INTERVAL_KM, SchedulerSettings, compute_predictions};
use crate::db::log::{audit, audit_quiet};
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries::{
    SETTING_CUSTOMER_SEQ, SETTING_DEFAULT_INTERVAL, delete_transaction,
    delete_transactions_for_date, get_setting, insert_dismissed, insert_transaction,
    load_customers, load_dismissed, load_transactions, replace_ledger_and_customers, set_setting,
    upsert_customer,
};
use crate::errors::{AppError, AppResult};
use crate::export::Snapshot;
use crate::models::customer::{CustomerIdentity, DiscountState};
use crate::models::followup::FollowUpPrediction;
use crate::models::month::YearMonth;
use crate::models::transaction::{
    CustomerRef, IncomeDetails, TransactionDetails, TransactionKind, TransactionRecord,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// What the operator decided about the new-customer discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DiscountDecision {
    /// Discount granted now; the entitlement is consumed.
    Given,
    /// Customer not entitled any more.
    NotGiven,
    /// Back to a fresh, unused entitlement.
    Reset,
}

impl DiscountDecision {
    pub fn state(&self) -> DiscountState {
        match self {
            DiscountDecision::Given => DiscountState {
                eligible: true,
                used: true,
                applied: true,
            },
            DiscountDecision::NotGiven => DiscountState {
                eligible: false,
                used: false,
                applied: false,
            },
            DiscountDecision::Reset => DiscountState::default(),
        }
    }
}

/// Customer fields typed on the entry form.
#[derive(Debug, Clone, Default)]
pub struct CustomerInput {
    pub name: String,
    pub contact: String,
    pub channel: Option<String>,
}

/// An entry before it becomes a record.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub customer: Option<CustomerInput>,
    pub vehicle: Option<String>,
    pub registration: Option<String>,
    pub service_type: Option<String>,
    pub distance_km: Option<u32>,
    pub document: Option<String>,
    pub discount: Option<DiscountDecision>,
}

impl TransactionDraft {
    pub fn new(kind: TransactionKind, amount: Decimal, date: NaiveDate) -> Self {
        Self {
            kind,
            amount,
            date,
            note: None,
            customer: None,
            vehicle: None,
            registration: None,
            service_type: None,
            distance_km: None,
            document: None,
            discount: None,
        }
    }
}

/// Outcome of an accepted entry.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: String,
    pub date: NaiveDate,
    pub resolution: Option<Resolution>,
    /// The entry form should offer the new-customer discount.
    pub offer_discount: bool,
    /// A discount decision was passed but no offer was due.
    pub decision_ignored: bool,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub struct Session {
    pub pool: DbPool,
    pub ledger: Ledger,
    pub registry: CustomerRegistry,
    pub dismissed: HashSet<String>,
    pub default_interval_km: u32,
}

impl Session {
    pub fn open(cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::new(&cfg.database)?;
        run_pending_migrations(&pool.conn)?;

        let ledger = Ledger::from_records(load_transactions(&pool.conn)?);

        let mut registry =
            CustomerRegistry::from_identities(&cfg.customer_code_prefix, load_customers(&pool.conn)?);
        if let Some(seq) = get_setting(&pool.conn, SETTING_CUSTOMER_SEQ)?
            .and_then(|s| s.parse::<u32>().ok())
        {
            registry.raise_floor(seq);
        }

        let dismissed = load_dismissed(&pool.conn)?;

        let default_interval_km = get_setting(&pool.conn, SETTING_DEFAULT_INTERVAL)?
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|km| *km > 0)
            .unwrap_or(DEFAULT_INTERVAL_KM);

        Ok(Self {
            pool,
            ledger,
            registry,
            dismissed,
            default_interval_km,
        })
    }

    /// Validate, resolve the customer, then store the record.
    ///
    /// `Ok(None)` means the amount was not positive and nothing changed.
    pub fn submit_transaction(&mut self, draft: TransactionDraft) -> AppResult<Option<Submission>> {
        if draft.amount <= Decimal::ZERO {
            return Ok(None);
        }

        let note = non_empty(draft.note);

        let (details, resolution, offer, ignored) = match draft.kind {
            TransactionKind::Income => {
                let mut resolution = None;
                let mut offer = false;
                let mut ignored = false;

                let customer = match draft.customer {
                    Some(input)
                        if !input.name.trim().is_empty() && !input.contact.trim().is_empty() =>
                    {
                        let (res, created) = self.registry.resolve(&input.name, &input.contact);
                        if let Some(identity) = &created {
                            self.persist_new_customer(identity)?;
                        }

                        offer = should_offer_discount(&res);
                        let mut snapshot = res.discount;

                        match draft.discount {
                            Some(decision) if offer => {
                                let state = decision.state();
                                let updated = self
                                    .registry
                                    .set_discount_state(&input.name, &input.contact, state)?
                                    .clone();
                                upsert_customer(&self.pool.conn, &updated)?;
                                snapshot = state;
                            }
                            Some(_) => ignored = true,
                            None => {}
                        }

                        let cref = CustomerRef {
                            name: input.name.trim().to_string(),
                            contact: input.contact.trim().to_string(),
                            code: Some(res.code.clone()),
                            channel: non_empty(input.channel),
                            discount: Some(snapshot),
                        };
                        resolution = Some(res);
                        Some(cref)
                    }
                    // Partial identity: kept on the record, never registered.
                    Some(input) if !input.name.trim().is_empty() => Some(CustomerRef {
                        name: input.name.trim().to_string(),
                        contact: input.contact.trim().to_string(),
                        code: None,
                        channel: non_empty(input.channel),
                        discount: None,
                    }),
                    _ => None,
                };

                let details = TransactionDetails::Income(IncomeDetails {
                    customer,
                    vehicle: non_empty(draft.vehicle),
                    registration: non_empty(draft.registration),
                    service_type: non_empty(draft.service_type),
                    distance_km: draft.distance_km,
                    document: non_empty(draft.document),
                });
                (details, resolution, offer, ignored)
            }
            TransactionKind::Expense => (TransactionDetails::Expense, None, false, false),
            TransactionKind::MonthlyIncome => (
                TransactionDetails::MonthlyIncome {
                    month: YearMonth::of(draft.date),
                },
                None,
                false,
                false,
            ),
            TransactionKind::MonthlyExpense => (
                TransactionDetails::MonthlyExpense {
                    month: YearMonth::of(draft.date),
                },
                None,
                false,
                false,
            ),
        };

        let record = TransactionRecord::new(draft.amount, draft.date, note, details);
        let date = record.occurred_on;
        let kind = record.kind();
        let amount = record.amount;

        insert_transaction(&self.pool.conn, &record)?;
        let Some(id) = self.ledger.add_transaction(record) else {
            return Ok(None);
        };

        audit_quiet(
            &self.pool.conn,
            "add",
            &id,
            &format!("{} {} on {}", kind, amount, date),
        );

        Ok(Some(Submission {
            id,
            date,
            resolution,
            offer_discount: offer,
            decision_ignored: ignored,
        }))
    }

    fn persist_new_customer(&self, identity: &CustomerIdentity) -> AppResult<()> {
        upsert_customer(&self.pool.conn, identity)?;
        set_setting(
            &self.pool.conn,
            SETTING_CUSTOMER_SEQ,
            &self.registry.last_sequence().to_string(),
        )?;
        audit_quiet(
            &self.pool.conn,
            "customer_new",
            &identity.code,
            &format!("{} / {}", identity.name, identity.contact),
        );
        Ok(())
    }

    pub fn remove_transaction(&mut self, date: NaiveDate, id: &str) -> AppResult<TransactionRecord> {
        let not_found = || AppError::TransactionNotFound {
            date: date.format("%Y-%m-%d").to_string(),
            id: id.to_string(),
        };

        if self.ledger.list_for_date(date).iter().all(|r| r.id != id) {
            return Err(not_found());
        }

        delete_transaction(&self.pool.conn, &date, id)?;
        let removed = self.ledger.remove_transaction(date, id).ok_or_else(not_found)?;

        audit_quiet(
            &self.pool.conn,
            "del",
            id,
            &format!("{} {} on {}", removed.kind(), removed.amount, date),
        );
        Ok(removed)
    }

    /// Delete every record of a date and return them.
    pub fn clear_date(&mut self, date: NaiveDate) -> AppResult<Vec<TransactionRecord>> {
        delete_transactions_for_date(&self.pool.conn, &date)?;
        let removed = self.ledger.clear_date(date);

        audit_quiet(
            &self.pool.conn,
            "clear",
            &date.format("%Y-%m-%d").to_string(),
            &format!("{} entries removed", removed.len()),
        );
        Ok(removed)
    }

    /// Overwrite a customer's discount state, looked up by code.
    pub fn set_discount(&mut self, code: &str, state: DiscountState) -> AppResult<CustomerIdentity> {
        let (name, contact) = self
            .registry
            .find_by_code(code)
            .map(|c| (c.name.clone(), c.contact.clone()))
            .ok_or_else(|| AppError::CustomerNotFound(code.to_string()))?;

        let updated = self
            .registry
            .set_discount_state(&name, &contact, state)?
            .clone();
        upsert_customer(&self.pool.conn, &updated)?;

        audit_quiet(
            &self.pool.conn,
            "discount",
            &updated.code,
            &format!(
                "eligible={} used={} applied={}",
                state.eligible, state.used, state.applied
            ),
        );
        Ok(updated)
    }

    pub fn predictions(&self, cfg: &Config, today: NaiveDate) -> Vec<FollowUpPrediction> {
        let settings = SchedulerSettings {
            rules: &cfg.service_intervals,
            default_interval_km: self.default_interval_km,
            today,
        };
        compute_predictions(&self.ledger, &settings, &self.dismissed)
    }

    /// Hide a prediction for good. Dismissing twice is harmless.
    pub fn dismiss_prediction(&mut self, cfg: &Config, id: &str, today: NaiveDate) -> AppResult<()> {
        if self.dismissed.contains(id) {
            return Ok(());
        }

        if !self.predictions(cfg, today).iter().any(|p| p.id == id) {
            return Err(AppError::FollowUpNotFound(id.to_string()));
        }

        insert_dismissed(&self.pool.conn, id)?;
        self.dismissed.insert(id.to_string());

        audit_quiet(&self.pool.conn, "followup_dismiss", id, "Follow-up dismissed");
        Ok(())
    }

    pub fn set_default_interval(&mut self, km: u32) -> AppResult<()> {
        if km == 0 {
            return Err(AppError::Validation(
                "the default interval must be greater than zero".into(),
            ));
        }

        set_setting(&self.pool.conn, SETTING_DEFAULT_INTERVAL, &km.to_string())?;
        self.default_interval_km = km;

        audit_quiet(
            &self.pool.conn,
            "followup_interval",
            "",
            &format!("Default interval set to {km} km"),
        );
        Ok(())
    }

    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot::build(&self.ledger, &self.registry)
    }

    /// Replace ledger and registry with the content of a snapshot file.
    /// Either everything is replaced or nothing is.
    pub fn import_snapshot(&mut self, text: &str) -> AppResult<usize> {
        let validated = Snapshot::parse(text)?.validate()?;

        let mut registry =
            CustomerRegistry::from_identities(self.registry.prefix(), validated.identities.clone());
        registry.raise_floor(self.registry.last_sequence());

        replace_ledger_and_customers(
            &mut self.pool.conn,
            &validated.records,
            &validated.identities,
            registry.last_sequence(),
        )?;

        let count = validated.records.len();
        self.ledger = Ledger::from_records(validated.records);
        self.registry = registry;

        audit(
            &self.pool.conn,
            "import",
            "",
            &format!(
                "{} entries, {} customers imported",
                count,
                self.registry.len()
            ),
        )?;
        Ok(count)
    }
}
