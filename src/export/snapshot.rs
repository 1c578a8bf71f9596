//! Whole-ledger JSON snapshot used by `export --format json` and `import`.

use crate::core::ledger::Ledger;
use crate::core::registry::CustomerRegistry;
use crate::errors::{AppError, AppResult};
use crate::models::customer::{CustomerIdentity, customer_key};
use crate::models::transaction::TransactionRecord;
use crate::utils::date::parse_date;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub exported_at: Option<String>,
    /// Distinct customer names, alphabetical.
    #[serde(default)]
    pub customers: Vec<String>,
    /// Registry key → customer code.
    #[serde(default)]
    pub customer_codes: BTreeMap<String, String>,
    #[serde(default)]
    pub registry: Vec<CustomerIdentity>,
    /// `YYYY-MM-DD` → records of that day.
    pub ledger: BTreeMap<String, Vec<TransactionRecord>>,
}

/// Snapshot content after validation, ready to replace the stores.
#[derive(Debug, Clone)]
pub struct ValidatedSnapshot {
    pub records: Vec<TransactionRecord>,
    pub identities: Vec<CustomerIdentity>,
}

impl Snapshot {
    pub fn build(ledger: &Ledger, registry: &CustomerRegistry) -> Self {
        let names: BTreeSet<String> = registry.list().iter().map(|c| c.name.clone()).collect();

        Self {
            exported_at: Some(Local::now().to_rfc3339()),
            customers: names.into_iter().collect(),
            customer_codes: registry.codes(),
            registry: registry.list().into_iter().cloned().collect(),
            ledger: ledger
                .list_all()
                .iter()
                .map(|(d, recs)| (d.format("%Y-%m-%d").to_string(), recs.clone()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot file. Any syntax or shape error rejects the whole file.
    pub fn parse(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| AppError::Import(format!("invalid JSON: {e}")))
    }

    /// Check every record and identity before anything is replaced.
    pub fn validate(self) -> AppResult<ValidatedSnapshot> {
        let mut records = Vec::new();
        let mut ids = HashSet::new();

        for (bucket, day) in self.ledger {
            let date: NaiveDate = parse_date(&bucket)
                .ok_or_else(|| AppError::Import(format!("invalid date bucket '{bucket}'")))?;

            for r in day {
                if r.amount <= Decimal::ZERO {
                    return Err(AppError::Import(format!(
                        "record {} on {} has a non-positive amount",
                        r.id, bucket
                    )));
                }
                if r.occurred_on != date {
                    return Err(AppError::Import(format!(
                        "record {} is dated {} but stored under {}",
                        r.id, r.occurred_on, bucket
                    )));
                }
                if let Some(m) = r.details.month()
                    && m.first_day() != date
                {
                    return Err(AppError::Import(format!(
                        "monthly record {} for {} must sit on {}",
                        r.id,
                        m,
                        m.first_day()
                    )));
                }
                if r.id.trim().is_empty() || !ids.insert(r.id.clone()) {
                    return Err(AppError::Import(format!("duplicate or empty id '{}'", r.id)));
                }
                records.push(r);
            }
        }

        let identities = Self::collect_identities(self.registry, &self.customer_codes, &records)?;

        Ok(ValidatedSnapshot {
            records,
            identities,
        })
    }

    /// Registry entries, plus entries rebuilt from `customer_codes` for
    /// snapshots that only carry the code map.
    fn collect_identities(
        registry: Vec<CustomerIdentity>,
        codes: &BTreeMap<String, String>,
        records: &[TransactionRecord],
    ) -> AppResult<Vec<CustomerIdentity>> {
        let mut out: BTreeMap<String, CustomerIdentity> = BTreeMap::new();
        let mut seen_codes = HashSet::new();

        for c in registry {
            if c.name.trim().is_empty() || c.contact.trim().is_empty() || c.code.trim().is_empty() {
                return Err(AppError::Import("registry entry without name, contact or code".into()));
            }
            if !seen_codes.insert(c.code.to_lowercase()) {
                return Err(AppError::Import(format!("customer code {} used twice", c.code)));
            }
            out.insert(c.key(), c);
        }

        for (key, code) in codes {
            if out.contains_key(key) || seen_codes.contains(&code.to_lowercase()) {
                continue;
            }

            let found = records
                .iter()
                .filter_map(|r| r.customer())
                .find(|c| customer_key(&c.name, &c.contact) == *key);

            if let Some(c) = found {
                seen_codes.insert(code.to_lowercase());
                out.insert(
                    key.clone(),
                    CustomerIdentity {
                        name: c.name.clone(),
                        contact: c.contact.clone(),
                        code: code.clone(),
                        discount: c.discount.unwrap_or_default(),
                        created_at: String::new(),
                    },
                );
            }
        }

        Ok(out.into_values().collect())
    }
}
