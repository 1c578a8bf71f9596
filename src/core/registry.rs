//! Customer identity registry: stable sequential codes and the one-time
//! new-customer discount entitlement.

use crate::errors::{AppError, AppResult};
use crate::models::customer::{CustomerIdentity, DiscountState, customer_key};
use chrono::Local;
use std::collections::HashMap;

pub const DEFAULT_CODE_PREFIX: &str = "CUST";
const CODE_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: String,
    pub is_new: bool,
    pub discount: DiscountState,
}

#[derive(Debug, Clone)]
pub struct CustomerRegistry {
    prefix: String,
    by_key: HashMap<String, CustomerIdentity>,
    /// Highest sequence ever handed out. Never decreases.
    last_seq: u32,
}

impl CustomerRegistry {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            by_key: HashMap::new(),
            last_seq: 0,
        }
    }

    /// Rebuild from persisted identities.
    pub fn from_identities<I>(prefix: &str, identities: I) -> Self
    where
        I: IntoIterator<Item = CustomerIdentity>,
    {
        let mut reg = Self::new(prefix);
        for c in identities {
            reg.insert_existing(c);
        }
        reg
    }

    /// Highest sequence handed out so far.
    pub fn last_sequence(&self) -> u32 {
        self.last_seq
    }

    /// Make sure future codes start above `seq` (persisted high-water mark).
    pub fn raise_floor(&mut self, seq: u32) {
        self.last_seq = self.last_seq.max(seq);
    }

    fn insert_existing(&mut self, identity: CustomerIdentity) {
        let seq = self.sequence_of(&identity.code).unwrap_or(0);
        self.by_key.insert(identity.key(), identity);
        self.last_seq = self.last_seq.max(seq).max(self.by_key.len() as u32);
    }

    /// Numeric suffix of a code, whatever its prefix.
    fn sequence_of(&self, code: &str) -> Option<u32> {
        let digits: String = code
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        digits.parse().ok()
    }

    fn format_code(&self, seq: u32) -> String {
        format!("{}{:0width$}", self.prefix, seq, width = CODE_WIDTH)
    }

    /// Look up `(name, contact)`; create the identity on first sight.
    ///
    /// Returns the resolution and, for a new identity, the created entry so
    /// the caller can persist it.
    pub fn resolve(&mut self, name: &str, contact: &str) -> (Resolution, Option<CustomerIdentity>) {
        let key = customer_key(name, contact);

        if let Some(existing) = self.by_key.get(&key) {
            return (
                Resolution {
                    code: existing.code.clone(),
                    is_new: false,
                    discount: existing.discount,
                },
                None,
            );
        }

        self.last_seq += 1;
        let identity = CustomerIdentity {
            name: name.trim().to_string(),
            contact: contact.trim().to_string(),
            code: self.format_code(self.last_seq),
            discount: DiscountState::default(),
            created_at: Local::now().to_rfc3339(),
        };

        self.by_key.insert(key, identity.clone());

        (
            Resolution {
                code: identity.code.clone(),
                is_new: true,
                discount: identity.discount,
            },
            Some(identity),
        )
    }

    /// Overwrite the stored discount state. The only mutator of an existing
    /// identity.
    pub fn set_discount_state(
        &mut self,
        name: &str,
        contact: &str,
        state: DiscountState,
    ) -> AppResult<&CustomerIdentity> {
        let key = customer_key(name, contact);
        let identity = self
            .by_key
            .get_mut(&key)
            .ok_or_else(|| AppError::CustomerNotFound(format!("{name} / {contact}")))?;

        identity.discount = state;
        Ok(identity)
    }

    pub fn get(&self, name: &str, contact: &str) -> Option<&CustomerIdentity> {
        self.by_key.get(&customer_key(name, contact))
    }

    pub fn find_by_code(&self, code: &str) -> Option<&CustomerIdentity> {
        self.by_key
            .values()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Identities ordered by code.
    pub fn list(&self) -> Vec<&CustomerIdentity> {
        let mut out: Vec<&CustomerIdentity> = self.by_key.values().collect();
        out.sort_by_key(|c| (self.sequence_of(&c.code).unwrap_or(u32::MAX), c.code.clone()));
        out
    }

    /// key → code, as written into snapshots.
    pub fn codes(&self) -> std::collections::BTreeMap<String, String> {
        self.by_key
            .iter()
            .map(|(k, c)| (k.clone(), c.code.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Whether the entry form should offer the new-customer discount.
/// The registry never decides that a discount was given.
pub fn should_offer_discount(resolution: &Resolution) -> bool {
    resolution.is_new || (resolution.discount.eligible && !resolution.discount.used)
}
