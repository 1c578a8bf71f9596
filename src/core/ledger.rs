//! Date-keyed in-memory transaction store.

use crate::models::transaction::TransactionRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    buckets: BTreeMap<NaiveDate, Vec<TransactionRecord>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from already-validated records, keeping their order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TransactionRecord>,
    {
        let mut ledger = Self::new();
        for r in records {
            ledger.buckets.entry(r.occurred_on).or_default().push(r);
        }
        ledger
    }

    /// Append a record to its date bucket.
    ///
    /// Returns `None` when the amount is not positive: the record is dropped
    /// and the ledger is left untouched.
    pub fn add_transaction(&mut self, record: TransactionRecord) -> Option<String> {
        if record.amount <= Decimal::ZERO {
            return None;
        }

        let id = record.id.clone();
        self.buckets
            .entry(record.occurred_on)
            .or_default()
            .push(record);
        Some(id)
    }

    /// Remove one record. Returns the removed record, if any.
    pub fn remove_transaction(&mut self, date: NaiveDate, id: &str) -> Option<TransactionRecord> {
        let bucket = self.buckets.get_mut(&date)?;
        let pos = bucket.iter().position(|r| r.id == id)?;
        let removed = bucket.remove(pos);

        if bucket.is_empty() {
            self.buckets.remove(&date);
        }
        Some(removed)
    }

    /// Drop every record of a date bucket and return them.
    pub fn clear_date(&mut self, date: NaiveDate) -> Vec<TransactionRecord> {
        self.buckets.remove(&date).unwrap_or_default()
    }

    pub fn list_for_date(&self, date: NaiveDate) -> &[TransactionRecord] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn list_all(&self) -> &BTreeMap<NaiveDate, Vec<TransactionRecord>> {
        &self.buckets
    }

    /// All records, date ascending, insertion order within a date.
    pub fn iter(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.buckets.values().flatten()
    }

    /// Records whose bucket lies in `[from, to]`.
    pub fn range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Iterator<Item = (&NaiveDate, &Vec<TransactionRecord>)> {
        self.buckets.range(from..=to)
    }

    pub fn find(&self, id: &str) -> Option<&TransactionRecord> {
        self.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
