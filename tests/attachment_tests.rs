use chrono::NaiveDate;
use garageledger::core::attachments::AttachmentStore;
use garageledger::core::ledger::Ledger;
use garageledger::models::transaction::{IncomeDetails, TransactionDetails, TransactionRecord};
use rust_decimal::Decimal;
use std::env;
use std::fs;
use std::path::PathBuf;

fn store_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("{}_garageledger_attachments", name));
    fs::remove_dir_all(&dir).ok();
    dir
}

fn with_bill(date: &str, document: &str) -> TransactionRecord {
    TransactionRecord::new(
        Decimal::from(1000),
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        None,
        TransactionDetails::Income(IncomeDetails {
            document: Some(document.to_string()),
            ..Default::default()
        }),
    )
}

#[test]
fn same_file_name_uploads_never_overwrite() {
    let store = AttachmentStore::new(store_dir("same_name"));

    let a = store.upload(b"first bill", "ali-0300", "bill.jpg").unwrap();
    let b = store.upload(b"second bill", "ali-0300", "bill.jpg").unwrap();

    assert_ne!(a, b);
    assert!(a.starts_with("ali-0300/") && a.ends_with("-bill.jpg"));
    assert_eq!(fs::read(store.root().join(&a)).unwrap(), b"first bill");
    assert_eq!(fs::read(store.root().join(&b)).unwrap(), b"second bill");
}

#[test]
fn access_url_rejects_lifetimes_out_of_range() {
    let store = AttachmentStore::new(store_dir("ttl_range"));

    let url = store.access_url("ali-0300/x.jpg", 60).unwrap();
    assert!(url.starts_with("file://"));
    assert!(url.contains("?expires="));

    assert!(store.access_url("ali-0300/x.jpg", 9_000_000_000_000).is_err());
    assert!(store.access_url("ali-0300/x.jpg", i64::MAX).is_err());
}

#[test]
fn release_keeps_bills_still_referenced() {
    let store = AttachmentStore::new(store_dir("release"));

    let shared = store.upload(b"shared", "ali-0300", "bill.jpg").unwrap();
    let orphan = store.upload(b"orphan", "ali-0300", "bill.jpg").unwrap();

    let kept = with_bill("2024-05-02", &shared);
    let ledger = Ledger::from_records([kept]);

    let removed = vec![with_bill("2024-05-01", &shared), with_bill("2024-05-01", &orphan)];
    let released = store.release_unreferenced(&ledger, &removed).unwrap();

    assert_eq!(released, 1);
    assert!(store.root().join(&shared).exists());
    assert!(!store.root().join(&orphan).exists());

    // Removing a file twice is harmless.
    store.remove(&orphan).unwrap();
}
