use chrono::NaiveDate;
use garageledger::core::ledger::Ledger;
use garageledger::core::registry::CustomerRegistry;
use garageledger::export::Snapshot;
use garageledger::models::month::YearMonth;
use garageledger::models::transaction::{
    CustomerRef, IncomeDetails, TransactionDetails, TransactionRecord,
};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sample() -> (Ledger, CustomerRegistry) {
    let mut reg = CustomerRegistry::new("CUST");
    let (res, _) = reg.resolve("Ali", "0300");

    let ledger = Ledger::from_records([
        TransactionRecord::new(
            Decimal::new(150050, 2),
            d("2024-01-01"),
            Some("oil change".into()),
            TransactionDetails::Income(IncomeDetails {
                customer: Some(CustomerRef {
                    name: "Ali".into(),
                    contact: "0300".into(),
                    code: Some(res.code),
                    channel: Some("walk-in".into()),
                    discount: Some(res.discount),
                }),
                distance_km: Some(10_000),
                ..Default::default()
            }),
        ),
        TransactionRecord::new(Decimal::from(300), d("2024-01-01"), None, TransactionDetails::Expense),
        TransactionRecord::new(
            Decimal::from(20_000),
            d("2024-02-01"),
            Some("rent".into()),
            TransactionDetails::MonthlyExpense {
                month: YearMonth::parse("2024-02").unwrap(),
            },
        ),
    ]);

    (ledger, reg)
}

#[test]
fn export_then_import_reproduces_ledger_and_codes() {
    let (ledger, reg) = sample();

    let json = Snapshot::build(&ledger, &reg).to_json().unwrap();
    let parsed = Snapshot::parse(&json).unwrap();
    assert_eq!(parsed.customer_codes, reg.codes());
    assert_eq!(parsed.customers, vec!["Ali".to_string()]);

    let validated = parsed.validate().unwrap();
    assert_eq!(Ledger::from_records(validated.records), ledger);

    let restored = CustomerRegistry::from_identities("CUST", validated.identities);
    assert_eq!(restored.codes(), reg.codes());
}

#[test]
fn invalid_json_is_rejected() {
    assert!(Snapshot::parse("{ not json").is_err());
    assert!(Snapshot::parse(r#"{"customers": []}"#).is_err());
}

#[test]
fn non_positive_amount_rejects_whole_snapshot() {
    let (ledger, reg) = sample();
    let json = Snapshot::build(&ledger, &reg)
        .to_json()
        .unwrap()
        .replace("\"300\"", "\"-300\"");

    assert!(Snapshot::parse(&json).unwrap().validate().is_err());
}

#[test]
fn misfiled_record_is_rejected() {
    let (ledger, reg) = sample();
    let mut snap = Snapshot::build(&ledger, &reg);

    let moved = snap.ledger.remove("2024-02-01").unwrap();
    snap.ledger.insert("2024-02-02".into(), moved);

    assert!(snap.validate().is_err());
}

#[test]
fn codes_map_alone_rebuilds_identities() {
    let (ledger, reg) = sample();
    let mut snap = Snapshot::build(&ledger, &reg);
    snap.registry.clear();

    let validated = snap.validate().unwrap();
    assert_eq!(validated.identities.len(), 1);
    assert_eq!(validated.identities[0].code, "CUST0001");
}
