use chrono::NaiveDate;
use garageledger::core::ledger::Ledger;
use garageledger::core::scheduler::{
    DEFAULT_INTERVAL_KM, SchedulerSettings, compute_predictions, default_interval_rules,
    days_for_distance, filter, service_interval, stats,
};
use garageledger::models::followup::FollowUpStatus;
use garageledger::models::transaction::{
    CustomerRef, IncomeDetails, TransactionDetails, TransactionRecord,
};
use rust_decimal::Decimal;
use std::collections::HashSet;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn service(
    date: &str,
    name: &str,
    contact: &str,
    note: Option<&str>,
    service_type: Option<&str>,
    km: Option<u32>,
) -> TransactionRecord {
    TransactionRecord::new(
        Decimal::from(1500),
        d(date),
        note.map(String::from),
        TransactionDetails::Income(IncomeDetails {
            customer: Some(CustomerRef {
                name: name.into(),
                contact: contact.into(),
                code: None,
                channel: None,
                discount: None,
            }),
            vehicle: Some("Corolla".into()),
            registration: Some("LEA-1234".into()),
            service_type: service_type.map(String::from),
            distance_km: km,
            document: None,
        }),
    )
}

fn ali() -> TransactionRecord {
    service(
        "2024-01-01",
        "Ali",
        "03001234567",
        Some("Oil Change"),
        None,
        Some(10_000),
    )
}

fn predict(ledger: &Ledger, today: &str) -> Vec<garageledger::models::followup::FollowUpPrediction> {
    let rules = default_interval_rules();
    let settings = SchedulerSettings {
        rules: &rules,
        default_interval_km: DEFAULT_INTERVAL_KM,
        today: d(today),
    };
    compute_predictions(ledger, &settings, &HashSet::new())
}

#[test]
fn oil_change_scenario() {
    let ledger = Ledger::from_records([ali()]);
    let preds = predict(&ledger, "2024-01-31");

    assert_eq!(preds.len(), 1);
    let p = &preds[0];
    assert_eq!(p.id, "ali-03001234567-2024-01-01");
    assert_eq!(p.last_service_type, "Oil Change");
    assert_eq!(p.next_service_distance, 15_000);
    assert_eq!(p.estimated_next_date, d("2024-02-10"));
    assert_eq!(p.days_until_due, 10);
    assert_eq!(p.status, FollowUpStatus::Upcoming);
}

#[test]
fn status_boundaries() {
    let ledger = Ledger::from_records([ali()]);

    let p = &predict(&ledger, "2024-02-10")[0];
    assert_eq!(p.days_until_due, 0);
    assert_eq!(p.status, FollowUpStatus::Overdue);

    let p = &predict(&ledger, "2024-02-03")[0];
    assert_eq!(p.days_until_due, 7);
    assert_eq!(p.status, FollowUpStatus::Due);

    let p = &predict(&ledger, "2024-02-02")[0];
    assert_eq!(p.days_until_due, 8);
    assert_eq!(p.status, FollowUpStatus::Upcoming);

    let p = &predict(&ledger, "2024-03-01")[0];
    assert!(p.days_until_due < 0);
    assert_eq!(p.status, FollowUpStatus::Overdue);
}

#[test]
fn keyword_table_first_match_wins() {
    let rules = default_interval_rules();
    assert_eq!(service_interval("  Engine OIL ", &rules, 7000), 5000);
    assert_eq!(service_interval("Timing belt replacement", &rules, 7000), 100_000);
    assert_eq!(service_interval("brake pads", &rules, 7000), 25_000);
    assert_eq!(service_interval("front brake check", &rules, 7000), 20_000);
    assert_eq!(service_interval("wheel alignment", &rules, 7000), 7000);
}

#[test]
fn interval_to_days_rounds_half_away_from_zero() {
    assert_eq!(days_for_distance(5000), 40);
    assert_eq!(days_for_distance(10_000), 80);
    assert_eq!(days_for_distance(3750), 30);
    // 625 km = 5.0 days exactly, 687 km = 5.496 → 5, 688 km = 5.504 → 6
    assert_eq!(days_for_distance(625), 5);
    assert_eq!(days_for_distance(687), 5);
    assert_eq!(days_for_distance(688), 6);
}

#[test]
fn latest_record_supersedes_older_ones() {
    let ledger = Ledger::from_records([
        ali(),
        service(
            "2024-03-01",
            "ali",
            "03001234567",
            None,
            Some("tires"),
            Some(14_000),
        ),
    ]);

    let preds = predict(&ledger, "2024-03-02");
    assert_eq!(preds.len(), 1);
    assert_eq!(preds[0].last_service_date, d("2024-03-01"));
    assert_eq!(preds[0].next_service_distance, 54_000);
}

#[test]
fn same_day_tie_goes_to_highest_distance() {
    let ledger = Ledger::from_records([
        service("2024-01-01", "Ali", "1", Some("oil"), None, Some(12_000)),
        service("2024-01-01", "Ali", "1", Some("oil"), None, Some(11_000)),
    ]);

    let preds = predict(&ledger, "2024-01-02");
    assert_eq!(preds.len(), 1);
    assert_eq!(preds[0].last_distance, 12_000);
}

#[test]
fn records_without_distance_or_service_are_skipped() {
    let ledger = Ledger::from_records([
        service("2024-01-01", "NoKm", "1", Some("oil"), None, None),
        service("2024-01-01", "NoNote", "2", None, None, Some(5000)),
        service("2024-01-01", "", "3", Some("oil"), None, Some(5000)),
    ]);

    assert!(predict(&ledger, "2024-01-02").is_empty());
}

#[test]
fn dismissed_predictions_are_hidden() {
    let ledger = Ledger::from_records([ali()]);
    let rules = default_interval_rules();
    let settings = SchedulerSettings {
        rules: &rules,
        default_interval_km: DEFAULT_INTERVAL_KM,
        today: d("2024-01-02"),
    };

    let mut dismissed = HashSet::new();
    dismissed.insert("ali-03001234567-2024-01-01".to_string());
    assert!(compute_predictions(&ledger, &settings, &dismissed).is_empty());
}

#[test]
fn predictions_are_sorted_and_filterable() {
    let ledger = Ledger::from_records([
        service("2024-01-01", "Zed", "9", Some("timing belt"), None, Some(1000)),
        ali(),
    ]);

    let preds = predict(&ledger, "2024-02-05");
    assert_eq!(preds[0].customer_name, "Ali");
    assert_eq!(preds[1].customer_name, "Zed");

    let s = stats(&preds);
    assert_eq!(s.total, 2);
    assert_eq!(s.due, 1);
    assert_eq!(s.upcoming, 1);

    assert_eq!(filter(&preds, Some(FollowUpStatus::Due), None).len(), 1);
    assert_eq!(filter(&preds, None, Some("zed")).len(), 1);
    assert_eq!(filter(&preds, None, Some("lea-1234")).len(), 2);
}
