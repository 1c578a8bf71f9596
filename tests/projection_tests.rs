use chrono::NaiveDate;
use garageledger::core::aggregate::{Totals, monthly_totals};
use garageledger::core::ledger::Ledger;
use garageledger::core::projection::{
    Action, Field, project_monthly, project_totals, project_transaction,
};
use garageledger::models::month::YearMonth;
use garageledger::models::role::Role;
use garageledger::models::transaction::{
    CustomerRef, IncomeDetails, TransactionDetails, TransactionKind, TransactionRecord,
};
use rust_decimal::Decimal;

fn record() -> TransactionRecord {
    TransactionRecord::new(
        Decimal::from(2500),
        NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
        Some("brake pads".into()),
        TransactionDetails::Income(IncomeDetails {
            customer: Some(CustomerRef {
                name: "Sara".into(),
                contact: "0311".into(),
                code: Some("CUST0002".into()),
                channel: Some("Facebook".into()),
                discount: None,
            }),
            vehicle: Some("Civic".into()),
            registration: None,
            service_type: None,
            distance_km: Some(42_000),
            document: Some("cust/bill.jpg".into()),
        }),
    )
}

#[test]
fn owner_sees_everything() {
    let v = project_transaction(Role::Owner, &record());
    assert_eq!(v.amount, Some(Decimal::from(2500)));
    assert_eq!(v.customer_contact.as_deref(), Some("0311"));
    assert_eq!(v.document.as_deref(), Some("cust/bill.jpg"));
    assert_eq!(v.note.as_deref(), Some("brake pads"));
}

#[test]
fn staff_loses_amounts_and_contacts() {
    let v = project_transaction(Role::Staff, &record());
    assert_eq!(v.amount, None);
    assert_eq!(v.customer_contact, None);
    assert_eq!(v.document, None);
    assert_eq!(v.customer_name.as_deref(), Some("Sara"));
    assert_eq!(v.distance_km, Some(42_000));

    assert!(project_totals(Role::Staff, &Totals::default()).is_none());
}

#[test]
fn staff_may_only_add_income() {
    assert!(Role::Staff.can_add(TransactionKind::Income));
    assert!(!Role::Staff.can_add(TransactionKind::Expense));
    assert!(!Role::Staff.can_add(TransactionKind::MonthlyIncome));
    assert!(!Role::Staff.can(Action::DeleteEntry));
    assert!(!Role::Staff.sees(Field::Amount));
}

#[test]
fn editor_gets_daily_but_not_monthly_figures() {
    let ledger = Ledger::from_records([record()]);
    let month = monthly_totals(&ledger, YearMonth::parse("2024-05").unwrap());

    assert!(project_totals(Role::Editor, &month.totals).is_some());
    assert!(project_monthly(Role::Editor, &month).is_none());
    assert!(project_monthly(Role::Owner, &month).is_some());

    assert!(Role::Editor.can(Action::DeleteEntry));
    assert!(!Role::Editor.can(Action::ClearDate));
    assert!(!Role::Editor.can(Action::Export));
    assert!(!Role::Editor.can(Action::ManageEmployees));
    assert!(Role::Editor.require(Action::Import).is_err());
    assert!(Role::Owner.require(Action::Import).is_ok());
}
