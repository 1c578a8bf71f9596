use chrono::NaiveDate;
use garageledger::core::aggregate::{daily_totals, marketing_budget, monthly_totals};
use garageledger::core::ledger::Ledger;
use garageledger::models::month::YearMonth;
use garageledger::models::transaction::{IncomeDetails, TransactionDetails, TransactionRecord};
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn income(date: &str, amount: i64) -> TransactionRecord {
    TransactionRecord::new(
        Decimal::from(amount),
        d(date),
        None,
        TransactionDetails::Income(IncomeDetails::default()),
    )
}

fn expense(date: &str, amount: i64) -> TransactionRecord {
    TransactionRecord::new(
        Decimal::from(amount),
        d(date),
        None,
        TransactionDetails::Expense,
    )
}

#[test]
fn profitable_day_reserves_twenty_percent() {
    let ledger = Ledger::from_records([income("2024-01-05", 5000), expense("2024-01-05", 2000)]);

    let t = daily_totals(&ledger, d("2024-01-05"));
    assert_eq!(t.income, Decimal::from(5000));
    assert_eq!(t.expense, Decimal::from(2000));
    assert_eq!(t.gross_profit, Decimal::from(3000));
    assert_eq!(t.marketing_budget, Decimal::from(600));
    assert_eq!(t.net_profit, Decimal::from(2400));
}

#[test]
fn loss_day_has_no_marketing_budget() {
    let ledger = Ledger::from_records([income("2024-01-06", 1000), expense("2024-01-06", 3000)]);

    let t = daily_totals(&ledger, d("2024-01-06"));
    assert_eq!(t.gross_profit, Decimal::from(-2000));
    assert_eq!(t.marketing_budget, Decimal::ZERO);
    assert_eq!(t.net_profit, Decimal::from(-2000));
}

#[test]
fn monthly_budget_sums_daily_reserves() {
    // +3000 day and -2000 day: the month is +1000 but the budget stays 600.
    let ledger = Ledger::from_records([
        income("2024-01-05", 5000),
        expense("2024-01-05", 2000),
        income("2024-01-06", 1000),
        expense("2024-01-06", 3000),
        income("2024-02-01", 9999),
    ]);

    let m = monthly_totals(&ledger, YearMonth::parse("2024-01").unwrap());
    assert_eq!(m.totals.income, Decimal::from(6000));
    assert_eq!(m.totals.expense, Decimal::from(5000));
    assert_eq!(m.totals.gross_profit, Decimal::from(1000));
    assert_eq!(m.totals.marketing_budget, Decimal::from(600));
    assert_eq!(m.totals.net_profit, Decimal::from(400));
    assert_eq!(m.saved_date_count, 2);
}

#[test]
fn monthly_entries_count_on_the_first_of_the_month() {
    let rent = TransactionRecord::new(
        Decimal::from(1200),
        d("2024-03-17"),
        Some("rent".into()),
        TransactionDetails::MonthlyExpense {
            month: YearMonth::parse("2024-03").unwrap(),
        },
    );
    assert_eq!(rent.occurred_on, d("2024-03-01"));

    let ledger = Ledger::from_records([rent, income("2024-03-01", 2000)]);
    let t = daily_totals(&ledger, d("2024-03-01"));
    assert_eq!(t.gross_profit, Decimal::from(800));
    assert_eq!(t.marketing_budget, Decimal::from(160));
}

#[test]
fn empty_month_is_all_zeros() {
    let ledger = Ledger::from_records([income("2024-01-05", 100)]);

    let m = monthly_totals(&ledger, YearMonth::parse("2023-12").unwrap());
    assert_eq!(m.totals.income, Decimal::ZERO);
    assert_eq!(m.totals.marketing_budget, Decimal::ZERO);
    assert_eq!(m.saved_date_count, 0);
}

#[test]
fn budget_is_never_negative_and_exact() {
    assert_eq!(marketing_budget(Decimal::new(-1, 0)), Decimal::ZERO);
    assert_eq!(marketing_budget(Decimal::ZERO), Decimal::ZERO);
    assert_eq!(marketing_budget(Decimal::new(1001, 1)), Decimal::new(2002, 2));
}

#[test]
fn ledger_rejects_non_positive_amounts() {
    let mut ledger = Ledger::new();
    assert!(ledger.add_transaction(income("2024-01-05", 0)).is_none());
    assert!(ledger.add_transaction(expense("2024-01-05", -5)).is_none());
    assert!(ledger.is_empty());

    let id = ledger.add_transaction(income("2024-01-05", 10)).unwrap();
    assert_eq!(ledger.list_for_date(d("2024-01-05")).len(), 1);

    assert!(ledger.remove_transaction(d("2024-01-05"), &id).is_some());
    assert!(ledger.remove_transaction(d("2024-01-05"), &id).is_none());
    assert!(ledger.list_all().is_empty());
}
