use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{add_expense, add_income, gl, init_db, run_ok, setup_test_db};

#[test]
fn test_add_and_daily_summary() {
    let db = setup_test_db("add_and_daily_summary");
    init_db(&db);

    add_income(&db, "2024-01-05", "5000", "Ali", "03001234567");
    add_expense(&db, "2024-01-05", "2000");

    gl().args(["--db", &db, "summary", "--date", "2024-01-05"])
        .assert()
        .success()
        .stdout(contains("Rs 5000"))
        .stdout(contains("Rs 3000"))
        .stdout(contains("Rs 600"))
        .stdout(contains("Rs 2400"));
}

#[test]
fn test_loss_day_summary() {
    let db = setup_test_db("loss_day_summary");
    init_db(&db);

    add_income(&db, "2024-01-06", "1000", "Ali", "0300");
    add_expense(&db, "2024-01-06", "3000");

    gl().args(["--db", &db, "summary", "--date", "2024-01-06"])
        .assert()
        .success()
        .stdout(contains("Rs -2000"))
        .stdout(contains("Rs 0"));
}

#[test]
fn test_monthly_summary_counts_saved_dates() {
    let db = setup_test_db("monthly_summary");
    init_db(&db);

    add_income(&db, "2024-01-05", "5000", "Ali", "0300");
    add_expense(&db, "2024-01-05", "2000");
    add_income(&db, "2024-01-20", "1000", "Sara", "0311");

    gl().args(["--db", &db, "summary", "--month", "2024-01"])
        .assert()
        .success()
        .stdout(contains("Summary for 2024-01"))
        .stdout(contains("Rs 4000"))
        .stdout(contains("Rs 800"))
        .stdout(contains("Saved dates:"));
}

#[test]
fn test_non_positive_amount_is_a_noop() {
    let db = setup_test_db("non_positive_amount");
    init_db(&db);

    gl().args(["--db", &db, "add", "2024-01-05", "--kind", "expense", "--amount", "0"])
        .assert()
        .success()
        .stdout(contains("nothing was saved"));

    gl().args(["--db", &db, "list", "--period", "2024-01"])
        .assert()
        .success()
        .stdout(contains("No entries"));
}

#[test]
fn test_list_shows_entries_in_period() {
    let db = setup_test_db("list_period");
    init_db(&db);

    add_income(&db, "2024-08-31", "1200", "Ali", "0300");
    add_income(&db, "2024-09-15", "800", "Sara", "0311");
    add_expense(&db, "2023-09-10", "50");

    gl().args(["--db", &db, "list", "--period", "2024-08:2024-09"])
        .assert()
        .success()
        .stdout(contains("2024-08-31"))
        .stdout(contains("2024-09-15"))
        .stdout(contains("2023-09-10").not());
}

#[test]
fn test_customer_codes_are_sequential_and_stable() {
    let db = setup_test_db("customer_codes");
    init_db(&db);

    let out = run_ok(&[
        "--db", &db, "add", "2024-01-05", "--amount", "100", "--customer", "Ali", "--contact",
        "0300",
    ]);
    assert!(out.contains("New customer registered with code CUST0001"));

    let out = run_ok(&[
        "--db", &db, "add", "2024-01-05", "--amount", "100", "--customer", "Sara", "--contact",
        "0311",
    ]);
    assert!(out.contains("CUST0002"));

    let out = run_ok(&[
        "--db", &db, "add", "2024-01-06", "--amount", "100", "--customer", "ALI", "--contact",
        "0300",
    ]);
    assert!(out.contains("Returning customer CUST0001"));

    // Deleting every entry does not free the codes.
    gl().args(["--db", &db, "del", "2024-01-05", "--yes"])
        .assert()
        .success();
    gl().args(["--db", &db, "del", "2024-01-06", "--yes"])
        .assert()
        .success();

    let out = run_ok(&[
        "--db", &db, "add", "2024-01-07", "--amount", "100", "--customer", "Bob", "--contact",
        "0322",
    ]);
    assert!(out.contains("CUST0003"));
}

#[test]
fn test_delete_single_entry() {
    let db = setup_test_db("delete_single");
    init_db(&db);

    let keep = add_expense(&db, "2024-02-01", "10");
    let drop = add_expense(&db, "2024-02-01", "20");

    gl().args(["--db", &db, "del", "2024-02-01", "--id", &drop, "--yes"])
        .assert()
        .success()
        .stdout(contains("has been deleted"));

    gl().args(["--db", &db, "list", "--period", "2024-02-01"])
        .assert()
        .success()
        .stdout(contains(keep.as_str()))
        .stdout(contains(drop.as_str()).not());

    gl().args(["--db", &db, "del", "2024-02-01", "--id", &drop, "--yes"])
        .assert()
        .failure()
        .stderr(contains("No transaction"));
}

#[test]
fn test_discount_offer_and_decision() {
    let db = setup_test_db("discount_decision");
    init_db(&db);

    let out = run_ok(&[
        "--db", &db, "add", "2024-01-05", "--amount", "100", "--customer", "Ali", "--contact",
        "0300",
    ]);
    assert!(out.contains("Offer the new-customer discount"));

    gl().args(["--db", &db, "customer", "discount", "CUST0001", "--state", "given"])
        .assert()
        .success()
        .stdout(contains("applied"));

    let out = run_ok(&[
        "--db", &db, "add", "2024-01-09", "--amount", "100", "--customer", "Ali", "--contact",
        "0300",
    ]);
    assert!(!out.contains("Offer the new-customer discount"));

    gl().args(["--db", &db, "customer", "list"])
        .assert()
        .success()
        .stdout(contains("CUST0001"))
        .stdout(contains("applied"));
}

#[test]
fn test_invalid_date_fails() {
    let db = setup_test_db("invalid_date");
    init_db(&db);

    gl().args(["--db", &db, "add", "2024-13-40", "--amount", "10"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}
