use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{add_expense, add_income, gl, init_db, setup_test_db};

#[test]
fn test_staff_list_hides_amounts_and_contacts() {
    let db = setup_test_db("staff_list");
    init_db(&db);
    add_income(&db, "2024-04-02", "4500", "Ali", "03001234567");

    gl().args(["--db", &db, "--role", "staff", "list", "--period", "2024-04"])
        .assert()
        .success()
        .stdout(contains("Ali"))
        .stdout(contains("Rs ").not())
        .stdout(contains("03001234567").not());
}

#[test]
fn test_staff_can_add_income_only() {
    let db = setup_test_db("staff_add");
    init_db(&db);

    gl().args([
        "--db", &db, "--role", "staff", "add", "2024-04-02", "--amount", "100",
    ])
    .assert()
    .success();

    gl().args([
        "--db", &db, "--role", "staff", "add", "2024-04-02", "--kind", "expense", "--amount",
        "100",
    ])
    .assert()
    .failure()
    .stderr(contains("Not allowed for role 'staff'"));
}

#[test]
fn test_staff_has_no_summaries() {
    let db = setup_test_db("staff_summary");
    init_db(&db);

    gl().args(["--db", &db, "--role", "staff", "summary", "--date", "2024-04-02"])
        .assert()
        .failure()
        .stderr(contains("Not allowed"));
}

#[test]
fn test_editor_daily_but_not_monthly() {
    let db = setup_test_db("editor_summary");
    init_db(&db);
    add_expense(&db, "2024-04-02", "100");

    gl().args(["--db", &db, "--role", "editor", "summary", "--date", "2024-04-02"])
        .assert()
        .success()
        .stdout(contains("Rs 100"));

    gl().args(["--db", &db, "--role", "editor", "summary", "--month", "2024-04"])
        .assert()
        .failure()
        .stderr(contains("view monthly summaries"));
}

#[test]
fn test_editor_cannot_clear_or_export() {
    let db = setup_test_db("editor_clear");
    init_db(&db);
    add_expense(&db, "2024-04-02", "100");

    gl().args(["--db", &db, "--role", "editor", "del", "2024-04-02", "--yes"])
        .assert()
        .failure()
        .stderr(contains("clear a whole date"));

    gl().args([
        "--db", &db, "--role", "editor", "export", "--file", "/tmp/never_written.json",
    ])
    .assert()
    .failure()
    .stderr(contains("export data"));
}
