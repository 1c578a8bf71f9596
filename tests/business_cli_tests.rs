use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{add_expense, add_income, added_id, gl, init_db, run_ok, setup_test_db, temp_out};

#[test]
fn test_marketing_budget_and_spend() {
    let db = setup_test_db("marketing_budget");
    init_db(&db);

    add_income(&db, "2024-03-04", "5000", "Ali", "0300");

    gl().args([
        "--db", &db, "marketing", "add", "--title", "Flyers", "--amount", "300", "--date",
        "2024-03-10",
    ])
    .assert()
    .success()
    .stdout(contains("Flyers"));

    gl().args(["--db", &db, "marketing", "list", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(contains("Rs 1000"))
        .stdout(contains("Rs 300"))
        .stdout(contains("Rs 700"))
        .stdout(contains("over the reserved budget").not());

    gl().args([
        "--db", &db, "marketing", "add", "--title", "", "--amount", "10",
    ])
    .assert()
    .failure();
}

#[test]
fn test_marketing_over_budget_warning() {
    let db = setup_test_db("marketing_over");
    init_db(&db);

    add_income(&db, "2024-03-04", "1000", "Ali", "0300");
    gl().args([
        "--db", &db, "marketing", "add", "--title", "Radio", "--amount", "500", "--date",
        "2024-03-04",
    ])
    .assert()
    .success();

    gl().args(["--db", &db, "marketing", "list", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(contains("over the reserved budget"));
}

#[test]
fn test_employee_lifecycle() {
    let db = setup_test_db("employee_lifecycle");
    init_db(&db);

    gl().args([
        "--db", &db, "employee", "add", "--name", "Usman", "--job", "Mechanic", "--monthly",
        "30000", "--off-day", "Friday",
    ])
    .assert()
    .success()
    .stdout(contains("EMP0001"));

    gl().args(["--db", &db, "employee", "pay", "EMP0001", "--date", "2024-03-31"])
        .assert()
        .success()
        .stdout(contains("Rs 30000"));

    gl().args(["--db", &db, "employee", "payments", "--code", "EMP0001"])
        .assert()
        .success()
        .stdout(contains("2024-03-31"))
        .stdout(contains("Usman"));

    gl().args(["--db", &db, "employee", "remove", "EMP0001"])
        .assert()
        .success();

    gl().args(["--db", &db, "employee", "list"])
        .assert()
        .success()
        .stdout(contains("No employees"));

    gl().args(["--db", &db, "employee", "pay", "EMP0001"])
        .assert()
        .failure();
}

#[test]
fn test_daily_wage_requires_amount() {
    let db = setup_test_db("employee_daily");
    init_db(&db);

    gl().args([
        "--db", &db, "employee", "add", "--name", "Bilal", "--job", "Helper", "--salary-type",
        "daily",
    ])
    .assert()
    .failure();

    gl().args([
        "--db", &db, "employee", "add", "--name", "Bilal", "--job", "Helper", "--salary-type",
        "daily", "--daily", "1200",
    ])
    .assert()
    .success()
    .stdout(contains("EMP0001"));
}

#[test]
fn test_bill_attachment_link() {
    let db = setup_test_db("bill_link");
    init_db(&db);

    let bill = temp_out("bill_link", "jpg");
    fs::write(&bill, b"fake image bytes").expect("write bill");

    let out = run_ok(&[
        "--db",
        &db,
        "add",
        "2024-05-01",
        "--amount",
        "2500",
        "--customer",
        "Ali",
        "--contact",
        "0300",
        "--bill",
        &bill,
    ]);
    let id = added_id(&out);

    gl().args(["--db", &db, "bill", &id, "--ttl", "5"])
        .assert()
        .success()
        .stdout(contains("file://"))
        .stdout(contains("expires="));

    gl().args(["--db", &db, "--role", "staff", "bill", &id])
        .assert()
        .failure()
        .stderr(contains("open attached bills"));
}

#[test]
fn test_json_export_import_roundtrip() {
    let db = setup_test_db("json_roundtrip");
    init_db(&db);
    add_income(&db, "2024-01-05", "5000", "Ali", "0300");
    add_expense(&db, "2024-01-05", "2000");

    let out = temp_out("json_roundtrip", "json");
    gl().args(["--db", &db, "export", "--file", &out])
        .assert()
        .success()
        .stdout(contains("JSON export completed"));

    let text = fs::read_to_string(&out).expect("read export");
    let v: serde_json::Value = serde_json::from_str(&text).expect("valid json");
    assert_eq!(v["customer_codes"]["ali-0300"], "CUST0001");
    assert_eq!(v["ledger"]["2024-01-05"].as_array().map(|a| a.len()), Some(2));

    let other = setup_test_db("json_roundtrip_target");
    init_db(&other);
    add_expense(&other, "2023-12-31", "99");

    gl().args(["--db", &other, "import", "--file", &out])
        .assert()
        .success()
        .stdout(contains("Imported 2 entries"));

    gl().args(["--db", &other, "summary", "--date", "2024-01-05"])
        .assert()
        .success()
        .stdout(contains("Rs 3000"));

    gl().args(["--db", &other, "list", "--period", "2023-12-31"])
        .assert()
        .success()
        .stdout(contains("No entries"));
}

#[test]
fn test_invalid_import_leaves_ledger_untouched() {
    let db = setup_test_db("invalid_import");
    init_db(&db);
    add_income(&db, "2024-01-05", "5000", "Ali", "0300");

    let before_file = temp_out("invalid_import_before", "json");
    run_ok(&["--db", &db, "export", "--file", &before_file]);

    let bad = temp_out("invalid_import_bad", "json");
    fs::write(&bad, "{ this is not json").expect("write bad file");

    gl().args(["--db", &db, "import", "--file", &bad])
        .assert()
        .failure()
        .stderr(contains("Import rejected"));

    let after_file = temp_out("invalid_import_after", "json");
    run_ok(&["--db", &db, "export", "--file", &after_file]);

    let before: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&before_file).unwrap()).unwrap();
    let after: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&after_file).unwrap()).unwrap();
    assert_eq!(before["ledger"], after["ledger"]);
    assert_eq!(before["customer_codes"], after["customer_codes"]);

    gl().args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("import_rejected"));
}

#[test]
fn test_csv_export_with_period() {
    let db = setup_test_db("csv_export");
    init_db(&db);
    add_income(&db, "2024-01-05", "5000", "Ali", "0300");
    add_expense(&db, "2024-02-05", "700");

    let out = temp_out("csv_export", "csv");
    gl().args([
        "--db", &db, "export", "--format", "csv", "--file", &out, "--period", "2024-01",
    ])
    .assert()
    .success();

    let text = fs::read_to_string(&out).expect("read csv");
    assert!(text.contains("2024-01-05"));
    assert!(!text.contains("2024-02-05"));
}

#[test]
fn test_export_refuses_to_overwrite_without_force() {
    let db = setup_test_db("export_force");
    init_db(&db);

    let out = temp_out("export_force", "json");
    fs::write(&out, "keep").expect("write placeholder");

    gl().args(["--db", &db, "export", "--file", &out])
        .assert()
        .failure();
    assert_eq!(fs::read_to_string(&out).unwrap(), "keep");

    gl().args(["--db", &db, "export", "--file", &out, "--force"])
        .assert()
        .success();
}

#[test]
fn test_backup_compressed() {
    let db = setup_test_db("backup_zip");
    init_db(&db);
    add_expense(&db, "2024-01-05", "10");

    let out = temp_out("backup_zip", "sqlite");
    let zip = out.replace(".sqlite", ".zip");
    fs::remove_file(&zip).ok();

    gl().args(["--db", &db, "backup", "--file", &out, "--compress"])
        .assert()
        .success();

    assert!(std::path::Path::new(&zip).exists());
    assert!(!std::path::Path::new(&out).exists());
}

/// Attachment directory of one customer next to the temp test databases.
fn owner_attachments(owner: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("attachments").join(owner);
    fs::remove_dir_all(&dir).ok();
    dir
}

fn stored_files(dir: &std::path::Path) -> usize {
    fs::read_dir(dir).map(|it| it.count()).unwrap_or(0)
}

#[test]
fn test_bill_link_with_huge_ttl_fails_cleanly() {
    let db = setup_test_db("bill_huge_ttl");
    init_db(&db);

    let bill = temp_out("bill_huge_ttl", "jpg");
    fs::write(&bill, b"bill").expect("write bill");

    let out = run_ok(&[
        "--db", &db, "add", "2024-05-01", "--amount", "2500", "--customer", "Huge", "--contact",
        "7", "--bill", &bill,
    ]);
    let id = added_id(&out);

    gl().args(["--db", &db, "bill", &id, "--ttl", "9000000000000"])
        .assert()
        .failure()
        .code(1)
        .stderr(contains("too long"));
}

#[test]
fn test_rejected_entry_keeps_no_bill() {
    let db = setup_test_db("rejected_bill");
    init_db(&db);
    let dir = owner_attachments("zed-9");

    let bill = temp_out("rejected_bill", "jpg");
    fs::write(&bill, b"bill").expect("write bill");

    gl().args([
        "--db", &db, "add", "2024-05-01", "--amount", "0", "--customer", "Zed", "--contact", "9",
        "--bill", &bill,
    ])
    .assert()
    .success()
    .stdout(contains("nothing was saved"));

    assert_eq!(stored_files(&dir), 0);
}

#[test]
fn test_deleting_entry_removes_its_bill() {
    let db = setup_test_db("delete_bill");
    init_db(&db);
    let dir = owner_attachments("kim-5");

    let bill = temp_out("delete_bill", "jpg");
    fs::write(&bill, b"bill").expect("write bill");

    let out = run_ok(&[
        "--db", &db, "add", "2024-05-01", "--amount", "900", "--customer", "Kim", "--contact", "5",
        "--bill", &bill,
    ]);
    let id = added_id(&out);
    let out = run_ok(&[
        "--db", &db, "add", "2024-05-02", "--amount", "700", "--customer", "Kim", "--contact", "5",
        "--bill", &bill,
    ]);
    added_id(&out);
    assert_eq!(stored_files(&dir), 2);

    gl().args(["--db", &db, "del", "2024-05-01", "--id", &id, "--yes"])
        .assert()
        .success();
    assert_eq!(stored_files(&dir), 1);

    gl().args(["--db", &db, "del", "2024-05-02", "--yes"])
        .assert()
        .success();
    assert_eq!(stored_files(&dir), 0);
}

#[test]
fn test_import_keeps_code_sequence_floor() {
    let db = setup_test_db("import_floor");
    init_db(&db);
    add_income(&db, "2024-01-01", "100", "Ali", "0300");
    add_income(&db, "2024-01-02", "100", "Sara", "0311");
    add_income(&db, "2024-01-03", "100", "Bob", "0322");

    let small = setup_test_db("import_floor_source");
    init_db(&small);
    add_income(&small, "2024-02-01", "500", "Zed", "0999");

    let snapshot = temp_out("import_floor", "json");
    run_ok(&["--db", &small, "export", "--file", &snapshot]);

    gl().args(["--db", &db, "import", "--file", &snapshot])
        .assert()
        .success();

    let out = run_ok(&[
        "--db", &db, "add", "2024-02-02", "--amount", "100", "--customer", "Nina", "--contact",
        "0355",
    ]);
    assert!(out.contains("New customer registered with code CUST0004"));

    let out = run_ok(&[
        "--db", &db, "add", "2024-02-03", "--amount", "100", "--customer", "Zed", "--contact",
        "0999",
    ]);
    assert!(out.contains("Returning customer CUST0001"));
}
