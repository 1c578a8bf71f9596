#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn gl() -> Command {
    cargo_bin_cmd!("garageledger")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_garageledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize an empty test database
pub fn init_db(db_path: &str) {
    gl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Run a command that must succeed and return its stdout
pub fn run_ok(args: &[&str]) -> String {
    let out = gl().args(args).output().expect("run garageledger");
    assert!(
        out.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).to_string()
}

/// Extract the entry id from the output of `add` ("Entry <id> saved on ...")
pub fn added_id(stdout: &str) -> String {
    stdout
        .split_whitespace()
        .skip_while(|w| !w.ends_with("Entry"))
        .nth(1)
        .expect("entry id in output")
        .to_string()
}

/// Add an income entry for a customer and return its id
pub fn add_income(db: &str, date: &str, amount: &str, name: &str, contact: &str) -> String {
    let out = run_ok(&[
        "--db",
        db,
        "add",
        date,
        "--amount",
        amount,
        "--customer",
        name,
        "--contact",
        contact,
    ]);
    added_id(&out)
}

/// Add a plain expense entry and return its id
pub fn add_expense(db: &str, date: &str, amount: &str) -> String {
    let out = run_ok(&[
        "--db", db, "add", date, "--kind", "expense", "--amount", amount,
    ]);
    added_id(&out)
}
