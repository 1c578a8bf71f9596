use crate::db::migrate::pending_migrations;
use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count(pool: &DbPool, table: &str) -> rusqlite::Result<i64> {
    pool.conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    for (label, table) in [
        ("Transactions", "transactions"),
        ("Customers", "customers"),
        ("Marketing expenses", "marketing_expenses"),
        ("Employees", "employees"),
        ("Salary payments", "salary_payments"),
    ] {
        println!(
            "{}• {}:{} {}{}{}",
            CYAN,
            label,
            RESET,
            GREEN,
            count(pool, table)?,
            RESET
        );
    }

    //
    // 3) DATE RANGE
    //
    let first_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT bucket FROM transactions ORDER BY bucket ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last_date: Option<String> = pool
        .conn
        .query_row(
            "SELECT bucket FROM transactions ORDER BY bucket DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!("{}• Date range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first_date.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last_date.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    //
    // 4) SCHEMA
    //
    let pending = pending_migrations(&pool.conn)?;
    if pending.is_empty() {
        println!("{}• Schema:{} up to date", CYAN, RESET);
    } else {
        println!(
            "{}• Schema:{} {}{} pending migration(s){}",
            CYAN,
            RESET,
            YELLOW,
            pending.len(),
            RESET
        );
    }

    println!();
    Ok(())
}
