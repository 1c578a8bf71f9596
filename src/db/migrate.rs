use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists. Migrations record themselves in it,
/// so it has to exist before anything else.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_ledger",
        description: "Created transactions and customers tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS transactions (
            seq               INTEGER PRIMARY KEY AUTOINCREMENT,
            id                TEXT NOT NULL UNIQUE,
            bucket            TEXT NOT NULL,
            kind              TEXT NOT NULL CHECK(kind IN ('income','expense','monthly-income','monthly-expense')),
            amount            TEXT NOT NULL,
            note              TEXT,
            month_key         TEXT,
            customer_name     TEXT,
            customer_contact  TEXT,
            customer_code     TEXT,
            vehicle           TEXT,
            registration      TEXT,
            service_type      TEXT,
            distance_km       INTEGER,
            created_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_bucket ON transactions(bucket);

        CREATE TABLE IF NOT EXISTS customers (
            key        TEXT PRIMARY KEY,
            name       TEXT NOT NULL,
            contact    TEXT NOT NULL,
            code       TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250415_0002_discounts_and_channels",
        description: "Added discount snapshots, acquisition channel and bill reference",
        sql: r#"
        ALTER TABLE transactions ADD COLUMN channel TEXT;
        ALTER TABLE transactions ADD COLUMN document TEXT;
        ALTER TABLE transactions ADD COLUMN discount_eligible INTEGER;
        ALTER TABLE transactions ADD COLUMN discount_used INTEGER;
        ALTER TABLE transactions ADD COLUMN discount_applied INTEGER;

        ALTER TABLE customers ADD COLUMN discount_eligible INTEGER NOT NULL DEFAULT 1;
        ALTER TABLE customers ADD COLUMN discount_used INTEGER NOT NULL DEFAULT 0;
        ALTER TABLE customers ADD COLUMN discount_applied INTEGER NOT NULL DEFAULT 0;
        "#,
    },
    Migration {
        version: "20250520_0003_followups",
        description: "Created dismissed_followups table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS dismissed_followups (
            id           TEXT PRIMARY KEY,
            dismissed_at TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20250612_0004_marketing_and_staff",
        description: "Created marketing_expenses, employees and salary_payments tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS marketing_expenses (
            id         TEXT PRIMARY KEY,
            date       TEXT NOT NULL,
            title      TEXT NOT NULL,
            amount     TEXT NOT NULL,
            notes      TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_marketing_date ON marketing_expenses(date);

        CREATE TABLE IF NOT EXISTS employees (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            code              TEXT NOT NULL UNIQUE,
            name              TEXT NOT NULL,
            role              TEXT NOT NULL,
            reason_for_hiring TEXT,
            salary_type       TEXT NOT NULL CHECK(salary_type IN ('monthly','daily','mixed')),
            monthly_salary    TEXT NOT NULL DEFAULT '0',
            daily_wage        TEXT,
            weekly_off_day    TEXT,
            is_active         INTEGER NOT NULL DEFAULT 1,
            created_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS salary_payments (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  INTEGER NOT NULL REFERENCES employees(id),
            amount       TEXT NOT NULL,
            payment_type TEXT NOT NULL CHECK(payment_type IN ('daily','monthly')),
            date         TEXT NOT NULL,
            notes        TEXT,
            created_at   TEXT NOT NULL
        );
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()
}

/// Public entry point: run all pending migrations in order.
///
/// Invoked by `db::initialize::init_db()` and at the start of every session.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;

    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}

/// Versions not yet applied (used by `db --info`).
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}
