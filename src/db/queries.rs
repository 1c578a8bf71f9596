use crate::errors::{AppError, AppResult};
use crate::models::customer::{CustomerIdentity, DiscountState};
use crate::models::employee::{Employee, PaymentType, SalaryPayment, SalaryType};
use crate::models::marketing::MarketingExpense;
use crate::models::month::YearMonth;
use crate::models::transaction::{
    CustomerRef, IncomeDetails, TransactionDetails, TransactionKind, TransactionRecord,
};
use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Column conversions
// ---------------------------------------------------------------------------

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn get_date(row: &Row, col: &str) -> Result<NaiveDate> {
    let raw: String = row.get(col)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| conversion_error(0, AppError::InvalidDate(raw.clone())))
}

fn get_decimal(row: &Row, col: &str) -> Result<Decimal> {
    let raw: String = row.get(col)?;
    Decimal::from_str(&raw).map_err(|_| conversion_error(0, AppError::InvalidAmount(raw.clone())))
}

fn get_opt_decimal(row: &Row, col: &str) -> Result<Option<Decimal>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|s| {
        Decimal::from_str(&s).map_err(|_| conversion_error(0, AppError::InvalidAmount(s.clone())))
    })
    .transpose()
}

fn get_opt_bool(row: &Row, col: &str) -> Result<Option<bool>> {
    Ok(row.get::<_, Option<i64>>(col)?.map(|v| v != 0))
}

fn fmt_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

pub fn map_transaction(row: &Row) -> Result<TransactionRecord> {
    let kind_str: String = row.get("kind")?;
    let kind = TransactionKind::from_db_str(&kind_str)
        .ok_or_else(|| conversion_error(0, AppError::InvalidKind(kind_str.clone())))?;

    let month = || -> Result<YearMonth> {
        let raw: Option<String> = row.get("month_key")?;
        let raw = raw.unwrap_or_default();
        YearMonth::parse(&raw).map_err(|e| conversion_error(0, e))
    };

    let details = match kind {
        TransactionKind::Income => {
            let name: Option<String> = row.get("customer_name")?;
            let contact: Option<String> = row.get("customer_contact")?;

            let discount = match (
                get_opt_bool(row, "discount_eligible")?,
                get_opt_bool(row, "discount_used")?,
                get_opt_bool(row, "discount_applied")?,
            ) {
                (Some(eligible), Some(used), Some(applied)) => Some(DiscountState {
                    eligible,
                    used,
                    applied,
                }),
                _ => None,
            };

            let customer = match (name, contact) {
                (Some(name), Some(contact)) => Some(CustomerRef {
                    name,
                    contact,
                    code: row.get("customer_code")?,
                    channel: row.get("channel")?,
                    discount,
                }),
                _ => None,
            };

            TransactionDetails::Income(IncomeDetails {
                customer,
                vehicle: row.get("vehicle")?,
                registration: row.get("registration")?,
                service_type: row.get("service_type")?,
                distance_km: row.get("distance_km")?,
                document: row.get("document")?,
            })
        }
        TransactionKind::Expense => TransactionDetails::Expense,
        TransactionKind::MonthlyIncome => TransactionDetails::MonthlyIncome { month: month()? },
        TransactionKind::MonthlyExpense => TransactionDetails::MonthlyExpense { month: month()? },
    };

    Ok(TransactionRecord {
        id: row.get("id")?,
        amount: get_decimal(row, "amount")?,
        occurred_on: get_date(row, "bucket")?,
        note: row.get("note")?,
        details,
        created_at: row.get("created_at")?,
    })
}

/// Every transaction, date ascending, insertion order within a date.
pub fn load_transactions(conn: &Connection) -> AppResult<Vec<TransactionRecord>> {
    let mut stmt = conn.prepare("SELECT * FROM transactions ORDER BY bucket ASC, seq ASC")?;
    let rows = stmt.query_map([], map_transaction)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_transaction(conn: &Connection, r: &TransactionRecord) -> AppResult<()> {
    let income = r.income();
    let customer = r.customer();
    let discount = customer.and_then(|c| c.discount);

    conn.execute(
        "INSERT INTO transactions (
            id, bucket, kind, amount, note, month_key,
            customer_name, customer_contact, customer_code, channel,
            vehicle, registration, service_type, distance_km, document,
            discount_eligible, discount_used, discount_applied, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
        params![
            r.id,
            fmt_date(&r.occurred_on),
            r.kind().to_db_str(),
            r.amount.to_string(),
            r.note,
            r.details.month().map(|m| m.to_string()),
            customer.map(|c| c.name.clone()),
            customer.map(|c| c.contact.clone()),
            customer.and_then(|c| c.code.clone()),
            customer.and_then(|c| c.channel.clone()),
            income.and_then(|d| d.vehicle.clone()),
            income.and_then(|d| d.registration.clone()),
            income.and_then(|d| d.service_type.clone()),
            income.and_then(|d| d.distance_km),
            income.and_then(|d| d.document.clone()),
            discount.map(|d| d.eligible),
            discount.map(|d| d.used),
            discount.map(|d| d.applied),
            r.created_at,
        ],
    )?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, date: &NaiveDate, id: &str) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE bucket = ?1 AND id = ?2",
        params![fmt_date(date), id],
    )?;
    Ok(n)
}

pub fn delete_transactions_for_date(conn: &Connection, date: &NaiveDate) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE bucket = ?1",
        [fmt_date(date)],
    )?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

pub fn map_customer(row: &Row) -> Result<CustomerIdentity> {
    Ok(CustomerIdentity {
        name: row.get("name")?,
        contact: row.get("contact")?,
        code: row.get("code")?,
        discount: DiscountState {
            eligible: row.get::<_, i64>("discount_eligible")? != 0,
            used: row.get::<_, i64>("discount_used")? != 0,
            applied: row.get::<_, i64>("discount_applied")? != 0,
        },
        created_at: row.get("created_at")?,
    })
}

pub fn load_customers(conn: &Connection) -> AppResult<Vec<CustomerIdentity>> {
    let mut stmt = conn.prepare("SELECT * FROM customers ORDER BY code ASC")?;
    let rows = stmt.query_map([], map_customer)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert or overwrite one identity (keyed by its normalized key).
pub fn upsert_customer(conn: &Connection, c: &CustomerIdentity) -> AppResult<()> {
    conn.execute(
        "INSERT INTO customers (key, name, contact, code, created_at,
                                discount_eligible, discount_used, discount_applied)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
         ON CONFLICT(key) DO UPDATE SET
            discount_eligible = excluded.discount_eligible,
            discount_used     = excluded.discount_used,
            discount_applied  = excluded.discount_applied",
        params![
            c.key(),
            c.name,
            c.contact,
            c.code,
            c.created_at,
            c.discount.eligible,
            c.discount.used,
            c.discount.applied,
        ],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub const SETTING_DEFAULT_INTERVAL: &str = "followup_default_interval_km";
pub const SETTING_CUSTOMER_SEQ: &str = "customer_last_seq";

pub fn get_setting(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let v = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Follow-ups
// ---------------------------------------------------------------------------

pub fn load_dismissed(conn: &Connection) -> AppResult<HashSet<String>> {
    let mut stmt = conn.prepare("SELECT id FROM dismissed_followups")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = HashSet::new();
    for r in rows {
        out.insert(r?);
    }
    Ok(out)
}

pub fn insert_dismissed(conn: &Connection, id: &str) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO dismissed_followups (id, dismissed_at) VALUES (?1, ?2)",
        params![id, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Snapshot import
// ---------------------------------------------------------------------------

/// Replace the ledger and the registry wholesale, inside one transaction.
pub fn replace_ledger_and_customers(
    conn: &mut Connection,
    records: &[TransactionRecord],
    customers: &[CustomerIdentity],
    last_seq: u32,
) -> AppResult<()> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM transactions", [])?;
    tx.execute("DELETE FROM customers", [])?;

    for r in records {
        insert_transaction(&tx, r)?;
    }
    for c in customers {
        upsert_customer(&tx, c)?;
    }
    set_setting(&tx, SETTING_CUSTOMER_SEQ, &last_seq.to_string())?;

    tx.commit()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Marketing expenses
// ---------------------------------------------------------------------------

pub fn map_marketing(row: &Row) -> Result<MarketingExpense> {
    Ok(MarketingExpense {
        id: row.get("id")?,
        date: get_date(row, "date")?,
        title: row.get("title")?,
        amount: get_decimal(row, "amount")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub fn load_marketing_for_month(
    conn: &Connection,
    month: &YearMonth,
) -> AppResult<Vec<MarketingExpense>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM marketing_expenses
         WHERE date BETWEEN ?1 AND ?2
         ORDER BY date DESC, created_at DESC",
    )?;
    let rows = stmt.query_map(
        params![fmt_date(&month.first_day()), fmt_date(&month.last_day())],
        map_marketing,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_marketing(conn: &Connection, e: &MarketingExpense) -> AppResult<()> {
    conn.execute(
        "INSERT INTO marketing_expenses (id, date, title, amount, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            e.id,
            fmt_date(&e.date),
            e.title,
            e.amount.to_string(),
            e.notes,
            e.created_at
        ],
    )?;
    Ok(())
}

pub fn delete_marketing(conn: &Connection, id: &str) -> AppResult<usize> {
    let n = conn.execute("DELETE FROM marketing_expenses WHERE id = ?1", [id])?;
    Ok(n)
}

// ---------------------------------------------------------------------------
// Employees and salary payments
// ---------------------------------------------------------------------------

pub fn map_employee(row: &Row) -> Result<Employee> {
    let st: String = row.get("salary_type")?;
    let salary_type = SalaryType::from_db_str(&st)
        .ok_or_else(|| conversion_error(0, AppError::InvalidSalaryType(st.clone())))?;

    Ok(Employee {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        role: row.get("role")?,
        reason_for_hiring: row.get("reason_for_hiring")?,
        salary_type,
        monthly_salary: get_decimal(row, "monthly_salary")?,
        daily_wage: get_opt_decimal(row, "daily_wage")?,
        weekly_off_day: row.get("weekly_off_day")?,
        active: row.get::<_, i64>("is_active")? != 0,
        created_at: row.get("created_at")?,
    })
}

pub fn load_employees(conn: &Connection, include_inactive: bool) -> AppResult<Vec<Employee>> {
    let sql = if include_inactive {
        "SELECT * FROM employees ORDER BY id ASC"
    } else {
        "SELECT * FROM employees WHERE is_active = 1 ORDER BY id ASC"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn find_employee_by_code(conn: &Connection, code: &str) -> AppResult<Option<Employee>> {
    let e = conn
        .query_row(
            "SELECT * FROM employees WHERE code = ?1 COLLATE NOCASE",
            [code],
            map_employee,
        )
        .optional()?;
    Ok(e)
}

/// Every employee ever created, active or not (drives the code sequence).
pub fn count_employees(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))?;
    Ok(n)
}

pub fn insert_employee(conn: &Connection, e: &Employee) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO employees (code, name, role, reason_for_hiring, salary_type,
                                monthly_salary, daily_wage, weekly_off_day, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            e.code,
            e.name,
            e.role,
            e.reason_for_hiring,
            e.salary_type.to_db_str(),
            e.monthly_salary.to_string(),
            e.daily_wage.map(|w| w.to_string()),
            e.weekly_off_day,
            e.active,
            e.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn deactivate_employee(conn: &Connection, id: i64) -> AppResult<usize> {
    let n = conn.execute("UPDATE employees SET is_active = 0 WHERE id = ?1", [id])?;
    Ok(n)
}

pub fn map_payment(row: &Row) -> Result<SalaryPayment> {
    let pt: String = row.get("payment_type")?;
    let payment_type = PaymentType::from_db_str(&pt)
        .ok_or_else(|| conversion_error(0, AppError::Validation(format!("payment type {pt}"))))?;

    Ok(SalaryPayment {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        amount: get_decimal(row, "amount")?,
        payment_type,
        date: get_date(row, "date")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_payment(conn: &Connection, p: &SalaryPayment) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO salary_payments (employee_id, amount, payment_type, date, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            p.employee_id,
            p.amount.to_string(),
            p.payment_type.to_db_str(),
            fmt_date(&p.date),
            p.notes,
            p.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_payments(conn: &Connection, employee_id: Option<i64>) -> AppResult<Vec<SalaryPayment>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM salary_payments
         WHERE (?1 IS NULL OR employee_id = ?1)
         ORDER BY date ASC, id ASC",
    )?;
    let rows = stmt.query_map([employee_id], map_payment)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
