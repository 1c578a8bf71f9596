use crate::cli::commands::date_or_today;
use crate::cli::parser::{Commands, EmployeeCmd};
use crate::config::Config;
use crate::core::payroll::{NewEmployee, PayrollLogic};
use crate::core::projection::Action;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries::{find_employee_by_code, load_employees, load_payments};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, colorize_optional};
use crate::utils::format_money;
use crate::utils::table::{Column, Table};
use std::collections::HashMap;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };

    cfg.role.require(Action::ManageEmployees)?;

    let pool = DbPool::new(&cfg.database)?;
    run_pending_migrations(&pool.conn)?;
    let conn = &pool.conn;

    match action {
        EmployeeCmd::Add {
            name,
            job,
            salary_type,
            monthly_salary,
            daily_wage,
            off_day,
            reason,
        } => {
            let e = PayrollLogic::add(
                conn,
                NewEmployee {
                    name: name.clone(),
                    role: job.clone(),
                    reason_for_hiring: reason.clone(),
                    salary_type: *salary_type,
                    monthly_salary: *monthly_salary,
                    daily_wage: *daily_wage,
                    weekly_off_day: off_day.clone(),
                },
            )?;
            success(format!("Employee {} added: {} ({})", e.code, e.name, e.role));
        }

        EmployeeCmd::List { all } => {
            let employees = load_employees(conn, *all)?;
            if employees.is_empty() {
                info("No employees.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("CODE", 8),
                Column::new("NAME", 20),
                Column::new("ROLE", 16),
                Column::new("SALARY", 8),
                Column::new("MONTHLY", 12),
                Column::new("DAILY", 10),
                Column::new("OFF DAY", 9),
                Column::new("ACTIVE", 6),
            ]);
            for e in employees {
                let monthly = e
                    .salary_type
                    .pays_monthly()
                    .then(|| format_money(&cfg.currency, e.monthly_salary));
                let daily = e.daily_wage.map(|w| format_money(&cfg.currency, w));

                table.add_row(vec![
                    e.code.clone(),
                    e.name.clone(),
                    e.role.clone(),
                    e.salary_type.to_db_str().to_string(),
                    colorize_optional(monthly.as_deref()),
                    colorize_optional(daily.as_deref()),
                    colorize_optional(e.weekly_off_day.as_deref()),
                    if e.active {
                        "yes".to_string()
                    } else {
                        format!("{GREY}no{RESET}")
                    },
                ]);
            }
            print!("{}", table.render());
        }

        EmployeeCmd::Remove { code } => {
            let e = PayrollLogic::remove(conn, code)?;
            success(format!("Employee {} ({}) removed.", e.code, e.name));
        }

        EmployeeCmd::Pay {
            code,
            payment_type,
            amount,
            date,
            notes,
        } => {
            let d = date_or_today(date.as_ref())?;
            let (e, p) = PayrollLogic::pay(conn, code, *payment_type, *amount, d, notes.clone())?;
            success(format!(
                "Paid {} to {} ({}) on {}",
                format_money(&cfg.currency, p.amount),
                e.name,
                e.code,
                p.date
            ));
        }

        EmployeeCmd::Payments { code } => {
            let filter_id = match code {
                Some(c) => Some(
                    find_employee_by_code(conn, c)?
                        .ok_or_else(|| AppError::EmployeeNotFound(c.clone()))?
                        .id,
                ),
                None => None,
            };

            let names: HashMap<i64, String> = load_employees(conn, true)?
                .into_iter()
                .map(|e| (e.id, format!("{} {}", e.code, e.name)))
                .collect();

            let payments = load_payments(conn, filter_id)?;
            if payments.is_empty() {
                info("No salary payments.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("DATE", 10),
                Column::new("EMPLOYEE", 26),
                Column::new("TYPE", 7),
                Column::new("AMOUNT", 12),
                Column::new("NOTES", 24),
            ]);
            for p in payments {
                table.add_row(vec![
                    p.date.to_string(),
                    names.get(&p.employee_id).cloned().unwrap_or_default(),
                    p.payment_type.to_db_str().to_string(),
                    format_money(&cfg.currency, p.amount),
                    colorize_optional(p.notes.as_deref()),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
