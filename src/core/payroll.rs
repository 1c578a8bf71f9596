use crate::db::log::audit_quiet;
use crate::db::queries::{
    count_employees, deactivate_employee, find_employee_by_code, insert_employee, insert_payment,
};
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, PaymentType, SalaryPayment, SalaryType};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Form data for a new employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub role: String,
    pub reason_for_hiring: Option<String>,
    pub salary_type: SalaryType,
    pub monthly_salary: Option<Decimal>,
    pub daily_wage: Option<Decimal>,
    pub weekly_off_day: Option<String>,
}

fn positive(v: Option<Decimal>, what: &str) -> AppResult<Decimal> {
    match v {
        Some(d) if d > Decimal::ZERO => Ok(d),
        _ => Err(AppError::Validation(format!("{what} must be a positive amount"))),
    }
}

pub struct PayrollLogic;

impl PayrollLogic {
    /// `EMP0001`, `EMP0002`, … counting every employee ever created.
    pub fn next_code(conn: &Connection) -> AppResult<String> {
        let n = count_employees(conn)? + 1;
        Ok(format!("EMP{:04}", n))
    }

    pub fn add(conn: &Connection, new: NewEmployee) -> AppResult<Employee> {
        let name = new.name.trim();
        let role = new.role.trim();
        if name.is_empty() || role.is_empty() {
            return Err(AppError::Validation("name and role are required".into()));
        }

        let monthly_salary = if new.salary_type.pays_monthly() {
            positive(new.monthly_salary, "monthly salary")?
        } else {
            Decimal::ZERO
        };
        let daily_wage = if new.salary_type.pays_daily() {
            Some(positive(new.daily_wage, "daily wage")?)
        } else {
            None
        };

        let mut employee = Employee {
            id: 0,
            code: Self::next_code(conn)?,
            name: name.to_string(),
            role: role.to_string(),
            reason_for_hiring: new.reason_for_hiring.filter(|r| !r.trim().is_empty()),
            salary_type: new.salary_type,
            monthly_salary,
            daily_wage,
            weekly_off_day: new.weekly_off_day.filter(|d| !d.trim().is_empty()),
            active: true,
            created_at: Local::now().to_rfc3339(),
        };
        employee.id = insert_employee(conn, &employee)?;

        audit_quiet(
            conn,
            "employee_add",
            &employee.code,
            &format!("{} ({})", employee.name, employee.role),
        );
        Ok(employee)
    }

    fn active_by_code(conn: &Connection, code: &str) -> AppResult<Employee> {
        find_employee_by_code(conn, code)?
            .filter(|e| e.active)
            .ok_or_else(|| AppError::EmployeeNotFound(code.to_string()))
    }

    /// Soft delete: the row and its payments stay.
    pub fn remove(conn: &Connection, code: &str) -> AppResult<Employee> {
        let employee = Self::active_by_code(conn, code)?;
        deactivate_employee(conn, employee.id)?;

        audit_quiet(conn, "employee_remove", &employee.code, "Employee deactivated");
        Ok(employee)
    }

    /// Record a salary payment. Without an explicit amount the configured
    /// wage for the payment type is paid.
    pub fn pay(
        conn: &Connection,
        code: &str,
        payment_type: PaymentType,
        amount: Option<Decimal>,
        date: NaiveDate,
        notes: Option<String>,
    ) -> AppResult<(Employee, SalaryPayment)> {
        let employee = Self::active_by_code(conn, code)?;

        let default_amount = match payment_type {
            PaymentType::Monthly if employee.salary_type.pays_monthly() => {
                Some(employee.monthly_salary)
            }
            PaymentType::Daily if employee.salary_type.pays_daily() => employee.daily_wage,
            _ => None,
        };

        let amount = positive(amount.or(default_amount), "salary payment")?;

        let mut payment = SalaryPayment::new(employee.id, amount, payment_type, date, notes);
        payment.id = insert_payment(conn, &payment)?;

        audit_quiet(
            conn,
            "salary_paid",
            &employee.code,
            &format!("{} {} on {}", payment_type.to_db_str(), amount, date),
        );
        Ok((employee, payment))
    }
}
