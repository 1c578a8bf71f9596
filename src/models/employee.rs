use chrono::{Local, NaiveDate};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SalaryType {
    Monthly,
    Daily,
    Mixed,
}

impl SalaryType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SalaryType::Monthly => "monthly",
            SalaryType::Daily => "daily",
            SalaryType::Mixed => "mixed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Some(SalaryType::Monthly),
            "daily" => Some(SalaryType::Daily),
            "mixed" => Some(SalaryType::Mixed),
            _ => None,
        }
    }

    pub fn pays_monthly(&self) -> bool {
        !matches!(self, SalaryType::Daily)
    }

    pub fn pays_daily(&self) -> bool {
        !matches!(self, SalaryType::Monthly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Daily,
    Monthly,
}

impl PaymentType {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            PaymentType::Daily => "daily",
            PaymentType::Monthly => "monthly",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(PaymentType::Daily),
            "monthly" => Some(PaymentType::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub role: String,
    pub reason_for_hiring: Option<String>,
    pub salary_type: SalaryType,
    pub monthly_salary: Decimal,
    pub daily_wage: Option<Decimal>,
    pub weekly_off_day: Option<String>,
    pub active: bool,
    pub created_at: String,
}

/// Append-only salary audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryPayment {
    pub id: i64,
    pub employee_id: i64,
    pub amount: Decimal,
    pub payment_type: PaymentType,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: String,
}

impl SalaryPayment {
    pub fn new(
        employee_id: i64,
        amount: Decimal,
        payment_type: PaymentType,
        date: NaiveDate,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: 0,
            employee_id,
            amount,
            payment_type,
            date,
            notes,
            created_at: Local::now().to_rfc3339(),
        }
    }
}
