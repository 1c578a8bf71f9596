use super::customer::DiscountState;
use super::month::YearMonth;
use chrono::{Local, NaiveDate};
use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction kind as stored in `transactions.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Income,
    Expense,
    MonthlyIncome,
    MonthlyExpense,
}

impl TransactionKind {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::MonthlyIncome => "monthly-income",
            TransactionKind::MonthlyExpense => "monthly-expense",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            "monthly-income" => Some(TransactionKind::MonthlyIncome),
            "monthly-expense" => Some(TransactionKind::MonthlyExpense),
            _ => None,
        }
    }

    pub fn is_income_like(&self) -> bool {
        matches!(
            self,
            TransactionKind::Income | TransactionKind::MonthlyIncome
        )
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

/// Customer reference embedded in an income record at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRef {
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub code: Option<String>,
    /// How the customer found the business.
    #[serde(default)]
    pub channel: Option<String>,
    /// Discount entitlement as it was when this record was written.
    #[serde(default)]
    pub discount: Option<DiscountState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeDetails {
    #[serde(default)]
    pub customer: Option<CustomerRef>,
    #[serde(default)]
    pub vehicle: Option<String>,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub service_type: Option<String>,
    /// Odometer reading at service time.
    #[serde(default)]
    pub distance_km: Option<u32>,
    /// Reference returned by the attachment store, never raw bytes.
    #[serde(default)]
    pub document: Option<String>,
}

/// Kind-specific part of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TransactionDetails {
    Income(IncomeDetails),
    Expense,
    MonthlyIncome { month: YearMonth },
    MonthlyExpense { month: YearMonth },
}

impl TransactionDetails {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionDetails::Income(_) => TransactionKind::Income,
            TransactionDetails::Expense => TransactionKind::Expense,
            TransactionDetails::MonthlyIncome { .. } => TransactionKind::MonthlyIncome,
            TransactionDetails::MonthlyExpense { .. } => TransactionKind::MonthlyExpense,
        }
    }

    pub fn month(&self) -> Option<YearMonth> {
        match self {
            TransactionDetails::MonthlyIncome { month }
            | TransactionDetails::MonthlyExpense { month } => Some(*month),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub amount: Decimal,
    /// Date bucket. Monthly records sit on the first day of their month.
    pub occurred_on: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    pub details: TransactionDetails,
    pub created_at: String,
}

impl TransactionRecord {
    /// Build a new record with a fresh id.
    /// Monthly records are normalized to the first day of their month.
    pub fn new(
        amount: Decimal,
        occurred_on: NaiveDate,
        note: Option<String>,
        details: TransactionDetails,
    ) -> Self {
        let occurred_on = details.month().map_or(occurred_on, |m| m.first_day());

        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            amount,
            occurred_on,
            note,
            details,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.details.kind()
    }

    pub fn income(&self) -> Option<&IncomeDetails> {
        match &self.details {
            TransactionDetails::Income(d) => Some(d),
            _ => None,
        }
    }

    pub fn customer(&self) -> Option<&CustomerRef> {
        self.income().and_then(|d| d.customer.as_ref())
    }

    pub fn date_str(&self) -> String {
        self.occurred_on.format("%Y-%m-%d").to_string()
    }
}
