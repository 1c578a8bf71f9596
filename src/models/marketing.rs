use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketingExpense {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub amount: Decimal,
    pub notes: Option<String>,
    pub created_at: String,
}

impl MarketingExpense {
    pub fn new(date: NaiveDate, title: String, amount: Decimal, notes: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            date,
            title,
            amount,
            notes,
            created_at: Local::now().to_rfc3339(),
        }
    }
}
