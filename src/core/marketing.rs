use crate::core::aggregate::monthly_totals;
use crate::core::ledger::Ledger;
use crate::db::log::audit_quiet;
use crate::db::queries::{delete_marketing, insert_marketing, load_marketing_for_month};
use crate::errors::{AppError, AppResult};
use crate::models::marketing::MarketingExpense;
use crate::models::month::YearMonth;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

/// Reserved budget against actual marketing spend for one month.
#[derive(Debug, Clone, Serialize)]
pub struct MarketingReport {
    pub month: YearMonth,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub expenses: Vec<MarketingExpense>,
}

impl MarketingReport {
    pub fn over_budget(&self) -> bool {
        self.remaining < Decimal::ZERO
    }
}

pub struct MarketingLogic;

impl MarketingLogic {
    pub fn add(
        conn: &Connection,
        date: NaiveDate,
        title: &str,
        amount: Decimal,
        notes: Option<String>,
    ) -> AppResult<MarketingExpense> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("a title is required".into()));
        }
        if amount <= Decimal::ZERO {
            return Err(AppError::Validation("amount must be positive".into()));
        }

        let expense = MarketingExpense::new(
            date,
            title.to_string(),
            amount,
            notes.filter(|n| !n.trim().is_empty()),
        );
        insert_marketing(conn, &expense)?;

        audit_quiet(
            conn,
            "marketing_add",
            &expense.id,
            &format!("{} {} on {}", expense.title, expense.amount, expense.date),
        );
        Ok(expense)
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        if delete_marketing(conn, id)? == 0 {
            return Err(AppError::Validation(format!(
                "no marketing expense with id {id}"
            )));
        }

        audit_quiet(conn, "marketing_del", id, "Marketing expense deleted");
        Ok(())
    }

    pub fn report(conn: &Connection, ledger: &Ledger, month: YearMonth) -> AppResult<MarketingReport> {
        let budget = monthly_totals(ledger, month).totals.marketing_budget;
        let expenses = load_marketing_for_month(conn, &month)?;
        let spent: Decimal = expenses.iter().map(|e| e.amount).sum();

        Ok(MarketingReport {
            month,
            budget,
            spent,
            remaining: budget - spent,
            expenses,
        })
    }
}
