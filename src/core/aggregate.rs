//! Daily and monthly totals, gross profit and the marketing reserve.

use crate::core::ledger::Ledger;
use crate::models::month::YearMonth;
use crate::models::transaction::TransactionRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Share of a day's positive gross profit reserved for marketing (20%).
pub const MARKETING_SHARE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub gross_profit: Decimal,
    pub marketing_budget: Decimal,
    pub net_profit: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: Option<YearMonth>,
    #[serde(flatten)]
    pub totals: Totals,
    /// Dates of the month holding at least one record.
    pub saved_date_count: usize,
}

/// `max(0, gross * 20%)`.
pub fn marketing_budget(gross_profit: Decimal) -> Decimal {
    if gross_profit > Decimal::ZERO {
        gross_profit * MARKETING_SHARE
    } else {
        Decimal::ZERO
    }
}

fn sum_records(records: &[TransactionRecord]) -> (Decimal, Decimal) {
    records
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), r| {
            if r.kind().is_income_like() {
                (inc + r.amount, exp)
            } else {
                (inc, exp + r.amount)
            }
        })
}

fn day_totals(records: &[TransactionRecord]) -> Totals {
    let (income, expense) = sum_records(records);
    let gross_profit = income - expense;
    let budget = marketing_budget(gross_profit);

    Totals {
        income,
        expense,
        gross_profit,
        marketing_budget: budget,
        net_profit: gross_profit - budget,
    }
}

pub fn daily_totals(ledger: &Ledger, date: NaiveDate) -> Totals {
    day_totals(ledger.list_for_date(date))
}

/// Month totals. The marketing budget is the sum of each day's own reserve,
/// so a loss-making day contributes nothing even in a profitable month.
pub fn monthly_totals(ledger: &Ledger, month: YearMonth) -> MonthlyTotals {
    let mut out = MonthlyTotals {
        month: Some(month),
        ..Default::default()
    };

    for (_, records) in ledger.range(month.first_day(), month.last_day()) {
        if records.is_empty() {
            continue;
        }
        out.saved_date_count += 1;

        let day = day_totals(records);
        out.totals.income += day.income;
        out.totals.expense += day.expense;
        out.totals.marketing_budget += day.marketing_budget;
    }

    out.totals.gross_profit = out.totals.income - out.totals.expense;
    out.totals.net_profit = out.totals.gross_profit - out.totals.marketing_budget;
    out
}
