/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

use crate::models::followup::FollowUpStatus;
use crate::models::transaction::TransactionKind;
use rust_decimal::Decimal;

/// Profit color:
/// \>0 → green
/// \<0 → red
/// 0 → reset
pub fn color_for_profit(value: Decimal) -> &'static str {
    if value > Decimal::ZERO {
        GREEN
    } else if value < Decimal::ZERO {
        RED
    } else {
        RESET
    }
}

pub fn color_for_kind(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => GREEN,
        TransactionKind::MonthlyIncome => CYAN,
        TransactionKind::Expense => RED,
        TransactionKind::MonthlyExpense => MAGENTA,
    }
}

pub fn color_for_status(status: FollowUpStatus) -> &'static str {
    match status {
        FollowUpStatus::Overdue => RED,
        FollowUpStatus::Due => YELLOW,
        FollowUpStatus::Upcoming => BLUE,
    }
}

/// Grey placeholder for hidden or empty values.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}
