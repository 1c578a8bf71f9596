//! Formatting utilities used for CLI and export outputs.

use rust_decimal::{Decimal, RoundingStrategy};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Exact amount with the currency symbol, trailing zeros trimmed.
pub fn format_money(currency: &str, amount: Decimal) -> String {
    format!("{} {}", currency, amount.normalize())
}

/// Budget figures are shown rounded to the nearest whole unit.
pub fn format_budget(currency: &str, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    format!("{} {}", currency, rounded.normalize())
}

/// Days relative to today: `12d`, `today`, `3d ago`.
pub fn days_label(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        d if d > 0 => format!("{}d", d),
        d => format!("{}d ago", d.abs()),
    }
}
