use crate::cli::commands::date_or_today;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{Totals, daily_totals, monthly_totals};
use crate::core::projection::{Action, project_monthly, project_totals};
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::models::month::YearMonth;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_profit};
use crate::utils::formatting::pad_right;
use crate::utils::{format_budget, format_money};

fn print_totals(t: &Totals, currency: &str) {
    let line = |label: &str, value: String| println!("{} {}", pad_right(label, 18), value);

    line("Income:", format_money(currency, t.income));
    line("Expense:", format_money(currency, t.expense));
    line(
        "Gross profit:",
        format!(
            "{}{}{}",
            color_for_profit(t.gross_profit),
            format_money(currency, t.gross_profit),
            RESET
        ),
    );
    line("Marketing (20%):", format_budget(currency, t.marketing_budget));
    line(
        "Net profit:",
        format!(
            "{}{}{}",
            color_for_profit(t.net_profit),
            format_money(currency, t.net_profit),
            RESET
        ),
    );
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Summary { date, month } = cmd {
        if let Some(m) = month {
            cfg.role.require(Action::ViewMonthlySummary)?;
            let ym = YearMonth::parse(m)?;

            let session = Session::open(cfg)?;
            let totals = monthly_totals(&session.ledger, ym);
            let visible = project_monthly(cfg.role, &totals).ok_or_else(|| {
                AppError::PermissionDenied {
                    role: cfg.role.to_string(),
                    action: Action::ViewMonthlySummary.describe().to_string(),
                }
            })?;

            header(format!("Summary for {}", ym));
            print_totals(&visible.totals, &cfg.currency);
            println!("{} {}", pad_right("Saved dates:", 18), visible.saved_date_count);
        } else {
            cfg.role.require(Action::ViewDailySummary)?;
            let d = date_or_today(date.as_ref())?;

            let session = Session::open(cfg)?;
            let totals = daily_totals(&session.ledger, d);
            let visible = project_totals(cfg.role, &totals).ok_or_else(|| {
                AppError::PermissionDenied {
                    role: cfg.role.to_string(),
                    action: Action::ViewDailySummary.describe().to_string(),
                }
            })?;

            header(format!("Summary for {}", d));
            print_totals(&visible, &cfg.currency);
        }
    }

    Ok(())
}
