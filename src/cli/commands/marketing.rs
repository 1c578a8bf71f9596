use crate::cli::commands::date_or_today;
use crate::cli::parser::{Commands, MarketingCmd};
use crate::config::Config;
use crate::core::marketing::MarketingLogic;
use crate::core::projection::Action;
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::models::month::YearMonth;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::pad_right;
use crate::utils::table::{Column, Table};
use crate::utils::{date, format_budget, format_money};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Marketing { action } = cmd else {
        return Ok(());
    };

    cfg.role.require(Action::ManageMarketing)?;
    let session = Session::open(cfg)?;
    let conn = &session.pool.conn;

    match action {
        MarketingCmd::Add {
            title,
            amount,
            date,
            notes,
        } => {
            let d = date_or_today(date.as_ref())?;
            let e = MarketingLogic::add(conn, d, title, *amount, notes.clone())?;
            success(format!(
                "Marketing expense {} recorded: {} {}",
                e.id,
                e.title,
                format_money(&cfg.currency, e.amount)
            ));
        }

        MarketingCmd::Del { id } => {
            MarketingLogic::delete(conn, id)?;
            success(format!("Marketing expense {} deleted.", id));
        }

        MarketingCmd::List { month } => {
            let ym = match month {
                Some(m) => YearMonth::parse(m)?,
                None => YearMonth::of(date::today()),
            };
            let report = MarketingLogic::report(conn, &session.ledger, ym)?;

            header(format!("Marketing budget for {}", ym));
            println!(
                "{} {}",
                pad_right("Budget:", 12),
                format_budget(&cfg.currency, report.budget)
            );
            println!(
                "{} {}",
                pad_right("Spent:", 12),
                format_money(&cfg.currency, report.spent)
            );
            println!(
                "{} {}\n",
                pad_right("Remaining:", 12),
                format_budget(&cfg.currency, report.remaining)
            );

            if report.over_budget() {
                warning("Marketing spend is over the reserved budget.");
            }

            if report.expenses.is_empty() {
                info("No marketing expenses this month.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 32),
                Column::new("DATE", 10),
                Column::new("TITLE", 24),
                Column::new("AMOUNT", 12),
                Column::new("NOTES", 24),
            ]);
            for e in &report.expenses {
                table.add_row(vec![
                    e.id.clone(),
                    e.date.to_string(),
                    e.title.clone(),
                    format_money(&cfg.currency, e.amount),
                    colorize_optional(e.notes.as_deref()),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
