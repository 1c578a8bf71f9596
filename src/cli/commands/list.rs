use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::daily_totals;
use crate::core::projection::{Action, TransactionView, project_totals, project_transaction};
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::models::month::YearMonth;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_kind, color_for_profit, colorize_optional};
use crate::utils::date;
use crate::utils::formatting::bold;
use crate::utils::table::{Column, Table};
use crate::utils::{format_budget, format_money};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { period, now } = cmd {
        cfg.role.require(Action::ViewEntries)?;

        let (from, to) = if *now {
            let t = date::today();
            (t, t)
        } else if let Some(p) = period {
            date::parse_period(p)?
        } else {
            let ym = YearMonth::of(date::today());
            (ym.first_day(), ym.last_day())
        };

        let session = Session::open(cfg)?;

        let mut any = false;
        for (d, records) in session.ledger.range(from, to) {
            any = true;
            header(d.format("%A %Y-%m-%d"));

            let views: Vec<TransactionView> = records
                .iter()
                .map(|r| project_transaction(cfg.role, r))
                .collect();
            print_views(&views, &cfg.currency);

            let totals = daily_totals(&session.ledger, *d);
            if let Some(t) = project_totals(cfg.role, &totals) {
                println!(
                    "{} {}  {} {}  {} {}{}{}  {} {}\n",
                    bold("Income:"),
                    format_money(&cfg.currency, t.income),
                    bold("Expense:"),
                    format_money(&cfg.currency, t.expense),
                    bold("Profit:"),
                    color_for_profit(t.gross_profit),
                    format_money(&cfg.currency, t.gross_profit),
                    RESET,
                    bold("Marketing:"),
                    format_budget(&cfg.currency, t.marketing_budget),
                );
            }
        }

        if !any {
            info(format!("No entries between {} and {}.", from, to));
        }
    }

    Ok(())
}

fn print_views(views: &[TransactionView], currency: &str) {
    let mut table = Table::new(vec![
        Column::new("ID", 32),
        Column::new("KIND", 15),
        Column::new("AMOUNT", 12),
        Column::new("CUSTOMER", 18),
        Column::new("CONTACT", 14),
        Column::new("CODE", 9),
        Column::new("VEHICLE", 20),
        Column::new("KM", 7),
        Column::new("NOTE", 20),
    ]);

    for v in views {
        let amount = v.amount.map(|a| format_money(currency, a));
        table.add_row(vec![
            v.id.clone(),
            format!("{}{}{}", color_for_kind(v.kind), v.kind, RESET),
            colorize_optional(amount.as_deref()),
            colorize_optional(v.customer_name.as_deref()),
            colorize_optional(v.customer_contact.as_deref()),
            colorize_optional(v.customer_code.as_deref()),
            colorize_optional(v.vehicle.as_deref()),
            colorize_optional(v.distance_km.map(|k| k.to_string()).as_deref()),
            colorize_optional(v.note.as_deref()),
        ]);
    }

    print!("{}", table.render());
}
