use crate::cli::parser::{Commands, CustomerCmd};
use crate::config::Config;
use crate::core::projection::{Action, Field};
use crate::core::session::Session;
use crate::errors::AppResult;
use crate::models::customer::{DiscountState, customer_key};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET, colorize_optional};
use crate::utils::format_money;
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

fn discount_label(d: &DiscountState) -> &'static str {
    if d.applied {
        "applied"
    } else if d.used {
        "used"
    } else if d.eligible {
        "eligible"
    } else {
        "none"
    }
}

#[derive(Default)]
struct Visits {
    count: usize,
    last: Option<NaiveDate>,
    spent: Decimal,
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Customer { action } = cmd {
        match action {
            CustomerCmd::List { search } => {
                cfg.role.require(Action::ViewCustomers)?;
                let session = Session::open(cfg)?;

                let mut visits: HashMap<String, Visits> = HashMap::new();
                for r in session.ledger.iter() {
                    if let Some(c) = r.customer() {
                        let v = visits.entry(customer_key(&c.name, &c.contact)).or_default();
                        v.count += 1;
                        v.spent += r.amount;
                        v.last = v.last.max(Some(r.occurred_on));
                    }
                }

                let query = search.as_deref().map(|s| s.trim().to_lowercase());
                let mut customers: Vec<_> = session
                    .registry
                    .list()
                    .into_iter()
                    .filter(|c| match &query {
                        None => true,
                        Some(q) => {
                            c.name.to_lowercase().contains(q)
                                || c.contact.contains(q.as_str())
                                || c.code.to_lowercase().contains(q)
                        }
                    })
                    .collect();
                customers.sort_by_key(|c| c.name.to_lowercase());

                if customers.is_empty() {
                    info("No customers found.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::new("CODE", 9),
                    Column::new("NAME", 22),
                    Column::new("CONTACT", 16),
                    Column::new("DISCOUNT", 9),
                    Column::new("VISITS", 6),
                    Column::new("LAST VISIT", 10),
                    Column::new("SPENT", 14),
                ]);

                for c in customers {
                    let v = visits.remove(&c.key()).unwrap_or_default();
                    let contact = cfg.role.sees(Field::CustomerContact).then_some(c.contact.as_str());
                    let spent = cfg
                        .role
                        .sees(Field::Amount)
                        .then(|| format_money(&cfg.currency, v.spent));

                    table.add_row(vec![
                        c.code.clone(),
                        c.name.clone(),
                        colorize_optional(contact),
                        discount_label(&c.discount).to_string(),
                        v.count.to_string(),
                        v.last
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| format!("{GREY}--{RESET}")),
                        colorize_optional(spent.as_deref()),
                    ]);
                }

                print!("{}", table.render());
            }

            CustomerCmd::Discount { code, state } => {
                cfg.role.require(Action::SetDiscount)?;
                let mut session = Session::open(cfg)?;

                let updated = session.set_discount(code, state.state())?;
                success(format!(
                    "Discount for {} ({}) is now '{}'",
                    updated.code,
                    updated.name,
                    discount_label(&updated.discount)
                ));
            }
        }
    }

    Ok(())
}
