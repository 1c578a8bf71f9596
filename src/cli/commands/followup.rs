use crate::cli::commands::date_or_today;
use crate::cli::parser::{Commands, FollowupCmd};
use crate::config::Config;
use crate::core::projection::{Action, Field, project_prediction};
use crate::core::scheduler::{filter, reminder_message, stats};
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{RESET, color_for_status, colorize_optional};
use crate::utils::formatting::days_label;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Followup { action } = cmd else {
        return Ok(());
    };

    match action {
        FollowupCmd::List {
            status,
            search,
            as_of,
        } => {
            cfg.role.require(Action::ViewFollowUps)?;
            let today = date_or_today(as_of.as_ref())?;

            let session = Session::open(cfg)?;
            let predictions = session.predictions(cfg, today);
            let s = stats(&predictions);

            header(format!("Follow-ups as of {}", today));
            println!(
                "Total: {}  Overdue: {}  Due: {}  Upcoming: {}\n",
                s.total, s.overdue, s.due, s.upcoming
            );

            let shown = filter(&predictions, *status, search.as_deref());
            if shown.is_empty() {
                info("No follow-ups to show.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 40),
                Column::new("STATUS", 8),
                Column::new("DUE", 10),
                Column::new("IN", 8),
                Column::new("CUSTOMER", 18),
                Column::new("CONTACT", 14),
                Column::new("VEHICLE", 18),
                Column::new("SERVICE", 16),
                Column::new("NEXT KM", 8),
            ]);

            for p in shown {
                let v = project_prediction(cfg.role, p);
                let vehicle = match (&v.vehicle, &v.registration) {
                    (Some(a), Some(b)) => Some(format!("{a} ({b})")),
                    (a, b) => a.clone().or_else(|| b.clone()),
                };

                table.add_row(vec![
                    v.id.clone(),
                    format!("{}{}{}", color_for_status(v.status), v.status, RESET),
                    v.estimated_next_date.to_string(),
                    days_label(v.days_until_due),
                    v.customer_name.clone(),
                    colorize_optional(v.customer_contact.as_deref()),
                    colorize_optional(vehicle.as_deref()),
                    v.last_service_type.clone(),
                    colorize_optional(v.next_service_distance.map(|k| k.to_string()).as_deref()),
                ]);
            }

            print!("{}", table.render());
        }

        FollowupCmd::Dismiss { id, as_of } => {
            cfg.role.require(Action::DismissFollowUp)?;
            let today = date_or_today(as_of.as_ref())?;

            let mut session = Session::open(cfg)?;
            session.dismiss_prediction(cfg, id, today)?;
            success(format!("Follow-up {} dismissed.", id));
        }

        FollowupCmd::Remind { id, as_of } => {
            cfg.role.require(Action::ViewFollowUps)?;
            if !cfg.role.sees(Field::CustomerContact) {
                return Err(AppError::PermissionDenied {
                    role: cfg.role.to_string(),
                    action: "send reminders".to_string(),
                });
            }
            let today = date_or_today(as_of.as_ref())?;

            let session = Session::open(cfg)?;
            let predictions = session.predictions(cfg, today);
            let p = predictions
                .iter()
                .find(|p| p.id == *id)
                .ok_or_else(|| AppError::FollowUpNotFound(id.clone()))?;

            println!("To: {} ({})\n", p.customer_name, p.customer_contact);
            println!(
                "{}",
                reminder_message(p, &cfg.business_name, &cfg.business_phone)
            );
        }

        FollowupCmd::Interval { km } => match km {
            Some(km) => {
                cfg.role.require(Action::EditSettings)?;
                let mut session = Session::open(cfg)?;
                session.set_default_interval(*km)?;
                success(format!("Default service interval set to {} km.", km));
            }
            None => {
                cfg.role.require(Action::ViewFollowUps)?;
                let session = Session::open(cfg)?;
                info(format!(
                    "Default service interval: {} km",
                    session.default_interval_km
                ));
            }
        },
    }

    Ok(())
}
