//! Follow-up scheduler: predicts when each customer's vehicle is next due
//! for service from the latest odometer reading in the ledger.

use crate::core::ledger::Ledger;
use crate::models::customer::customer_key;
use crate::models::followup::{FollowUpPrediction, FollowUpStatus};
use crate::models::transaction::{CustomerRef, IncomeDetails, TransactionRecord};
use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Assumed average distance driven per month.
pub const AVG_MONTHLY_KM: u32 = 3750;
/// Fallback interval until the user stores a different one.
pub const DEFAULT_INTERVAL_KM: u32 = 5000;

/// One keyword → interval rule. Order matters: the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRule {
    pub keyword: String,
    pub km: u32,
}

impl IntervalRule {
    pub fn new(keyword: &str, km: u32) -> Self {
        Self {
            keyword: keyword.to_string(),
            km,
        }
    }
}

pub fn default_interval_rules() -> Vec<IntervalRule> {
    [
        ("oil change", 5000),
        ("oil", 5000),
        ("engine oil", 5000),
        ("filter change", 10000),
        ("air filter", 15000),
        ("brake service", 20000),
        ("brakes", 20000),
        ("brake pads", 25000),
        ("brake", 20000),
        ("tire rotation", 10000),
        ("tires", 40000),
        ("transmission", 50000),
        ("coolant", 40000),
        ("spark plugs", 50000),
        ("timing belt", 100000),
        ("battery", 50000),
        ("ac service", 20000),
        ("ac", 20000),
        ("general service", 10000),
        ("service", 10000),
        ("tuning", 15000),
        ("tune up", 15000),
    ]
    .into_iter()
    .map(|(k, km)| IntervalRule::new(k, km))
    .collect()
}

/// Interval for a free-text service type: first keyword contained in the
/// normalized text, otherwise `default_km`.
pub fn service_interval(service_type: &str, rules: &[IntervalRule], default_km: u32) -> u32 {
    let normalized = service_type.trim().to_lowercase();

    rules
        .iter()
        .find(|r| !r.keyword.is_empty() && normalized.contains(&r.keyword.to_lowercase()))
        .map_or(default_km, |r| r.km)
}

/// `round(distance / AVG_MONTHLY_KM * 30)` days, half away from zero.
pub fn days_for_distance(distance_km: u32) -> i64 {
    let days = Decimal::from(distance_km) * Decimal::from(30) / Decimal::from(AVG_MONTHLY_KM);

    days.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(i64::MAX)
}

/// Inputs the scheduler reads besides the ledger.
#[derive(Debug, Clone)]
pub struct SchedulerSettings<'a> {
    pub rules: &'a [IntervalRule],
    pub default_interval_km: u32,
    pub today: NaiveDate,
}

struct Candidate<'a> {
    record: &'a TransactionRecord,
    customer: &'a CustomerRef,
    details: &'a IncomeDetails,
    service_type: String,
    distance: u32,
}

fn qualifying(record: &TransactionRecord) -> Option<Candidate<'_>> {
    let details = record.income()?;
    let customer = details.customer.as_ref()?;

    if customer.name.trim().is_empty() || customer.contact.trim().is_empty() {
        return None;
    }

    let service_type = details
        .service_type
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| record.note.as_deref().filter(|s| !s.trim().is_empty()))?
        .trim()
        .to_string();

    let distance = details.distance_km?;

    Some(Candidate {
        record,
        customer,
        details,
        service_type,
        distance,
    })
}

/// Later date wins; on the same date the higher reading wins; on a full tie
/// the record inserted last wins.
fn supersedes(new: &Candidate<'_>, current: &Candidate<'_>) -> bool {
    (new.record.occurred_on, new.distance) >= (current.record.occurred_on, current.distance)
}

/// Active predictions, most urgent first.
pub fn compute_predictions(
    ledger: &Ledger,
    settings: &SchedulerSettings<'_>,
    dismissed: &HashSet<String>,
) -> Vec<FollowUpPrediction> {
    let mut latest: HashMap<String, Candidate<'_>> = HashMap::new();

    for record in ledger.iter() {
        let Some(cand) = qualifying(record) else {
            continue;
        };

        let key = customer_key(&cand.customer.name, &cand.customer.contact);
        match latest.get(&key) {
            Some(current) if !supersedes(&cand, current) => {}
            _ => {
                latest.insert(key, cand);
            }
        }
    }

    let mut out: Vec<FollowUpPrediction> = latest
        .into_iter()
        .map(|(key, cand)| predict(&key, &cand, settings))
        .filter(|p| !dismissed.contains(&p.id))
        .collect();

    out.sort_by(|a, b| {
        a.days_until_due
            .cmp(&b.days_until_due)
            .then_with(|| a.customer_name.to_lowercase().cmp(&b.customer_name.to_lowercase()))
    });
    out
}

fn predict(key: &str, cand: &Candidate<'_>, settings: &SchedulerSettings<'_>) -> FollowUpPrediction {
    let last_date = cand.record.occurred_on;
    let interval = service_interval(
        &cand.service_type,
        settings.rules,
        settings.default_interval_km,
    );
    let next_distance = cand.distance.saturating_add(interval);

    let days = days_for_distance(next_distance - cand.distance);
    let estimated = last_date
        .checked_add_signed(Duration::days(days))
        .unwrap_or(last_date);
    let days_until_due = (estimated - settings.today).num_days();

    FollowUpPrediction {
        id: format!("{}-{}", key, last_date.format("%Y-%m-%d")),
        customer_name: cand.customer.name.clone(),
        customer_contact: cand.customer.contact.clone(),
        customer_code: cand.customer.code.clone(),
        vehicle: cand.details.vehicle.clone(),
        registration: cand.details.registration.clone(),
        last_service_date: last_date,
        last_service_type: cand.service_type.clone(),
        last_distance: cand.distance,
        next_service_distance: next_distance,
        estimated_next_date: estimated,
        days_until_due,
        status: FollowUpStatus::classify(days_until_due),
        dismissed: false,
    }
}

/// Counts shown above the follow-up list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FollowUpStats {
    pub total: usize,
    pub overdue: usize,
    pub due: usize,
    pub upcoming: usize,
}

pub fn stats(predictions: &[FollowUpPrediction]) -> FollowUpStats {
    predictions
        .iter()
        .fold(FollowUpStats::default(), |mut s, p| {
            s.total += 1;
            match p.status {
                FollowUpStatus::Overdue => s.overdue += 1,
                FollowUpStatus::Due => s.due += 1,
                FollowUpStatus::Upcoming => s.upcoming += 1,
            }
            s
        })
}

/// Status filter plus a case-insensitive search over name, contact,
/// vehicle and registration.
pub fn filter<'a>(
    predictions: &'a [FollowUpPrediction],
    status: Option<FollowUpStatus>,
    query: Option<&str>,
) -> Vec<&'a FollowUpPrediction> {
    let query = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

    predictions
        .iter()
        .filter(|p| status.is_none_or(|s| p.status == s))
        .filter(|p| match &query {
            None => true,
            Some(q) => {
                p.customer_name.to_lowercase().contains(q)
                    || p.customer_contact.contains(q.as_str())
                    || p.vehicle.as_deref().is_some_and(|v| v.to_lowercase().contains(q))
                    || p.registration
                        .as_deref()
                        .is_some_and(|r| r.to_lowercase().contains(q))
            }
        })
        .collect()
}

/// Reminder text for a customer, ready to paste into a messaging app.
pub fn reminder_message(p: &FollowUpPrediction, business_name: &str, business_phone: &str) -> String {
    let vehicle = p.vehicle.as_deref().unwrap_or("N/A");
    let registration = p.registration.as_deref().unwrap_or("N/A");

    let mut msg = format!(
        "Hello {}!\n\nThis is a friendly reminder from {}.\n\n\
         Your vehicle ({} - {}) is due for its next service:\n\n\
         Service type: {}\nLast service: {}\nLast reading: {} km\nNext service at: {} km\n\n\
         Please schedule your appointment to keep your vehicle running smoothly!\n",
        p.customer_name,
        business_name,
        vehicle,
        registration,
        p.last_service_type,
        p.last_service_date.format("%Y-%m-%d"),
        p.last_distance,
        p.next_service_distance,
    );

    if !business_phone.trim().is_empty() {
        msg.push_str(&format!("\nCall/WhatsApp: {}\n", business_phone.trim()));
    }
    msg.push_str(&format!("\nThank you for choosing {}!", business_name));
    msg
}
