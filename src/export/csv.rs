use crate::core::ledger::Ledger;
use crate::errors::AppResult;
use chrono::NaiveDate;
use csv::Writer;
use std::path::Path;

/// Write the ledger as flat rows, optionally limited to `[from, to]`.
/// Returns the number of rows written.
pub fn write_ledger_csv(
    path: &Path,
    ledger: &Ledger,
    bounds: Option<(NaiveDate, NaiveDate)>,
) -> AppResult<usize> {
    let mut wtr = Writer::from_path(path)?;

    wtr.write_record([
        "date",
        "id",
        "kind",
        "amount",
        "note",
        "month",
        "customer_name",
        "customer_contact",
        "customer_code",
        "channel",
        "vehicle",
        "registration",
        "service_type",
        "distance_km",
        "document",
    ])?;

    let mut rows = 0;
    for r in ledger.iter() {
        if let Some((from, to)) = bounds
            && (r.occurred_on < from || r.occurred_on > to)
        {
            continue;
        }

        let income = r.income();
        let customer = r.customer();
        let opt = |v: Option<&String>| v.cloned().unwrap_or_default();

        wtr.write_record(&[
            r.date_str(),
            r.id.clone(),
            r.kind().to_string(),
            r.amount.to_string(),
            opt(r.note.as_ref()),
            r.details.month().map(|m| m.to_string()).unwrap_or_default(),
            opt(customer.map(|c| &c.name)),
            opt(customer.map(|c| &c.contact)),
            opt(customer.and_then(|c| c.code.as_ref())),
            opt(customer.and_then(|c| c.channel.as_ref())),
            opt(income.and_then(|d| d.vehicle.as_ref())),
            opt(income.and_then(|d| d.registration.as_ref())),
            opt(income.and_then(|d| d.service_type.as_ref())),
            income
                .and_then(|d| d.distance_km)
                .map(|k| k.to_string())
                .unwrap_or_default(),
            opt(income.and_then(|d| d.document.as_ref())),
        ])?;
        rows += 1;
    }

    wtr.flush()?;
    Ok(rows)
}
