use crate::errors::{AppError, AppResult};
use crate::models::month::YearMonth;
use chrono::NaiveDate;

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a period into an inclusive date range.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any two of the above joined by `:` (e.g. `2024-01:2024-03`)
pub fn parse_period(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    if let Some((start, end)) = p.split_once(':') {
        let (from, _) = parse_single(start)?;
        let (_, to) = parse_single(end)?;
        if from > to {
            return Err(AppError::InvalidDate(format!("empty period: {p}")));
        }
        return Ok((from, to));
    }
    parse_single(p)
}

fn parse_single(p: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let p = p.trim();

    // YYYY-MM-DD
    if let Some(d) = parse_date(p) {
        return Ok((d, d));
    }

    // YYYY-MM
    if p.len() == 7
        && let Ok(ym) = YearMonth::parse(p)
    {
        return Ok((ym.first_day(), ym.last_day()));
    }

    // YYYY
    if p.len() == 4
        && let Ok(year) = p.parse::<i32>()
        && let (Some(a), Some(b)) = (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        )
    {
        return Ok((a, b));
    }

    Err(AppError::InvalidDate(format!("Invalid period: {}", p)))
}
