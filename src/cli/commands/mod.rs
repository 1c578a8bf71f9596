pub mod add;
pub mod backup;
pub mod bill;
pub mod config;
pub mod customer;
pub mod db;
pub mod del;
pub mod employee;
pub mod export;
pub mod followup;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod marketing;
pub mod summary;

use crate::errors::{AppError, AppResult};
use crate::utils::date;
use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` argument.
pub(crate) fn date_arg(s: &str) -> AppResult<NaiveDate> {
    date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Optional date argument, today when missing.
pub(crate) fn date_or_today(s: Option<&String>) -> AppResult<NaiveDate> {
    s.map_or_else(|| Ok(date::today()), |d| date_arg(d))
}
