use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    Upcoming,
    Due,
    Overdue,
}

impl FollowUpStatus {
    /// overdue ≤ 0 < due ≤ 7 < upcoming
    pub fn classify(days_until_due: i64) -> Self {
        if days_until_due <= 0 {
            FollowUpStatus::Overdue
        } else if days_until_due <= 7 {
            FollowUpStatus::Due
        } else {
            FollowUpStatus::Upcoming
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpStatus::Upcoming => "upcoming",
            FollowUpStatus::Due => "due",
            FollowUpStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for FollowUpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived "next service due" estimate for one customer.
/// Never stored; rebuilt from the ledger on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpPrediction {
    pub id: String,
    pub customer_name: String,
    pub customer_contact: String,
    pub customer_code: Option<String>,
    pub vehicle: Option<String>,
    pub registration: Option<String>,
    pub last_service_date: NaiveDate,
    pub last_service_type: String,
    pub last_distance: u32,
    pub next_service_distance: u32,
    pub estimated_next_date: NaiveDate,
    pub days_until_due: i64,
    pub status: FollowUpStatus,
    pub dismissed: bool,
}
