//! Per-role visibility of fields and availability of actions.
//!
//! This is a display policy evaluated on every render. It assumes the data
//! handed to it is already scoped to the current actor.

use crate::core::aggregate::{MonthlyTotals, Totals};
use crate::errors::{AppError, AppResult};
use crate::models::followup::{FollowUpPrediction, FollowUpStatus};
use crate::models::role::Role;
use crate::models::transaction::{TransactionKind, TransactionRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    CustomerName,
    CustomerContact,
    CustomerCode,
    Vehicle,
    ServiceNote,
    Distance,
    Channel,
    Discount,
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddIncome,
    AddExpense,
    AddMonthly,
    DeleteEntry,
    ClearDate,
    ViewEntries,
    ViewDailySummary,
    ViewMonthlySummary,
    ViewCustomers,
    SetDiscount,
    ViewFollowUps,
    DismissFollowUp,
    EditSettings,
    ManageMarketing,
    ManageEmployees,
    Export,
    Import,
    Backup,
    Maintenance,
}

impl Action {
    pub fn describe(&self) -> &'static str {
        match self {
            Action::AddIncome => "add income entries",
            Action::AddExpense => "add expense entries",
            Action::AddMonthly => "add monthly entries",
            Action::DeleteEntry => "delete entries",
            Action::ClearDate => "clear a whole date",
            Action::ViewEntries => "view entries",
            Action::ViewDailySummary => "view daily summaries",
            Action::ViewMonthlySummary => "view monthly summaries",
            Action::ViewCustomers => "view customers",
            Action::SetDiscount => "record discounts",
            Action::ViewFollowUps => "view follow-ups",
            Action::DismissFollowUp => "dismiss follow-ups",
            Action::EditSettings => "change settings",
            Action::ManageMarketing => "manage the marketing budget",
            Action::ManageEmployees => "manage employees",
            Action::Export => "export data",
            Action::Import => "import data",
            Action::Backup => "back up the database",
            Action::Maintenance => "run database maintenance",
        }
    }
}

impl Role {
    pub fn can(&self, action: Action) -> bool {
        match self {
            Role::Owner => true,
            Role::Editor => matches!(
                action,
                Action::AddIncome
                    | Action::AddExpense
                    | Action::AddMonthly
                    | Action::DeleteEntry
                    | Action::ViewEntries
                    | Action::ViewDailySummary
                    | Action::ViewCustomers
                    | Action::SetDiscount
                    | Action::ViewFollowUps
                    | Action::DismissFollowUp
                    | Action::ManageMarketing
            ),
            Role::Staff => matches!(
                action,
                Action::AddIncome | Action::ViewEntries | Action::ViewFollowUps
            ),
        }
    }

    pub fn sees(&self, field: Field) -> bool {
        match self {
            Role::Owner | Role::Editor => true,
            Role::Staff => !matches!(
                field,
                Field::Amount | Field::CustomerContact | Field::Discount | Field::Document
            ),
        }
    }

    /// Gate an action, turning a refusal into an error.
    pub fn require(&self, action: Action) -> AppResult<()> {
        if self.can(action) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied {
                role: self.to_string(),
                action: action.describe().to_string(),
            })
        }
    }

    pub fn can_add(&self, kind: TransactionKind) -> bool {
        match kind {
            TransactionKind::Income => self.can(Action::AddIncome),
            TransactionKind::Expense => self.can(Action::AddExpense),
            TransactionKind::MonthlyIncome | TransactionKind::MonthlyExpense => {
                self.can(Action::AddMonthly)
            }
        }
    }
}

/// A record as one role may see it. Hidden fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionView {
    pub id: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub amount: Option<Decimal>,
    pub note: Option<String>,
    pub customer_name: Option<String>,
    pub customer_contact: Option<String>,
    pub customer_code: Option<String>,
    pub vehicle: Option<String>,
    pub distance_km: Option<u32>,
    pub channel: Option<String>,
    pub discount: Option<String>,
    pub document: Option<String>,
}

fn keep<T>(role: Role, field: Field, value: Option<T>) -> Option<T> {
    if role.sees(field) { value } else { None }
}

pub fn project_transaction(role: Role, r: &TransactionRecord) -> TransactionView {
    let income = r.income();
    let customer = r.customer();

    let vehicle = income.and_then(|d| match (&d.vehicle, &d.registration) {
        (Some(v), Some(reg)) => Some(format!("{v} ({reg})")),
        (Some(v), None) => Some(v.clone()),
        (None, Some(reg)) => Some(reg.clone()),
        (None, None) => None,
    });

    let discount = customer.and_then(|c| c.discount).map(|d| {
        if d.applied {
            "applied".to_string()
        } else if d.used {
            "used".to_string()
        } else if d.eligible {
            "eligible".to_string()
        } else {
            "none".to_string()
        }
    });

    let note = income
        .and_then(|d| d.service_type.clone())
        .or_else(|| r.note.clone());

    TransactionView {
        id: r.id.clone(),
        date: r.occurred_on,
        kind: r.kind(),
        amount: keep(role, Field::Amount, Some(r.amount)),
        note: keep(role, Field::ServiceNote, note),
        customer_name: keep(role, Field::CustomerName, customer.map(|c| c.name.clone())),
        customer_contact: keep(
            role,
            Field::CustomerContact,
            customer.map(|c| c.contact.clone()),
        ),
        customer_code: keep(role, Field::CustomerCode, customer.and_then(|c| c.code.clone())),
        vehicle: keep(role, Field::Vehicle, vehicle),
        distance_km: keep(role, Field::Distance, income.and_then(|d| d.distance_km)),
        channel: keep(role, Field::Channel, customer.and_then(|c| c.channel.clone())),
        discount: keep(role, Field::Discount, discount),
        document: keep(role, Field::Document, income.and_then(|d| d.document.clone())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionView {
    pub id: String,
    pub customer_name: String,
    pub customer_contact: Option<String>,
    pub customer_code: Option<String>,
    pub vehicle: Option<String>,
    pub registration: Option<String>,
    pub last_service_date: NaiveDate,
    pub last_service_type: String,
    pub last_distance: Option<u32>,
    pub next_service_distance: Option<u32>,
    pub estimated_next_date: NaiveDate,
    pub days_until_due: i64,
    pub status: FollowUpStatus,
}

pub fn project_prediction(role: Role, p: &FollowUpPrediction) -> PredictionView {
    PredictionView {
        id: p.id.clone(),
        customer_name: p.customer_name.clone(),
        customer_contact: keep(role, Field::CustomerContact, Some(p.customer_contact.clone())),
        customer_code: keep(role, Field::CustomerCode, p.customer_code.clone()),
        vehicle: keep(role, Field::Vehicle, p.vehicle.clone()),
        registration: keep(role, Field::Vehicle, p.registration.clone()),
        last_service_date: p.last_service_date,
        last_service_type: p.last_service_type.clone(),
        last_distance: keep(role, Field::Distance, Some(p.last_distance)),
        next_service_distance: keep(role, Field::Distance, Some(p.next_service_distance)),
        estimated_next_date: p.estimated_next_date,
        days_until_due: p.days_until_due,
        status: p.status,
    }
}

/// Daily figures, or nothing when the role may not see them.
pub fn project_totals(role: Role, totals: &Totals) -> Option<Totals> {
    (role.can(Action::ViewDailySummary) && role.sees(Field::Amount)).then_some(*totals)
}

pub fn project_monthly(role: Role, totals: &MonthlyTotals) -> Option<MonthlyTotals> {
    (role.can(Action::ViewMonthlySummary) && role.sees(Field::Amount)).then_some(*totals)
}
