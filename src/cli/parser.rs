use crate::core::session::DiscountDecision;
use crate::export::ExportFormat;
use crate::models::employee::{PaymentType, SalaryType};
use crate::models::followup::FollowUpStatus;
use crate::models::role::Role;
use crate::models::transaction::TransactionKind;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

/// Command-line interface definition for garageledger
/// Offline ledger for a car-service workshop, stored in SQLite
#[derive(Parser)]
#[command(
    name = "garageledger",
    version = env!("CARGO_PKG_VERSION"),
    about = "Workshop ledger: daily income/expenses, marketing budget, customer codes and service follow-ups",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Act as this role instead of the one in the config file
    #[arg(global = true, long = "role", value_enum)]
    pub role: Option<Role>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Amounts are exact decimals (`1500`, `249.99`).
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    Decimal::from_str(s.trim()).map_err(|_| format!("'{s}' is not a valid amount"))
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Add an income or expense entry
    Add {
        /// Date of the entry (YYYY-MM-DD); monthly entries go to the 1st of its month
        date: String,

        #[arg(long, value_enum, default_value = "income")]
        kind: TransactionKind,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Decimal,

        #[arg(long, help = "Service note (income) or description")]
        note: Option<String>,

        #[arg(long = "customer", help = "Customer name")]
        customer: Option<String>,

        #[arg(long = "contact", help = "Customer phone or contact")]
        contact: Option<String>,

        #[arg(long = "channel", help = "How the customer found us")]
        channel: Option<String>,

        #[arg(long = "vehicle")]
        vehicle: Option<String>,

        #[arg(long = "reg", help = "Registration (plate) number")]
        registration: Option<String>,

        #[arg(long = "service", help = "Service type, e.g. 'oil change'")]
        service: Option<String>,

        #[arg(long = "km", help = "Odometer reading at service time")]
        km: Option<u32>,

        #[arg(long = "bill", value_name = "FILE", help = "Attach a bill image or PDF")]
        bill: Option<PathBuf>,

        #[arg(long = "discount", value_enum, help = "Record the new-customer discount decision")]
        discount: Option<DiscountDecision>,
    },

    /// Delete one entry, or every entry of a date
    Del {
        date: String,

        #[arg(long = "id", help = "Entry id to delete; without it the whole date is cleared")]
        id: Option<String>,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List entries
    List {
        #[arg(long, short, help = "Filter by year/month/day or a custom range")]
        period: Option<String>,

        #[arg(long = "today", help = "Show only today's entries")]
        now: bool,
    },

    /// Show daily or monthly totals
    Summary {
        #[arg(long, value_name = "YYYY-MM-DD", conflicts_with = "month")]
        date: Option<String>,

        #[arg(long, value_name = "YYYY-MM")]
        month: Option<String>,
    },

    /// Customer registry
    Customer {
        #[command(subcommand)]
        action: CustomerCmd,
    },

    /// Service follow-ups predicted from odometer readings
    Followup {
        #[command(subcommand)]
        action: FollowupCmd,
    },

    /// Marketing spend against the reserved budget
    Marketing {
        #[command(subcommand)]
        action: MarketingCmd,
    },

    /// Employees and salary payments
    Employee {
        #[command(subcommand)]
        action: EmployeeCmd,
    },

    /// Print a time-limited link to an entry's attached bill
    Bill {
        /// Entry id
        id: String,

        #[arg(long = "ttl", default_value_t = 60, help = "Link validity in minutes")]
        ttl_minutes: i64,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Export the ledger
    Export {
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "CSV only: filter by year/month/day or a custom range"
        )]
        period: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Replace ledger and customers with a JSON export
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,
    },
}

#[derive(Subcommand)]
pub enum CustomerCmd {
    /// List registered customers with their visit history
    List {
        #[arg(long, help = "Filter by name, contact or code")]
        search: Option<String>,
    },

    /// Set the new-customer discount state
    Discount {
        /// Customer code, e.g. CUST0001
        code: String,

        #[arg(long, value_enum)]
        state: DiscountDecision,
    },
}

#[derive(Subcommand)]
pub enum FollowupCmd {
    /// Active predictions, most urgent first
    List {
        #[arg(long, value_enum)]
        status: Option<FollowUpStatus>,

        #[arg(long, help = "Search name, contact, vehicle or registration")]
        search: Option<String>,

        #[arg(long = "as-of", value_name = "YYYY-MM-DD", help = "Compute as of this date")]
        as_of: Option<String>,
    },

    /// Hide a prediction permanently
    Dismiss {
        id: String,

        #[arg(long = "as-of", value_name = "YYYY-MM-DD")]
        as_of: Option<String>,
    },

    /// Print a reminder message for a prediction
    Remind {
        id: String,

        #[arg(long = "as-of", value_name = "YYYY-MM-DD")]
        as_of: Option<String>,
    },

    /// Show or change the default service interval (km)
    Interval { km: Option<u32> },
}

#[derive(Subcommand)]
pub enum MarketingCmd {
    /// Record a marketing expense
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, value_parser = parse_amount, allow_hyphen_values = true)]
        amount: Decimal,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Defaults to today")]
        date: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a marketing expense
    Del { id: String },

    /// Budget, spend and remaining for a month
    List {
        #[arg(long, value_name = "YYYY-MM", help = "Defaults to the current month")]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum EmployeeCmd {
    /// Hire an employee
    Add {
        #[arg(long)]
        name: String,

        /// Job title (`--role` is the acting role)
        #[arg(long = "job")]
        job: String,

        #[arg(long = "salary-type", value_enum, default_value = "monthly")]
        salary_type: SalaryType,

        #[arg(long = "monthly", value_parser = parse_amount)]
        monthly_salary: Option<Decimal>,

        #[arg(long = "daily", value_parser = parse_amount)]
        daily_wage: Option<Decimal>,

        #[arg(long = "off-day")]
        off_day: Option<String>,

        #[arg(long)]
        reason: Option<String>,
    },

    /// List employees
    List {
        #[arg(long, help = "Include removed employees")]
        all: bool,
    },

    /// Remove (deactivate) an employee
    Remove { code: String },

    /// Record a salary payment
    Pay {
        code: String,

        #[arg(long = "type", value_enum, default_value = "monthly")]
        payment_type: PaymentType,

        #[arg(long, value_parser = parse_amount, help = "Defaults to the configured wage")]
        amount: Option<Decimal>,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Defaults to today")]
        date: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Salary payment history
    Payments {
        #[arg(long, help = "Only this employee")]
        code: Option<String>,
    },
}
