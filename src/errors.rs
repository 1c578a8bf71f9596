//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid month format: {0} (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid transaction kind: {0}")]
    InvalidKind(String),

    #[error("Invalid salary type: {0}")]
    InvalidSalaryType(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("No transaction {id} on {date}")]
    TransactionNotFound { date: String, id: String },

    #[error("Unknown customer: {0}")]
    CustomerNotFound(String),

    #[error("Unknown employee: {0}")]
    EmployeeNotFound(String),

    #[error("Unknown follow-up: {0}")]
    FollowUpNotFound(String),

    #[error("Not allowed for role '{role}': {action}")]
    PermissionDenied { role: String, action: String },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export / import errors
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Import rejected: {0}")]
    Import(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
