pub mod aggregate;
pub mod attachments;
pub mod backup;
pub mod ledger;
pub mod log;
pub mod marketing;
pub mod payroll;
pub mod projection;
pub mod registry;
pub mod scheduler;
pub mod session;
