pub mod customer;
pub mod employee;
pub mod followup;
pub mod marketing;
pub mod month;
pub mod role;
pub mod transaction;
