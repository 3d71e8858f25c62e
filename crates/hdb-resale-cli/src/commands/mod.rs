pub mod loan;
pub mod purchase;
pub mod scenarios;
