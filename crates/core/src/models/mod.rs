pub mod expense;
pub mod holding;
pub mod instrument;
pub mod ledger;
pub mod quote;
pub mod valuation;
