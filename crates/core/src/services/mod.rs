pub mod ledger_service;
pub mod networth_service;
pub mod price_resolver;
pub mod snapshot_service;
pub mod summary_service;
pub mod valuation_service;
