use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::expense::Expense;
use crate::models::holding::HoldingsSnapshot;

/// Source of a user's holdings. Required dependency of every read API:
/// when this fails, the whole aggregation fails — no partial result is
/// synthesized.
///
/// A user with no holdings of a class gets empty lists, not an error.
#[async_trait]
pub trait HoldingsRepository: Send + Sync {
    async fn list_holdings(&self, user_id: &str) -> Result<HoldingsSnapshot, CoreError>;
}

/// Source of a user's recorded expenses. Optional dependency: when this
/// fails, the net-worth calculator degrades to zero liabilities instead
/// of failing the read.
#[async_trait]
pub trait ExpenseSource: Send + Sync {
    async fn list_expenses(&self, user_id: &str) -> Result<Vec<Expense>, CoreError>;
}

/// Available balances of the funding accounts the invest flow draws
/// from. Callers (the ledger) serialize access per account; the store
/// itself only needs to read and write atomically per call.
pub trait FundingAccountsStore: Send + Sync {
    /// The available balance, or `None` for an unknown account.
    fn get_balance(&self, account: &str) -> Option<f64>;

    /// Overwrite an account's balance, creating the account if needed.
    fn set_balance(&self, account: &str, amount: f64);
}
