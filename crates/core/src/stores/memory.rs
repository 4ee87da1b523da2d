use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::FundingAccountsStore;

/// In-memory funding-account balances.
///
/// The reference store for the single-process scope: a mutex-guarded
/// map. Per-account write serialization is the ledger's job; this
/// store just makes each individual read/write atomic.
pub struct InMemoryFundingAccounts {
    balances: Mutex<HashMap<String, f64>>,
}

impl InMemoryFundingAccounts {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_balances(balances: HashMap<String, f64>) -> Self {
        Self {
            balances: Mutex::new(balances),
        }
    }

    /// The known account names, sorted for stable display.
    #[must_use]
    pub fn account_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, f64>> {
        self.balances.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for InMemoryFundingAccounts {
    fn default() -> Self {
        Self::new()
    }
}

impl FundingAccountsStore for InMemoryFundingAccounts {
    fn get_balance(&self, account: &str) -> Option<f64> {
        self.lock().get(account).copied()
    }

    fn set_balance(&self, account: &str, amount: f64) {
        self.lock().insert(account.to_string(), amount);
    }
}
