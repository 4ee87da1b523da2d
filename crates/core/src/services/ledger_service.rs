use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::ledger::{InvestAssetClass, InvestmentEntry, InvestmentForm};
use crate::stores::traits::FundingAccountsStore;

/// How many ledger entries are retained, most-recent-first.
pub const DEFAULT_RECENT_WINDOW: usize = 8;

/// Records investment submissions: validate, check the funding balance,
/// merge into (or append to) the ledger, deduct the amount.
///
/// One submission is a single synchronous transition. Submissions
/// against the same funding account are serialized by a per-account
/// lock, so the balance check and the decrement can never interleave
/// with another writer; merge and decrement are one atomic unit from
/// the caller's perspective (both applied or neither).
pub struct LedgerService {
    accounts: Arc<dyn FundingAccountsStore>,
    window: usize,
    /// Retained entries, most recent first.
    entries: Mutex<Vec<InvestmentEntry>>,
    account_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LedgerService {
    #[must_use]
    pub fn new(accounts: Arc<dyn FundingAccountsStore>) -> Self {
        Self::with_window(accounts, DEFAULT_RECENT_WINDOW)
    }

    #[must_use]
    pub fn with_window(accounts: Arc<dyn FundingAccountsStore>, window: usize) -> Self {
        Self {
            accounts,
            window,
            entries: Mutex::new(Vec::new()),
            account_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Record one investment submission.
    ///
    /// Returns the resulting ledger entry — freshly appended, or the
    /// merged entry when one already existed for the same
    /// (asset class, asset name). Any validation or balance failure
    /// leaves ledger and balances untouched.
    pub fn submit(&self, form: &InvestmentForm) -> Result<InvestmentEntry, CoreError> {
        let entry = self.validate(form)?;

        // Per-account critical section: balance check, merge and
        // decrement must not interleave with another submission
        // against the same account.
        let account_lock = self.account_lock(&entry.out_account);
        let _guard = lock_unpoisoned(&account_lock);

        let available = self.accounts.get_balance(&entry.out_account).unwrap_or(0.0);
        if available < entry.amount {
            return Err(CoreError::InsufficientBalance {
                account: entry.out_account.clone(),
                available,
                shortfall: entry.amount - available,
            });
        }

        let recorded = self.merge_or_append(entry);
        self.accounts
            .set_balance(&recorded.out_account, available - form.amount);

        Ok(recorded)
    }

    /// The retained entries, most recent first.
    #[must_use]
    pub fn recent_entries(&self) -> Vec<InvestmentEntry> {
        lock_unpoisoned(&self.entries).clone()
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        lock_unpoisoned(&self.entries).len()
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Validate a form and shape it into a candidate entry.
    /// No state is touched here.
    fn validate(&self, form: &InvestmentForm) -> Result<InvestmentEntry, CoreError> {
        let date_time = match (form.date_time, form.out_account.trim().is_empty()) {
            (Some(dt), false) => dt,
            _ => {
                return Err(CoreError::Validation(
                    "Date/Time, Out Account and Asset Class are mandatory.".into(),
                ))
            }
        };

        if !(form.amount > 0.0) {
            return Err(CoreError::Validation(
                "Investment Amount should be greater than 0.".into(),
            ));
        }

        let market = form.asset_class.is_market();
        if market {
            if form.selected_symbol.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Select a symbol/scheme from search before saving.".into(),
                ));
            }
            if !form.price_per_unit.is_some_and(|p| p > 0.0) {
                return Err(CoreError::Validation(
                    "Price / NAV must be greater than 0 for market assets.".into(),
                ));
            }
            if !form.units.is_some_and(|u| u > 0.0) {
                return Err(CoreError::Validation(
                    "Units / Quantity must be greater than 0.".into(),
                ));
            }
        } else {
            if form.asset_name.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Asset Name is mandatory for Fixed Deposit and Real Estate.".into(),
                ));
            }
            if form.asset_class == InvestAssetClass::FixedDeposit && form.maturity_date.is_none() {
                return Err(CoreError::Validation(
                    "Maturity Date is required for Fixed Deposit.".into(),
                ));
            }
        }

        let asset_name = if market {
            form.selected_symbol.trim().to_string()
        } else {
            form.asset_name.trim().to_string()
        };

        Ok(InvestmentEntry {
            id: Uuid::new_v4(),
            date_time,
            out_account: form.out_account.trim().to_string(),
            asset_class: form.asset_class,
            asset_name,
            amount: form.amount,
            price_per_unit: if market { form.price_per_unit } else { None },
            units: if market { form.units } else { None },
            expected_roi: form.expected_roi,
            maturity_date: if form.asset_class == InvestAssetClass::FixedDeposit {
                form.maturity_date
            } else {
                None
            },
            tags: form.tags.clone(),
            notes: form.notes.clone(),
        })
    }

    /// Merge the candidate into an existing entry with the same
    /// (asset class, asset name), or prepend it as new. Either way the
    /// affected entry ends up at the front and the window stays capped.
    fn merge_or_append(&self, new: InvestmentEntry) -> InvestmentEntry {
        let mut entries = lock_unpoisoned(&self.entries);

        let existing_idx = entries
            .iter()
            .position(|e| e.asset_class == new.asset_class && e.asset_name == new.asset_name);

        let recorded = match existing_idx {
            None => {
                entries.insert(0, new.clone());
                new
            }
            Some(idx) => {
                let existing = entries.remove(idx);
                let merged = InvestmentEntry {
                    id: existing.id,
                    date_time: new.date_time,
                    out_account: new.out_account,
                    asset_class: existing.asset_class,
                    asset_name: existing.asset_name,
                    // amounts and units accumulate across submissions
                    amount: existing.amount + new.amount,
                    units: match (existing.units, new.units) {
                        (None, None) => None,
                        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
                    },
                    // newest transaction wins; older values survive only
                    // when the new submission left the field blank
                    price_per_unit: new.price_per_unit.or(existing.price_per_unit),
                    expected_roi: new.expected_roi.or(existing.expected_roi),
                    maturity_date: new.maturity_date.or(existing.maturity_date),
                    tags: join_fields(&existing.tags, &new.tags),
                    notes: join_fields(&existing.notes, &new.notes),
                };
                entries.insert(0, merged.clone());
                merged
            }
        };

        entries.truncate(self.window);
        recorded
    }

    fn account_lock(&self, account: &str) -> Arc<Mutex<()>> {
        let mut locks = lock_unpoisoned(&self.account_locks);
        locks
            .entry(account.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Concatenate two free-text fields, skipping empty sides.
fn join_fields(old: &str, new: &str) -> String {
    match (old.is_empty(), new.is_empty()) {
        (true, true) => String::new(),
        (false, true) => old.to_string(),
        (true, false) => new.to_string(),
        (false, false) => format!("{old} | {new}"),
    }
}

/// Lock a mutex, recovering the inner data if a previous holder
/// panicked.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
