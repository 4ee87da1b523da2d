use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use crate::models::valuation::PortfolioSnapshot;

/// How many daily snapshots are kept per user.
pub const DEFAULT_HISTORY_DEPTH: usize = 365;

/// Keeps a bounded per-user history of total portfolio value, one
/// point per day. Pure bookkeeping — the caller computes the total
/// (through the same fallback-aware valuation path as every read) and
/// hands it in.
pub struct SnapshotService {
    depth: usize,
    history: Mutex<HashMap<String, Vec<PortfolioSnapshot>>>,
}

impl SnapshotService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }

    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self {
            depth,
            history: Mutex::new(HashMap::new()),
        }
    }

    /// Record a snapshot for one user.
    ///
    /// A second snapshot on the same date replaces the first — the
    /// history holds at most one point per day, oldest first. Once the
    /// depth is exceeded, the oldest points are dropped.
    pub fn record(&self, user_id: &str, date: NaiveDate, total_value: f64) -> PortfolioSnapshot {
        let snapshot = PortfolioSnapshot {
            user_id: user_id.to_string(),
            snapshot_date: date,
            total_value,
        };

        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        let points = history.entry(user_id.to_string()).or_default();

        match points.binary_search_by_key(&date, |p| p.snapshot_date) {
            Ok(idx) => points[idx] = snapshot.clone(),
            Err(idx) => points.insert(idx, snapshot.clone()),
        }

        if points.len() > self.depth {
            let excess = points.len() - self.depth;
            points.drain(..excess);
        }

        snapshot
    }

    /// The recorded history for one user, oldest first.
    #[must_use]
    pub fn history(&self, user_id: &str) -> Vec<PortfolioSnapshot> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for SnapshotService {
    fn default() -> Self {
        Self::new()
    }
}
