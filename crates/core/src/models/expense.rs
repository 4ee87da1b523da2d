use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded expense. The net-worth calculator treats the sum of all
/// expense amounts as the liabilities figure; everything else on the
/// record is display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: DateTime<Utc>,
    pub category: String,
    pub amount: f64,
}
