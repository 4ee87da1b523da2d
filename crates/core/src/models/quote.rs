use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freshly resolved unit price for one identifier.
///
/// Ephemeral: produced per resolution attempt and consumed immediately
/// by the valuator. Quotes are never persisted or cached at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub identifier: String,
    pub unit_price: f64,
    pub as_of: DateTime<Utc>,
}

impl PriceQuote {
    #[must_use]
    pub fn new(identifier: impl Into<String>, unit_price: f64) -> Self {
        Self {
            identifier: identifier.into(),
            unit_price,
            as_of: Utc::now(),
        }
    }
}
