use thiserror::Error;

/// Unified error type for the vault-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No price provider available for asset class: {0}")]
    NoProvider(String),

    #[error("Price not available for {identifier} ({class})")]
    PriceNotAvailable {
        identifier: String,
        class: String,
    },

    #[error("Price lookup for {identifier} timed out after {millis}ms")]
    Timeout {
        identifier: String,
        millis: u64,
    },

    // ── Required dependencies ───────────────────────────────────────
    #[error("Holdings repository unavailable: {0}")]
    HoldingsUnavailable(String),

    #[error("Expense source unavailable: {0}")]
    ExpensesUnavailable(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Insufficient balance in {account}. Available: ₹{available:.2} (short by ₹{shortfall:.2})")]
    InsufficientBalance {
        account: String,
        available: f64,
        shortfall: f64,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so
        // provider credentials never end up in logs or error states.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}
