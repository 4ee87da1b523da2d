use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Derived current/invested/gain-loss figures for one holding.
/// Never stored — recomputed on every aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValuation {
    pub current_value: f64,
    pub invested_value: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
}

impl HoldingValuation {
    /// Build a valuation from the two source figures, deriving gain/loss
    /// and the division-safe percentage (0 when nothing was invested).
    #[must_use]
    pub fn from_values(current_value: f64, invested_value: f64) -> Self {
        let gain_loss = current_value - invested_value;
        Self {
            current_value,
            invested_value,
            gain_loss,
            gain_loss_percent: safe_percent(gain_loss, invested_value),
        }
    }
}

/// Reduction of one asset class's holding valuations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetClassSummary {
    /// Display label, e.g. "Stocks", "Crypto", "Gold".
    pub class_label: String,
    /// Icon name for the dashboard card.
    pub icon: String,
    pub total_value: f64,
    pub total_invested: f64,
    pub gain_loss: f64,
    pub gain_loss_percent: f64,
    pub holding_count: usize,
}

/// Whole-portfolio totals across every asset class, manual included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValue {
    pub total_assets: f64,
    pub total_invested: f64,
    pub return_amount: f64,
    pub return_percent: f64,
}

/// Portfolio value composed with liabilities.
///
/// `change_amount`/`change_percent` carry the unrealized since-purchase
/// return of the portfolio, not a rolling 24-hour delta. The dashboard
/// labels them "24h change"; the computation is the contract here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorth {
    pub net_worth: f64,
    pub total_assets: f64,
    pub total_liabilities: f64,
    pub change_amount: f64,
    pub change_percent: f64,
}

/// One enriched holding row for the dashboard tables.
/// `quantity` and `current_price` are absent for manual holdings, whose
/// values are user-maintained rather than price-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuatedHolding {
    pub external_id: String,
    pub class_label: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub current_price: Option<f64>,
    pub total_invested: f64,
    pub current_value: f64,
    pub pnl: f64,
}

/// Per-holding rows plus portfolio totals, one payload per dashboard load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDashboard {
    pub assets: Vec<ValuatedHolding>,
    pub total_invested: f64,
    pub total_current_value: f64,
    pub total_pnl: f64,
}

/// A point-in-time record of one user's total portfolio value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub user_id: String,
    pub snapshot_date: NaiveDate,
    pub total_value: f64,
}

/// `part / whole * 100`, with 0 instead of a division by zero.
#[must_use]
pub fn safe_percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        (part / whole) * 100.0
    } else {
        0.0
    }
}
